//! Retrieval API.
//!
//! This module contains:
//! - KnowledgeBase: get-by-id, category filter/summary and search over one snapshot
//! - SharedKnowledgeBase: atomic whole-snapshot replacement

pub mod knowledge_base;
pub mod shared;

// Re-export commonly used types
pub use knowledge_base::KnowledgeBase;
pub use shared::SharedKnowledgeBase;
