//! edukb - In-process knowledge base of multi-level educational content
//!
//! Entries (e.g. "Acupuncture", "Ginkgo Biloba") carry five complexity
//! levels of explanation, key terms, citations and weak cross-references.
//! A complete batch of entries is validated once into an immutable
//! [`Corpus`]; a [`KnowledgeBase`] over it answers lookups, category
//! filters/summaries and free-text search.
//!
//! # Modules
//!
//! - `schema`: Entry data types and validation
//! - `corpus`: Corpus store and category index
//! - `search`: Case-insensitive substring search
//! - `core`: Retrieval façade and snapshot replacement
//! - `loader`: Reading content files from disk
//! - `config`: Paths and search field configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Validate a content directory
//! edukb --content ./content validate
//!
//! # Search and look up
//! edukb search acupuncture
//! edukb show tai-chi --level 3
//! edukb summary
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod corpus;
pub mod loader;
pub mod schema;
pub mod search;

// Re-export main types at crate root for convenience
pub use crate::core::{KnowledgeBase, SharedKnowledgeBase};
pub use corpus::{Corpus, LoadError, LoadProblem, LookupError};
pub use schema::{
    validate, Category, ContentEntry, CrossReference, LevelContent, Relationship, ValidationError,
};
pub use search::SearchField;
