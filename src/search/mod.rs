//! Free-text search over a corpus.
//!
//! Matching is a case-insensitive substring test over a configurable set of
//! fields. See [`index`] for the folding and field-boundary rules.

pub mod field;
pub mod index;

pub use field::SearchField;
pub use index::{fold, SearchIndex, FIELD_SEPARATOR};
