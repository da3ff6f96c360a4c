//! Corpus store and the category index derived from it.
//!
//! A [`Corpus`] owns every entry of one snapshot. The [`CategoryIndex`] is a
//! recomputable view over it and is rebuilt whenever a new corpus is built.

pub mod index;
pub mod store;

pub use index::CategoryIndex;
pub use store::{Corpus, LoadError, LoadProblem, LookupError};
