//! Entry schema: the shape of one knowledge-base record and its validation.
//!
//! - `entry`: data types (ContentEntry, LevelContent, CrossReference, ...)
//! - `validate`: pure structural checks producing ValidationError

pub mod entry;
pub mod validate;

pub use entry::{
    Category, Citation, ClinicalRelevance, ContentEntry, ContentKind, ContentStatus,
    ContentTags, CrossReference, ExamRelevance, KeyTerm, LevelContent, MediaRef, Relationship,
    MAX_LEVEL, MIN_LEVEL,
};
pub use validate::{collect_issues, validate, ValidationError};
