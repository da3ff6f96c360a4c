//! Corpus store: the authoritative, validated set of entries for one snapshot.
//!
//! A corpus is built once from a complete batch and never mutated. Updating
//! the knowledge base means building a new corpus.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::schema::{collect_issues, ContentEntry, LevelContent, ValidationError};

/// Immutable snapshot of validated entries keyed by id
#[derive(Debug)]
pub struct Corpus {
    /// Entries in source (insertion) order
    entries: Vec<ContentEntry>,

    /// id -> position in `entries`
    by_id: HashMap<String, usize>,

    /// Short digest identifying this snapshot
    fingerprint: String,
}

impl Corpus {
    /// Build a corpus from a complete batch of entries.
    ///
    /// Every entry is validated and every id collision is detected before
    /// anything is returned; if any problem exists, all of them are reported
    /// in one [`LoadError`] and no corpus is produced.
    pub fn build(entries: impl IntoIterator<Item = ContentEntry>) -> Result<Self, LoadError> {
        let entries: Vec<ContentEntry> = entries.into_iter().collect();
        let mut problems = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            for error in collect_issues(entry) {
                problems.push(LoadProblem::Invalid {
                    index,
                    id: entry.id.clone(),
                    error,
                });
            }

            // Blank ids are already reported above
            if entry.id.trim().is_empty() {
                continue;
            }

            // First occurrence stays; later ones are reported, never overwrite
            match by_id.get(&entry.id) {
                Some(&first_index) => problems.push(LoadProblem::DuplicateId {
                    id: entry.id.clone(),
                    first_index,
                    second_index: index,
                }),
                None => {
                    by_id.insert(entry.id.clone(), index);
                }
            }
        }

        if !problems.is_empty() {
            warn!(problems = problems.len(), "Corpus build rejected");
            return Err(LoadError { problems });
        }

        let fingerprint = compute_fingerprint(&entries);
        let corpus = Self {
            entries,
            by_id,
            fingerprint,
        };

        for (source_id, target_id) in corpus.dangling_references() {
            warn!(source_id, target_id, "Cross-reference target not in corpus");
        }

        info!(
            entries = corpus.len(),
            fingerprint = %corpus.fingerprint,
            "Corpus built"
        );

        Ok(corpus)
    }

    /// Look up an entry by id
    pub fn get_by_id(&self, id: &str) -> Result<&ContentEntry, LookupError> {
        self.get(id)
            .ok_or_else(|| LookupError::NotFound(id.to_string()))
    }

    /// Look up an entry by id, as an Option
    pub fn get(&self, id: &str) -> Option<&ContentEntry> {
        self.by_id.get(id).map(|&pos| &self.entries[pos])
    }

    /// Look up one complexity level of an entry (no fallback to other levels)
    pub fn level(&self, id: &str, level: u8) -> Result<&LevelContent, LookupError> {
        self.get_by_id(id)?
            .level(level)
            .ok_or_else(|| LookupError::LevelNotFound {
                id: id.to_string(),
                level,
            })
    }

    /// Check whether an id is present
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub(crate) fn entry_at(&self, position: usize) -> &ContentEntry {
        &self.entries[position]
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Short hex digest over (id, category, version, updatedAt) of every entry
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Cross-references whose target is absent, as (source id, target id).
    ///
    /// These are tolerated: cross-references are weak.
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        let corpus = self;
        self.entries
            .iter()
            .flat_map(move |entry| {
                entry
                    .cross_references
                    .iter()
                    .filter(move |r| !corpus.contains(&r.target_id))
                    .map(move |r| (entry.id.as_str(), r.target_id.as_str()))
            })
            .collect()
    }
}

fn compute_fingerprint(entries: &[ContentEntry]) -> String {
    let mut hasher = Sha256::new();
    for entry in entries {
        hasher.update(entry.id.as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.category.label().as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.version.to_le_bytes());
        hasher.update(entry.updated_at.to_string().as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();

    // First 8 bytes (16 hex chars)
    hex::encode(&digest[..8])
}

/// A single problem found while building a corpus
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadProblem {
    #[error("entry #{index} ({id:?}) is invalid: {error}")]
    Invalid {
        index: usize,
        id: String,
        error: ValidationError,
    },

    #[error("duplicate id {id:?} at entries #{first_index} and #{second_index}")]
    DuplicateId {
        id: String,
        first_index: usize,
        second_index: usize,
    },
}

/// Corpus-level build failure aggregating every problem found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("corpus build failed with {} problem(s):\n{}", .problems.len(), render_problems(.problems))]
pub struct LoadError {
    pub problems: Vec<LoadProblem>,
}

impl LoadError {
    /// Ids involved in collisions, in detection order
    pub fn duplicate_ids(&self) -> Vec<&str> {
        self.problems
            .iter()
            .filter_map(|p| match p {
                LoadProblem::DuplicateId { id, .. } => Some(id.as_str()),
                LoadProblem::Invalid { .. } => None,
            })
            .collect()
    }

    /// Validation failures only
    pub fn validation_errors(&self) -> Vec<&ValidationError> {
        self.problems
            .iter()
            .filter_map(|p| match p {
                LoadProblem::Invalid { error, .. } => Some(error),
                LoadProblem::DuplicateId { .. } => None,
            })
            .collect()
    }
}

fn render_problems(problems: &[LoadProblem]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {}", p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Expected, recoverable lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No entry with id {0:?}")]
    NotFound(String),

    #[error("Entry {id:?} has no complexity level {level}")]
    LevelNotFound { id: String, level: u8 },
}
