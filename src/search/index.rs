//! Case-insensitive substring search over precomputed haystacks.
//!
//! Each entry's searchable fields are folded and joined with
//! [`FIELD_SEPARATOR`] once, when the index is built. A query matches an
//! entry iff the folded query is a substring of that haystack. Folding maps
//! the separator itself to a space, so no query can match across a field
//! boundary.
//!
//! Results keep corpus insertion order. There is no ranking.

use tracing::debug;

use crate::corpus::Corpus;
use crate::schema::ContentEntry;

use super::field::SearchField;

/// Joins folded fields inside a haystack (ASCII unit separator)
pub const FIELD_SEPARATOR: char = '\u{1F}';

/// Fold text for matching.
///
/// Lowercases character by character (no context-sensitive rules), so every
/// substring of a text folds to a substring of the folded text.
pub fn fold(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        if c == FIELD_SEPARATOR {
            folded.push(' ');
        } else {
            folded.extend(c.to_lowercase());
        }
    }
    folded
}

/// Derived view holding one folded haystack per corpus entry
#[derive(Debug, Clone)]
pub struct SearchIndex {
    fingerprint: String,
    fields: Vec<SearchField>,
    haystacks: Vec<String>,
}

impl SearchIndex {
    /// Build over the given fields (duplicates are ignored)
    pub(crate) fn build(corpus: &Corpus, fields: &[SearchField]) -> Self {
        let mut unique: Vec<SearchField> = Vec::with_capacity(fields.len());
        for &field in fields {
            if !unique.contains(&field) {
                unique.push(field);
            }
        }

        let haystacks = corpus
            .entries()
            .iter()
            .map(|entry| haystack(entry, &unique))
            .collect();

        Self {
            fingerprint: corpus.fingerprint().to_string(),
            fields: unique,
            haystacks,
        }
    }

    /// Fields this index scans
    pub fn fields(&self) -> &[SearchField] {
        &self.fields
    }

    /// Entries matching `query`, in corpus insertion order.
    ///
    /// The empty query matches nothing. No match is an empty result, not an
    /// error.
    pub fn search<'c>(&self, corpus: &'c Corpus, query: &str) -> Vec<&'c ContentEntry> {
        assert!(
            self.haystacks.len() == corpus.len() && self.fingerprint == corpus.fingerprint(),
            "search index queried with a corpus it was not built from"
        );

        if query.is_empty() {
            debug!("Empty search query");
            return Vec::new();
        }

        let needle = fold(query);
        let results: Vec<&ContentEntry> = self
            .haystacks
            .iter()
            .enumerate()
            .filter(|(_, haystack)| haystack.contains(needle.as_str()))
            .map(|(position, _)| corpus.entry_at(position))
            .collect();

        debug!(query, matches = results.len(), "Search completed");
        results
    }
}

fn haystack(entry: &ContentEntry, fields: &[SearchField]) -> String {
    let mut texts = Vec::new();
    for field in fields {
        field.collect(entry, &mut texts);
    }

    let separator = FIELD_SEPARATOR.to_string();
    texts
        .into_iter()
        .map(fold)
        .collect::<Vec<_>>()
        .join(&separator)
}
