//! Structural validation of content entries.
//!
//! Validation is a pure check over an already-parsed entry. Malformed content
//! never panics here; every problem becomes a [`ValidationError`] carrying the
//! path of the offending field (using the authored camelCase names).

use thiserror::Error;

use super::entry::{Category, ContentEntry, LevelContent, Relationship, MAX_LEVEL, MIN_LEVEL};

/// One invariant violation inside a single entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct ValidationError {
    /// Field path, e.g. `levels.3.summary` or `crossReferences[0].relationship`
    pub path: String,

    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Validate an entry, returning the first problem found
pub fn validate(entry: &ContentEntry) -> Result<(), ValidationError> {
    match collect_issues(entry).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Collect every problem in an entry, in field order
pub fn collect_issues(entry: &ContentEntry) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    if entry.id.trim().is_empty() {
        issues.push(ValidationError::new("id", "must not be empty"));
    }

    if entry.name.trim().is_empty() {
        issues.push(ValidationError::new("name", "must not be empty"));
    }
    check_placeholder("name", &entry.name, &mut issues);

    if let Some(name_es) = &entry.name_es {
        check_placeholder("nameEs", name_es, &mut issues);
    }

    if let Category::Unrecognized(label) = &entry.category {
        issues.push(ValidationError::new(
            "category",
            format!(
                "unknown category \"{}\" (expected one of: {})",
                label,
                joined_labels(Category::ALL.iter().map(Category::label))
            ),
        ));
    }

    for level in MIN_LEVEL..=MAX_LEVEL {
        if !entry.levels.contains_key(&level) {
            issues.push(ValidationError::new(
                format!("levels.{}", level),
                "missing complexity level",
            ));
        }
    }

    for (&key, content) in &entry.levels {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&key) {
            issues.push(ValidationError::new(
                format!("levels.{}", key),
                format!("level key outside {}..={}", MIN_LEVEL, MAX_LEVEL),
            ));
            continue;
        }
        check_level(key, content, &mut issues);
    }

    for (i, reference) in entry.cross_references.iter().enumerate() {
        let base = format!("crossReferences[{}]", i);

        if reference.target_id.trim().is_empty() {
            issues.push(ValidationError::new(
                format!("{}.targetId", base),
                "must not be empty",
            ));
        }

        if let Relationship::Unrecognized(label) = &reference.relationship {
            issues.push(ValidationError::new(
                format!("{}.relationship", base),
                format!(
                    "unknown relationship \"{}\" (expected one of: {})",
                    label,
                    joined_labels(Relationship::ALL.iter().map(Relationship::label))
                ),
            ));
        }
    }

    issues
}

fn check_level(key: u8, content: &LevelContent, issues: &mut Vec<ValidationError>) {
    let base = format!("levels.{}", key);

    if content.level != key {
        issues.push(ValidationError::new(
            format!("{}.level", base),
            format!("level {} does not match its key {}", content.level, key),
        ));
    }

    if content.summary.trim().is_empty() {
        issues.push(ValidationError::new(
            format!("{}.summary", base),
            "must not be empty",
        ));
    }

    if content.explanation.trim().is_empty() {
        issues.push(ValidationError::new(
            format!("{}.explanation", base),
            "must not be empty",
        ));
    }

    check_placeholder(&format!("{}.summary", base), &content.summary, issues);
    check_placeholder(&format!("{}.explanation", base), &content.explanation, issues);
    if let Some(notes) = &content.clinical_notes {
        check_placeholder(&format!("{}.clinicalNotes", base), notes, issues);
    }

    for (i, term) in content.key_terms.iter().enumerate() {
        if contains_placeholder(&term.term) || contains_placeholder(&term.definition) {
            issues.push(ValidationError::new(
                format!("{}.keyTerms[{}]", base, i),
                format!("key term \"{}\" contains placeholder text", term.term),
            ));
        }
        if term.term.trim().is_empty() {
            issues.push(ValidationError::new(
                format!("{}.keyTerms[{}].term", base, i),
                "must not be empty",
            ));
        }
        if term.definition.trim().is_empty() {
            issues.push(ValidationError::new(
                format!("{}.keyTerms[{}].definition", base, i),
                "must not be empty",
            ));
        }
    }
}

/// Words that mark unfinished authoring
const PLACEHOLDER_WORDS: [&str; 3] = ["TODO", "FIXME", "PLACEHOLDER"];

/// Whether `text` contains a placeholder marker as a whole word (any case).
///
/// Word characters are ASCII letters, digits and `_`, so "TODOs" or
/// "TODO_list" are not markers but "(todo)" is.
fn contains_placeholder(text: &str) -> bool {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| PLACEHOLDER_WORDS.iter().any(|p| word.eq_ignore_ascii_case(p)))
}

fn check_placeholder(path: &str, text: &str, issues: &mut Vec<ValidationError>) {
    if contains_placeholder(text) {
        issues.push(ValidationError::new(
            path,
            format!("contains placeholder text: {}", text.trim()),
        ));
    }
}

fn joined_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}
