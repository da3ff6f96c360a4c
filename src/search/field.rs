//! Searchable text fields of an entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::ContentEntry;

/// A group of entry text that search scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchField {
    /// Display name
    Name,

    /// Synonyms
    AlternateNames,

    /// Localized display name (`nameEs`)
    LocalizedName,

    Description,

    /// Every level's summary, explanation and patient counseling points
    Levels,

    PatientExplanation,

    Mechanism,

    EvidenceLevel,

    Indications,

    Risks,

    Interactions,

    /// Every level's key terms, both term and definition
    KeyTerms,

    /// Tag keywords
    Keywords,
}

impl SearchField {
    /// Default field set (everything)
    pub const ALL: [SearchField; 13] = [
        SearchField::Name,
        SearchField::AlternateNames,
        SearchField::LocalizedName,
        SearchField::Description,
        SearchField::Levels,
        SearchField::PatientExplanation,
        SearchField::Mechanism,
        SearchField::EvidenceLevel,
        SearchField::Indications,
        SearchField::Risks,
        SearchField::Interactions,
        SearchField::KeyTerms,
        SearchField::Keywords,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::AlternateNames => "alternate-names",
            SearchField::LocalizedName => "localized-name",
            SearchField::Description => "description",
            SearchField::Levels => "levels",
            SearchField::PatientExplanation => "patient-explanation",
            SearchField::Mechanism => "mechanism",
            SearchField::EvidenceLevel => "evidence-level",
            SearchField::Indications => "indications",
            SearchField::Risks => "risks",
            SearchField::Interactions => "interactions",
            SearchField::KeyTerms => "key-terms",
            SearchField::Keywords => "keywords",
        }
    }

    /// Append this field's texts for `entry`, in document order
    pub fn collect<'e>(self, entry: &'e ContentEntry, out: &mut Vec<&'e str>) {
        match self {
            SearchField::Name => out.push(&entry.name),
            SearchField::AlternateNames => out.extend(entry.alternate_names.iter().map(String::as_str)),
            SearchField::LocalizedName => out.extend(entry.name_es.as_deref()),
            SearchField::Description => out.extend(entry.description.as_deref()),
            SearchField::Levels => {
                for level in entry.levels.values() {
                    out.push(&level.summary);
                    out.push(&level.explanation);
                    out.extend(level.patient_counseling_points.iter().map(String::as_str));
                }
            }
            SearchField::PatientExplanation => out.extend(entry.patient_explanation.as_deref()),
            SearchField::Mechanism => out.extend(entry.mechanism.as_deref()),
            SearchField::EvidenceLevel => out.extend(entry.evidence_level.as_deref()),
            SearchField::Indications => out.extend(entry.indications.iter().map(String::as_str)),
            SearchField::Risks => out.extend(entry.risks.iter().map(String::as_str)),
            SearchField::Interactions => out.extend(entry.interactions.iter().map(String::as_str)),
            SearchField::KeyTerms => {
                for level in entry.levels.values() {
                    for key_term in &level.key_terms {
                        out.push(&key_term.term);
                        out.push(&key_term.definition);
                    }
                }
            }
            SearchField::Keywords => out.extend(entry.tags.keywords.iter().map(String::as_str)),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim().to_lowercase();
        match Self::ALL.into_iter().find(|f| f.label() == wanted) {
            Some(field) => Ok(field),
            None => anyhow::bail!("Unknown search field: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Category, LevelContent};

    #[test]
    fn test_field_labels_round_trip() {
        for field in SearchField::ALL {
            assert_eq!(field.label().parse::<SearchField>().unwrap(), field);
        }
        assert!("body".parse::<SearchField>().is_err());
    }

    #[test]
    fn test_serde_labels_match_display() {
        let json = serde_json::to_string(&SearchField::KeyTerms).unwrap();
        assert_eq!(json, "\"key-terms\"");
    }

    #[test]
    fn test_collect_levels_and_key_terms() {
        let entry = ContentEntry::new("a", "Acupuncture", Category::ManualTherapy)
            .with_level(
                LevelContent::new(1, "Needles", "Thin needles at points")
                    .with_key_term("acupoint", "Defined insertion site")
                    .with_counseling_point("Mild soreness is common"),
            );

        let mut texts = Vec::new();
        SearchField::Levels.collect(&entry, &mut texts);
        assert_eq!(
            texts,
            vec!["Needles", "Thin needles at points", "Mild soreness is common"]
        );

        texts.clear();
        SearchField::KeyTerms.collect(&entry, &mut texts);
        assert_eq!(texts, vec!["acupoint", "Defined insertion site"]);
    }

    #[test]
    fn test_absent_optional_fields_contribute_nothing() {
        let entry = ContentEntry::new("a", "Acupuncture", Category::ManualTherapy);
        let mut texts = Vec::new();
        SearchField::Description.collect(&entry, &mut texts);
        SearchField::LocalizedName.collect(&entry, &mut texts);
        assert!(texts.is_empty());
    }
}
