//! Content entry data types.
//!
//! These types mirror the authored content records (camelCase field names on
//! the wire). Closed vocabularies that authors can get wrong (category,
//! relationship kind) keep unrecognized labels around so that validation can
//! report them instead of the parser rejecting the whole file.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Simplest complexity level
pub const MIN_LEVEL: u8 = 1;

/// Most advanced complexity level
pub const MAX_LEVEL: u8 = 5;

/// Category of an entry (closed taxonomy)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    MindBody,
    ManualTherapy,
    Herbal,
    Nutritional,
    EnergyMedicine,
    Traditional,
    EvidenceEvaluation,
    Safety,

    /// A label outside the taxonomy, kept verbatim for error reporting
    Unrecognized(String),
}

impl Category {
    /// Every member of the taxonomy, in declaration order
    pub const ALL: [Category; 8] = [
        Category::MindBody,
        Category::ManualTherapy,
        Category::Herbal,
        Category::Nutritional,
        Category::EnergyMedicine,
        Category::Traditional,
        Category::EvidenceEvaluation,
        Category::Safety,
    ];

    /// Kebab-case label used in content files
    pub fn label(&self) -> &str {
        match self {
            Category::MindBody => "mind-body",
            Category::ManualTherapy => "manual-therapy",
            Category::Herbal => "herbal",
            Category::Nutritional => "nutritional",
            Category::EnergyMedicine => "energy-medicine",
            Category::Traditional => "traditional",
            Category::EvidenceEvaluation => "evidence-evaluation",
            Category::Safety => "safety",
            Category::Unrecognized(label) => label,
        }
    }

    /// Whether this category is a member of the taxonomy
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self::from_label(&label).unwrap_or(Category::Unrecognized(label))
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match Self::from_label(&s.trim().to_lowercase()) {
            Some(category) => Ok(category),
            None => anyhow::bail!("Unknown category: {}", s),
        }
    }
}

/// Kind of relationship a cross-reference expresses
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relationship {
    Parent,
    Child,
    Sibling,
    Related,
    SeeAlso,

    /// A label outside the closed set, kept verbatim for error reporting
    Unrecognized(String),
}

impl Relationship {
    /// Every valid relationship kind
    pub const ALL: [Relationship; 5] = [
        Relationship::Parent,
        Relationship::Child,
        Relationship::Sibling,
        Relationship::Related,
        Relationship::SeeAlso,
    ];

    pub fn label(&self) -> &str {
        match self {
            Relationship::Parent => "parent",
            Relationship::Child => "child",
            Relationship::Sibling => "sibling",
            Relationship::Related => "related",
            Relationship::SeeAlso => "see-also",
            Relationship::Unrecognized(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Relationship::Unrecognized(_))
    }
}

impl From<String> for Relationship {
    fn from(label: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|r| r.label() == label)
            .unwrap_or(Relationship::Unrecognized(label))
    }
}

impl From<Relationship> for String {
    fn from(relationship: Relationship) -> Self {
        relationship.label().to_string()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What sort of thing an entry (or a cross-reference target) describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Structure,
    System,
    Pathway,
    Process,
    Condition,
    Concept,
    #[default]
    Topic,
}

/// Editorial status set by the authoring process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Review,
    #[default]
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClinicalRelevance {
    Low,
    Medium,
    High,
    Critical,
}

/// A term defined in the context of one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub definition: String,
}

/// Attached media (image, video, diagram); passive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Bibliographic reference; passive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    #[serde(rename = "type")]
    pub citation_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// Weak pointer to another entry by id.
///
/// The target is not guaranteed to exist in the same corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub target_id: String,
    #[serde(default)]
    pub target_type: ContentKind,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRelevance {
    #[serde(default)]
    pub usmle: bool,
    #[serde(default)]
    pub nbme: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shelf: Vec<String>,
}

/// Classification facets used for filtering and search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTags {
    #[serde(default)]
    pub systems: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_relevance: Option<ClinicalRelevance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_relevance: Option<ExamRelevance>,
}

/// One complexity tier of an entry (1 = simplest, 5 = most advanced)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelContent {
    /// Must equal its key in the owning `levels` map
    pub level: u8,

    pub summary: String,

    pub explanation: String,

    /// Duplicate terms are kept as separate entries
    #[serde(default)]
    pub key_terms: Vec<KeyTerm>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analogies: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patient_counseling_points: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,
}

impl LevelContent {
    /// Create level content with the required fields
    pub fn new(level: u8, summary: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            level,
            summary: summary.into(),
            explanation: explanation.into(),
            key_terms: Vec::new(),
            analogies: Vec::new(),
            examples: Vec::new(),
            patient_counseling_points: Vec::new(),
            clinical_notes: None,
        }
    }

    /// Add a key term
    pub fn with_key_term(mut self, term: impl Into<String>, definition: impl Into<String>) -> Self {
        self.key_terms.push(KeyTerm {
            term: term.into(),
            definition: definition.into(),
        });
        self
    }

    pub fn with_counseling_point(mut self, point: impl Into<String>) -> Self {
        self.patient_counseling_points.push(point.into());
        self
    }

    pub fn with_clinical_notes(mut self, notes: impl Into<String>) -> Self {
        self.clinical_notes = Some(notes.into());
        self
    }
}

/// One named unit of knowledge with multi-level content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    /// Sole identity key; unique across a corpus
    pub id: String,

    pub name: String,

    /// Localized display name (Spanish in the current content)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_es: Option<String>,

    /// Synonyms, used only for search
    #[serde(default)]
    pub alternate_names: Vec<String>,

    #[serde(default, rename = "type")]
    pub kind: ContentKind,

    pub category: Category,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_explanation: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indications: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risks: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<String>,

    /// Complexity level -> content; complete entries hold exactly 1..=5
    #[serde(deserialize_with = "deserialize_levels")]
    pub levels: BTreeMap<u8, LevelContent>,

    #[serde(default)]
    pub media: Vec<MediaRef>,

    #[serde(default)]
    pub citations: Vec<Citation>,

    #[serde(default)]
    pub cross_references: Vec<CrossReference>,

    #[serde(default)]
    pub tags: ContentTags,

    pub created_at: NaiveDate,

    pub updated_at: NaiveDate,

    /// Set by the authoring process; stored, never enforced
    pub version: u32,

    #[serde(default)]
    pub status: ContentStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<String>,
}

impl ContentEntry {
    /// Create an entry with no levels, dated today at version 1
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: id.into(),
            name: name.into(),
            name_es: None,
            alternate_names: Vec::new(),
            kind: ContentKind::default(),
            category,
            description: None,
            evidence_level: None,
            mechanism: None,
            patient_explanation: None,
            indications: Vec::new(),
            risks: Vec::new(),
            interactions: Vec::new(),
            levels: BTreeMap::new(),
            media: Vec::new(),
            citations: Vec::new(),
            cross_references: Vec::new(),
            tags: ContentTags::default(),
            created_at: today,
            updated_at: today,
            version: 1,
            status: ContentStatus::default(),
            contributors: Vec::new(),
        }
    }

    /// Insert level content under its own level number
    pub fn with_level(mut self, content: LevelContent) -> Self {
        self.levels.insert(content.level, content);
        self
    }

    pub fn with_name_es(mut self, name_es: impl Into<String>) -> Self {
        self.name_es = Some(name_es.into());
        self
    }

    pub fn with_alternate_name(mut self, name: impl Into<String>) -> Self {
        self.alternate_names.push(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_patient_explanation(mut self, text: impl Into<String>) -> Self {
        self.patient_explanation = Some(text.into());
        self
    }

    pub fn with_mechanism(mut self, mechanism: impl Into<String>) -> Self {
        self.mechanism = Some(mechanism.into());
        self
    }

    pub fn with_evidence_level(mut self, evidence_level: impl Into<String>) -> Self {
        self.evidence_level = Some(evidence_level.into());
        self
    }

    pub fn with_indications(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.indications.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn with_risks(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.risks.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn with_interactions(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.interactions.extend(items.into_iter().map(Into::into));
        self
    }

    /// Add a cross-reference to another entry
    pub fn with_cross_reference(
        mut self,
        target_id: impl Into<String>,
        relationship: Relationship,
    ) -> Self {
        self.cross_references.push(CrossReference {
            target_id: target_id.into(),
            target_type: ContentKind::default(),
            relationship,
            label: None,
        });
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.tags.keywords.push(keyword.into());
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Content at a specific complexity level (no fallback to other levels)
    pub fn level(&self, level: u8) -> Option<&LevelContent> {
        self.levels.get(&level)
    }
}

/// Read the `levels` map, rejecting a level number that appears twice
fn deserialize_levels<'de, D>(deserializer: D) -> Result<BTreeMap<u8, LevelContent>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LevelsVisitor;

    impl<'de> Visitor<'de> for LevelsVisitor {
        type Value = BTreeMap<u8, LevelContent>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of complexity level to level content")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut levels = BTreeMap::new();
            while let Some((key, content)) = map.next_entry::<u8, LevelContent>()? {
                match levels.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert(content);
                    }
                    Entry::Occupied(_) => {
                        return Err(de::Error::custom(format!(
                            "duplicate complexity level {}",
                            key
                        )));
                    }
                }
            }
            Ok(levels)
        }
    }

    deserializer.deserialize_map(LevelsVisitor)
}
