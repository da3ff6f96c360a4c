//! Content file loading.
//!
//! Reads authored entries from a directory tree before a corpus is built.
//! Each `*.json`, `*.yaml` or `*.yml` file holds either a single entry or a
//! list of entries. Files are read in sorted path order so the resulting
//! sequence (and therefore corpus insertion order) is deterministic.
//!
//! # Layout
//!
//! ```text
//! ~/.edukb/content/
//! ├── mind-body/
//! │   ├── tai-chi.yaml
//! │   └── yoga-therapy.yaml
//! └── herbal.json               # list of entries
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tokio::fs;
use tracing::{debug, info};

use crate::schema::ContentEntry;

/// File extensions recognized as content files
pub const CONTENT_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// List content files under `dir`, sorted by path
pub fn content_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let root = Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();

    for ext in CONTENT_EXTENSIONS {
        let pattern = format!("{}/**/*.{}", root, ext);
        let paths = glob::glob(&pattern)
            .with_context(|| format!("Invalid content pattern: {}", pattern))?;

        for path in paths {
            let path = path.context("Failed to read content directory entry")?;
            if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Load every entry under `dir`, in sorted file order
pub async fn load_dir(dir: &Path) -> Result<Vec<ContentEntry>> {
    if !fs::try_exists(dir).await.unwrap_or(false) {
        anyhow::bail!("Content directory not found: {}", dir.display());
    }

    let mut entries = Vec::new();
    let files = content_files(dir)?;

    for path in &files {
        let loaded = load_file(path).await?;
        debug!(path = %path.display(), entries = loaded.len(), "Loaded content file");
        entries.extend(loaded);
    }

    info!(
        dir = %dir.display(),
        files = files.len(),
        entries = entries.len(),
        "Loaded content"
    );

    Ok(entries)
}

/// Load the entries in one file
pub async fn load_file(path: &Path) -> Result<Vec<ContentEntry>> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read content file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        parse_json(&text)
    } else {
        parse_yaml(&text)
    };

    parsed.with_context(|| format!("Failed to parse content file: {}", path.display()))
}

/// Parse a JSON document holding one entry or a list of entries
pub fn parse_json(text: &str) -> Result<Vec<ContentEntry>> {
    let OneOrMany(entries) = serde_json::from_str(text)?;
    Ok(entries)
}

/// Parse a YAML document holding one entry or a list of entries
pub fn parse_yaml(text: &str) -> Result<Vec<ContentEntry>> {
    let OneOrMany(entries) = serde_yaml::from_str(text)?;
    Ok(entries)
}

/// A file body: a single entry (map) or a list of entries (sequence).
///
/// Decoded in one pass straight into [`ContentEntry`], so a field repeated
/// inside an entry is reported instead of the last value winning.
struct OneOrMany(Vec<ContentEntry>);

impl<'de> Deserialize<'de> for OneOrMany {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OneOrManyVisitor;

        impl<'de> Visitor<'de> for OneOrManyVisitor {
            type Value = OneOrMany;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a content entry or a list of content entries")
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let entry = ContentEntry::deserialize(MapAccessDeserializer::new(map))?;
                Ok(OneOrMany(vec![entry]))
            }

            fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                Vec::<ContentEntry>::deserialize(SeqAccessDeserializer::new(seq)).map(OneOrMany)
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Category;
    use tempfile::TempDir;

    const YAML_ENTRY: &str = r#"
id: tai-chi
name: Tai Chi
category: mind-body
levels:
  1: { level: 1, summary: Slow movement, explanation: Gentle exercise }
createdAt: 2026-02-05
updatedAt: 2026-02-05
version: 1
"#;

    const JSON_LIST: &str = r#"[
        { "id": "ginkgo", "name": "Ginkgo", "category": "herbal", "levels": {},
          "createdAt": "2026-02-05", "updatedAt": "2026-02-05", "version": 1 },
        { "id": "echinacea", "name": "Echinacea", "category": "herbal", "levels": {},
          "createdAt": "2026-02-05", "updatedAt": "2026-02-05", "version": 3 }
    ]"#;

    #[test]
    fn test_parse_single_and_list() {
        let single = parse_yaml(YAML_ENTRY).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].category, Category::MindBody);
        assert_eq!(single[0].level(1).unwrap().summary, "Slow movement");

        let list = parse_json(JSON_LIST).unwrap();
        let ids: Vec<&str> = list.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ginkgo", "echinacea"]);
        assert_eq!(list[1].version, 3);
    }

    #[test]
    fn test_parse_rejects_repeated_field() {
        let json = r#"{ "id": "a", "id": "b", "name": "A", "category": "herbal", "levels": {},
                        "createdAt": "2026-02-05", "updatedAt": "2026-02-05", "version": 1 }"#;
        let err = parse_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate field `id`"));

        let list = format!("[{}]", json);
        assert!(parse_json(&list).is_err());

        let yaml = YAML_ENTRY.replace("name: Tai Chi", "name: Tai Chi\nname: Taiji");
        let err = parse_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_parse_rejects_scalar_document() {
        assert!(parse_json("42").is_err());
        assert!(parse_yaml("just text").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_required_field() {
        assert!(parse_json(r#"{ "id": "x", "name": "X" }"#).is_err());
    }

    #[tokio::test]
    async fn test_load_dir_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("mind-body")).unwrap();
        std::fs::write(temp.path().join("mind-body").join("tai-chi.yaml"), YAML_ENTRY).unwrap();
        std::fs::write(temp.path().join("herbal.json"), JSON_LIST).unwrap();
        std::fs::write(temp.path().join("notes.txt"), "not content").unwrap();

        let entries = load_dir(temp.path()).await.unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();

        // herbal.json sorts before mind-body/tai-chi.yaml
        assert_eq!(ids, vec!["ginkgo", "echinacea", "tai-chi"]);
    }

    #[tokio::test]
    async fn test_load_dir_missing() {
        let temp = TempDir::new().unwrap();
        let err = load_dir(&temp.path().join("nope")).await.unwrap_err();
        assert!(err.to_string().contains("Content directory not found"));
    }

    #[tokio::test]
    async fn test_parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("broken.json"), "{ not json").unwrap();

        let err = load_dir(temp.path()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
