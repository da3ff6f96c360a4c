//! Configuration for edukb paths and search.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (EDUKB_HOME, EDUKB_CONTENT)
//! 2. Config file (.edukb/config.yaml)
//! 3. Defaults (~/.edukb, ~/.edukb/content)
//!
//! Config file discovery:
//! - Searches current directory and parents for .edukb/config.yaml
//! - `paths.content` is relative to the project root (parent of .edukb/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::search::SearchField;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub search: Option<SearchConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .edukb/)
    pub home: Option<String>,
    /// Content directory (relative to the project root)
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Fields scanned by search (kebab-case labels)
    pub fields: Option<Vec<SearchField>>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to edukb home
    pub home: PathBuf,
    /// Directory content files are loaded from
    pub content: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Search settings
    pub search: SearchSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub fields: Vec<SearchField>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            fields: SearchField::ALL.to_vec(),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".edukb").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Resolve a parsed config file into absolute settings, applying env overrides
fn resolve(config: ConfigFile, config_path: &Path, default_home: PathBuf) -> ResolvedConfig {
    let edukb_dir = config_path.parent().unwrap_or(Path::new("."));
    // Project root is the parent of .edukb/
    let base_dir = edukb_dir.parent().unwrap_or(Path::new("."));

    let home = if let Ok(env_home) = std::env::var("EDUKB_HOME") {
        PathBuf::from(env_home)
    } else if let Some(ref home_path) = config.paths.home {
        resolve_path(edukb_dir, home_path)
    } else {
        default_home
    };

    let content = if let Ok(env_content) = std::env::var("EDUKB_CONTENT") {
        PathBuf::from(env_content)
    } else if let Some(ref content_path) = config.paths.content {
        resolve_path(base_dir, content_path)
    } else {
        home.join("content")
    };

    let search = config
        .search
        .and_then(|s| s.fields)
        .filter(|fields| !fields.is_empty())
        .map(|fields| SearchSettings { fields })
        .unwrap_or_default();

    ResolvedConfig {
        home,
        content,
        config_file: Some(config_path.to_path_buf()),
        search,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".edukb");

    if let Some(config_path) = find_config_file() {
        let config = load_config_file(&config_path)?;
        return Ok(resolve(config, &config_path, default_home));
    }

    // No config file - use env vars or defaults
    let home = std::env::var("EDUKB_HOME")
        .map(PathBuf::from)
        .unwrap_or(default_home);

    let content = std::env::var("EDUKB_CONTENT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home.join("content"));

    Ok(ResolvedConfig {
        home,
        content,
        config_file: None,
        search: SearchSettings::default(),
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the content directory.
pub fn content_dir() -> Result<PathBuf> {
    Ok(config()?.content.clone())
}
