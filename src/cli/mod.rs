//! Command-line interface for edukb.
//!
//! A thin wrapper translating the retrieval operations to a terminal:
//! show an entry, filter by category, summarize categories, search, and
//! validate a content directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config;
use crate::core::KnowledgeBase;
use crate::corpus::Corpus;
use crate::loader;
use crate::schema::{Category, ContentEntry, LevelContent};

/// edukb - Multi-level educational content knowledge base
#[derive(Parser, Debug)]
#[command(name = "edukb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content directory (overrides config and EDUKB_CONTENT)
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show an entry by id
    Show {
        /// Entry ID
        id: String,

        /// Show only this complexity level (1-5)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        level: Option<u8>,
    },

    /// List entries in a category
    Category {
        /// Category label (e.g. "herbal", "manual-therapy")
        label: String,
    },

    /// Count entries per category
    Summary,

    /// Search entries (case-insensitive substring)
    Search {
        /// Search query
        query: String,

        /// Maximum number of results to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Validate every content file without serving queries
    Validate,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let json = self.json;
        let content = self.content;

        match self.command {
            Commands::Show { id, level } => {
                let kb = open(content).await?;
                show_entry(&kb, &id, level, json)
            }
            Commands::Category { label } => {
                let kb = open(content).await?;
                list_category(&kb, &label, json)
            }
            Commands::Summary => {
                let kb = open(content).await?;
                show_summary(&kb, json)
            }
            Commands::Search { query, limit } => {
                let kb = open(content).await?;
                search(&kb, &query, limit, json)
            }
            Commands::Validate => validate(content).await,
            Commands::Config => show_config(),
        }
    }
}

fn resolve_content_dir(content: Option<PathBuf>) -> Result<PathBuf> {
    match content {
        Some(dir) => Ok(dir),
        None => config::content_dir(),
    }
}

/// Load content and build the knowledge base with configured search fields
async fn open(content: Option<PathBuf>) -> Result<KnowledgeBase> {
    let dir = resolve_content_dir(content)?;
    let entries = loader::load_dir(&dir).await?;
    let corpus = Corpus::build(entries)
        .with_context(|| format!("Invalid content in {}", dir.display()))?;

    let fields = &config::config()?.search.fields;
    Ok(KnowledgeBase::with_search_fields(corpus, fields))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

fn print_table(entries: &[&ContentEntry]) {
    println!("{:<36} {:<20} {:<40}", "ID", "CATEGORY", "NAME");
    println!("{}", "-".repeat(96));

    for entry in entries {
        println!(
            "{:<36} {:<20} {:<40}",
            truncate(&entry.id, 36),
            entry.category.to_string(),
            truncate(&entry.name, 40)
        );
    }
}

fn print_level(content: &LevelContent) {
    println!("Level {}: {}", content.level, content.summary);
    println!();
    println!("{}", content.explanation.trim());

    if !content.key_terms.is_empty() {
        println!();
        println!("Key terms:");
        for term in &content.key_terms {
            println!("  {}: {}", term.term, term.definition);
        }
    }
    if let Some(notes) = &content.clinical_notes {
        println!();
        println!("Clinical notes: {}", notes);
    }
}

/// Show one entry, or one level of it
fn show_entry(kb: &KnowledgeBase, id: &str, level: Option<u8>, json: bool) -> Result<()> {
    if let Some(level) = level {
        let content = kb.get_level(id, level)?;
        return if json {
            print_json(content)
        } else {
            print_level(content);
            Ok(())
        };
    }

    let entry = kb.get_by_id(id)?;
    if json {
        return print_json(entry);
    }

    println!("ID:        {}", entry.id);
    println!("Name:      {}", entry.name);
    if let Some(name_es) = &entry.name_es {
        println!("Name (es): {}", name_es);
    }
    println!("Category:  {}", entry.category);
    println!("Version:   {} (updated {})", entry.version, entry.updated_at);
    if !entry.alternate_names.is_empty() {
        println!("Also:      {}", entry.alternate_names.join(", "));
    }
    if let Some(description) = &entry.description {
        println!();
        println!("{}", description);
    }

    println!();
    println!("Levels:");
    for content in entry.levels.values() {
        println!("  {}. {}", content.level, content.summary);
    }

    if !entry.cross_references.is_empty() {
        println!();
        println!("See also:");
        for reference in &entry.cross_references {
            let marker = if kb.corpus().contains(&reference.target_id) {
                ""
            } else {
                " (not loaded)"
            };
            println!(
                "  {} [{}]{}",
                reference.target_id, reference.relationship, marker
            );
        }
    }

    Ok(())
}

fn list_category(kb: &KnowledgeBase, label: &str, json: bool) -> Result<()> {
    let entries = kb.filter_by_category_label(label);

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No entries in category: {}", label);
        return Ok(());
    }

    print_table(&entries);
    Ok(())
}

fn show_summary(kb: &KnowledgeBase, json: bool) -> Result<()> {
    let summary = kb.category_summary();

    if json {
        return print_json(&summary);
    }

    println!(
        "{} entries (snapshot {})\n",
        kb.corpus().len(),
        kb.fingerprint()
    );
    for (category, count) in &summary {
        println!("  {:<22} {}", category.to_string(), count);
    }

    Ok(())
}

fn search(kb: &KnowledgeBase, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let mut results = kb.search(query);
    if let Some(limit) = limit {
        results.truncate(limit);
    }

    if json {
        return print_json(&results);
    }

    if results.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", results.len(), query);
    print_table(&results);
    Ok(())
}

/// Validate a content directory, reporting every problem at once
async fn validate(content: Option<PathBuf>) -> Result<()> {
    let dir = resolve_content_dir(content)?;
    let entries = loader::load_dir(&dir).await?;

    match Corpus::build(entries) {
        Ok(corpus) => {
            println!(
                "OK: {} entries valid (snapshot {})",
                corpus.len(),
                corpus.fingerprint()
            );
            let dangling = corpus.dangling_references();
            if !dangling.is_empty() {
                println!("\n{} cross-reference(s) to entries not loaded:", dangling.len());
                for (source, target) in dangling {
                    println!("  {} -> {}", source, target);
                }
            }
            Ok(())
        }
        Err(err) => {
            for problem in &err.problems {
                eprintln!("  - {}", problem);
            }
            anyhow::bail!(
                "{} problem(s) found in {}",
                err.problems.len(),
                dir.display()
            )
        }
    }
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("edukb configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Content: {}", cfg.content.display());
    println!();
    println!("Search fields:");
    for field in &cfg.search.fields {
        println!("  {}", field);
    }
    println!();
    println!("Categories:");
    for category in Category::ALL {
        println!("  {}", category);
    }

    Ok(())
}
