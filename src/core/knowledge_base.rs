//! Retrieval façade combining the corpus, category index and search index.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use crate::corpus::{CategoryIndex, Corpus, LoadError, LookupError};
use crate::schema::{Category, ContentEntry, LevelContent};
use crate::search::{SearchField, SearchIndex};

/// Read-only knowledge base over one corpus snapshot.
///
/// The derived indexes are built together with the corpus they describe and
/// are never updated on their own. Every query is a pure function of the
/// snapshot and its arguments, so a `KnowledgeBase` can be shared across
/// threads without locking.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    corpus: Arc<Corpus>,
    categories: CategoryIndex,
    search: SearchIndex,
}

impl KnowledgeBase {
    /// Validate `entries` and build a knowledge base searching every field
    pub fn build(entries: impl IntoIterator<Item = ContentEntry>) -> Result<Self, LoadError> {
        Ok(Self::new(Corpus::build(entries)?))
    }

    /// Wrap a built corpus, searching every field
    pub fn new(corpus: Corpus) -> Self {
        Self::with_search_fields(corpus, &SearchField::ALL)
    }

    /// Wrap a built corpus, searching only `fields`
    #[instrument(skip_all, fields(entries = corpus.len()))]
    pub fn with_search_fields(corpus: Corpus, search_fields: &[SearchField]) -> Self {
        let categories = CategoryIndex::build(&corpus);
        let search = SearchIndex::build(&corpus, search_fields);

        Self {
            corpus: Arc::new(corpus),
            categories,
            search,
        }
    }

    /// The underlying corpus snapshot
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Snapshot identifier
    pub fn fingerprint(&self) -> &str {
        self.corpus.fingerprint()
    }

    /// Fields scanned by [`search`](Self::search)
    pub fn search_fields(&self) -> &[SearchField] {
        self.search.fields()
    }

    /// Look up an entry by id
    pub fn get_by_id(&self, id: &str) -> Result<&ContentEntry, LookupError> {
        self.corpus.get_by_id(id)
    }

    /// Look up one complexity level of an entry
    pub fn get_level(&self, id: &str, level: u8) -> Result<&LevelContent, LookupError> {
        self.corpus.level(id, level)
    }

    /// Entries in a category, in insertion order
    pub fn filter_by_category(&self, category: &Category) -> Vec<&ContentEntry> {
        self.categories.entries_in(&self.corpus, category)
    }

    /// Entries in the category named by `label`; unknown labels yield nothing
    pub fn filter_by_category_label(&self, label: &str) -> Vec<&ContentEntry> {
        match label.parse::<Category>() {
            Ok(category) => self.filter_by_category(&category),
            Err(_) => Vec::new(),
        }
    }

    /// Entry count per category present in the corpus
    pub fn category_summary(&self) -> BTreeMap<Category, usize> {
        self.categories.summary()
    }

    /// Case-insensitive substring search, in insertion order
    pub fn search(&self, query: &str) -> Vec<&ContentEntry> {
        self.search.search(&self.corpus, query)
    }
}
