//! Category index: category -> entries, precomputed at build time.

use std::collections::BTreeMap;

use crate::schema::{Category, ContentEntry};

use super::store::Corpus;

/// Derived view mapping each category to the positions of its entries.
///
/// Holds positions into the corpus it was built from, never the entries
/// themselves; it must only be queried with that same corpus.
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    fingerprint: String,
    corpus_len: usize,
    positions: BTreeMap<Category, Vec<usize>>,
}

impl CategoryIndex {
    /// Build the index from a corpus, preserving insertion order per category
    pub(crate) fn build(corpus: &Corpus) -> Self {
        let mut positions: BTreeMap<Category, Vec<usize>> = BTreeMap::new();
        for (position, entry) in corpus.entries().iter().enumerate() {
            positions
                .entry(entry.category.clone())
                .or_default()
                .push(position);
        }

        Self {
            fingerprint: corpus.fingerprint().to_string(),
            corpus_len: corpus.len(),
            positions,
        }
    }

    /// Entries in a category, in insertion order (empty if none)
    pub fn entries_in<'c>(&self, corpus: &'c Corpus, category: &Category) -> Vec<&'c ContentEntry> {
        self.assert_same_snapshot(corpus);

        self.positions
            .get(category)
            .map(|positions| positions.iter().map(|&p| corpus.entry_at(p)).collect())
            .unwrap_or_default()
    }

    /// Count per category, listing only categories with at least one entry
    pub fn summary(&self) -> BTreeMap<Category, usize> {
        self.positions
            .iter()
            .map(|(category, positions)| (category.clone(), positions.len()))
            .collect()
    }

    /// Categories that have at least one entry, in taxonomy order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.positions.keys()
    }

    fn assert_same_snapshot(&self, corpus: &Corpus) {
        assert!(
            self.corpus_len == corpus.len() && self.fingerprint == corpus.fingerprint(),
            "category index queried with a corpus it was not built from"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LevelContent;

    fn complete(id: &str, category: Category) -> ContentEntry {
        (1..=5).fold(ContentEntry::new(id, id, category), |entry, level| {
            entry.with_level(LevelContent::new(level, "Summary", "Explanation"))
        })
    }

    fn sample() -> Corpus {
        Corpus::build(vec![
            complete("ginkgo", Category::Herbal),
            complete("tai-chi", Category::MindBody),
            complete("echinacea", Category::Herbal),
            complete("acupuncture", Category::ManualTherapy),
        ])
        .unwrap()
    }

    #[test]
    fn test_entries_in_keeps_insertion_order() {
        let corpus = sample();
        let index = CategoryIndex::build(&corpus);

        let ids: Vec<&str> = index
            .entries_in(&corpus, &Category::Herbal)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ginkgo", "echinacea"]);
    }

    #[test]
    fn test_unused_category_is_empty() {
        let corpus = sample();
        let index = CategoryIndex::build(&corpus);

        assert!(index.entries_in(&corpus, &Category::Safety).is_empty());
        assert!(index
            .entries_in(&corpus, &Category::Unrecognized("x".to_string()))
            .is_empty());
    }

    #[test]
    fn test_summary_omits_empty_categories() {
        let corpus = sample();
        let summary = CategoryIndex::build(&corpus).summary();

        assert_eq!(summary.len(), 3);
        assert_eq!(summary[&Category::Herbal], 2);
        assert_eq!(summary[&Category::MindBody], 1);
        assert_eq!(summary[&Category::ManualTherapy], 1);
        assert!(!summary.contains_key(&Category::Safety));
    }

    #[test]
    fn test_categories_in_taxonomy_order() {
        let corpus = sample();
        let index = CategoryIndex::build(&corpus);

        let categories: Vec<&Category> = index.categories().collect();
        assert_eq!(
            categories,
            vec![
                &Category::MindBody,
                &Category::ManualTherapy,
                &Category::Herbal
            ]
        );
    }

    #[test]
    #[should_panic(expected = "not built from")]
    fn test_foreign_corpus_is_rejected() {
        let corpus = sample();
        let index = CategoryIndex::build(&corpus);
        let other = Corpus::build(vec![complete("other", Category::Herbal)]).unwrap();

        index.entries_in(&other, &Category::Herbal);
    }

    #[test]
    #[should_panic(expected = "not built from")]
    fn test_recategorized_corpus_is_rejected() {
        let corpus = sample();
        let index = CategoryIndex::build(&corpus);
        let recategorized = Corpus::build(vec![
            complete("ginkgo", Category::Herbal),
            complete("tai-chi", Category::Safety),
            complete("echinacea", Category::Herbal),
            complete("acupuncture", Category::ManualTherapy),
        ])
        .unwrap();

        index.entries_in(&recategorized, &Category::MindBody);
    }
}
