//! Whole-snapshot replacement for embedding applications.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::knowledge_base::KnowledgeBase;

/// Handle holding the current knowledge base snapshot.
///
/// Readers take a [`snapshot`](Self::snapshot) and run all of their queries
/// against it; a concurrent [`replace`](Self::replace) swaps the whole
/// snapshot at once, so one reader never sees entries from two builds.
#[derive(Debug)]
pub struct SharedKnowledgeBase {
    current: RwLock<Arc<KnowledgeBase>>,
}

impl SharedKnowledgeBase {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self {
            current: RwLock::new(Arc::new(kb)),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<KnowledgeBase> {
        // The guarded value is a single Arc, which a panicking writer cannot leave half-written
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new snapshot, returning the previous one
    pub fn replace(&self, kb: KnowledgeBase) -> Arc<KnowledgeBase> {
        let next = Arc::new(kb);
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        info!(
            from = %current.fingerprint(),
            to = %next.fingerprint(),
            entries = next.corpus().len(),
            "Knowledge base replaced"
        );

        std::mem::replace(&mut *current, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Category, ContentEntry, LevelContent};

    fn kb(ids: &[&str]) -> KnowledgeBase {
        KnowledgeBase::build(ids.iter().map(|id| {
            (1..=5).fold(ContentEntry::new(*id, *id, Category::Safety), |entry, level| {
                entry.with_level(LevelContent::new(level, "Summary", "Explanation"))
            })
        }))
        .unwrap()
    }

    #[test]
    fn test_old_snapshot_survives_replace() {
        let shared = SharedKnowledgeBase::new(kb(&["a"]));
        let before = shared.snapshot();

        let previous = shared.replace(kb(&["b", "c"]));
        let after = shared.snapshot();

        assert!(Arc::ptr_eq(&before, &previous));
        assert!(before.get_by_id("a").is_ok());
        assert!(before.get_by_id("b").is_err());
        assert_eq!(after.corpus().len(), 2);
        assert!(after.get_by_id("a").is_err());
        assert_ne!(before.fingerprint(), after.fingerprint());
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let shared = Arc::new(SharedKnowledgeBase::new(kb(&["a", "b"])));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = shared.snapshot();
                        let total: usize = snapshot.category_summary().values().sum();
                        assert_eq!(total, snapshot.corpus().len());
                        let len = snapshot.search("summary").len();
                        assert!(len == 2 || len == 3);
                    }
                })
            })
            .collect();

        shared.replace(kb(&["x", "y", "z"]));

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(shared.snapshot().corpus().len(), 3);
    }
}
