//! Thread-safe handle around a [`HierarchyTreeStore`]
//!
//! Every mutation is one transaction under a single lock. Readers get owned
//! snapshots, never references into the live store.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::application::store::{HierarchyTreeStore, StoreSnapshot};
use crate::domain::{Forest, Node};

#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<HierarchyTreeStore>>,
}

impl SharedStore {
    pub fn new(store: HierarchyTreeStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` as one atomic transaction.
    pub fn transact<R>(&self, f: impl FnOnce(&mut HierarchyTreeStore) -> R) -> R {
        let mut guard = self.inner.lock();
        trace!("transaction start");
        f(&mut *guard)
    }

    /// Read under the lock; `f` must return owned data.
    pub fn read<R>(&self, f: impl FnOnce(&HierarchyTreeStore) -> R) -> R {
        let guard = self.inner.lock();
        f(&*guard)
    }

    pub fn data(&self) -> Forest {
        self.read(HierarchyTreeStore::data)
    }

    pub fn selected(&self) -> Option<Node> {
        self.read(|store| store.selected().cloned())
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.read(HierarchyTreeStore::snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::application::props::HierarchyProps;
    use crate::application::store::StoreOptions;
    use crate::domain::FieldValue;

    #[test]
    fn given_concurrent_generated_appends_when_joined_then_all_ids_distinct() {
        let forest = Forest::new(vec![Node::new().with_field("id", "1").with_empty_children()]);
        let store =
            HierarchyTreeStore::new(HierarchyProps::new(forest), StoreOptions::default()).unwrap();
        let shared = SharedStore::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.transact(|s| {
                        s.add_generated_child(&FieldValue::from("1"), Default::default())
                    })
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let data = shared.data();
        assert_eq!(data.roots()[0].children().len(), 8);
        assert!(data.duplicate_keys("id").is_empty());
    }

    #[test]
    fn given_snapshot_when_store_mutates_then_snapshot_unchanged() {
        let forest = Forest::new(vec![Node::new().with_field("id", "1").with_empty_children()]);
        let store =
            HierarchyTreeStore::new(HierarchyProps::new(forest), StoreOptions::default()).unwrap();
        let shared = SharedStore::new(store);

        let before = shared.data();
        shared
            .transact(|s| s.append_child(&"1".into(), Node::new().with_field("id", "1-1")))
            .unwrap();

        assert!(before.roots()[0].children().is_empty());
        assert_eq!(shared.data().roots()[0].children().len(), 1);
    }
}
