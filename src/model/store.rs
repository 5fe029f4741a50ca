//! Current search results and the snapshots handed to the presentations

use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::{Item, ItemId};

/// Section every result row belongs to
pub const RESULTS_SECTION: &str = "Results";

/// Immutable view of the result list at one point in time
#[derive(Clone, Debug)]
pub struct ResultSnapshot {
    pub id: u64,
    pub section: &'static str,
    pub items: Arc<[Item]>,
}

impl ResultSnapshot {
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

struct StoreState {
    items: Arc<[Item]>,
    snapshot_id: u64,
}

/// Holds the current result list. Replaced wholesale, never edited in place.
#[derive(Clone)]
pub struct ResultStore {
    state: Arc<RwLock<StoreState>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                items: Arc::from(Vec::new()),
                snapshot_id: 0,
            })),
        }
    }

    pub async fn replace(&self, items: Vec<Item>) -> u64 {
        let mut state = self.state.write().await;
        state.items = Arc::from(items);
        state.snapshot_id += 1;
        state.snapshot_id
    }

    pub async fn clear(&self) -> u64 {
        self.replace(Vec::new()).await
    }

    pub async fn snapshot(&self) -> ResultSnapshot {
        let state = self.state.read().await;
        ResultSnapshot {
            id: state.snapshot_id,
            section: RESULTS_SECTION,
            items: Arc::clone(&state.items),
        }
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::item;

    #[tokio::test]
    async fn replace_bumps_snapshot_id() {
        let store = ResultStore::new();
        let first = store.snapshot().await;
        assert_eq!(first.id, 0);
        assert!(first.is_empty());

        store.replace(vec![item(1), item(2)]).await;
        let second = store.snapshot().await;
        assert_eq!(second.id, 1);
        assert_eq!(second.ids(), vec![ItemId(1), ItemId(2)]);
        assert_eq!(second.section, RESULTS_SECTION);

        store.clear().await;
        let third = store.snapshot().await;
        assert_eq!(third.id, 2);
        assert!(third.is_empty());
        // Earlier snapshots are unaffected by later replacements
        assert_eq!(second.len(), 2);
    }
}
