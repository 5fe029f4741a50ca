//! Debounced search against the catalog

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::SearchSettings;
use crate::model::{FetchClient, FetchError, MediaCategory, Query, ResultStore};
use super::sync::ViewSynchronizer;

/// What the search bar and scope bar currently show
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub term: String,
    pub category: MediaCategory,
}

struct ActiveSearch {
    id: u64,
    cancel: CancellationToken,
}

/// Owns the debounce timer and the single in-flight search.
#[derive(Clone)]
pub struct SearchCoordinator {
    client: Arc<dyn FetchClient>,
    settings: SearchSettings,
    store: ResultStore,
    sync: Arc<ViewSynchronizer>,
    live: Arc<Mutex<SearchInput>>,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
    active: Arc<Mutex<Option<ActiveSearch>>>,
    next_search: Arc<AtomicU64>,
}

impl SearchCoordinator {
    pub fn new(
        client: Arc<dyn FetchClient>,
        settings: SearchSettings,
        store: ResultStore,
        sync: Arc<ViewSynchronizer>,
    ) -> Self {
        Self {
            client,
            settings,
            store,
            sync,
            live: Arc::new(Mutex::new(SearchInput::default())),
            pending: Arc::new(Mutex::new(None)),
            active: Arc::new(Mutex::new(None)),
            next_search: Arc::new(AtomicU64::new(1)),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub async fn is_searching(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Record new input and restart the debounce timer. A pending timer
    /// from earlier input is dropped without issuing a request.
    pub async fn on_search_input_changed(&self, term: impl Into<String>, category: MediaCategory) {
        let input = SearchInput {
            term: term.into(),
            category,
        };
        tracing::trace!(term = %input.term, category = ?input.category, "Search input changed");
        *self.live.lock().await = input;

        let this = self.clone();
        let debounce = self.settings.debounce;
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // Once the window has elapsed the search must not be torn down
            // by a later abort of this timer
            tokio::spawn(async move {
                this.fetch_matching_items().await;
            });
        }));
    }

    /// Drop the pending timer and cancel the active search, if any
    pub async fn cancel(&self) {
        if let Some(pending) = self.pending.lock().await.take() {
            pending.abort();
        }
        if let Some(active) = self.active.lock().await.take() {
            tracing::debug!(search = active.id, "Cancelling search");
            active.cancel.cancel();
        }
    }

    /// Start a search for the current input, superseding any active one.
    pub async fn fetch_matching_items(&self) -> JoinHandle<()> {
        let input = self.live.lock().await.clone();
        let search_id = self.next_search.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        {
            let mut active = self.active.lock().await;
            if let Some(previous) = active.take() {
                tracing::debug!(search = previous.id, "Cancelling superseded search");
                previous.cancel.cancel();
            }
            *active = Some(ActiveSearch {
                id: search_id,
                cancel: cancel.clone(),
            });
        }

        let this = self.clone();
        tokio::spawn(async move {
            this.run_search(search_id, input, cancel).await;
        })
    }

    async fn run_search(&self, search_id: u64, input: SearchInput, cancel: CancellationToken) {
        if input.term.is_empty() {
            tracing::debug!(search = search_id, "Empty search term, clearing results");
            self.store.clear().await;
        } else {
            let query = Query::new(
                input.term.clone(),
                input.category,
                self.settings.lang.clone(),
                self.settings.limit,
            );

            match self.client.search(&query, &cancel).await {
                Ok(items) => {
                    if self.is_current(&input).await {
                        let count = items.len();
                        let snapshot = self.store.replace(items).await;
                        tracing::info!(search = search_id, term = %input.term, count, snapshot, "Search completed");
                    } else {
                        tracing::debug!(search = search_id, term = %input.term, "Discarding stale search results");
                    }
                }
                Err(FetchError::Cancelled) => {
                    tracing::debug!(search = search_id, term = %input.term, "Search cancelled");
                }
                Err(e) => {
                    if self.is_current(&input).await {
                        tracing::warn!(search = search_id, term = %input.term, error = %e, "Search failed");
                        self.store.clear().await;
                    } else {
                        tracing::debug!(search = search_id, error = %e, "Ignoring failure of stale search");
                    }
                }
            }
        }

        self.sync.apply_current(&self.store).await;

        let mut active = self.active.lock().await;
        if active.as_ref().is_some_and(|a| a.id == search_id) {
            *active = None;
        }
    }

    async fn is_current(&self, input: &SearchInput) -> bool {
        *self.live.lock().await == *input
    }
}
