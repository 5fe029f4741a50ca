//! Scripted fetch client and fixtures for unit tests

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::model::{FetchClient, FetchError, Item, ItemId, Query, ResultSnapshot, RESULTS_SECTION};
use crate::model::encode_png;

pub(crate) fn item(id: u64) -> Item {
    Item {
        id: ItemId(id),
        name: format!("Item {id}"),
        artist: format!("Artist {id}"),
        artwork_url: artwork_url(id),
        kind: "feature-movie".to_string(),
        release_date: None,
    }
}

pub(crate) fn items(ids: impl IntoIterator<Item = u64>) -> Vec<Item> {
    ids.into_iter().map(item).collect()
}

pub(crate) fn artwork_url(id: u64) -> String {
    format!("https://artwork.test/{id}.png")
}

pub(crate) fn snapshot(id: u64, ids: &[u64]) -> ResultSnapshot {
    ResultSnapshot {
        id,
        section: RESULTS_SECTION,
        items: Arc::from(items(ids.iter().copied())),
    }
}

/// Poll `check` until it holds, failing the test after a few seconds.
pub(crate) async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..2000 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not reached");
}

struct Script<T> {
    outcome: Result<T, FetchError>,
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
pub(crate) struct MockClient {
    searches: Mutex<HashMap<String, Script<Vec<Item>>>>,
    search_calls: Mutex<Vec<Query>>,
    images: Mutex<HashMap<String, Script<Bytes>>>,
    image_calls: Mutex<Vec<String>>,
    ignore_cancellation: AtomicBool,
}

impl MockClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_search(&self, term: &str, outcome: Result<Vec<Item>, FetchError>) {
        self.searches
            .lock()
            .unwrap()
            .insert(term.to_string(), Script { outcome, gate: None });
    }

    /// The search for `term` waits until the returned gate is notified.
    pub fn on_search_gated(&self, term: &str, outcome: Result<Vec<Item>, FetchError>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.searches.lock().unwrap().insert(
            term.to_string(),
            Script {
                outcome,
                gate: Some(Arc::clone(&gate)),
            },
        );
        gate
    }

    pub fn on_image(&self, url: &str, outcome: Result<Bytes, FetchError>) {
        self.images
            .lock()
            .unwrap()
            .insert(url.to_string(), Script { outcome, gate: None });
    }

    pub fn on_image_gated(&self, url: &str, outcome: Result<Bytes, FetchError>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.images.lock().unwrap().insert(
            url.to_string(),
            Script {
                outcome,
                gate: Some(Arc::clone(&gate)),
            },
        );
        gate
    }

    /// Let requests finish with their scripted outcome even after cancellation,
    /// like a response that was already on the wire.
    pub fn ignore_cancellation(&self) {
        self.ignore_cancellation.store(true, Ordering::SeqCst);
    }

    pub fn search_calls(&self) -> Vec<Query> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn search_terms(&self) -> Vec<String> {
        self.search_calls().into_iter().map(|q| q.term).collect()
    }

    pub fn image_calls(&self) -> Vec<String> {
        self.image_calls.lock().unwrap().clone()
    }

    async fn run<T>(
        &self,
        outcome: Result<T, FetchError>,
        gate: Option<Arc<Notify>>,
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        let respond = async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            outcome
        };

        if self.ignore_cancellation.load(Ordering::SeqCst) {
            return respond.await;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = respond => result,
        }
    }
}

#[async_trait]
impl FetchClient for MockClient {
    async fn search(&self, query: &Query, cancel: &CancellationToken) -> Result<Vec<Item>, FetchError> {
        self.search_calls.lock().unwrap().push(query.clone());
        let (outcome, gate) = match self.searches.lock().unwrap().get(&query.term) {
            Some(script) => (script.outcome.clone(), script.gate.clone()),
            None => (Ok(Vec::new()), None),
        };
        self.run(outcome, gate, cancel).await
    }

    async fn fetch_image(&self, url: &str, cancel: &CancellationToken) -> Result<Bytes, FetchError> {
        self.image_calls.lock().unwrap().push(url.to_string());
        let (outcome, gate) = match self.images.lock().unwrap().get(url) {
            Some(script) => (script.outcome.clone(), script.gate.clone()),
            None => (Ok(encode_png(4, 4, [90, 90, 90])), None),
        };
        self.run(outcome, gate, cancel).await
    }
}
