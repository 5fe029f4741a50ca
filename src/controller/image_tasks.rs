//! Per-row artwork loads
//!
//! Each presentation owns one `TaskRegistry`, keyed by its own row scheme.
//! A row key holds at most one load; requesting a new one cancels the old.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::MutexGuard as RowsGuard;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::model::{FetchClient, FetchError, PresentedList, RowImage, Thumbnail};

struct ImageTask {
    id: u64,
    cancel: CancellationToken,
}

/// Tracks the in-flight artwork load of every row key.
///
/// Lock order is always rows, then the task map. A completing load holds
/// both while it checks that it is still the row's registered task and
/// writes the image, so it cannot interleave with `request_image`.
#[derive(Clone)]
pub struct TaskRegistry<K> {
    client: Arc<dyn FetchClient>,
    rows: Arc<tokio::sync::Mutex<PresentedList>>,
    tasks: Arc<Mutex<HashMap<K, ImageTask>>>,
    next_task: Arc<AtomicU64>,
}

impl<K> TaskRegistry<K>
where
    K: Copy + Eq + Hash + Debug + Send + Sync + 'static,
{
    pub fn new(client: Arc<dyn FetchClient>, rows: Arc<tokio::sync::Mutex<PresentedList>>) -> Self {
        Self {
            client,
            rows,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_task: Arc::new(AtomicU64::new(1)),
        }
    }

    fn lock_tasks(tasks: &Mutex<HashMap<K, ImageTask>>) -> MutexGuard<'_, HashMap<K, ImageTask>> {
        tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start loading `url` into row `index` under `key`.
    ///
    /// `rows` must guard the registry's own row list; the placeholder is
    /// written before this returns.
    pub fn request_image(
        &self,
        rows: &mut RowsGuard<'_, PresentedList>,
        key: K,
        index: usize,
        url: String,
    ) -> JoinHandle<()> {
        debug_assert!(
            std::ptr::eq(RowsGuard::mutex(rows), &*self.rows),
            "request_image called with another list's rows"
        );
        let task_id = self.next_task.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        {
            let mut tasks = Self::lock_tasks(&self.tasks);
            let previous = tasks.insert(
                key,
                ImageTask {
                    id: task_id,
                    cancel: cancel.clone(),
                },
            );
            if let Some(previous) = previous {
                tracing::trace!(?key, superseded = previous.id, "Cancelling artwork load");
                previous.cancel.cancel();
            }
        }

        rows.set_image(index, RowImage::Placeholder);

        let client = Arc::clone(&self.client);
        let rows = Arc::clone(&self.rows);
        let tasks = Arc::clone(&self.tasks);

        tokio::spawn(async move {
            let outcome = match client.fetch_image(&url, &cancel).await {
                Ok(bytes) => Thumbnail::decode(bytes).await,
                Err(e) => Err(e),
            };

            let mut rows = rows.lock().await;
            let mut tasks = Self::lock_tasks(&tasks);
            let current = tasks.get(&key).is_some_and(|task| task.id == task_id);

            match outcome {
                Ok(thumbnail) if current => {
                    rows.set_image(index, RowImage::Loaded(thumbnail));
                    tracing::trace!(?key, url = %url, "Artwork loaded");
                }
                Ok(_) => {
                    tracing::debug!(?key, url = %url, "Dropping artwork for recycled row");
                }
                Err(FetchError::Cancelled) => {}
                Err(e) => {
                    tracing::warn!(?key, url = %url, error = %e, "Artwork load failed");
                    if current {
                        rows.set_image(index, RowImage::Placeholder);
                    }
                }
            }

            if current {
                tasks.remove(&key);
            }
        })
    }

    /// Cancel the load registered for `key`, if any.
    pub fn cancel(&self, key: K) -> bool {
        match Self::lock_tasks(&self.tasks).remove(&key) {
            Some(task) => {
                task.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, task) in Self::lock_tasks(&self.tasks).drain() {
            task.cancel.cancel();
        }
    }

    pub fn is_active(&self, key: K) -> bool {
        Self::lock_tasks(&self.tasks).contains_key(&key)
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        Self::lock_tasks(&self.tasks).len()
    }
}
