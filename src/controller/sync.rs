//! Applies result snapshots to the table and the grid

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::model::{FetchClient, PresentedList, ResultSnapshot, ResultStore};
use super::image_tasks::TaskRegistry;

/// Maps a row position to the key its artwork load is tracked under
pub trait RowLayout: Send + Sync + 'static {
    type Key: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Name used in logs
    const NAME: &'static str;

    fn key(&self, index: usize) -> Self::Key;

    /// Rows per visual line
    fn stride(&self) -> usize;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TableLayout;

impl RowLayout for TableLayout {
    type Key = usize;
    const NAME: &'static str = "table";

    fn key(&self, index: usize) -> usize {
        index
    }

    fn stride(&self) -> usize {
        1
    }
}

/// Cell position in the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridIndex {
    pub row: usize,
    pub column: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct GridLayout {
    pub columns: usize,
}

impl RowLayout for GridLayout {
    type Key = GridIndex;
    const NAME: &'static str = "grid";

    fn key(&self, index: usize) -> GridIndex {
        GridIndex {
            row: index / self.columns,
            column: index % self.columns,
        }
    }

    fn stride(&self) -> usize {
        self.columns
    }
}

/// One presentation: its rows and its own artwork registry
pub struct ListPresenter<L: RowLayout> {
    layout: L,
    rows: Arc<Mutex<PresentedList>>,
    registry: TaskRegistry<L::Key>,
}

impl<L: RowLayout> ListPresenter<L> {
    pub fn new(layout: L, client: Arc<dyn FetchClient>) -> Self {
        let rows = Arc::new(Mutex::new(PresentedList::new(layout.stride())));
        let registry = TaskRegistry::new(client, Arc::clone(&rows));
        Self {
            layout,
            rows,
            registry,
        }
    }

    pub fn rows(&self) -> &Arc<Mutex<PresentedList>> {
        &self.rows
    }

    #[cfg(test)]
    pub fn registry(&self) -> &TaskRegistry<L::Key> {
        &self.registry
    }

    pub async fn apply(&self, snapshot: &ResultSnapshot) {
        let mut rows = self.rows.lock().await;
        let changes = rows.apply(snapshot);

        // Rows that vanished or changed occupant no longer want the old load
        for index in changes.dropped.clone().chain(changes.reassigned.iter().copied()) {
            self.registry.cancel(self.layout.key(index));
        }

        let started = self.load_visible(&mut rows);

        if changes.diff.is_empty() {
            tracing::trace!(view = L::NAME, snapshot = snapshot.id, "Snapshot left rows unchanged");
            return;
        }
        tracing::debug!(
            view = L::NAME,
            snapshot = snapshot.id,
            rows = rows.len(),
            inserted = changes.diff.inserted.len(),
            removed = changes.diff.removed.len(),
            moved = changes.diff.moved.len(),
            artwork_loads = started,
            "Applied snapshot"
        );
    }

    pub async fn move_selection(&self, delta: isize) {
        let mut rows = self.rows.lock().await;
        rows.move_selection(delta);
        self.load_visible(&mut rows);
    }

    pub async fn move_lines(&self, lines: isize) {
        let mut rows = self.rows.lock().await;
        rows.move_lines(lines);
        self.load_visible(&mut rows);
    }

    pub async fn page(&self, forward: bool) {
        let mut rows = self.rows.lock().await;
        rows.page(forward);
        self.load_visible(&mut rows);
    }

    pub async fn set_visible_lines(&self, lines: usize) {
        let mut rows = self.rows.lock().await;
        if rows.set_visible_lines(lines) {
            self.load_visible(&mut rows);
        }
    }

    /// Start artwork loads for on-screen rows that have neither an image
    /// nor a load in flight. Returns how many were started.
    fn load_visible(&self, rows: &mut MutexGuard<'_, PresentedList>) -> usize {
        let pending: Vec<(usize, String)> = rows
            .visible_range()
            .filter_map(|index| {
                let row = rows.row(index)?;
                let wanted = !row.image.is_loaded()
                    && !row.item.artwork_url.is_empty()
                    && !self.registry.is_active(self.layout.key(index));
                wanted.then(|| (index, row.item.artwork_url.clone()))
            })
            .collect();

        let started = pending.len();
        for (index, url) in pending {
            self.registry.request_image(rows, self.layout.key(index), index, url);
        }
        started
    }
}

/// Keeps both presentations in step with the result store.
///
/// Applies are serialized: a new one waits for the previous one to finish,
/// and it reads the store only once it holds the apply lock, so an older
/// snapshot can never be applied over a newer one.
pub struct ViewSynchronizer {
    table: ListPresenter<TableLayout>,
    grid: ListPresenter<GridLayout>,
    apply_lock: Mutex<()>,
}

impl ViewSynchronizer {
    pub fn new(client: Arc<dyn FetchClient>, grid_columns: usize) -> Self {
        Self {
            table: ListPresenter::new(TableLayout, Arc::clone(&client)),
            grid: ListPresenter::new(
                GridLayout {
                    columns: grid_columns.max(1),
                },
                client,
            ),
            apply_lock: Mutex::new(()),
        }
    }

    pub fn table(&self) -> &ListPresenter<TableLayout> {
        &self.table
    }

    pub fn grid(&self) -> &ListPresenter<GridLayout> {
        &self.grid
    }

    /// Apply the store's current snapshot to both presentations.
    pub async fn apply_current(&self, store: &ResultStore) {
        let _serial = self.apply_lock.lock().await;
        let snapshot = store.snapshot().await;
        self.apply_both(&snapshot).await;
    }

    #[cfg(test)]
    pub async fn apply_snapshot(&self, snapshot: &ResultSnapshot) {
        let _serial = self.apply_lock.lock().await;
        self.apply_both(snapshot).await;
    }

    /// Cancel every artwork load in both presentations
    pub fn cancel_loads(&self) {
        self.table.registry.cancel_all();
        self.grid.registry.cancel_all();
    }

    async fn apply_both(&self, snapshot: &ResultSnapshot) {
        futures::join!(self.table.apply(snapshot), self.grid.apply(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{encode_png, FetchError, ItemId, RowImage};
    use crate::testing::{artwork_url, eventually, items, snapshot, MockClient};

    async fn settle<L: RowLayout>(presenter: &ListPresenter<L>) {
        let registry = presenter.registry();
        eventually(|| async move { registry.active_count() == 0 }).await;
    }

    async fn ids_of<L: RowLayout>(presenter: &ListPresenter<L>) -> Vec<ItemId> {
        presenter.rows().lock().await.ids()
    }

    #[test]
    fn grid_keys_follow_columns() {
        let layout = GridLayout { columns: 4 };
        assert_eq!(layout.key(0), GridIndex { row: 0, column: 0 });
        assert_eq!(layout.key(6), GridIndex { row: 1, column: 2 });
        assert_eq!(TableLayout.key(6), 6);
    }

    #[tokio::test]
    async fn both_views_show_snapshot_order() {
        let client = MockClient::new();
        let sync = ViewSynchronizer::new(client, 3);

        for (id, ids) in [(1, vec![1, 2, 3]), (2, vec![3, 1, 2]), (3, vec![]), (4, vec![9, 3])] {
            let next = snapshot(id, &ids);
            sync.apply_snapshot(&next).await;
            assert_eq!(ids_of(sync.table()).await, next.ids());
            assert_eq!(ids_of(sync.grid()).await, next.ids());
        }
    }

    #[tokio::test]
    async fn apply_current_reads_the_store() {
        let client = MockClient::new();
        let sync = ViewSynchronizer::new(client, 2);
        let store = ResultStore::new();
        store.replace(items([7, 8])).await;

        sync.apply_current(&store).await;
        assert_eq!(ids_of(sync.table()).await, vec![ItemId(7), ItemId(8)]);
        assert_eq!(sync.grid().rows().lock().await.snapshot_id(), 1);
    }

    async fn settle_tasks() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn later_apply_waits_for_the_one_in_progress() {
        let client = MockClient::new();
        let sync = Arc::new(ViewSynchronizer::new(client, 2));
        let store = ResultStore::new();
        store.replace(items([1, 2])).await;

        // Stall the first apply halfway: the table gets it, the grid cannot
        let grid_rows = sync.grid().rows().lock().await;
        let first = tokio::spawn({
            let (sync, store) = (Arc::clone(&sync), store.clone());
            async move { sync.apply_current(&store).await }
        });
        settle_tasks().await;

        store.replace(items([3, 4, 5])).await;
        let second = tokio::spawn({
            let (sync, store) = (Arc::clone(&sync), store.clone());
            async move { sync.apply_current(&store).await }
        });
        settle_tasks().await;

        {
            let table = sync.table().rows().lock().await;
            assert_eq!(table.snapshot_id(), 1);
            assert_eq!(table.ids(), vec![ItemId(1), ItemId(2)]);
        }

        drop(grid_rows);
        first.await.unwrap();
        second.await.unwrap();

        for rows in [sync.table().rows(), sync.grid().rows()] {
            let rows = rows.lock().await;
            assert_eq!(rows.snapshot_id(), 2);
            assert_eq!(rows.ids(), vec![ItemId(3), ItemId(4), ItemId(5)]);
        }
    }

    #[tokio::test]
    async fn only_visible_rows_load_artwork() {
        let client = MockClient::new();
        let presenter = ListPresenter::new(TableLayout, client.clone());
        presenter.set_visible_lines(2).await;

        presenter.apply(&snapshot(1, &[1, 2, 3, 4])).await;
        settle(&presenter).await;

        let calls = client.image_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&artwork_url(1)) && calls.contains(&artwork_url(2)));
        let rows = presenter.rows().lock().await;
        assert!(rows.image(0).unwrap().is_loaded());
        assert_eq!(rows.image(3), Some(RowImage::Placeholder));
    }

    #[tokio::test]
    async fn scrolling_loads_rows_entering_the_viewport() {
        let client = MockClient::new();
        let presenter = ListPresenter::new(TableLayout, client.clone());
        presenter.set_visible_lines(2).await;
        presenter.apply(&snapshot(1, &[1, 2, 3, 4])).await;
        settle(&presenter).await;

        presenter.move_selection(2).await;
        settle(&presenter).await;

        assert!(client.image_calls().contains(&artwork_url(3)));
        assert!(!client.image_calls().contains(&artwork_url(4)));
        assert!(presenter.rows().lock().await.image(2).unwrap().is_loaded());
    }

    #[tokio::test]
    async fn reassigned_row_cancels_previous_occupant() {
        let client = MockClient::new();
        let gate = client.on_image_gated(&artwork_url(1), Ok(encode_png(2, 2, [1, 2, 3])));
        let presenter = ListPresenter::new(TableLayout, client.clone());
        presenter.set_visible_lines(1).await;

        presenter.apply(&snapshot(1, &[1])).await;
        assert!(presenter.registry().is_active(0));

        // Row 0 now shows a different item; its load replaces the old one
        presenter.apply(&snapshot(2, &[5])).await;
        gate.notify_one();
        settle(&presenter).await;

        let rows = presenter.rows().lock().await;
        assert_eq!(rows.ids(), vec![ItemId(5)]);
        assert!(rows.image(0).unwrap().is_loaded());
        assert_eq!(client.image_calls(), vec![artwork_url(1), artwork_url(5)]);
    }

    #[tokio::test]
    async fn failed_artwork_in_row_three_keeps_placeholder() {
        let client = MockClient::new();
        client.on_image(&artwork_url(4), Err(FetchError::Network("timed out".into())));
        let presenter = ListPresenter::new(TableLayout, client.clone());
        presenter.set_visible_lines(5).await;

        presenter.apply(&snapshot(1, &[1, 2, 3, 4, 5])).await;
        settle(&presenter).await;

        let rows = presenter.rows().lock().await;
        assert_eq!(rows.image(3), Some(RowImage::Placeholder));
        assert!(rows.image(2).unwrap().is_loaded());
        assert!(rows.image(4).unwrap().is_loaded());
    }

    #[tokio::test]
    async fn emptying_the_list_cancels_pending_loads() {
        let client = MockClient::new();
        let _gate = client.on_image_gated(&artwork_url(1), Ok(encode_png(2, 2, [1, 1, 1])));
        let presenter = ListPresenter::new(GridLayout { columns: 2 }, client.clone());
        presenter.set_visible_lines(1).await;

        presenter.apply(&snapshot(1, &[1])).await;
        assert!(presenter.registry().is_active(GridIndex { row: 0, column: 0 }));

        presenter.apply(&snapshot(2, &[])).await;
        assert_eq!(presenter.registry().active_count(), 0);
        assert!(presenter.rows().lock().await.is_empty());
    }
}
