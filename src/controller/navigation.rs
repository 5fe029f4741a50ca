//! Selection, scrolling and viewport controller methods

use crate::model::ViewMode;
use super::AppController;

impl AppController {
    /// Move the selection by whole lines in the visible presentation
    pub async fn move_selection(&self, lines: isize) {
        match self.model.view_mode().await {
            ViewMode::Table => self.sync.table().move_lines(lines).await,
            ViewMode::Grid => self.sync.grid().move_lines(lines).await,
        }
    }

    /// Move between grid cells on the same line. The table has no columns.
    pub async fn move_column(&self, delta: isize) {
        if self.model.view_mode().await == ViewMode::Grid {
            self.sync.grid().move_selection(delta).await;
        }
    }

    pub async fn page(&self, forward: bool) {
        match self.model.view_mode().await {
            ViewMode::Table => self.sync.table().page(forward).await,
            ViewMode::Grid => self.sync.grid().page(forward).await,
        }
    }

    /// Both presentations track the terminal size, visible or not, so a
    /// toggle shows rows that already have their artwork
    pub async fn set_viewport(&self, table_lines: usize, grid_lines: usize) {
        self.sync.table().set_visible_lines(table_lines).await;
        self.sync.grid().set_visible_lines(grid_lines).await;
    }
}
