//! Main application model with state management

use std::sync::Arc;
use tokio::sync::Mutex;

use super::presented_list::PresentedList;
use super::types::{MediaCategory, UiState, ViewMode};

/// Main application model containing all state
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    table_rows: Arc<Mutex<PresentedList>>,
    grid_rows: Arc<Mutex<PresentedList>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(table_rows: Arc<Mutex<PresentedList>>, grid_rows: Arc<Mutex<PresentedList>>) -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            table_rows,
            grid_rows,
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    // ========================================================================
    // Search input
    // ========================================================================

    /// Current search text and category, as handed to the search coordinator
    pub async fn search_input(&self) -> (String, MediaCategory) {
        let state = self.ui_state.lock().await;
        (state.search_text.clone(), state.category)
    }

    pub async fn append_to_search(&self, c: char) {
        let mut state = self.ui_state.lock().await;
        state.search_text.push(c);
    }

    pub async fn backspace_search(&self) -> bool {
        let mut state = self.ui_state.lock().await;
        state.search_text.pop().is_some()
    }

    pub async fn clear_search(&self) -> bool {
        let mut state = self.ui_state.lock().await;
        let had_text = !state.search_text.is_empty();
        state.search_text.clear();
        had_text
    }

    pub async fn cycle_category(&self, forward: bool) -> MediaCategory {
        let mut state = self.ui_state.lock().await;
        state.category = if forward {
            state.category.next()
        } else {
            state.category.prev()
        };
        state.category
    }

    // ========================================================================
    // Presentation
    // ========================================================================

    pub async fn toggle_view_mode(&self) -> ViewMode {
        let mut state = self.ui_state.lock().await;
        state.view_mode = state.view_mode.toggle();
        state.view_mode
    }

    pub async fn view_mode(&self) -> ViewMode {
        self.ui_state.lock().await.view_mode
    }

    pub async fn toggle_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = !state.show_help_popup;
    }

    pub async fn hide_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn get_table(&self) -> PresentedList {
        self.table_rows.lock().await.clone()
    }

    pub async fn get_grid(&self) -> PresentedList {
        self.grid_rows.lock().await.clone()
    }
}
