//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, thumbnail cells)
//! - `layout`: Search bar, scope bar and status line
//! - `table`: One line per result
//! - `grid`: Result cells laid out in columns
//! - `overlays`: Help popup

mod utils;
mod layout;
mod table;
mod grid;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::model::{PresentedList, UiState, ViewMode};

/// Terminal lines taken by one grid cell
pub const GRID_CELL_HEIGHT: u16 = 4;

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        ui_state: &UiState,
        table: &PresentedList,
        grid: &PresentedList,
        is_searching: bool,
    ) {
        let chunks = split(frame.area());

        layout::render_search_bar(frame, chunks[0], ui_state);
        layout::render_scope_bar(frame, chunks[1], ui_state.category);

        let visible = match ui_state.view_mode {
            ViewMode::Table => {
                table::render_table(frame, chunks[2], table, ui_state);
                table
            }
            ViewMode::Grid => {
                grid::render_grid(frame, chunks[2], grid, ui_state);
                grid
            }
        };

        layout::render_status_line(frame, chunks[3], ui_state, visible.len(), is_searching);

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }

    /// Lines available to the table and the grid for a terminal of `area`
    pub fn viewport_lines(area: Rect) -> (usize, usize) {
        let results = split(area)[2];
        let inner = results.height.saturating_sub(2);
        (inner as usize, (inner / GRID_CELL_HEIGHT) as usize)
    }
}

fn split(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Length(3), // Scope bar
            Constraint::Min(0),    // Results
            Constraint::Length(1), // Status line
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}
