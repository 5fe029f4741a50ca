//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Handle help popup
        if self.model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.model.hide_help_popup().await;
            }
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.model.set_should_quit(true).await;
                }
                KeyCode::Char('t') => {
                    let mode = self.model.toggle_view_mode().await;
                    tracing::debug!(?mode, "View mode toggled");
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::F(1) => {
                self.model.toggle_help_popup().await;
            }
            // Scope bar
            KeyCode::Tab => {
                self.model.cycle_category(true).await;
                self.search_input_changed().await;
            }
            KeyCode::BackTab => {
                self.model.cycle_category(false).await;
                self.search_input_changed().await;
            }
            KeyCode::Up => self.move_selection(-1).await,
            KeyCode::Down => self.move_selection(1).await,
            KeyCode::Left => self.move_column(-1).await,
            KeyCode::Right => self.move_column(1).await,
            KeyCode::PageUp => self.page(false).await,
            KeyCode::PageDown => self.page(true).await,
            // Search bar
            KeyCode::Esc => {
                if self.model.clear_search().await {
                    self.search_input_changed().await;
                }
            }
            KeyCode::Backspace => {
                if self.model.backspace_search().await {
                    self.search_input_changed().await;
                }
            }
            KeyCode::Char(c) => {
                self.model.append_to_search(c).await;
                self.search_input_changed().await;
            }
            _ => {}
        }
        Ok(())
    }
}
