mod config;
mod controller;
mod logging;
mod model;
mod view;

#[cfg(test)]
mod testing;

use std::io;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use config::AppConfig;
use view::AppView;
use controller::{AppController, SearchCoordinator, ViewSynchronizer};
use model::{AppModel, FetchClient, ItunesClient, ResultStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(
        base_url = %config.base_url,
        lang = %config.lang,
        limit = config.limit,
        debounce_ms = config.debounce_ms,
        "=== iTunes Search Starting ==="
    );

    let client: Arc<dyn FetchClient> = Arc::new(ItunesClient::new(config.base_url.clone(), config.timeout())?);

    let sync = Arc::new(ViewSynchronizer::new(Arc::clone(&client), config.grid_columns));
    let store = ResultStore::new();
    let model = Arc::new(AppModel::new(
        Arc::clone(sync.table().rows()),
        Arc::clone(sync.grid().rows()),
    ));
    let search = SearchCoordinator::new(client, config.search_settings(), store, Arc::clone(&sync));
    let controller = AppController::new(Arc::clone(&model), search, sync);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller.clone()).await;
    controller.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("iTunes Search shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
) -> Result<()> {
    loop {
        // Viewport follows the terminal so scrolled-in rows get their artwork
        let size = terminal.size()?;
        let (table_lines, grid_lines) = AppView::viewport_lines(Rect::new(0, 0, size.width, size.height));
        controller.set_viewport(table_lines, grid_lines).await;

        // Get current state
        let ui_state = model.get_ui_state().await;
        let table = model.get_table().await;
        let grid = model.get_grid().await;
        let is_searching = controller.is_searching().await;
        let should_quit = model.should_quit().await;

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &ui_state, &table, &grid, is_searching);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
