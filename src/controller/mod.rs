//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input
//! and coordinates the async work behind the view. It is organized into
//! submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `navigation`: Selection, scrolling and viewport updates
//! - `search`: Debounced search coordinator
//! - `image_tasks`: Per-row artwork load registry
//! - `sync`: Snapshot application to the table and grid

mod input;
mod navigation;
mod search;
mod image_tasks;
mod sync;

use std::sync::Arc;

use crate::model::AppModel;

pub use search::SearchCoordinator;
pub use sync::ViewSynchronizer;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) search: SearchCoordinator,
    pub(crate) sync: Arc<ViewSynchronizer>,
}

impl AppController {
    pub fn new(model: Arc<AppModel>, search: SearchCoordinator, sync: Arc<ViewSynchronizer>) -> Self {
        Self { model, search, sync }
    }

    /// Hand the current search bar and scope bar state to the coordinator
    pub(crate) async fn search_input_changed(&self) {
        let (term, category) = self.model.search_input().await;
        self.search.on_search_input_changed(term, category).await;
    }

    pub async fn is_searching(&self) -> bool {
        self.search.is_searching().await
    }

    /// Stop outstanding network work before the runtime goes away
    pub async fn shutdown(&self) {
        self.search.cancel().await;
        self.sync.cancel_loads();
    }
}
