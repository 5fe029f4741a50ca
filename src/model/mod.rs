//! Model module - Application state and data types
//!
//! This module contains the data structures and state shared between the
//! controller and the view. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (queries, items, UI input state)
//! - `error`: Fetch error taxonomy
//! - `itunes_client`: Catalog and artwork fetch client
//! - `thumbnail`: Artwork decoding and row image state
//! - `store`: Current result list and its snapshots
//! - `diff`: Identity-keyed snapshot diffing
//! - `presented_list`: Rows shown by one presentation
//! - `app_model`: Main application model

mod types;
mod error;
mod itunes_client;
mod thumbnail;
mod store;
mod diff;
mod presented_list;
mod app_model;

// Re-export all public types for convenient access
pub use types::{Item, MediaCategory, Query, UiState, ViewMode};

#[cfg(test)]
pub use types::ItemId;

pub use error::FetchError;

pub use itunes_client::{FetchClient, ItunesClient};

pub use thumbnail::{RowImage, Thumbnail};

pub use store::{ResultSnapshot, ResultStore, RESULTS_SECTION};

pub use presented_list::PresentedList;

pub use app_model::AppModel;

#[cfg(test)]
pub(crate) use thumbnail::encode_png;
