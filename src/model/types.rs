//! Core type definitions for the application

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Media category selected in the scope bar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MediaCategory {
    #[default]
    Movie,
    Music,
    Software,
    Ebook,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 4] = [
        MediaCategory::Movie,
        MediaCategory::Music,
        MediaCategory::Software,
        MediaCategory::Ebook,
    ];

    /// Value sent as the `media` query parameter
    pub fn query_value(self) -> &'static str {
        match self {
            MediaCategory::Movie => "movie",
            MediaCategory::Music => "music",
            MediaCategory::Software => "software",
            MediaCategory::Ebook => "ebook",
        }
    }

    /// Scope bar title
    pub fn title(self) -> &'static str {
        match self {
            MediaCategory::Movie => "Movies",
            MediaCategory::Music => "Music",
            MediaCategory::Software => "Apps",
            MediaCategory::Ebook => "Books",
        }
    }

    pub fn next(self) -> Self {
        match self {
            MediaCategory::Movie => MediaCategory::Music,
            MediaCategory::Music => MediaCategory::Software,
            MediaCategory::Software => MediaCategory::Ebook,
            MediaCategory::Ebook => MediaCategory::Movie,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            MediaCategory::Movie => MediaCategory::Ebook,
            MediaCategory::Music => MediaCategory::Movie,
            MediaCategory::Software => MediaCategory::Music,
            MediaCategory::Ebook => MediaCategory::Software,
        }
    }
}

/// Parameters of a single search request. Built fresh for every attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub term: String,
    pub media: MediaCategory,
    pub lang: String,
    pub limit: u32,
}

impl Query {
    pub fn new(term: impl Into<String>, media: MediaCategory, lang: impl Into<String>, limit: u32) -> Self {
        Self {
            term: term.into(),
            media,
            lang: lang.into(),
            limit,
        }
    }

    pub fn params(&self) -> [(&'static str, String); 4] {
        [
            ("term", self.term.clone()),
            ("media", self.media.query_value().to_string()),
            ("lang", self.lang.clone()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Identifier of an item within a result set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single search result
///
/// Decoded from the catalog response. Tracks carry `trackId`/`trackName`,
/// collections (albums, some ebooks) only carry the `collection*` fields.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawItem")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub artist: String,
    pub artwork_url: String,
    pub kind: String,
    pub release_date: Option<DateTime<Utc>>,
}

impl Item {
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    track_id: Option<u64>,
    collection_id: Option<u64>,
    track_name: Option<String>,
    collection_name: Option<String>,
    #[serde(default)]
    artist_name: String,
    #[serde(default)]
    artwork_url100: String,
    kind: Option<String>,
    wrapper_type: Option<String>,
    release_date: Option<DateTime<Utc>>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        Self {
            id: ItemId(raw.track_id.or(raw.collection_id).unwrap_or_default()),
            name: raw.track_name.or(raw.collection_name).unwrap_or_default(),
            artist: raw.artist_name,
            artwork_url: raw.artwork_url100,
            kind: raw.kind.or(raw.wrapper_type).unwrap_or_default(),
            release_date: raw.release_date,
        }
    }
}

/// Which presentation of the results is visible
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Grid,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Table => ViewMode::Grid,
            ViewMode::Grid => ViewMode::Table,
        }
    }
}

/// Input state owned by the search bar and scope bar
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub search_text: String,
    pub category: MediaCategory,
    pub view_mode: ViewMode,
    pub show_help_popup: bool,
}
