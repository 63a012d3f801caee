mod identifiers;

pub use identifiers::MediaItemId;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Image,
    Video,
    /// A carousel container whose photos and videos are fetched separately.
    Album,
}

impl MediaType {
    pub fn is_album(&self) -> bool {
        matches!(self, MediaType::Album)
    }
}

/// A single photo, video or album as returned by the media API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaItemId,
    pub caption: Option<String>,
    pub media_type: MediaType,
    pub media_url: Option<Url>,
    pub permalink: Option<Url>,
    pub thumbnail_url: Option<Url>,
    pub timestamp: Option<DateTime<Utc>>,
    pub username: Option<String>,
}

impl MediaItem {
    pub fn is_album(&self) -> bool {
        self.media_type.is_album()
    }

    /// Long form date for display, e.g. `Friday, April 8, 2022`.
    pub fn display_date(&self) -> Option<String> {
        self.timestamp
            .map(|timestamp| timestamp.format("%A, %B %-d, %Y").to_string())
    }
}

/// Address of the next page, handed out by the server and fetched verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(Url);

impl Cursor {
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw `before`/`after` tokens from the paging block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursors {
    pub before: Option<String>,
    pub after: Option<String>,
}

/// One fetched batch of items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<MediaItem>,
    /// `None` when the server reports no further pages.
    pub next: Option<Cursor>,
    pub cursors: Option<PageCursors>,
}

impl Page {
    pub fn new(items: Vec<MediaItem>, next: Option<Cursor>) -> Self {
        Self {
            items,
            next,
            cursors: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Position of an item: section is the page index in fetch order, row the index inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}
