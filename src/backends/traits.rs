use async_trait::async_trait;

use super::graph::ApiError;
use crate::models::{Cursor, MediaItem, MediaItemId, Page};

/// Remote source of media pages.
///
/// Each call is a single attempt: failures are returned as-is and retrying is
/// left to whoever triggered the call.
#[async_trait]
pub trait MediaClient: Send + Sync + std::fmt::Debug {
    /// Fetch the most recent items, at most `limit` of them
    async fn fetch_first_page(&self, limit: u32) -> Result<Page, ApiError>;

    /// Fetch the page addressed by a cursor returned with a previous page
    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page, ApiError>;

    /// Fetch the photos and videos contained in an album.
    ///
    /// `Ok(None)` means the server answered without a children list.
    async fn fetch_children(&self, id: &MediaItemId) -> Result<Option<Vec<MediaItem>>, ApiError>;
}
