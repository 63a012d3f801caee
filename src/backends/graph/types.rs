use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::warn;
use url::Url;

use super::errors::ApiError;
use crate::models::{Cursor, MediaItem, MediaItemId, MediaType, Page, PageCursors};

/// Wire format of timestamps, e.g. `2022-04-08T10:30:00+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

// Timestamps carry a numeric offset without a colon, which RFC 3339 parsing rejects.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(|timestamp| Some(timestamp.with_timezone(&Utc)))
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e))),
    }
}

/// Envelope shared by the media listing and children endpoints
#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(default)]
    pub data: Option<Vec<MediaNode>>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<PagingCursors>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PagingCursors {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphMediaType {
    Image,
    Video,
    CarouselAlbum,
}

impl From<GraphMediaType> for MediaType {
    fn from(media_type: GraphMediaType) -> Self {
        match media_type {
            GraphMediaType::Image => MediaType::Image,
            GraphMediaType::Video => MediaType::Video,
            GraphMediaType::CarouselAlbum => MediaType::Album,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MediaNode {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub media_type: Option<GraphMediaType>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub username: Option<String>,
}

fn parse_url(field: &str, id: &str, value: Option<String>) -> Result<Option<Url>, ApiError> {
    value
        .map(|raw| {
            Url::parse(&raw).map_err(|e| {
                ApiError::Decode(format!("invalid {} '{}' for media {}: {}", field, raw, id, e))
            })
        })
        .transpose()
}

impl TryFrom<MediaNode> for MediaItem {
    type Error = ApiError;

    fn try_from(node: MediaNode) -> Result<Self, Self::Error> {
        if node.id.is_empty() {
            return Err(ApiError::Decode("media item with empty id".to_string()));
        }
        let media_type = node
            .media_type
            .ok_or_else(|| ApiError::Decode(format!("media {} has no media_type", node.id)))?;

        Ok(MediaItem {
            media_url: parse_url("media_url", &node.id, node.media_url)?,
            permalink: parse_url("permalink", &node.id, node.permalink)?,
            thumbnail_url: parse_url("thumbnail_url", &node.id, node.thumbnail_url)?,
            id: MediaItemId::new(node.id),
            caption: node.caption,
            media_type: media_type.into(),
            timestamp: node.timestamp,
            username: node.username,
        })
    }
}

impl MediaResponse {
    // Nodes without a media type cannot be rendered; drop them rather than the whole page
    fn into_items(data: Vec<MediaNode>) -> Result<Vec<MediaItem>, ApiError> {
        data.into_iter()
            .filter(|node| {
                if node.media_type.is_none() {
                    warn!("Skipping media {} without media_type", node.id);
                    return false;
                }
                true
            })
            .map(MediaItem::try_from)
            .collect()
    }

    /// Convert a listing response into a page, keeping the forward cursor
    pub fn into_page(self) -> Result<Page, ApiError> {
        let items = Self::into_items(self.data.unwrap_or_default())?;
        let (next, cursors) = match self.paging {
            Some(paging) => {
                let next = paging
                    .next
                    .map(|raw| {
                        Url::parse(&raw)
                            .map(Cursor::new)
                            .map_err(|e| ApiError::Decode(format!("invalid next cursor '{}': {}", raw, e)))
                    })
                    .transpose()?;
                let cursors = paging.cursors.map(|c| PageCursors {
                    before: c.before,
                    after: c.after,
                });
                (next, cursors)
            }
            None => (None, None),
        };

        Ok(Page {
            items,
            next,
            cursors,
        })
    }

    /// Convert a children response. `None` when the response has no `data`
    /// array at all, which is not the same as an album with no children.
    pub fn into_children(self) -> Result<Option<Vec<MediaItem>>, ApiError> {
        self.data.map(Self::into_items).transpose()
    }
}
