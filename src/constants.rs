// Tuning and API constants

// === Remote API ===
pub const DEFAULT_BASE_URL: &str = "https://graph.instagram.com";
pub const DEFAULT_PAGE_LIMIT: u32 = 25;
pub const ACCESS_TOKEN_ENV: &str = "GLANCE_ACCESS_TOKEN";

/// Fields requested for top-level media
pub const MEDIA_FIELDS: &[&str] = &[
    "id",
    "caption",
    "media_type",
    "media_url",
    "permalink",
    "thumbnail_url",
    "timestamp",
    "username",
];

/// Fields requested for album children (captions live on the album itself)
pub const CHILDREN_FIELDS: &[&str] = &[
    "id",
    "media_type",
    "media_url",
    "permalink",
    "thumbnail_url",
    "timestamp",
    "username",
];

// === Pagination ===
/// Rows before the end of the last section at which the next page is requested
pub const PREFETCH_COUNT: usize = 2;
