use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::fmt;
use tracing::{debug, info, trace, warn};
use url::Url;

use super::errors::ApiError;
use super::types::MediaResponse;
use crate::backends::traits::MediaClient;
use crate::config::ApiConfig;
use crate::constants::{CHILDREN_FIELDS, MEDIA_FIELDS};
use crate::models::{Cursor, MediaItem, MediaItemId, Page};

/// Pretty-print a JSON body for trace logging, falling back to the raw text
fn format_json_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| body.to_string())
}

/// Render a URL for logs with the access token masked
fn redacted(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "access_token") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "access_token" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    let mut masked = url.clone();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

#[derive(Clone)]
pub struct GraphApi {
    client: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl fmt::Debug for GraphApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphApi")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GraphApi {
    /// Build a client from configuration.
    ///
    /// Fails with [`ApiError::Configuration`] when the access token is missing,
    /// so a misconfigured client never reaches the network.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Configuration(format!("invalid base_url: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    /// Append path segments to the base URL, keeping any base path prefix
    fn build_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration(format!("cannot use {} as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(super) fn media_url(&self, limit: u32) -> Result<Url, ApiError> {
        let mut url = self.build_url(&["me", "media"])?;
        url.query_pairs_mut()
            .append_pair("fields", &MEDIA_FIELDS.join(","))
            .append_pair("access_token", &self.access_token)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    pub(super) fn children_url(&self, id: &MediaItemId) -> Result<Url, ApiError> {
        let mut url = self.build_url(&[id.as_str(), "children"])?;
        url.query_pairs_mut()
            .append_pair("fields", &CHILDREN_FIELDS.join(","))
            .append_pair("access_token", &self.access_token);
        Ok(url)
    }

    /// Execute a single GET and decode the media envelope
    async fn execute_get(&self, url: Url, operation_name: &str) -> Result<MediaResponse, ApiError> {
        debug!("[{}] GET {}", operation_name, redacted(&url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();
        debug!("[{}] Response: {}", operation_name, status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            warn!(
                "[{}] Error response - Status: {}, Body: {}",
                operation_name,
                status.as_u16(),
                body
            );
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        let body = response.text().await.map_err(ApiError::from_reqwest)?;
        trace!("[{}] Body:\n{}", operation_name, format_json_body(&body));

        serde_json::from_str::<MediaResponse>(&body).map_err(|e| {
            warn!("[{}] Failed to decode response: {}", operation_name, e);
            ApiError::from(e)
        })
    }
}

#[async_trait]
impl MediaClient for GraphApi {
    async fn fetch_first_page(&self, limit: u32) -> Result<Page, ApiError> {
        let url = self.media_url(limit)?;
        let page = self.execute_get(url, "fetch_first_page").await?.into_page()?;
        info!(
            "Fetched first page: {} items (more: {})",
            page.len(),
            page.has_next()
        );
        Ok(page)
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page, ApiError> {
        let page = self
            .execute_get(cursor.url().clone(), "fetch_page")
            .await?
            .into_page()?;
        info!("Fetched page: {} items (more: {})", page.len(), page.has_next());
        Ok(page)
    }

    async fn fetch_children(
        &self,
        id: &MediaItemId,
    ) -> Result<Option<Vec<MediaItem>>, ApiError> {
        let url = self.children_url(id)?;
        let children = self
            .execute_get(url, "fetch_children")
            .await?
            .into_children()?;
        match &children {
            Some(children) => debug!("Fetched {} children for album {}", children.len(), id),
            None => warn!("Children response for album {} has no data", id),
        }
        Ok(children)
    }
}
