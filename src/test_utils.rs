#![cfg(test)]

pub use mock_client::MockMediaClient;
pub use recording::RecordingNotifier;

/// Common test utilities
pub mod common {
    use std::time::Duration;
    use tokio::time::sleep;

    /// Wait for a condition to become true, yielding to other tasks in between
    pub async fn wait_for<F>(mut condition: F, max_wait: Duration) -> bool
    where
        F: FnMut() -> bool,
    {
        let start = std::time::Instant::now();

        while start.elapsed() < max_wait {
            if condition() {
                return true;
            }
            sleep(Duration::from_millis(5)).await;
        }

        condition()
    }
}

/// Builders for media fixtures
pub mod fixtures {
    use crate::models::{Cursor, MediaItem, MediaItemId, MediaType, Page};
    use url::Url;

    pub fn media(id: &str, media_type: MediaType) -> MediaItem {
        MediaItem {
            id: MediaItemId::new(id),
            caption: Some(format!("caption {}", id)),
            media_type,
            media_url: Url::parse(&format!("https://cdn.example.com/{}.jpg", id)).ok(),
            permalink: None,
            thumbnail_url: None,
            timestamp: None,
            username: Some("tester".to_string()),
        }
    }

    pub fn image(id: &str) -> MediaItem {
        media(id, MediaType::Image)
    }

    pub fn album(id: &str) -> MediaItem {
        media(id, MediaType::Album)
    }

    pub fn cursor(after: &str) -> Cursor {
        let url = format!("https://graph.example.com/me/media?after={}", after);
        Cursor::new(Url::parse(&url).expect("fixture cursor is a valid URL"))
    }

    /// Page of plain images
    pub fn page(ids: &[&str], next: Option<&str>) -> Page {
        page_of(ids.iter().map(|id| image(id)).collect(), next)
    }

    pub fn page_of(items: Vec<MediaItem>, next: Option<&str>) -> Page {
        Page::new(items, next.map(cursor))
    }
}

/// Notifier that records every change it receives
pub mod recording {
    use crate::events::{ChangeEvent, ChangeNotifier};
    use crate::models::IndexPath;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        events: Mutex<Vec<ChangeEvent>>,
    }

    impl RecordingNotifier {
        pub fn events(&self) -> Vec<ChangeEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ChangeNotifier for RecordingNotifier {
        fn on_reset(&self) {
            self.events.lock().unwrap().push(ChangeEvent::Reset);
        }

        fn on_sections_appended(&self, sections: &BTreeSet<usize>) {
            self.events
                .lock()
                .unwrap()
                .push(ChangeEvent::SectionsAppended(sections.clone()));
        }

        fn on_items_changed(&self, positions: &BTreeSet<IndexPath>) {
            self.events
                .lock()
                .unwrap()
                .push(ChangeEvent::ItemsChanged(positions.clone()));
        }
    }
}

/// Scripted media client for testing
pub mod mock_client {
    use crate::backends::{ApiError, MediaClient};
    use crate::models::{Cursor, MediaItem, MediaItemId, Page};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    /// Replays queued responses in order. With [`hold_calls`](Self::hold_calls)
    /// every call blocks until [`release`](Self::release) lets it through, which
    /// keeps requests in flight for as long as a test needs.
    pub struct MockMediaClient {
        first_pages: Mutex<VecDeque<Result<Page, ApiError>>>,
        pages: Mutex<VecDeque<Result<Page, ApiError>>>,
        children: Mutex<HashMap<String, VecDeque<Result<Option<Vec<MediaItem>>, ApiError>>>>,
        held: AtomicBool,
        gate: Semaphore,
        first_page_calls: AtomicUsize,
        page_calls: AtomicUsize,
        children_calls: AtomicUsize,
        requested_limits: Mutex<Vec<u32>>,
        requested_cursors: Mutex<Vec<Cursor>>,
    }

    impl MockMediaClient {
        pub fn new() -> Self {
            Self {
                first_pages: Mutex::new(VecDeque::new()),
                pages: Mutex::new(VecDeque::new()),
                children: Mutex::new(HashMap::new()),
                held: AtomicBool::new(false),
                gate: Semaphore::new(0),
                first_page_calls: AtomicUsize::new(0),
                page_calls: AtomicUsize::new(0),
                children_calls: AtomicUsize::new(0),
                requested_limits: Mutex::new(Vec::new()),
                requested_cursors: Mutex::new(Vec::new()),
            }
        }

        pub fn push_first_page(&self, response: Result<Page, ApiError>) {
            self.first_pages.lock().unwrap().push_back(response);
        }

        pub fn push_page(&self, response: Result<Page, ApiError>) {
            self.pages.lock().unwrap().push_back(response);
        }

        pub fn push_children(&self, id: &str, response: Result<Vec<MediaItem>, ApiError>) {
            self.push_children_response(id, response.map(Some));
        }

        /// Queue a children response that carries no `data` array
        pub fn push_children_without_data(&self, id: &str) {
            self.push_children_response(id, Ok(None));
        }

        fn push_children_response(
            &self,
            id: &str,
            response: Result<Option<Vec<MediaItem>>, ApiError>,
        ) {
            self.children
                .lock()
                .unwrap()
                .entry(id.to_string())
                .or_default()
                .push_back(response);
        }

        pub fn hold_calls(&self) {
            self.held.store(true, Ordering::SeqCst);
        }

        pub fn release(&self, calls: usize) {
            self.gate.add_permits(calls);
        }

        pub fn first_page_calls(&self) -> usize {
            self.first_page_calls.load(Ordering::SeqCst)
        }

        pub fn page_calls(&self) -> usize {
            self.page_calls.load(Ordering::SeqCst)
        }

        pub fn children_calls(&self) -> usize {
            self.children_calls.load(Ordering::SeqCst)
        }

        pub fn requested_limits(&self) -> Vec<u32> {
            self.requested_limits.lock().unwrap().clone()
        }

        pub fn requested_cursors(&self) -> Vec<Cursor> {
            self.requested_cursors.lock().unwrap().clone()
        }

        async fn pass_gate(&self) {
            if self.held.load(Ordering::SeqCst) {
                self.gate.acquire().await.unwrap().forget();
            }
        }

        fn unscripted<T>(call: &str) -> Result<T, ApiError> {
            Err(ApiError::Transport(format!("no scripted response for {}", call)))
        }
    }

    impl std::fmt::Debug for MockMediaClient {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockMediaClient").finish()
        }
    }

    #[async_trait]
    impl MediaClient for MockMediaClient {
        async fn fetch_first_page(&self, limit: u32) -> Result<Page, ApiError> {
            self.first_page_calls.fetch_add(1, Ordering::SeqCst);
            self.requested_limits.lock().unwrap().push(limit);
            self.pass_gate().await;
            let response = self.first_pages.lock().unwrap().pop_front();
            response.unwrap_or_else(|| Self::unscripted("fetch_first_page"))
        }

        async fn fetch_page(&self, cursor: &Cursor) -> Result<Page, ApiError> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            self.requested_cursors.lock().unwrap().push(cursor.clone());
            self.pass_gate().await;
            let response = self.pages.lock().unwrap().pop_front();
            response.unwrap_or_else(|| Self::unscripted("fetch_page"))
        }

        async fn fetch_children(
            &self,
            id: &MediaItemId,
        ) -> Result<Option<Vec<MediaItem>>, ApiError> {
            self.children_calls.fetch_add(1, Ordering::SeqCst);
            self.pass_gate().await;
            let response = self
                .children
                .lock()
                .unwrap()
                .get_mut(id.as_str())
                .and_then(VecDeque::pop_front);
            response.unwrap_or_else(|| Self::unscripted("fetch_children"))
        }
    }
}
