use glance::{ApiConfig, ChangeEvent, ChannelNotifier, GraphApi, MediaListViewModel};
use mockito::ServerGuard;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub const TEST_TOKEN: &str = "test_token";

pub struct TestContext {
    pub server: ServerGuard,
    pub view_model: Arc<MediaListViewModel>,
    pub notifier: Arc<ChannelNotifier>,
    pub events: UnboundedReceiver<ChangeEvent>,
}

impl TestContext {
    pub async fn new() -> Self {
        let server = mockito::Server::new_async().await;

        let mut config = ApiConfig::with_token(TEST_TOKEN);
        config.base_url = server.url();
        config.page_limit = 2;
        let client = GraphApi::new(&config).expect("test config is valid");

        let view_model = Arc::new(
            MediaListViewModel::new(Arc::new(client)).with_page_limit(config.page_limit),
        );
        let (notifier, events) = ChannelNotifier::new();
        let notifier = Arc::new(notifier);
        view_model.set_notifier(&notifier);

        Self {
            server,
            view_model,
            notifier,
            events,
        }
    }

    /// Everything emitted so far
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }

    pub fn next_page_url(&self, after: &str) -> String {
        format!(
            "{}/me/media?access_token={}&after={}",
            self.server.url(),
            TEST_TOKEN,
            after
        )
    }
}

pub fn media_node(id: &str, media_type: &str) -> serde_json::Value {
    json!({
        "id": id,
        "caption": format!("Post {}", id),
        "media_type": media_type,
        "media_url": format!("https://cdn.example.com/{}.jpg", id),
        "permalink": format!("https://www.instagram.com/p/{}/", id),
        "timestamp": "2022-04-08T10:30:00+0000",
        "username": "tester"
    })
}

pub fn media_response(nodes: Vec<serde_json::Value>, next: Option<String>) -> String {
    let mut paging = json!({ "cursors": { "before": "QVFIUmFi", "after": "QVFIUmNk" } });
    if let Some(next) = next {
        paging["next"] = json!(next);
    }
    json!({ "data": nodes, "paging": paging }).to_string()
}
