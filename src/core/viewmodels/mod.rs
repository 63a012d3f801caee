pub mod media_list_view_model;
pub mod property;

pub use media_list_view_model::{LoadPhase, MediaListViewModel};
pub use property::{Property, PropertySubscriber};

#[async_trait::async_trait]
pub trait ViewModel: Send + Sync {
    /// Load whatever the view needs on first display
    async fn initialize(&self);

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber>;

    async fn refresh(&self);
}
