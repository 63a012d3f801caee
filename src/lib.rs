// Paginated media browser core: API client, page store and list view model

pub mod backends;
pub mod config;
pub mod constants;
pub mod core;
pub mod events;
pub mod models;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use backends::{ApiError, GraphApi, MediaClient};
pub use config::{ApiConfig, Config};
pub use self::core::{LoadPhase, MediaListViewModel, Property, ViewModel};
pub use events::{ChangeEvent, ChangeNotifier, ChannelNotifier};
pub use models::{Cursor, IndexPath, MediaItem, MediaItemId, MediaType, Page};
pub use state::{ChildrenState, PageStore};
