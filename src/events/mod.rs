pub mod notifier;
pub mod types;

pub use notifier::{ChangeNotifier, ChannelNotifier};
pub use types::ChangeEvent;
