pub mod viewmodels;

pub use viewmodels::{LoadPhase, MediaListViewModel, Property, PropertySubscriber, ViewModel};
