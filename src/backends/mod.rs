pub mod graph;
pub mod traits;

pub use graph::{ApiError, GraphApi};
pub use traits::MediaClient;
