// Instagram Graph API client

mod api;
pub mod errors;
mod types;


pub use api::GraphApi;
pub use errors::ApiError;
pub use types::TIMESTAMP_FORMAT;
