pub mod api;
pub mod client;
pub mod error;
pub mod traits;
pub mod wire;

pub use client::HttpBackend;
pub use error::ApiError;
pub use traits::{AccountBackend, BrowseBackend, CatalogBackend, ReviewBackend, SearchBackend, WatchlistBackend};
