pub mod debounce;
pub mod error;
pub mod fallback;
pub mod pagination;
pub mod reconcile;
pub mod reviews;
pub mod search;
pub mod session;
pub mod store;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod testing;

pub use debounce::Debouncer;
pub use error::{ReviewError, SessionError, StoreError, ValidationError};
pub use pagination::{clamp_page, paginate};
pub use reconcile::{merge_reviews, merge_watchlist};
pub use reviews::{ReviewService, SubmitOutcome};
pub use search::SearchSession;
pub use session::Session;
pub use store::{FileStore, KeyValueStore, LocalCache, MemoryStore};
pub use watchlist::WatchlistService;
