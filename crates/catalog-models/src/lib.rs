pub mod movie;
pub mod page;
pub mod persist;
pub mod review;
pub mod search;
pub mod user;
pub mod watchlist;

pub use movie::{Genre, Movie, MovieQuery, Person, Principal, TitleDetails};
pub use page::Page;
pub use persist::{PersistOutcome, PersistSource};
pub use review::{Review, ReviewDraft};
pub use search::{SearchLogEntry, TrendingQuery};
pub use user::{ProfileUpdate, Registration, SessionUser, UserPatch, DEMO_USER_ID};
pub use watchlist::{WatchlistItem, WatchlistTarget};
