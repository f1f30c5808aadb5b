use crate::error::ApiError;
use async_trait::async_trait;
use catalog_models::{
    Genre, Movie, MovieQuery, Person, ProfileUpdate, Registration, Review, SearchLogEntry,
    SessionUser, TitleDetails, TrendingQuery, UserPatch, WatchlistItem,
};

// The backend is split by concern so that services (and their test fakes) only
// depend on the endpoints they actually call.

#[async_trait]
pub trait ReviewBackend: Send + Sync {
    async fn get_reviews(&self, tconst: &str) -> Result<Vec<Review>, ApiError>;
    async fn put_review(&self, tconst: &str, review: &Review) -> Result<(), ApiError>;
    async fn delete_review(&self, tconst: &str, user_id: i64) -> Result<(), ApiError>;
}

#[async_trait]
pub trait WatchlistBackend: Send + Sync {
    async fn get_watchlist(&self, user_id: i64) -> Result<Vec<WatchlistItem>, ApiError>;
    async fn add_watchlist_item(&self, user_id: i64, tconst: &str) -> Result<(), ApiError>;
    async fn remove_watchlist_item(&self, user_id: i64, tconst: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn list_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, ApiError>;
    async fn log_search(&self, user_id: i64, q: &str) -> Result<(), ApiError>;
    async fn search_history(&self, user_id: i64) -> Result<Vec<SearchLogEntry>, ApiError>;
    async fn trending(&self) -> Result<Vec<TrendingQuery>, ApiError>;
}

#[async_trait]
pub trait BrowseBackend: Send + Sync {
    async fn get_title(&self, tconst: &str) -> Result<TitleDetails, ApiError>;
    async fn list_people(&self, q: Option<&str>) -> Result<Vec<Person>, ApiError>;
    async fn list_genres(&self) -> Result<Vec<Genre>, ApiError>;
}

#[async_trait]
pub trait AccountBackend: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> Result<SessionUser, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<SessionUser, ApiError>;
    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<SessionUser, ApiError>;

    // Admin
    async fn list_users(&self) -> Result<Vec<SessionUser>, ApiError>;
    async fn update_user(&self, user_id: i64, patch: &UserPatch) -> Result<SessionUser, ApiError>;
    async fn delete_user(&self, user_id: i64) -> Result<(), ApiError>;
}

/// Everything the catalog client talks to
pub trait CatalogBackend:
    ReviewBackend + WatchlistBackend + SearchBackend + BrowseBackend + AccountBackend
{
}

impl<T> CatalogBackend for T where
    T: ReviewBackend + WatchlistBackend + SearchBackend + BrowseBackend + AccountBackend
{
}
