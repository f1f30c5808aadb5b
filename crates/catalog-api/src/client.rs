use crate::api;
use crate::error::ApiError;
use crate::traits::{AccountBackend, BrowseBackend, ReviewBackend, SearchBackend, WatchlistBackend};
use async_trait::async_trait;
use catalog_models::{
    Genre, Movie, MovieQuery, Person, ProfileUpdate, Registration, Review, SearchLogEntry,
    SessionUser, TitleDetails, TrendingQuery, UserPatch, WatchlistItem,
};
use reqwest::Client;
use std::sync::Arc;

/// REST client for the catalog backend
#[derive(Clone)]
pub struct HttpBackend {
    client: Arc<Client>,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("reelbase/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Arc::new(client),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ReviewBackend for HttpBackend {
    async fn get_reviews(&self, tconst: &str) -> Result<Vec<Review>, ApiError> {
        api::get_reviews(&self.client, &self.base_url, tconst).await
    }

    async fn put_review(&self, tconst: &str, review: &Review) -> Result<(), ApiError> {
        api::put_review(&self.client, &self.base_url, tconst, review).await
    }

    async fn delete_review(&self, tconst: &str, user_id: i64) -> Result<(), ApiError> {
        api::delete_review(&self.client, &self.base_url, tconst, user_id).await
    }
}

#[async_trait]
impl WatchlistBackend for HttpBackend {
    async fn get_watchlist(&self, user_id: i64) -> Result<Vec<WatchlistItem>, ApiError> {
        api::get_watchlist(&self.client, &self.base_url, user_id).await
    }

    async fn add_watchlist_item(&self, user_id: i64, tconst: &str) -> Result<(), ApiError> {
        api::add_watchlist_item(&self.client, &self.base_url, user_id, tconst).await
    }

    async fn remove_watchlist_item(&self, user_id: i64, tconst: &str) -> Result<(), ApiError> {
        api::remove_watchlist_item(&self.client, &self.base_url, user_id, tconst).await
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn list_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, ApiError> {
        api::list_movies(&self.client, &self.base_url, query).await
    }

    async fn log_search(&self, user_id: i64, q: &str) -> Result<(), ApiError> {
        api::log_search(&self.client, &self.base_url, user_id, q).await
    }

    async fn search_history(&self, user_id: i64) -> Result<Vec<SearchLogEntry>, ApiError> {
        api::search_history(&self.client, &self.base_url, user_id).await
    }

    async fn trending(&self) -> Result<Vec<TrendingQuery>, ApiError> {
        api::trending(&self.client, &self.base_url).await
    }
}

#[async_trait]
impl BrowseBackend for HttpBackend {
    async fn get_title(&self, tconst: &str) -> Result<TitleDetails, ApiError> {
        api::get_title(&self.client, &self.base_url, tconst).await
    }

    async fn list_people(&self, q: Option<&str>) -> Result<Vec<Person>, ApiError> {
        api::list_people(&self.client, &self.base_url, q).await
    }

    async fn list_genres(&self) -> Result<Vec<Genre>, ApiError> {
        api::list_genres(&self.client, &self.base_url).await
    }
}

#[async_trait]
impl AccountBackend for HttpBackend {
    async fn login(&self, identifier: &str, password: &str) -> Result<SessionUser, ApiError> {
        api::login(&self.client, &self.base_url, identifier, password).await
    }

    async fn register(&self, registration: &Registration) -> Result<SessionUser, ApiError> {
        api::register(&self.client, &self.base_url, registration).await
    }

    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<SessionUser, ApiError> {
        api::update_profile(&self.client, &self.base_url, user_id, update).await
    }

    async fn list_users(&self) -> Result<Vec<SessionUser>, ApiError> {
        api::list_users(&self.client, &self.base_url).await
    }

    async fn update_user(&self, user_id: i64, patch: &UserPatch) -> Result<SessionUser, ApiError> {
        api::update_user(&self.client, &self.base_url, user_id, patch).await
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        api::delete_user(&self.client, &self.base_url, user_id).await
    }
}
