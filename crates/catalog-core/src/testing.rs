//! In-memory backend and store doubles shared by the service tests.

use crate::error::StoreError;
use crate::store::{KeyValueStore, MemoryStore};
use async_trait::async_trait;
use catalog_api::{AccountBackend, ApiError, ReviewBackend, SearchBackend, WatchlistBackend};
use catalog_models::{
    Movie, MovieQuery, ProfileUpdate, Registration, Review, SearchLogEntry, SessionUser,
    TrendingQuery, UserPatch, WatchlistItem,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

#[derive(Default)]
pub struct FakeBackend {
    pub offline: AtomicBool,
    pub reviews: Mutex<HashMap<String, Vec<Review>>>,
    pub watchlist: Mutex<Vec<WatchlistItem>>,
    pub movies: Mutex<Vec<Movie>>,
    pub users: Mutex<Vec<SessionUser>>,
    pub search_logs: Mutex<Vec<(i64, String, Instant)>>,
    /// Every call, in order, as `"<method> <args>"`
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                message: "Server unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Memory store whose reads can be switched to fail
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_reads: AtomicBool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read refused").into());
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}

pub fn user(user_id: i64, username: &str, is_admin: bool) -> SessionUser {
    SessionUser {
        user_id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        display_name: None,
        bio: None,
        is_admin,
        is_active: true,
    }
}

pub fn movie(tconst: &str, title: &str, year: i32) -> Movie {
    Movie {
        tconst: tconst.to_string(),
        title: title.to_string(),
        original_title: None,
        year: Some(year),
        genres: Vec::new(),
        rating: None,
        num_votes: None,
    }
}

#[async_trait]
impl ReviewBackend for FakeBackend {
    async fn get_reviews(&self, tconst: &str) -> Result<Vec<Review>, ApiError> {
        self.record(format!("get_reviews {}", tconst))?;
        Ok(self.reviews.lock().unwrap().get(tconst).cloned().unwrap_or_default())
    }

    async fn put_review(&self, tconst: &str, review: &Review) -> Result<(), ApiError> {
        self.record(format!("put_review {} {}", tconst, review.user_id))?;
        let mut reviews = self.reviews.lock().unwrap();
        let list = reviews.entry(tconst.to_string()).or_default();
        list.retain(|r| r.user_id != review.user_id);
        list.push(review.clone());
        Ok(())
    }

    async fn delete_review(&self, tconst: &str, user_id: i64) -> Result<(), ApiError> {
        self.record(format!("delete_review {} {}", tconst, user_id))?;
        if let Some(list) = self.reviews.lock().unwrap().get_mut(tconst) {
            list.retain(|r| r.user_id != user_id);
        }
        Ok(())
    }
}

#[async_trait]
impl WatchlistBackend for FakeBackend {
    async fn get_watchlist(&self, user_id: i64) -> Result<Vec<WatchlistItem>, ApiError> {
        self.record(format!("get_watchlist {}", user_id))?;
        Ok(self.watchlist.lock().unwrap().clone())
    }

    async fn add_watchlist_item(&self, user_id: i64, tconst: &str) -> Result<(), ApiError> {
        self.record(format!("add_watchlist_item {} {}", user_id, tconst))?;
        Ok(())
    }

    async fn remove_watchlist_item(&self, user_id: i64, tconst: &str) -> Result<(), ApiError> {
        self.record(format!("remove_watchlist_item {} {}", user_id, tconst))?;
        self.watchlist
            .lock()
            .unwrap()
            .retain(|i| i.tconst.as_deref() != Some(tconst));
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn list_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, ApiError> {
        let q = query.q.clone().unwrap_or_default().to_lowercase();
        self.record(format!("list_movies {}", q))?;
        Ok(self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| q.is_empty() || m.title.to_lowercase().contains(&q))
            .cloned()
            .collect())
    }

    async fn log_search(&self, user_id: i64, q: &str) -> Result<(), ApiError> {
        self.record(format!("log_search {} {}", user_id, q))?;
        self.search_logs
            .lock()
            .unwrap()
            .push((user_id, q.to_string(), Instant::now()));
        Ok(())
    }

    async fn search_history(&self, user_id: i64) -> Result<Vec<SearchLogEntry>, ApiError> {
        self.record(format!("search_history {}", user_id))?;
        Ok(self
            .search_logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| *id == user_id)
            .map(|(_, q, _)| SearchLogEntry { q: q.clone(), ts: None })
            .collect())
    }

    async fn trending(&self) -> Result<Vec<TrendingQuery>, ApiError> {
        self.record("trending".to_string())?;
        Ok(vec![TrendingQuery {
            q: "nolan".to_string(),
            count: 3,
        }])
    }
}

#[async_trait]
impl AccountBackend for FakeBackend {
    async fn login(&self, identifier: &str, password: &str) -> Result<SessionUser, ApiError> {
        self.record(format!("login {}", identifier))?;
        let users = self.users.lock().unwrap();
        users
            .iter()
            .find(|u| (u.username == identifier || u.email == identifier) && password == "secret")
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
    }

    async fn register(&self, registration: &Registration) -> Result<SessionUser, ApiError> {
        self.record(format!("register {}", registration.username))?;
        let mut users = self.users.lock().unwrap();
        let next_id = users.iter().map(|u| u.user_id).max().unwrap_or(0) + 1;
        let mut created = user(next_id, &registration.username, false);
        created.email = registration.email.clone();
        created.display_name = registration.display_name.clone();
        users.push(created.clone());
        Ok(created)
    }

    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<SessionUser, ApiError> {
        self.record(format!("update_profile {}", user_id))?;
        let mut users = self.users.lock().unwrap();
        let found = users.iter_mut().find(|u| u.user_id == user_id).ok_or(ApiError::Status {
            status: 404,
            message: "User not found".to_string(),
        })?;
        if let Some(name) = &update.display_name {
            found.display_name = Some(name.clone());
        }
        if let Some(bio) = &update.bio {
            found.bio = Some(bio.clone());
        }
        Ok(found.clone())
    }

    async fn list_users(&self) -> Result<Vec<SessionUser>, ApiError> {
        self.record("list_users".to_string())?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_user(&self, user_id: i64, patch: &UserPatch) -> Result<SessionUser, ApiError> {
        self.record(format!("update_user {}", user_id))?;
        let mut users = self.users.lock().unwrap();
        let found = users.iter_mut().find(|u| u.user_id == user_id).ok_or(ApiError::Status {
            status: 404,
            message: "User not found".to_string(),
        })?;
        if let Some(is_admin) = patch.is_admin {
            found.is_admin = is_admin;
        }
        if let Some(is_active) = patch.is_active {
            found.is_active = is_active;
        }
        Ok(found.clone())
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.record(format!("delete_user {}", user_id))?;
        self.users.lock().unwrap().retain(|u| u.user_id != user_id);
        Ok(())
    }
}
