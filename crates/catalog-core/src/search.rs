use crate::debounce::Debouncer;
use crate::session::Session;
use catalog_api::{ApiError, SearchBackend};
use catalog_models::{Movie, MovieQuery, SearchLogEntry, TrendingQuery};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);
pub const DEFAULT_MIN_LOGGED_LEN: usize = 2;

/// Live movie search: results for every keystroke, a search-log entry once typing settles
pub struct SearchSession {
    backend: Arc<dyn SearchBackend>,
    session: Arc<Session>,
    debouncer: Debouncer,
    min_logged_len: usize,
}

impl SearchSession {
    pub fn new(backend: Arc<dyn SearchBackend>, session: Arc<Session>) -> Self {
        Self::with_settings(backend, session, DEFAULT_DEBOUNCE, DEFAULT_MIN_LOGGED_LEN)
    }

    pub fn with_settings(
        backend: Arc<dyn SearchBackend>,
        session: Arc<Session>,
        window: Duration,
        min_logged_len: usize,
    ) -> Self {
        Self {
            backend,
            session,
            debouncer: Debouncer::new(window),
            min_logged_len,
        }
    }

    /// Handle the current contents of the search box.
    ///
    /// Returns the filtered movies right away. Queries of at least `min_logged_len`
    /// characters (re)arm the search-log write; shorter ones disarm it.
    pub async fn on_input(&self, raw: &str) -> Vec<Movie> {
        let query = raw.trim().to_string();

        if query.chars().count() >= self.min_logged_len {
            let backend = self.backend.clone();
            let user_id = self.session.user_id();
            let q = query.clone();
            self.debouncer.schedule(async move {
                match backend.log_search(user_id, &q).await {
                    Ok(()) => debug!("Logged search '{}' for user {}", q, user_id),
                    Err(e) => warn!("Failed to log search '{}': {}", q, e),
                }
            });
        } else {
            self.debouncer.cancel();
        }

        self.filter(&query).await
    }

    async fn filter(&self, query: &str) -> Vec<Movie> {
        let movie_query = if query.is_empty() {
            MovieQuery::default()
        } else {
            MovieQuery::search(query)
        };
        match self.backend.list_movies(&movie_query).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!("Movie search for '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }

    pub fn has_pending_log(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Let a pending search-log write finish
    pub async fn flush(&self) {
        self.debouncer.flush().await;
    }

    pub async fn history(&self) -> Result<Vec<SearchLogEntry>, ApiError> {
        self.backend.search_history(self.session.user_id()).await
    }

    pub async fn trending(&self) -> Result<Vec<TrendingQuery>, ApiError> {
        self.backend.trending().await
    }
}
