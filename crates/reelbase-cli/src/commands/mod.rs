pub mod account;
pub mod admin;
pub mod browse;
pub mod clear;
pub mod config;
pub mod prompts;
pub mod render;
pub mod reviews;
pub mod search;
pub mod watchlist;

use catalog_api::HttpBackend;
use catalog_config::{Config, PathManager};
use catalog_core::{FileStore, LocalCache, ReviewService, SearchSession, Session, WatchlistService};
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use std::sync::Arc;
use std::time::Duration;

/// Everything a command needs: config, the backend client, the local store and the session
pub struct App {
    pub config: Config,
    pub backend: Arc<HttpBackend>,
    pub cache: LocalCache,
    pub session: Arc<Session>,
}

impl App {
    pub fn load(ephemeral: bool) -> Result<Self> {
        let path_manager = PathManager::default();
        let config_file = path_manager.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        let cache = if ephemeral {
            LocalCache::in_memory()
        } else {
            let store_dir = config.storage.dir.clone().unwrap_or_else(|| path_manager.store_dir());
            let store = FileStore::new(&store_dir)
                .wrap_err_with(|| format!("Failed to open local store at {}", store_dir.display()))?;
            LocalCache::new(Arc::new(store))
        };

        let backend = Arc::new(HttpBackend::new(config.api_base()).wrap_err("Failed to create HTTP client")?);
        let session = Arc::new(Session::restore(backend.clone(), cache.clone()));

        Ok(Self {
            config,
            backend,
            cache,
            session,
        })
    }

    pub fn reviews(&self) -> ReviewService {
        ReviewService::new(self.backend.clone(), self.cache.clone(), self.session.clone())
    }

    pub fn watchlist(&self) -> WatchlistService {
        WatchlistService::new(self.backend.clone(), self.cache.clone(), self.session.clone())
    }

    pub fn search(&self) -> SearchSession {
        SearchSession::with_settings(
            self.backend.clone(),
            self.session.clone(),
            Duration::from_millis(self.config.ui.search_debounce_ms),
            self.config.ui.min_logged_query_len,
        )
    }

    pub fn per_page(&self, requested: Option<usize>) -> usize {
        requested.filter(|n| *n > 0).unwrap_or(self.config.ui.per_page)
    }
}
