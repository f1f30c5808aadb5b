use crate::reconcile::merge_watchlist;
use crate::session::Session;
use crate::store::LocalCache;
use catalog_api::WatchlistBackend;
use catalog_models::{PersistOutcome, WatchlistItem, WatchlistTarget};
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// The user's watchlist: local cache first, server sync for logged-in users.
///
/// Keeps an in-memory presence list so callers can tell whether a title is already on the
/// list without touching the cache. Membership uses the same identity rule as
/// [`WatchlistItem::same_entry`].
pub struct WatchlistService {
    backend: Arc<dyn WatchlistBackend>,
    cache: LocalCache,
    session: Arc<Session>,
    present: Mutex<Vec<WatchlistItem>>,
}

impl WatchlistService {
    pub fn new(backend: Arc<dyn WatchlistBackend>, cache: LocalCache, session: Arc<Session>) -> Self {
        let service = Self {
            backend,
            cache,
            session,
            present: Mutex::new(Vec::new()),
        };
        service.refresh_presence(&service.cache.watchlist());
        service
    }

    fn presence(&self) -> MutexGuard<'_, Vec<WatchlistItem>> {
        self.present.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn refresh_presence(&self, items: &[WatchlistItem]) {
        let mut present = self.presence();
        present.clear();
        for item in items {
            mark(&mut present, item);
        }
    }

    fn persist_local(&self, items: &[WatchlistItem]) -> bool {
        match self.cache.set_watchlist(items) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save watchlist locally: {}", e);
                false
            }
        }
    }

    /// Merge local and server lists and write the result back to the cache.
    ///
    /// An unreadable local list is left as it is: the server list is shown but not written back.
    pub async fn load(&self) -> Vec<WatchlistItem> {
        let local = match self.cache.try_watchlist() {
            Ok(items) => Some(items),
            Err(e) => {
                warn!("Failed to read local watchlist: {}. It will not be rewritten.", e);
                None
            }
        };
        let server = match self.session.logged_in_id() {
            Some(user_id) => match self.backend.get_watchlist(user_id).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Failed to fetch watchlist from server: {}. Using local list.", e);
                    Vec::new()
                }
            },
            None => {
                debug!("Not logged in, watchlist is local only");
                Vec::new()
            }
        };

        let writable = local.is_some();
        let merged = merge_watchlist(local.unwrap_or_default(), server);
        if writable {
            self.persist_local(&merged);
        }
        self.refresh_presence(&merged);
        merged
    }

    /// Cached list without contacting the server
    pub fn local_items(&self) -> Vec<WatchlistItem> {
        self.cache.watchlist()
    }

    pub fn contains(&self, item: &WatchlistItem) -> bool {
        self.presence().iter().any(|listed| listed.same_entry(item))
    }

    pub async fn add(&self, item: WatchlistItem) -> PersistOutcome {
        let local_saved = match self.cache.try_watchlist() {
            Ok(mut items) => {
                if items.iter().any(|existing| existing.same_entry(&item)) {
                    debug!("{} is already on the watchlist", item.key());
                } else {
                    items.push(item.clone());
                }
                self.persist_local(&items)
            }
            Err(e) => {
                warn!("Failed to read local watchlist: {}. Not adding {} locally.", e, item.key());
                false
            }
        };
        mark(&mut self.presence(), &item);

        let server_saved = match (self.session.logged_in_id(), item.tconst.as_deref()) {
            (Some(user_id), Some(tconst)) => match self.backend.add_watchlist_item(user_id, tconst).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to add {} to server watchlist: {}. Kept locally.", tconst, e);
                    false
                }
            },
            _ => false,
        };

        info!("Added {} to watchlist", item.key());
        PersistOutcome::from_parts(local_saved, server_saved)
    }

    /// Remove every item matching the target's key or tconst
    pub async fn remove(&self, target: &WatchlistTarget) -> PersistOutcome {
        let (removed, local_saved) = match self.cache.try_watchlist() {
            Ok(items) => {
                let (removed, kept): (Vec<WatchlistItem>, Vec<WatchlistItem>) =
                    items.into_iter().partition(|item| item.matches_target(target));
                let saved = self.persist_local(&kept);
                (removed, saved)
            }
            Err(e) => {
                warn!("Failed to read local watchlist: {}. Local list left untouched.", e);
                (Vec::new(), false)
            }
        };

        let mut tconsts: Vec<String> = removed.iter().filter_map(|i| i.tconst.clone()).collect();
        if let Some(tconst) = &target.tconst {
            if !tconsts.contains(tconst) {
                tconsts.push(tconst.clone());
            }
        }

        self.presence().retain(|item| !item.matches_target(target));

        let mut server_saved = false;
        if let Some(user_id) = self.session.logged_in_id() {
            let results = join_all(
                tconsts
                    .iter()
                    .map(|tconst| self.backend.remove_watchlist_item(user_id, tconst)),
            )
            .await;
            server_saved = !tconsts.is_empty();
            for (tconst, result) in tconsts.iter().zip(results) {
                if let Err(e) = result {
                    warn!("Failed to remove {} from server watchlist: {}", tconst, e);
                    server_saved = false;
                }
            }
        }

        info!("Removed {} item(s) from watchlist", removed.len());
        PersistOutcome::from_parts(local_saved, server_saved)
    }
}

fn mark(present: &mut Vec<WatchlistItem>, item: &WatchlistItem) {
    if !present.iter().any(|listed| listed.same_entry(item)) {
        present.push(item.clone());
    }
}
