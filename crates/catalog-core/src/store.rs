use crate::error::StoreError;
use catalog_models::{Review, SessionUser, WatchlistItem};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub const REVIEWS_KEY: &str = "reviews";
pub const WATCHLIST_KEY: &str = "watchlist";
pub const USER_KEY: &str = "user";

/// Persistent string-valued key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Atomic replace via rename
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`]: cached reviews per title, the watchlist and the
/// logged-in user. Display reads never fail; unreadable or corrupt entries count as absent.
/// Mutations read through [`LocalCache::try_watchlist`] and friends and refuse to write over
/// an entry they could not read.
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocalCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read for display: any failure counts as absent
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Read for read-modify-write. A store error is returned so the caller never
    /// overwrites an entry it could not read; a corrupt entry is dropped and reads as absent.
    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(key)? else {
            debug!("Cache miss: {}", key);
            return Ok(None);
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                debug!("Cache hit: {}", key);
                Ok(Some(value))
            }
            Err(e) => {
                warn!("Cache corruption detected for {}: {}. Removing entry.", key, e);
                if let Err(rm_err) = self.store.remove(key) {
                    warn!("Failed to remove corrupted cache entry {}: {}", key, rm_err);
                }
                Ok(None)
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)?;
        self.store.set(key, &json)?;
        debug!("Cache saved: {}", key);
        Ok(())
    }

    fn all_reviews(&self) -> Result<BTreeMap<String, Vec<Review>>, StoreError> {
        Ok(self.try_load(REVIEWS_KEY)?.unwrap_or_default())
    }

    pub fn reviews_for(&self, tconst: &str) -> Vec<Review> {
        let mut all: BTreeMap<String, Vec<Review>> = self.load(REVIEWS_KEY).unwrap_or_default();
        all.remove(tconst).unwrap_or_default()
    }

    /// Replace the review by the same user for this title, or append it
    pub fn upsert_review(&self, tconst: &str, review: Review) -> Result<(), StoreError> {
        let mut all = self.all_reviews()?;
        let list = all.entry(tconst.to_string()).or_default();
        match list.iter_mut().find(|r| r.user_id == review.user_id) {
            Some(existing) => *existing = review,
            None => list.push(review),
        }
        self.save(REVIEWS_KEY, &all)
    }

    /// Returns whether a review was removed
    pub fn remove_review(&self, tconst: &str, user_id: i64) -> Result<bool, StoreError> {
        let mut all = self.all_reviews()?;
        let Some(list) = all.get_mut(tconst) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|r| r.user_id != user_id);
        let removed = list.len() != before;
        if list.is_empty() {
            all.remove(tconst);
        }
        if removed {
            self.save(REVIEWS_KEY, &all)?;
        }
        Ok(removed)
    }

    pub fn watchlist(&self) -> Vec<WatchlistItem> {
        self.load(WATCHLIST_KEY).unwrap_or_default()
    }

    /// Watchlist for a read-modify-write; fails instead of reading an unreadable list as empty
    pub fn try_watchlist(&self) -> Result<Vec<WatchlistItem>, StoreError> {
        Ok(self.try_load(WATCHLIST_KEY)?.unwrap_or_default())
    }

    pub fn set_watchlist(&self, items: &[WatchlistItem]) -> Result<(), StoreError> {
        self.save(WATCHLIST_KEY, items)
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.load(USER_KEY)
    }

    pub fn set_user(&self, user: &SessionUser) -> Result<(), StoreError> {
        self.save(USER_KEY, user)
    }

    pub fn clear_user(&self) -> Result<(), StoreError> {
        self.store.remove(USER_KEY)
    }

    /// Drop cached reviews and watchlist; the session is kept
    pub fn clear_data(&self) -> Result<(), StoreError> {
        self.store.remove(REVIEWS_KEY)?;
        self.store.remove(WATCHLIST_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FlakyStore;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::Ordering;

    fn review(user_id: i64, stars: u8, day: u32) -> Review {
        Review {
            user_id,
            username: None,
            stars,
            text: format!("review by {}", user_id),
            tags: Vec::new(),
            spoiler: false,
            created_at: Utc.with_ymd_and_hms(2025, 10, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_file_store_roundtrip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store")).unwrap();

        assert_eq!(store.get("watchlist").unwrap(), None);
        store.set("watchlist", "[]").unwrap();
        assert_eq!(store.get("watchlist").unwrap().as_deref(), Some("[]"));
        assert!(store.dir().join("watchlist.json").exists());

        store.remove("watchlist").unwrap();
        store.remove("watchlist").unwrap();
        assert_eq!(store.get("watchlist").unwrap(), None);
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent_and_is_removed() {
        let store = Arc::new(MemoryStore::new());
        store.set(WATCHLIST_KEY, "{not json").unwrap();
        let cache = LocalCache::new(store.clone());

        assert!(cache.watchlist().is_empty());
        assert_eq!(store.get(WATCHLIST_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path()).unwrap());
        std::fs::write(dir.path().join("user.json"), "garbage").unwrap();
        let cache = LocalCache::new(store);

        assert!(cache.user().is_none());
        assert!(!dir.path().join("user.json").exists());
    }

    #[test]
    fn test_upsert_review_replaces_same_user() {
        let cache = LocalCache::in_memory();
        cache.upsert_review("tt1375666", review(7, 6, 1)).unwrap();
        cache.upsert_review("tt1375666", review(8, 5, 2)).unwrap();
        cache.upsert_review("tt1375666", review(7, 9, 3)).unwrap();
        cache.upsert_review("tt0468569", review(7, 10, 4)).unwrap();

        let reviews = cache.reviews_for("tt1375666");
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].stars, 9);
        assert_eq!(cache.reviews_for("tt0468569").len(), 1);
    }

    #[test]
    fn test_remove_review() {
        let cache = LocalCache::in_memory();
        cache.upsert_review("tt1375666", review(7, 6, 1)).unwrap();

        assert!(!cache.remove_review("tt1375666", 99).unwrap());
        assert!(cache.remove_review("tt1375666", 7).unwrap());
        assert!(cache.reviews_for("tt1375666").is_empty());
        assert!(!cache.remove_review("tt0000001", 7).unwrap());
    }

    #[test]
    fn test_failed_read_never_overwrites_reviews() {
        let store = Arc::new(FlakyStore::default());
        let cache = LocalCache::new(store.clone());
        cache.upsert_review("ttA", review(7, 8, 1)).unwrap();

        store.fail_reads.store(true, Ordering::SeqCst);
        assert!(matches!(cache.upsert_review("ttB", review(7, 6, 2)), Err(StoreError::Io(_))));
        assert!(cache.remove_review("ttA", 7).is_err());
        assert!(cache.try_watchlist().is_err());
        assert!(cache.watchlist().is_empty());

        store.fail_reads.store(false, Ordering::SeqCst);
        assert_eq!(cache.reviews_for("ttA").len(), 1);
        assert!(cache.reviews_for("ttB").is_empty());
    }

    #[test]
    fn test_clear_data_keeps_user() {
        let cache = LocalCache::in_memory();
        cache.set_watchlist(&[WatchlistItem::new("Heat", 1995)]).unwrap();
        cache.upsert_review("tt0113277", review(1, 8, 1)).unwrap();
        cache
            .set_user(&SessionUser {
                user_id: 1,
                username: "ana".to_string(),
                email: String::new(),
                display_name: None,
                bio: None,
                is_admin: false,
                is_active: true,
            })
            .unwrap();

        cache.clear_data().unwrap();
        assert!(cache.watchlist().is_empty());
        assert!(cache.reviews_for("tt0113277").is_empty());
        assert!(cache.user().is_some());
    }
}
