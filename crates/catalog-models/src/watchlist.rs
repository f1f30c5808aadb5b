use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistItem {
    pub title: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tconst: Option<String>, // canonical title id when known
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl WatchlistItem {
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            year,
            tconst: None,
            genres: Vec::new(),
            rating: None,
        }
    }

    pub fn with_tconst(mut self, tconst: impl Into<String>) -> Self {
        self.tconst = Some(tconst.into());
        self
    }

    /// Display key `"{title} ({year})"`, used as identity when no tconst is known
    pub fn key(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }

    /// Key used by the presence set: the tconst when present, else the display key
    pub fn identity_key(&self) -> String {
        self.tconst.clone().unwrap_or_else(|| self.key())
    }

    /// Whether two items denote the same watchlist entry.
    ///
    /// When both sides carry a tconst it decides alone; otherwise the display keys are compared.
    pub fn same_entry(&self, other: &WatchlistItem) -> bool {
        match (&self.tconst, &other.tconst) {
            (Some(a), Some(b)) => a == b,
            _ => self.key() == other.key(),
        }
    }

    pub fn matches_target(&self, target: &WatchlistTarget) -> bool {
        let by_key = target.key.as_deref().is_some_and(|k| k == self.key());
        let by_tconst = match (&target.tconst, &self.tconst) {
            (Some(t), Some(own)) => t == own,
            _ => false,
        };
        by_key || by_tconst
    }
}

/// Identifies the item(s) to remove from a watchlist: by display key, by tconst, or both
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchlistTarget {
    pub key: Option<String>,
    pub tconst: Option<String>,
}

impl WatchlistTarget {
    pub fn by_key(key: impl Into<String>) -> Self {
        Self { key: Some(key.into()), tconst: None }
    }

    pub fn by_tconst(tconst: impl Into<String>) -> Self {
        Self { key: None, tconst: Some(tconst.into()) }
    }

    pub fn for_item(item: &WatchlistItem) -> Self {
        Self {
            key: Some(item.key()),
            tconst: item.tconst.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.tconst.is_none()
    }
}
