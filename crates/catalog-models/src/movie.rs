use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub tconst: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_votes: Option<u64>,
}

impl Movie {
    /// Watchlist entry for this movie; movies without a known year can't be keyed
    pub fn to_watchlist_item(&self) -> Option<crate::WatchlistItem> {
        let year = self.year?;
        Some(crate::WatchlistItem {
            title: self.title.clone(),
            year,
            tconst: Some(self.tconst.clone()),
            genres: self.genres.clone(),
            rating: self.rating,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Principal {
    pub ordering: Option<u32>,
    pub category: Option<String>,
    pub job: Option<String>,
    pub character_name: Option<String>,
    pub nconst: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleDetails {
    pub movie: Movie,
    pub title_type: Option<String>,
    pub end_year: Option<i32>,
    pub runtime_minutes: Option<u32>,
    pub is_adult: bool,
    pub principals: Vec<Principal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub nconst: String,
    pub primary_name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    #[serde(default)]
    pub professions: Vec<String>,
}

impl Person {
    /// "b. 1974" for the living, "1954–2020" otherwise
    pub fn lifespan(&self) -> String {
        let born = self
            .birth_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "?".to_string());
        match self.death_year {
            Some(died) => format!("{}–{}", born, died),
            None => format!("b. {}", born),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub genre_id: i64,
    pub name: String,
}

/// Filter parameters for the movie list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_start: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_end: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

impl MovieQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    /// Query-string pairs for the non-empty filters
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(genre) = self.genre.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            pairs.push(("genre", genre.to_string()));
        }
        if let Some(start) = self.year_start {
            pairs.push(("year_start", start.to_string()));
        }
        if let Some(end) = self.year_end {
            pairs.push(("year_end", end.to_string()));
        }
        if let Some(min) = self.min_rating {
            pairs.push(("min_rating", min.to_string()));
        }
        pairs
    }
}
