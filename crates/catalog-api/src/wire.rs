//! Backend JSON shapes and their conversion into the canonical models.
//!
//! The backend is loose about field names (`rating` / `averageRating` / `ratingAvg`,
//! `title` / `primaryTitle`, `year` / `startYear`) and serializes dates either as
//! RFC 3339 or as RFC 2822. All of that is resolved here, once.

use catalog_models::{
    Genre, Movie, Person, Principal, Review, SearchLogEntry, TitleDetails, WatchlistItem,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parse a backend timestamp: RFC 3339, RFC 2822, or a naive ISO timestamp taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn first_rating(candidates: [Option<f64>; 3]) -> Option<f64> {
    candidates.into_iter().flatten().next()
}

#[derive(Debug, Deserialize)]
pub struct WireReview {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub stars: Option<i64>,
    pub text: Option<String>,
    pub tags: Option<Vec<String>>,
    pub spoiler: Option<bool>,
    pub created_at: Option<String>,
}

impl WireReview {
    /// Reviews without an author or a readable timestamp can't take part in merging, and
    /// ones without a 1-10 rating or any text could never have been submitted
    pub fn into_review(self) -> Option<Review> {
        let Some(user_id) = self.user_id else {
            debug!("Dropping review without user_id");
            return None;
        };
        let Some(created_at) = self.created_at.as_deref().and_then(parse_timestamp) else {
            debug!(
                "Dropping review by user {} with unreadable created_at {:?}",
                user_id, self.created_at
            );
            return None;
        };
        let Some(stars) = self.stars.filter(|s| (1..=10).contains(s)) else {
            debug!("Dropping review by user {} with stars {:?}", user_id, self.stars);
            return None;
        };
        let Some(text) = self.text.filter(|t| !t.trim().is_empty()) else {
            debug!("Dropping review by user {} without text", user_id);
            return None;
        };
        Some(Review {
            user_id,
            username: self.username,
            stars: stars as u8,
            text,
            tags: self.tags.unwrap_or_default(),
            spoiler: self.spoiler.unwrap_or(false),
            created_at,
        })
    }
}

/// Body of `POST /api/reviews/{tconst}`
#[derive(Debug, Serialize)]
pub struct ReviewBody<'a> {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    pub stars: u8,
    pub text: &'a str,
    pub tags: &'a [String],
    pub spoiler: bool,
    pub created_at: String,
}

impl<'a> From<&'a Review> for ReviewBody<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            user_id: review.user_id,
            username: review.username.as_deref(),
            stars: review.stars,
            text: &review.text,
            tags: &review.tags,
            spoiler: review.spoiler,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireWatchlistItem {
    pub tconst: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub genres: Option<Vec<String>>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub average_rating: Option<f64>,
    pub rating_avg: Option<f64>,
}

impl WireWatchlistItem {
    pub fn into_item(self) -> Option<WatchlistItem> {
        let title = self.title.filter(|t| !t.is_empty())?;
        let Some(year) = self.year else {
            debug!("Dropping watchlist item '{}' without a year", title);
            return None;
        };
        let genres = match (self.genres, self.genre) {
            (Some(genres), _) => genres,
            (None, Some(genre)) if !genre.is_empty() => vec![genre],
            _ => Vec::new(),
        };
        Some(WatchlistItem {
            title,
            year,
            tconst: self.tconst.filter(|t| !t.is_empty()),
            genres,
            rating: first_rating([self.rating, self.average_rating, self.rating_avg]),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct WatchlistBody<'a> {
    pub tconst: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMovie {
    pub tconst: String,
    pub title: Option<String>,
    pub primary_title: Option<String>,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub start_year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    pub average_rating: Option<f64>,
    pub rating_avg: Option<f64>,
    pub num_votes: Option<u64>,
}

impl From<WireMovie> for Movie {
    fn from(wire: WireMovie) -> Self {
        let title = wire
            .title
            .or(wire.primary_title)
            .or_else(|| wire.original_title.clone())
            .unwrap_or_else(|| wire.tconst.clone());
        Movie {
            tconst: wire.tconst,
            title,
            original_title: wire.original_title,
            year: wire.year.or(wire.start_year),
            genres: wire.genres,
            rating: first_rating([wire.rating, wire.average_rating, wire.rating_avg]),
            num_votes: wire.num_votes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePrincipal {
    pub ordering: Option<u32>,
    pub category: Option<String>,
    pub job: Option<String>,
    pub character_name: Option<String>,
    pub nconst: String,
    pub primary_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTitleDetails {
    #[serde(flatten)]
    pub movie: WireMovie,
    pub title_type: Option<String>,
    pub end_year: Option<i32>,
    pub runtime_minutes: Option<u32>,
    /// MySQL hands this back as 0/1
    pub is_adult: Option<serde_json::Value>,
    #[serde(default)]
    pub principals: Vec<WirePrincipal>,
}

impl From<WireTitleDetails> for TitleDetails {
    fn from(wire: WireTitleDetails) -> Self {
        let is_adult = match wire.is_adult {
            Some(serde_json::Value::Bool(b)) => b,
            Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
            _ => false,
        };
        TitleDetails {
            movie: wire.movie.into(),
            title_type: wire.title_type,
            end_year: wire.end_year,
            runtime_minutes: wire.runtime_minutes,
            is_adult,
            principals: wire
                .principals
                .into_iter()
                .map(|p| Principal {
                    ordering: p.ordering,
                    category: p.category,
                    job: p.job,
                    character_name: p.character_name,
                    nconst: p.nconst,
                    name: p.primary_name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePerson {
    pub nconst: String,
    pub primary_name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    #[serde(default)]
    pub professions: Vec<String>,
}

impl From<WirePerson> for Person {
    fn from(wire: WirePerson) -> Self {
        Person {
            nconst: wire.nconst,
            primary_name: wire.primary_name,
            birth_year: wire.birth_year,
            death_year: wire.death_year,
            professions: wire.professions,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireGenre {
    #[serde(rename = "genreID")]
    pub genre_id: i64,
    pub name: String,
}

impl From<WireGenre> for Genre {
    fn from(wire: WireGenre) -> Self {
        Genre {
            genre_id: wire.genre_id,
            name: wire.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireSearchLog {
    pub q: Option<String>,
    pub ts: Option<String>,
}

impl From<WireSearchLog> for SearchLogEntry {
    fn from(wire: WireSearchLog) -> Self {
        SearchLogEntry {
            q: wire.q.unwrap_or_default(),
            ts: wire.ts.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchLogBody<'a> {
    pub q: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `{"error": ...}` / `{"message": ...}` bodies sent with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct WireErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 10, 1, 12, 45, 0).unwrap();
        assert_eq!(parse_timestamp("2025-10-01T12:45:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-01T14:45:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("Wed, 01 Oct 2025 12:45:00 GMT"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-01T12:45:00.000000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_review_normalization() {
        let json = r#"[
            {"id":"a1","tconst":"tt1375666","user_id":7,"username":"user-7","stars":9,"text":"Great","spoiler":false,"tags":["score"],"created_at":"Wed, 01 Oct 2025 12:45:00 GMT","updated_at":null},
            {"user_id":null,"stars":5,"text":"anon","created_at":"2025-10-01T12:45:00Z"},
            {"user_id":8,"stars":5,"text":"bad date","created_at":"soon"},
            {"user_id":9,"stars":0,"text":"zero","created_at":"2025-10-01T12:45:00Z"},
            {"user_id":10,"stars":11,"text":"eleven","created_at":"2025-10-01T12:45:00Z"},
            {"user_id":11,"text":"unrated","created_at":"2025-10-01T12:45:00Z"},
            {"user_id":12,"stars":6,"text":"   ","created_at":"2025-10-01T12:45:00Z"},
            {"user_id":13,"stars":6,"created_at":"2025-10-01T12:45:00Z"},
            {"user_id":14,"stars":10,"text":"ok","created_at":"2025-10-01T12:45:00Z"}
        ]"#;
        let wire: Vec<WireReview> = serde_json::from_str(json).unwrap();
        let reviews: Vec<Review> = wire.into_iter().filter_map(WireReview::into_review).collect();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[1].user_id, 14);
        assert_eq!(reviews[1].stars, 10);
        assert_eq!(reviews[0].user_id, 7);
        assert_eq!(reviews[0].username.as_deref(), Some("user-7"));
        assert_eq!(reviews[0].tags, vec!["score"]);
    }

    #[test]
    fn test_watchlist_rating_aliases() {
        let json = r#"[
            {"tconst":"tt1","title":"A","year":2001,"genres":["Drama"],"rating":7.1},
            {"title":"B","year":2002,"averageRating":8.2,"genre":"Comedy"},
            {"title":"C","year":2003,"ratingAvg":6.3},
            {"title":"D","year":null,"rating":5.0}
        ]"#;
        let wire: Vec<WireWatchlistItem> = serde_json::from_str(json).unwrap();
        let items: Vec<WatchlistItem> = wire.into_iter().filter_map(WireWatchlistItem::into_item).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].rating, Some(7.1));
        assert_eq!(items[0].tconst.as_deref(), Some("tt1"));
        assert_eq!(items[1].rating, Some(8.2));
        assert_eq!(items[1].genres, vec!["Comedy"]);
        assert_eq!(items[2].rating, Some(6.3));
        assert_eq!(items[2].key(), "C (2003)");
    }

    #[test]
    fn test_title_details_normalization() {
        let json = r#"{
            "tconst":"tt1375666","primaryTitle":"Inception","originalTitle":"Inception",
            "titleType":"movie","year":2010,"endYear":null,"runtimeMinutes":148,"isAdult":0,
            "genres":["Action","Sci-Fi"],"ratingAvg":8.8,"numVotes":2500000,
            "principals":[{"ordering":1,"category":"director","job":null,"characterName":null,"nconst":"nm0000288","primaryName":"Christopher Nolan"}],
            "akas":[]
        }"#;
        let wire: WireTitleDetails = serde_json::from_str(json).unwrap();
        let details: TitleDetails = wire.into();
        assert_eq!(details.movie.title, "Inception");
        assert_eq!(details.movie.year, Some(2010));
        assert_eq!(details.movie.rating, Some(8.8));
        assert!(!details.is_adult);
        assert_eq!(details.principals[0].name.as_deref(), Some("Christopher Nolan"));
    }

    #[test]
    fn test_review_body_uses_rfc3339() {
        let review = Review {
            user_id: 42,
            username: None,
            stars: 8,
            text: "Solid".to_string(),
            tags: vec![],
            spoiler: true,
            created_at: Utc.with_ymd_and_hms(2025, 11, 1, 8, 12, 0).unwrap(),
        };
        let body = serde_json::to_value(ReviewBody::from(&review)).unwrap();
        assert_eq!(body["created_at"], "2025-11-01T08:12:00+00:00");
        assert_eq!(body["spoiler"], true);
        assert!(body.get("username").is_none());
    }
}
