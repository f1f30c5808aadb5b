use crate::error::ApiError;
use crate::wire::{
    LoginBody, ReviewBody, SearchLogBody, WatchlistBody, WireErrorBody, WireGenre, WireMovie,
    WirePerson, WireReview, WireSearchLog, WireTitleDetails, WireWatchlistItem,
};
use catalog_models::{
    Genre, Movie, MovieQuery, Person, ProfileUpdate, Registration, Review, SearchLogEntry,
    SessionUser, TitleDetails, TrendingQuery, UserPatch, WatchlistItem,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Send a request and decode a JSON body, mapping non-2xx responses to `ApiError::Status`
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.header("Accept", "application/json").send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    Ok(serde_json::from_str(&body)?)
}

/// Send a request whose response body is irrelevant beyond its status
async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
    let response = request.header("Accept", "application/json").send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }

    Ok(())
}

fn status_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<WireErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

// Reviews

pub async fn get_reviews(client: &Client, base: &str, tconst: &str) -> Result<Vec<Review>, ApiError> {
    let url = format!("{}/api/reviews/{}", base, segment(tconst));
    let wire: Vec<WireReview> = send_json(client.get(&url)).await?;
    let total = wire.len();
    let reviews: Vec<Review> = wire.into_iter().filter_map(WireReview::into_review).collect();
    debug!(
        "get_reviews: tconst={}, received={}, usable={}",
        tconst,
        total,
        reviews.len()
    );
    Ok(reviews)
}

pub async fn put_review(client: &Client, base: &str, tconst: &str, review: &Review) -> Result<(), ApiError> {
    let url = format!("{}/api/reviews/{}", base, segment(tconst));
    send_empty(client.post(&url).json(&ReviewBody::from(review))).await
}

pub async fn delete_review(client: &Client, base: &str, tconst: &str, user_id: i64) -> Result<(), ApiError> {
    let url = format!("{}/api/reviews/{}/{}", base, segment(tconst), user_id);
    send_empty(client.delete(&url)).await
}

// Watchlist

pub async fn get_watchlist(client: &Client, base: &str, user_id: i64) -> Result<Vec<WatchlistItem>, ApiError> {
    let url = format!("{}/api/watchlist/{}", base, user_id);
    let wire: Vec<WireWatchlistItem> = send_json(client.get(&url)).await?;
    Ok(wire.into_iter().filter_map(WireWatchlistItem::into_item).collect())
}

pub async fn add_watchlist_item(client: &Client, base: &str, user_id: i64, tconst: &str) -> Result<(), ApiError> {
    let url = format!("{}/api/watchlist/{}", base, user_id);
    send_empty(client.post(&url).json(&WatchlistBody { tconst, note: None })).await
}

pub async fn remove_watchlist_item(client: &Client, base: &str, user_id: i64, tconst: &str) -> Result<(), ApiError> {
    let url = format!("{}/api/watchlist/{}", base, user_id);
    send_empty(client.delete(&url).json(&WatchlistBody { tconst, note: None })).await
}

// Search

pub async fn list_movies(client: &Client, base: &str, query: &MovieQuery) -> Result<Vec<Movie>, ApiError> {
    let url = format!("{}/api/movies", base);
    let wire: Vec<WireMovie> = send_json(client.get(&url).query(&query.to_pairs())).await?;
    Ok(wire.into_iter().map(Movie::from).collect())
}

pub async fn log_search(client: &Client, base: &str, user_id: i64, q: &str) -> Result<(), ApiError> {
    let url = format!("{}/api/search_logs/{}", base, user_id);
    send_empty(client.post(&url).json(&SearchLogBody { q })).await
}

pub async fn search_history(client: &Client, base: &str, user_id: i64) -> Result<Vec<SearchLogEntry>, ApiError> {
    let url = format!("{}/api/search_logs/{}", base, user_id);
    let wire: Vec<WireSearchLog> = send_json(client.get(&url)).await?;
    Ok(wire.into_iter().map(SearchLogEntry::from).collect())
}

pub async fn trending(client: &Client, base: &str) -> Result<Vec<TrendingQuery>, ApiError> {
    let url = format!("{}/api/search_trending", base);
    send_json(client.get(&url)).await
}

// Browse

pub async fn get_title(client: &Client, base: &str, tconst: &str) -> Result<TitleDetails, ApiError> {
    let url = format!("{}/api/title/{}", base, segment(tconst));
    let wire: WireTitleDetails = send_json(client.get(&url)).await?;
    Ok(wire.into())
}

pub async fn list_people(client: &Client, base: &str, q: Option<&str>) -> Result<Vec<Person>, ApiError> {
    let url = format!("{}/api/actors", base);
    let mut request = client.get(&url);
    if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
        request = request.query(&[("q", q)]);
    }
    let wire: Vec<WirePerson> = send_json(request).await?;
    Ok(wire.into_iter().map(Person::from).collect())
}

pub async fn list_genres(client: &Client, base: &str) -> Result<Vec<Genre>, ApiError> {
    let url = format!("{}/api/genres", base);
    let wire: Vec<WireGenre> = send_json(client.get(&url)).await?;
    Ok(wire.into_iter().map(Genre::from).collect())
}

// Accounts

pub async fn login(client: &Client, base: &str, identifier: &str, password: &str) -> Result<SessionUser, ApiError> {
    let url = format!("{}/api/login", base);
    let body = LoginBody {
        username: identifier,
        password,
    };
    send_json(client.post(&url).json(&body)).await
}

pub async fn register(client: &Client, base: &str, registration: &Registration) -> Result<SessionUser, ApiError> {
    let url = format!("{}/api/register", base);
    send_json(client.post(&url).json(registration)).await
}

pub async fn update_profile(
    client: &Client,
    base: &str,
    user_id: i64,
    update: &ProfileUpdate,
) -> Result<SessionUser, ApiError> {
    let url = format!("{}/api/users/{}", base, user_id);
    send_json(client.put(&url).json(update)).await
}

pub async fn list_users(client: &Client, base: &str) -> Result<Vec<SessionUser>, ApiError> {
    let url = format!("{}/api/admin/users", base);
    let users: Vec<SessionUser> = send_json(client.get(&url)).await?;
    if users.is_empty() {
        warn!("Admin user list came back empty");
    }
    Ok(users)
}

pub async fn update_user(client: &Client, base: &str, user_id: i64, patch: &UserPatch) -> Result<SessionUser, ApiError> {
    let url = format!("{}/api/admin/users/{}", base, user_id);
    send_json(client.put(&url).json(patch)).await
}

pub async fn delete_user(client: &Client, base: &str, user_id: i64) -> Result<(), ApiError> {
    let url = format!("{}/api/admin/users/{}", base, user_id);
    send_empty(client.delete(&url)).await
}
