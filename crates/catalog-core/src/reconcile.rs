use catalog_models::{Review, WatchlistItem};
use std::collections::HashMap;
use tracing::debug;

// Reviews merge timestamp-wins across every source; the watchlist merges local-wins
// with server gap fill. The two share no helper.

/// Merge review lists from the local cache, the static fallback set and the server.
///
/// Records are considered in the order local, fallback, server. For each `user_id` the record
/// with the strictly latest `created_at` survives; on equal timestamps the one seen first
/// stays. The result is sorted newest first (stable, so ties keep their first-seen order).
pub fn merge_reviews(local: Vec<Review>, fallback: Vec<Review>, server: Vec<Review>) -> Vec<Review> {
    let counts = (local.len(), fallback.len(), server.len());
    let mut merged: Vec<Review> = Vec::new();
    let mut by_user: HashMap<i64, usize> = HashMap::new();

    for review in local.into_iter().chain(fallback).chain(server) {
        match by_user.get(&review.user_id) {
            Some(&idx) => {
                if review.created_at > merged[idx].created_at {
                    merged[idx] = review;
                }
            }
            None => {
                by_user.insert(review.user_id, merged.len());
                merged.push(review);
            }
        }
    }

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    debug!(
        "merge_reviews: local={}, fallback={}, server={} -> {}",
        counts.0,
        counts.1,
        counts.2,
        merged.len()
    );
    merged
}

/// Merge the local watchlist with the server's.
///
/// Every local entry is kept as-is and in order. A server entry is appended only when no
/// entry already in the result is the same entry (see [`WatchlistItem::same_entry`]).
pub fn merge_watchlist(local: Vec<WatchlistItem>, server: Vec<WatchlistItem>) -> Vec<WatchlistItem> {
    let local_count = local.len();
    let server_count = server.len();
    let mut merged = local;

    for item in server {
        if !merged.iter().any(|existing| existing.same_entry(&item)) {
            merged.push(item);
        }
    }

    debug!(
        "merge_watchlist: local={}, server={} -> {}",
        local_count,
        server_count,
        merged.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, hour, 0, 0).unwrap()
    }

    fn review(user_id: i64, text: &str, created_at: DateTime<Utc>) -> Review {
        Review {
            user_id,
            username: None,
            stars: 7,
            text: text.to_string(),
            tags: Vec::new(),
            spoiler: false,
            created_at,
        }
    }

    #[test]
    fn test_timestamp_wins_over_source_order() {
        let local = vec![review(1, "local old", at(1))];
        let server = vec![review(1, "server new", at(5))];

        let merged = merge_reviews(local, Vec::new(), server);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "server new");
    }

    #[test]
    fn test_equal_timestamps_keep_first_seen() {
        let local = vec![review(1, "local", at(3))];
        let fallback = vec![review(1, "fallback", at(3))];
        let server = vec![review(1, "server", at(3))];

        let merged = merge_reviews(local, fallback, server);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "local");

        let merged = merge_reviews(Vec::new(), vec![review(2, "fallback", at(3))], vec![review(2, "server", at(3))]);
        assert_eq!(merged[0].text, "fallback");
    }

    #[test]
    fn test_merged_reviews_sorted_newest_first() {
        let local = vec![review(1, "a", at(2)), review(2, "b", at(9))];
        let fallback = vec![review(3, "c", at(4))];
        let server = vec![review(4, "d", at(7)), review(1, "a2", at(1))];

        let merged = merge_reviews(local, fallback, server);
        let users: Vec<i64> = merged.iter().map(|r| r.user_id).collect();
        assert_eq!(users, vec![2, 4, 3, 1]);
        assert_eq!(merged[3].text, "a");
    }

    #[test]
    fn test_one_review_per_user_with_max_timestamp() {
        // Deterministic spread of users and timestamps across the three sources
        let base = at(0);
        let mut sources: [Vec<Review>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for i in 0..60i64 {
            let user = i % 7;
            let offset = (i * 37) % 101;
            sources[(i % 3) as usize].push(review(user, &format!("r{}", i), base + Duration::minutes(offset)));
        }
        let all: Vec<Review> = sources.iter().flatten().cloned().collect();
        let [local, fallback, server] = sources;

        let merged = merge_reviews(local, fallback, server);

        for user in 0..7 {
            let kept: Vec<&Review> = merged.iter().filter(|r| r.user_id == user).collect();
            assert_eq!(kept.len(), 1, "user {} should appear once", user);
            let max = all.iter().filter(|r| r.user_id == user).map(|r| r.created_at).max().unwrap();
            assert_eq!(kept[0].created_at, max);
        }
        for pair in merged.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_merge_reviews_all_empty() {
        assert!(merge_reviews(Vec::new(), Vec::new(), Vec::new()).is_empty());
    }

    #[test]
    fn test_watchlist_local_entry_wins() {
        let mut local_item = WatchlistItem::new("Inception", 2010).with_tconst("tt1375666");
        local_item.rating = Some(8.8);
        let mut server_item = WatchlistItem::new("Inception", 2010).with_tconst("tt1375666");
        server_item.rating = Some(1.0);
        server_item.genres = vec!["Sci-Fi".to_string()];

        let merged = merge_watchlist(vec![local_item.clone()], vec![server_item]);
        assert_eq!(merged, vec![local_item]);
    }

    #[test]
    fn test_watchlist_server_fills_gaps_in_order() {
        let local = vec![WatchlistItem::new("Heat", 1995), WatchlistItem::new("Alien", 1979)];
        let server = vec![
            WatchlistItem::new("Alien", 1979).with_tconst("tt0078748"),
            WatchlistItem::new("Arrival", 2016).with_tconst("tt2543164"),
            WatchlistItem::new("Arrival", 2016).with_tconst("tt2543164"),
        ];

        let merged = merge_watchlist(local, server);
        let keys: Vec<String> = merged.iter().map(|i| i.key()).collect();
        assert_eq!(keys, vec!["Heat (1995)", "Alien (1979)", "Arrival (2016)"]);
        // The local copy of Alien had no tconst and is kept untouched
        assert_eq!(merged[1].tconst, None);
    }

    #[test]
    fn test_watchlist_distinct_tconsts_with_same_key_both_kept() {
        let local = vec![WatchlistItem::new("Dune", 2021).with_tconst("tt1160419")];
        let server = vec![WatchlistItem::new("Dune", 2021).with_tconst("tt0000042")];

        let merged = merge_watchlist(local, server);
        assert_eq!(merged.len(), 2);
    }
}
