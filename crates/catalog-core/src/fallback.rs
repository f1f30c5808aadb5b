use catalog_models::Review;
use chrono::{DateTime, TimeZone, Utc};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn seed(user_id: i64, stars: u8, text: &str, tags: &[&str], created_at: DateTime<Utc>) -> Review {
    Review {
        user_id,
        username: None,
        stars,
        text: text.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        spoiler: false,
        created_at,
    }
}

/// Reviews bundled with the client, shown when neither cache nor server has any
pub fn fallback_reviews(tconst: &str) -> Vec<Review> {
    match tconst {
        "tt1375666" => vec![
            seed(
                7,
                9,
                "Mind-bending score and pacing.",
                &["soundtrack", "pacing"],
                utc(2025, 10, 1, 12, 45),
            ),
            seed(12, 9, "Dream layers still hold up.", &["concept"], utc(2025, 11, 1, 8, 12)),
        ],
        "tt0468569" => vec![seed(
            23,
            10,
            "Ledger's Joker is unmatched.",
            &["performance"],
            utc(2025, 9, 20, 10, 0),
        )],
        _ => Vec::new(),
    }
}
