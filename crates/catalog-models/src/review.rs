use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single user's review of one title.
///
/// Reviews are scoped by title (tconst) outside of this struct; within one title the
/// `user_id` is the identity key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub stars: u8, // 1-10
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub spoiler: bool,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated review input as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub stars: Option<u8>,
    pub text: String,
    pub tags: String, // comma separated
    pub spoiler: bool,
}

impl ReviewDraft {
    /// Split the raw tag input on commas, trimming and dropping empty entries
    pub fn parsed_tags(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}
