use catalog_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode cache entry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Input rejected before anything is sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please choose a star rating.")]
    MissingRating,

    #[error("Rating must be between 1 and 10 (got {0}).")]
    RatingOutOfRange(u8),

    #[error("Please write some review text.")]
    EmptyText,

    #[error("Please fill in all fields.")]
    MissingCredentials,

    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("You haven't reviewed this title.")]
    NoReview,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("failed to update local session: {0}")]
    Store(#[from] StoreError),

    #[error("You need to log in first.")]
    NotLoggedIn,

    #[error("Admin access required.")]
    NotAdmin,

    #[error("You cannot modify your own account here.")]
    SelfModification,

    #[error("Nothing to update.")]
    NothingToUpdate,
}
