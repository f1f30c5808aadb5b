use crate::error::{ReviewError, ValidationError};
use crate::fallback::fallback_reviews;
use crate::reconcile::merge_reviews;
use crate::session::Session;
use crate::store::LocalCache;
use catalog_api::ReviewBackend;
use catalog_models::{PersistOutcome, Review, ReviewDraft};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The user declined to overwrite their existing review; nothing changed
    Cancelled,
    Saved(PersistOutcome),
}

pub struct ReviewService {
    backend: Arc<dyn ReviewBackend>,
    cache: LocalCache,
    session: Arc<Session>,
}

impl ReviewService {
    pub fn new(backend: Arc<dyn ReviewBackend>, cache: LocalCache, session: Arc<Session>) -> Self {
        Self {
            backend,
            cache,
            session,
        }
    }

    async fn fetch_server(&self, tconst: &str) -> Vec<Review> {
        match self.backend.get_reviews(tconst).await {
            Ok(reviews) => reviews,
            Err(e) => {
                warn!("Failed to fetch reviews for {}: {}. Using cached data only.", tconst, e);
                Vec::new()
            }
        }
    }

    /// Reconciled reviews for a title, newest first
    pub async fn load(&self, tconst: &str) -> Vec<Review> {
        let server = self.fetch_server(tconst).await;
        let local = self.cache.reviews_for(tconst);
        merge_reviews(local, fallback_reviews(tconst), server)
    }

    /// The current user's review in the reconciled view, if any
    pub async fn own_review(&self, tconst: &str) -> Option<Review> {
        let user_id = self.session.user_id();
        self.load(tconst).await.into_iter().find(|r| r.user_id == user_id)
    }

    /// Validate and save the current user's review.
    ///
    /// When the user already has a review for this title, `confirm_overwrite` decides whether it
    /// is replaced. The local copy is written first; the server write is best-effort.
    pub async fn submit<F>(&self, tconst: &str, draft: &ReviewDraft, confirm_overwrite: F) -> Result<SubmitOutcome, ReviewError>
    where
        F: FnOnce(&Review) -> bool,
    {
        let (stars, text) = validate(draft)?;

        if let Some(existing) = self.own_review(tconst).await {
            if !confirm_overwrite(&existing) {
                debug!("Overwrite of review for {} declined", tconst);
                return Ok(SubmitOutcome::Cancelled);
            }
        }

        let review = Review {
            user_id: self.session.user_id(),
            username: self.session.username(),
            stars,
            text,
            tags: draft.parsed_tags(),
            spoiler: draft.spoiler,
            created_at: Utc::now(),
        };

        let local_saved = match self.cache.upsert_review(tconst, review.clone()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save review for {} locally: {}", tconst, e);
                false
            }
        };

        let server_saved = match self.backend.put_review(tconst, &review).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send review for {} to server: {}. Kept locally.", tconst, e);
                false
            }
        };

        let outcome = PersistOutcome::from_parts(local_saved, server_saved);
        info!(
            "Saved review for {} by user {} ({:?})",
            tconst, review.user_id, outcome.source
        );
        Ok(SubmitOutcome::Saved(outcome))
    }

    /// Remove the current user's review locally and on the server (best-effort)
    pub async fn delete(&self, tconst: &str) -> Result<PersistOutcome, ReviewError> {
        let user_id = self.session.user_id();
        if self.own_review(tconst).await.is_none() {
            return Err(ReviewError::NoReview);
        }

        let local_saved = match self.cache.remove_review(tconst, user_id) {
            Ok(removed) => {
                debug!("Local review for {} removed: {}", tconst, removed);
                true
            }
            Err(e) => {
                warn!("Failed to remove local review for {}: {}", tconst, e);
                false
            }
        };

        let server_saved = match self.backend.delete_review(tconst, user_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to delete review for {} on server: {}", tconst, e);
                false
            }
        };

        info!("Deleted review for {} by user {}", tconst, user_id);
        Ok(PersistOutcome::from_parts(local_saved, server_saved))
    }
}

fn validate(draft: &ReviewDraft) -> Result<(u8, String), ValidationError> {
    let stars = draft.stars.ok_or(ValidationError::MissingRating)?;
    if !(1..=10).contains(&stars) {
        return Err(ValidationError::RatingOutOfRange(stars));
    }
    let text = draft.text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok((stars, text.to_string()))
}
