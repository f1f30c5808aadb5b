use super::{prompts, render, App};
use crate::output::Output;
use crate::ReviewCommands;
use catalog_core::{paginate, SubmitOutcome};
use catalog_models::{PersistOutcome, Review, ReviewDraft};
use color_eyre::Result;
use serde_json::json;
use tracing::warn;

pub async fn run_reviews(app: &App, cmd: ReviewCommands, output: &Output) -> Result<()> {
    match cmd {
        ReviewCommands::Show { tconst, paging } => {
            let reviews = app.reviews().load(&tconst).await;
            let page = paginate(&reviews, paging.page, app.per_page(paging.per_page));

            if !output.is_human() {
                output.json(&json!({ "type": "reviews", "tconst": tconst, "page": page }));
                return Ok(());
            }
            if reviews.is_empty() {
                output.info(format!("No reviews for {} yet.", tconst));
                return Ok(());
            }
            if let Some(notice) = render::past_end_notice(&page) {
                output.warn(notice);
                return Ok(());
            }
            output.table(&render::reviews_table(&page.items, app.session.user_id()));
            if let Some(footer) = render::page_footer(&page) {
                output.println(footer);
            }
            Ok(())
        }
        ReviewCommands::Submit {
            tconst,
            stars,
            text,
            tags,
            spoiler,
            yes,
        } => {
            let stars = match stars {
                Some(stars) => stars,
                None => prompts::prompt_number_in("Stars (1-10)", 1..=10)?,
            };
            let text = match text {
                Some(text) => text,
                None => prompts::prompt_string("Review", None)?,
            };
            let draft = ReviewDraft {
                stars: Some(stars),
                text,
                tags,
                spoiler,
            };

            let outcome = app
                .reviews()
                .submit(&tconst, &draft, |existing| yes || confirm_overwrite(existing))
                .await?;

            match outcome {
                SubmitOutcome::Cancelled => {
                    output.info("Kept your existing review.");
                    output.json(&json!({ "type": "review", "tconst": tconst, "status": "cancelled" }));
                }
                SubmitOutcome::Saved(persist) => {
                    report(output, "Review saved", &persist);
                    output.json(&json!({ "type": "review", "tconst": tconst, "status": "saved", "persist": persist }));
                }
            }
            Ok(())
        }
        ReviewCommands::Delete { tconst } => {
            let persist = app.reviews().delete(&tconst).await?;
            report(output, "Review deleted", &persist);
            output.json(&json!({ "type": "review", "tconst": tconst, "status": "deleted", "persist": persist }));
            Ok(())
        }
    }
}

fn confirm_overwrite(existing: &Review) -> bool {
    let prompt = format!(
        "You already reviewed this title ({}, {}). Replace it?",
        render::stars(existing.stars),
        existing.created_at.format("%Y-%m-%d")
    );
    prompts::prompt_yes_no(&prompt, false).unwrap_or_else(|e| {
        warn!("Could not ask for confirmation: {}", e);
        false
    })
}

/// Success line plus a warning when the change only reached the local store
pub fn report(output: &Output, what: &str, persist: &PersistOutcome) {
    if !output.is_human() {
        return;
    }
    if persist.reached_server() {
        output.success(what);
    } else if persist.persisted {
        output.success(what);
        output.warn("Server unavailable. The change is saved locally only.");
    } else {
        output.error(format!("{} failed: could not save locally or on the server.", what));
    }
}
