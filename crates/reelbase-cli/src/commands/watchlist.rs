use super::reviews::report;
use super::{render, App};
use crate::output::Output;
use crate::WatchlistCommands;
use catalog_api::BrowseBackend;
use catalog_core::paginate;
use catalog_models::{WatchlistItem, WatchlistTarget};
use color_eyre::eyre::eyre;
use color_eyre::Report;
use color_eyre::Result;
use serde_json::json;

pub async fn run_watchlist(app: &App, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    let watchlist = app.watchlist();

    match cmd {
        WatchlistCommands::Show { paging } => {
            let items = watchlist.load().await;
            let page = paginate(&items, paging.page, app.per_page(paging.per_page));

            if !output.is_human() {
                output.json(&json!({ "type": "watchlist", "page": page }));
                return Ok(());
            }
            if items.is_empty() {
                output.info("Your watchlist is empty.");
                return Ok(());
            }
            if let Some(notice) = render::past_end_notice(&page) {
                output.warn(notice);
                return Ok(());
            }
            if !app.session.is_logged_in() {
                output.println("Showing the local watchlist. Log in to sync it with your account.");
            }
            output.table(&render::watchlist_table(&page.items));
            if let Some(footer) = render::page_footer(&page) {
                output.println(footer);
            }
            Ok(())
        }
        WatchlistCommands::Add { tconst, title, year } => {
            let item = resolve_item(app, tconst, title, year).await?;
            let key = item.key();
            let persist = watchlist.add(item).await;
            report(output, &format!("Added {} to your watchlist", key), &persist);
            output.json(&json!({ "type": "watchlist", "added": key, "persist": persist }));
            Ok(())
        }
        WatchlistCommands::Remove { target } => {
            let target = parse_target(&target);
            let persist = watchlist.remove(&target).await;
            let label = target.tconst.or(target.key).unwrap_or_default();
            report(output, &format!("Removed {} from your watchlist", label), &persist);
            output.json(&json!({ "type": "watchlist", "removed": label, "persist": persist }));
            Ok(())
        }
    }
}

async fn resolve_item(
    app: &App,
    tconst: Option<String>,
    title: Option<String>,
    year: Option<i32>,
) -> Result<WatchlistItem> {
    let manual = title.zip(year).map(|(title, year)| WatchlistItem::new(title, year));

    let Some(tconst) = tconst else {
        return manual.ok_or_else(|| eyre!("Give a tconst, or --title and --year"));
    };

    match app.backend.get_title(&tconst).await {
        Ok(details) => details
            .movie
            .to_watchlist_item()
            .or_else(|| manual.clone().map(|m| m.with_tconst(tconst.clone())))
            .ok_or_else(|| eyre!("{} has no release year; pass --title and --year", tconst)),
        Err(e) => match manual {
            Some(item) => {
                tracing::warn!("Title lookup for {} failed: {}. Using the given title.", tconst, e);
                Ok(item.with_tconst(tconst))
            }
            None => Err(Report::new(e).wrap_err(format!("Could not look up {}", tconst))),
        },
    }
}

/// `tt1234567` removes by id, anything else by "Title (Year)" key
fn parse_target(raw: &str) -> WatchlistTarget {
    let raw = raw.trim();
    let is_tconst = raw.len() > 2
        && raw.starts_with("tt")
        && raw[2..].chars().all(|c| c.is_ascii_digit());
    if is_tconst {
        WatchlistTarget::by_tconst(raw)
    } else {
        WatchlistTarget::by_key(raw)
    }
}
