use super::{render, App};
use crate::output::Output;
use catalog_core::paginate;
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Read queries from stdin, one per line, until EOF or `:q`
pub async fn run_interactive(app: &App, output: &Output) -> Result<()> {
    let search = app.search();
    let watchlist = app.watchlist();
    let per_page = app.per_page(None);

    output.println(format!(
        "{} Type a query and press enter; an empty line lists everything. Ctrl-D or :q to quit.",
        "→".bright_blue()
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        output.print("search> ")?;
        let Some(line) = lines.next_line().await.wrap_err("Failed to read from stdin")? else {
            break;
        };
        if line.trim() == ":q" {
            break;
        }

        let results = search.on_input(&line).await;
        let page = paginate(&results, 1, per_page);

        if !output.is_human() {
            output.json(&json!({ "type": "search", "q": line.trim(), "page": page }));
            continue;
        }
        if results.is_empty() {
            output.info("No matches.");
            continue;
        }
        output.table(&render::movies_table(&page.items, |m| {
            m.to_watchlist_item().is_some_and(|item| watchlist.contains(&item))
        }));
        if page.total > page.items.len() {
            output.println(format!("Showing {} of {} matches.", page.items.len(), page.total));
        }
    }

    // The last query may still be inside its quiet window
    search.flush().await;
    Ok(())
}

pub async fn run_history(app: &App, output: &Output) -> Result<()> {
    let history = app.search().history().await.wrap_err("Failed to load search history")?;

    if !output.is_human() {
        output.json(&json!({ "type": "history", "userId": app.session.user_id(), "entries": history }));
        return Ok(());
    }
    if history.is_empty() {
        output.info("No searches recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["Query", "When"]);
    for entry in &history {
        let when = entry
            .ts
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![entry.q.clone(), when]);
    }
    output.table(&table);
    Ok(())
}

pub async fn run_trending(app: &App, output: &Output) -> Result<()> {
    let trending = app.search().trending().await.wrap_err("Failed to load trending searches")?;

    if !output.is_human() {
        output.json(&json!({ "type": "trending", "queries": trending }));
        return Ok(());
    }
    if trending.is_empty() {
        output.info("Nothing trending yet.");
        return Ok(());
    }
    for (rank, entry) in trending.iter().enumerate() {
        output.println(format!("{:>2}. {} {}", rank + 1, entry.q.bold(), format!("({})", entry.count).dimmed()));
    }
    Ok(())
}
