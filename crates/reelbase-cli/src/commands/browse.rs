use super::{render, App};
use crate::output::Output;
use crate::PageArgs;
use catalog_api::{BrowseBackend, SearchBackend};
use catalog_core::paginate;
use catalog_models::MovieQuery;
use color_eyre::eyre::Context;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_movies(app: &App, query: MovieQuery, paging: PageArgs, output: &Output) -> Result<()> {
    let movies = app
        .backend
        .list_movies(&query)
        .await
        .wrap_err("Failed to load movies")?;
    let page = paginate(&movies, paging.page, app.per_page(paging.per_page));

    if !output.is_human() {
        output.json(&json!({ "type": "movies", "page": page }));
        return Ok(());
    }
    if movies.is_empty() {
        output.info("No movies match these filters.");
        return Ok(());
    }
    if let Some(notice) = render::past_end_notice(&page) {
        output.warn(notice);
        return Ok(());
    }

    let watchlist = app.watchlist();
    output.table(&render::movies_table(&page.items, |m| {
        m.to_watchlist_item().is_some_and(|item| watchlist.contains(&item))
    }));
    if let Some(footer) = render::page_footer(&page) {
        output.println(footer);
    }
    Ok(())
}

pub async fn run_title(app: &App, tconst: &str, output: &Output) -> Result<()> {
    let details = app
        .backend
        .get_title(tconst)
        .await
        .wrap_err_with(|| format!("Failed to load title {}", tconst))?;

    let on_watchlist = details
        .movie
        .to_watchlist_item()
        .is_some_and(|item| app.watchlist().contains(&item));

    if !output.is_human() {
        output.json(&json!({ "type": "title", "title": details, "onWatchlist": on_watchlist }));
        return Ok(());
    }

    let movie = &details.movie;
    let year = match (movie.year, details.end_year) {
        (Some(start), Some(end)) => format!(" ({}–{})", start, end),
        (Some(start), None) => format!(" ({})", start),
        _ => String::new(),
    };
    output.println(format!("\n{}{}", movie.title.bright_cyan().bold(), year));
    if let Some(original) = movie.original_title.as_deref().filter(|o| *o != movie.title) {
        output.println(format!("Original title: {}", original));
    }
    let mut facts = Vec::new();
    if let Some(kind) = &details.title_type {
        facts.push(kind.clone());
    }
    if let Some(minutes) = details.runtime_minutes {
        facts.push(format!("{} min", minutes));
    }
    if !movie.genres.is_empty() {
        facts.push(movie.genres.join(", "));
    }
    if details.is_adult {
        facts.push("adult".to_string());
    }
    if !facts.is_empty() {
        output.println(facts.join(" · "));
    }
    let votes = movie.num_votes.map(|n| format!(" from {} votes", n)).unwrap_or_default();
    output.println(format!("Rating: {}{}", render::rating(movie.rating), votes));
    if on_watchlist {
        output.println(format!("{} On your watchlist", "✓".green()));
    }

    if !details.principals.is_empty() {
        output.println("");
        output.table(&render::principals_table(&details.principals));
    }
    Ok(())
}

pub async fn run_people(app: &App, query: Option<String>, paging: PageArgs, output: &Output) -> Result<()> {
    let people = app
        .backend
        .list_people(query.as_deref())
        .await
        .wrap_err("Failed to load people")?;
    let page = paginate(&people, paging.page, app.per_page(paging.per_page));

    if !output.is_human() {
        output.json(&json!({ "type": "people", "page": page }));
        return Ok(());
    }
    if people.is_empty() {
        output.info("No people found.");
        return Ok(());
    }
    if let Some(notice) = render::past_end_notice(&page) {
        output.warn(notice);
        return Ok(());
    }
    output.table(&render::people_table(&page.items));
    if let Some(footer) = render::page_footer(&page) {
        output.println(footer);
    }
    Ok(())
}

pub async fn run_genres(app: &App, output: &Output) -> Result<()> {
    let genres = app.backend.list_genres().await.wrap_err("Failed to load genres")?;

    if !output.is_human() {
        output.json(&json!({ "type": "genres", "genres": genres }));
        return Ok(());
    }
    output.table(&render::genres_table(&genres));
    Ok(())
}
