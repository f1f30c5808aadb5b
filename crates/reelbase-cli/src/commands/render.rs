use catalog_models::{Genre, Movie, Page, Person, Principal, Review, SessionUser, WatchlistItem};
use comfy_table::{Attribute, Cell, Color, Table};

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn rating(value: Option<f64>) -> String {
    value.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string())
}

/// "★★★★★★★☆☆☆ 7/10"
pub fn stars(count: u8) -> String {
    let filled = usize::from(count.min(10));
    format!("{}{} {}/10", "★".repeat(filled), "☆".repeat(10 - filled), count)
}

/// Navigation line under a paged listing; `None` when everything fits on one page
pub fn page_footer<T>(page: &Page<T>) -> Option<String> {
    if !page.needs_controls() {
        return None;
    }
    let numbers: Vec<String> = page
        .page_numbers()
        .map(|n| if n == page.page { format!("[{}]", n) } else { n.to_string() })
        .collect();
    let prev = if page.has_previous() { "‹ prev" } else { "" };
    let next = if page.has_next() { "next ›" } else { "" };
    Some(
        format!("{} {} {}  ({} total)", prev, numbers.join(" "), next, page.total)
            .trim()
            .to_string(),
    )
}

/// Warning for a page number beyond the last page of a non-empty listing
pub fn past_end_notice<T>(page: &Page<T>) -> Option<String> {
    (page.is_empty() && page.total > 0)
        .then(|| format!("Page {} is past the end ({} pages).", page.page, page.pages))
}

pub fn movies_table(movies: &[Movie], on_watchlist: impl Fn(&Movie) -> bool) -> Table {
    let mut table = new_table(&["", "tconst", "Title", "Year", "Genres", "Rating"]);
    for movie in movies {
        table.add_row(vec![
            Cell::new(if on_watchlist(movie) { "✓" } else { "" }).fg(Color::Green),
            Cell::new(&movie.tconst),
            Cell::new(&movie.title),
            Cell::new(or_dash(movie.year)),
            Cell::new(movie.genres.join(", ")),
            Cell::new(rating(movie.rating)),
        ]);
    }
    table
}

pub fn principals_table(principals: &[Principal]) -> Table {
    let mut table = new_table(&["Name", "Category", "Character"]);
    for p in principals {
        table.add_row(vec![
            p.name.clone().unwrap_or_else(|| p.nconst.clone()),
            or_dash(p.category.as_deref().or(p.job.as_deref())),
            or_dash(p.character_name.as_deref()),
        ]);
    }
    table
}

pub fn people_table(people: &[Person]) -> Table {
    let mut table = new_table(&["nconst", "Name", "Years", "Professions"]);
    for person in people {
        table.add_row(vec![
            person.nconst.clone(),
            person.primary_name.clone(),
            person.lifespan(),
            person.professions.join(", "),
        ]);
    }
    table
}

pub fn genres_table(genres: &[Genre]) -> Table {
    let mut table = new_table(&["Id", "Genre"]);
    for genre in genres {
        table.add_row(vec![genre.genre_id.to_string(), genre.name.clone()]);
    }
    table
}

pub fn reviews_table(reviews: &[Review], own_user_id: i64) -> Table {
    let mut table = new_table(&["User", "Rating", "Review", "Tags", "Date"]);
    for review in reviews {
        let user = review
            .username
            .clone()
            .unwrap_or_else(|| format!("user {}", review.user_id));
        let mut user_cell = Cell::new(user);
        if review.user_id == own_user_id {
            user_cell = user_cell.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        let text = if review.spoiler {
            "[spoiler hidden]".to_string()
        } else {
            review.text.clone()
        };
        table.add_row(vec![
            user_cell,
            Cell::new(stars(review.stars)).fg(Color::Yellow),
            Cell::new(text),
            Cell::new(review.tags.join(", ")),
            Cell::new(review.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    table
}

pub fn watchlist_table(items: &[WatchlistItem]) -> Table {
    let mut table = new_table(&["Title", "Year", "tconst", "Genres", "Rating"]);
    for item in items {
        table.add_row(vec![
            item.title.clone(),
            item.year.to_string(),
            or_dash(item.tconst.as_deref()),
            item.genres.join(", "),
            rating(item.rating),
        ]);
    }
    table
}

pub fn users_table(users: &[SessionUser]) -> Table {
    let mut table = new_table(&["Id", "Username", "Email", "Display name", "Admin", "Active"]);
    for user in users {
        let flag = |set: bool| if set { "yes" } else { "no" };
        table.add_row(vec![
            user.user_id.to_string(),
            user.username.clone(),
            user.email.clone(),
            or_dash(user.display_name.as_deref()),
            flag(user.is_admin).to_string(),
            flag(user.is_active).to_string(),
        ]);
    }
    table
}
