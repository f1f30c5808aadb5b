use super::App;
use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;

pub fn run_clear(app: &App, all: bool, cache: bool, session: bool, output: &Output) -> Result<()> {
    if all {
        clear_cache(app, output)?;
        clear_session(app, output)?;
        output.success("Local reviews, watchlist and session cleared");
        return Ok(());
    }

    let mut cleared_anything = false;

    if cache {
        clear_cache(app, output)?;
        cleared_anything = true;
    }

    if session {
        clear_session(app, output)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --cache, --session, or --all");
        output.println("\nExample: reelbase clear --cache");
    }

    Ok(())
}

fn clear_cache(app: &App, output: &Output) -> Result<()> {
    app.cache
        .clear_data()
        .wrap_err("Failed to clear locally stored reviews and watchlist")?;
    output.info("Cleared locally stored reviews and watchlist");
    Ok(())
}

fn clear_session(app: &App, output: &Output) -> Result<()> {
    let was_logged_in = app.session.is_logged_in();
    app.session.logout().wrap_err("Failed to clear the saved session")?;
    if was_logged_in {
        output.info("Cleared the saved session");
    } else {
        output.info("No saved session to clear");
    }
    Ok(())
}
