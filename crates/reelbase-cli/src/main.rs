use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{account, admin, browse, clear, config, reviews, search, watchlist, App};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelbase")]
#[command(about = "Reelbase - browse the movie catalog, keep a watchlist and review what you watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Keep the local store in memory for this run only
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone, Copy)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Results per page (defaults to ui.per_page from the config)
    #[arg(long)]
    pub per_page: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// List and filter movies
    Movies {
        /// Title search
        query: Option<String>,

        /// Only movies with this genre
        #[arg(long)]
        genre: Option<String>,

        /// Earliest release year
        #[arg(long)]
        year_start: Option<i32>,

        /// Latest release year
        #[arg(long)]
        year_end: Option<i32>,

        /// Minimum average rating
        #[arg(long)]
        min_rating: Option<f64>,

        #[command(flatten)]
        paging: PageArgs,
    },
    /// Show one title with its cast and crew
    Title { tconst: String },
    /// List people, optionally filtered by name
    People {
        query: Option<String>,

        #[command(flatten)]
        paging: PageArgs,
    },
    /// List genres
    Genres,
    /// Interactive search: each line typed is treated as the current search box contents
    #[command(long_about = "Start an interactive search. Every line you enter replaces the query, results are shown immediately, and the query is recorded in your search history once you stop typing for the configured quiet window.")]
    Search,
    /// Show your recent searches
    History,
    /// Show the most searched queries
    Trending,
    /// Read and write reviews
    Reviews {
        #[command(subcommand)]
        cmd: ReviewCommands,
    },
    /// Manage your watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// Log in to the catalog
    Login {
        /// Username or email (prompted when omitted)
        identifier: Option<String>,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        display_name: Option<String>,
    },
    /// Log out
    Logout,
    /// Show who is logged in
    Whoami,
    /// Update your profile
    Profile {
        #[arg(long)]
        display_name: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// Prompt for a new password
        #[arg(long, action = ArgAction::SetTrue)]
        password: bool,
    },
    /// User administration (admins only)
    Admin {
        #[command(subcommand)]
        cmd: AdminCommands,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear local data
    #[command(long_about = "Clear locally stored data. Use --cache to drop cached reviews and the local watchlist, --session to log out, or --all for both.")]
    Clear {
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        cache: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        session: bool,
    },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Show reviews for a title, newest first
    Show {
        tconst: String,

        #[command(flatten)]
        paging: PageArgs,
    },
    /// Write or replace your review of a title
    Submit {
        tconst: String,

        /// Rating from 1 to 10 (prompted when omitted)
        #[arg(long)]
        stars: Option<u8>,

        /// Review text (prompted when omitted)
        #[arg(long)]
        text: Option<String>,

        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,

        #[arg(long, action = ArgAction::SetTrue)]
        spoiler: bool,

        /// Replace an existing review without asking
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Delete your review of a title
    Delete { tconst: String },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// Show your watchlist
    Show {
        #[command(flatten)]
        paging: PageArgs,
    },
    /// Add a title, looked up by tconst or given by title and year
    Add {
        tconst: Option<String>,

        #[arg(long, requires = "year")]
        title: Option<String>,

        #[arg(long, requires = "title")]
        year: Option<i32>,
    },
    /// Remove a title by tconst or by its "Title (Year)" key
    Remove { target: String },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List all users
    Users,
    /// Change another user's admin or active flag
    Update {
        user_id: i64,

        #[arg(long)]
        admin: Option<bool>,

        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete another user
    Delete {
        user_id: i64,

        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Set one value, e.g. `reelbase config set ui.per_page 20`
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let output = output::Output::new(cli.output, cli.quiet);

    // Config commands must work even when the config file is invalid
    if let Commands::Config { cmd } = cli.command {
        logging::init_logging(cli.verbose, cli.quiet, None).map_err(|e| eyre!("{}", e))?;
        return config::run_config(cmd, &output);
    }

    let app = App::load(cli.ephemeral)?;
    logging::init_logging(cli.verbose, cli.quiet, app.config.logging.file.clone())
        .map_err(|e| eyre!("{}", e))?;
    tracing::debug!("Using API at {}", app.config.api_base());

    match cli.command {
        Commands::Movies {
            query,
            genre,
            year_start,
            year_end,
            min_rating,
            paging,
        } => {
            let query = catalog_models::MovieQuery {
                q: query,
                genre,
                year_start,
                year_end,
                min_rating,
            };
            browse::run_movies(&app, query, paging, &output).await
        }
        Commands::Title { tconst } => browse::run_title(&app, &tconst, &output).await,
        Commands::People { query, paging } => browse::run_people(&app, query, paging, &output).await,
        Commands::Genres => browse::run_genres(&app, &output).await,
        Commands::Search => search::run_interactive(&app, &output).await,
        Commands::History => search::run_history(&app, &output).await,
        Commands::Trending => search::run_trending(&app, &output).await,
        Commands::Reviews { cmd } => reviews::run_reviews(&app, cmd, &output).await,
        Commands::Watchlist { cmd } => watchlist::run_watchlist(&app, cmd, &output).await,
        Commands::Login { identifier } => account::run_login(&app, identifier, &output).await,
        Commands::Register {
            username,
            email,
            display_name,
        } => account::run_register(&app, username, email, display_name, &output).await,
        Commands::Logout => account::run_logout(&app, &output),
        Commands::Whoami => account::run_whoami(&app, &output),
        Commands::Profile {
            display_name,
            bio,
            password,
        } => account::run_profile(&app, display_name, bio, password, &output).await,
        Commands::Admin { cmd } => admin::run_admin(&app, cmd, &output).await,
        Commands::Clear { all, cache, session } => clear::run_clear(&app, all, cache, session, &output),
        Commands::Config { .. } => Ok(()),
    }
}
