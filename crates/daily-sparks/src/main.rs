//! # Daily Sparks CLI (`sparks`)
//!
//! The `sparks` binary is the operational interface for the Daily Sparks
//! related-content engine.
//!
//! ## Usage
//!
//! ```bash
//! sparks --config ./config/sparks.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sparks init` | Create the SQLite database and run schema migrations |
//! | `sparks import <file>` | Import posts from a JSON file |
//! | `sparks related` | Query related content for a post |
//! | `sparks serve` | Start the public HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! sparks init --config ./config/sparks.toml
//!
//! # Import a batch of posts
//! sparks import ./content/posts.json
//!
//! # Preview an import without writing
//! sparks import ./content/posts.json --dry-run
//!
//! # Related posts for an article
//! sparks related --exclude tokyo-eats --category Travel --tags japan,food --limit 5
//!
//! # Start the HTTP server
//! sparks serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use daily_sparks::{config, import, migrate, related_cmd, server};

/// Daily Sparks CLI — a blogging platform's related-content engine.
#[derive(Parser)]
#[command(
    name = "sparks",
    about = "Daily Sparks — related-content engine for a blogging platform",
    version,
    long_about = "Daily Sparks recommends related articles: candidates are fetched from a \
    SQLite content store with a coarse category/tag filter, scored on tag overlap, title \
    keyword hits, and category match, then ranked and served via CLI and HTTP."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/sparks.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the posts table. This
    /// command is idempotent — running it multiple times is safe.
    Init,

    /// Import posts from a JSON file.
    ///
    /// Reads an array of post drafts, assigns slugs (with uniqueness
    /// suffixing), and upserts them. Posts whose content is unchanged
    /// since the last import are skipped.
    Import {
        /// Path to the JSON file containing an array of posts.
        file: PathBuf,

        /// Show what would happen without writing to the database.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of posts to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Query related content for a post.
    ///
    /// Runs the same scoring pipeline as `GET /related-content` and
    /// prints the ranked results.
    Related {
        /// Post to exclude from results (id or slug).
        #[arg(long)]
        exclude: Option<String>,

        /// Category filter (case-insensitive).
        #[arg(long)]
        category: Option<String>,

        /// Tag filter, comma-separated (case-sensitive).
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Free text (typically the post title) for keyword matching.
        #[arg(long)]
        title: Option<String>,

        /// Maximum number of results (clamped to the configured range).
        #[arg(long)]
        limit: Option<usize>,

        /// Print results as JSON instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Start the public HTTP server.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// related content, posts, and feeds.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_init(&cfg).await?;
        }
        Commands::Import {
            file,
            dry_run,
            limit,
        } => {
            import::run_import(&cfg, &file, dry_run, limit).await?;
        }
        Commands::Related {
            exclude,
            category,
            tags,
            title,
            limit,
            json,
        } => {
            related_cmd::run_related(&cfg, exclude, category, tags, title, limit, json).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
