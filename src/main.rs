//! # Navify CLI (`navify`)
//!
//! The `navify` binary is the front end for the knowledge search
//! aggregator. It provides commands for store initialization, running the
//! aggregation pipeline, entry retrieval and rating, search history, and
//! direct expert lookup.
//!
//! ## Usage
//!
//! ```bash
//! navify --config ./config/navify.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `navify init` | Create the SQLite store and seed demo data |
//! | `navify search "<query>"` | Classify, fan out, and show merged results |
//! | `navify get <id>` | Print an entry's detail view (counts a view) |
//! | `navify rate <id> --helpful` | Record a rating event |
//! | `navify history` | Print recent searches, newest first |
//! | `navify experts <term>...` | Query the expert index directly |

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use navify::{config, db, entry, experts, history, migrate, search, seed, sqlite_store};

/// Navify: a local-first knowledge search aggregator.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/navify.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "navify",
    about = "Navify - search answers, experts, and docs from one query",
    version,
    long_about = "Navify aggregates an organization's answer sources: a knowledge entry \
    store, an expert directory, a documentation index, and an optional remote QnA service. \
    One query fans out to all of them and comes back as a single merged result list."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/navify.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the store schema and seed demo data.
    ///
    /// Creates the SQLite file, runs migrations, and loads the
    /// documentation index plus demo users/entries when the store is
    /// empty. Idempotent.
    Init,

    /// Run the search aggregation pipeline for a query.
    ///
    /// Classifies the query, asks the QnA service (best effort), searches
    /// entries and experts, filters the documentation index, and prints
    /// the merged result list. When exactly one solution matches, its
    /// detail view opens directly.
    Search {
        /// The search query string.
        query: String,
    },

    /// Print a knowledge entry's detail view by id.
    ///
    /// Opening an entry increments its view counter.
    Get {
        /// Entry id.
        id: String,
    },

    /// Record a helpful / not-helpful rating for an entry.
    #[command(group(
        ArgGroup::new("verdict").required(true).args(["helpful", "not_helpful"])
    ))]
    Rate {
        /// Entry id.
        id: String,

        /// The entry solved the problem.
        #[arg(long)]
        helpful: bool,

        /// The entry did not help.
        #[arg(long)]
        not_helpful: bool,
    },

    /// Print the search history, newest first.
    History,

    /// Query the expert index with explicit terms.
    Experts {
        /// Terms matched against expertise tags (substring,
        /// case-insensitive).
        #[arg(required = true)]
        terms: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg).await?;
            migrate::run_migrations(&pool).await?;

            let store = sqlite_store::SqliteStore::new(pool.clone(), cfg.search.history_limit);
            let seeded = seed::ensure_seeded(&store).await?;
            pool.close().await;

            if seeded {
                println!("Store initialized and seeded.");
            } else {
                println!("Store initialized (already seeded).");
            }
        }
        Commands::Search { query } => {
            search::run_search(&cfg, &query).await?;
        }
        Commands::Get { id } => {
            entry::run_get(&cfg, &id).await?;
        }
        Commands::Rate {
            id,
            helpful,
            not_helpful: _,
        } => {
            entry::run_rate(&cfg, &id, helpful).await?;
        }
        Commands::History => {
            history::run_history(&cfg).await?;
        }
        Commands::Experts { terms } => {
            experts::run_experts(&cfg, &terms).await?;
        }
    }

    Ok(())
}
