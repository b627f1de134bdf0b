//! stockpile CLI - Inventory management from the command line.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockpile_core::{parse_tag_list, ItemFilter, ItemUpdate, NewItem};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "stockpile")]
#[command(author, version, about = "Inventory management CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: output::OutputFormat,

    /// Workspace path (defaults to current directory)
    #[arg(long, short = 'C', global = true, env = "STOCKPILE_PATH")]
    path: Option<std::path::PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new workspace
    Init {
        /// Workspace name
        #[arg(long)]
        name: Option<String>,
    },

    /// Create a new item
    #[command(alias = "new")]
    Add {
        /// Item name
        #[arg(long, short = 'n')]
        name: String,

        /// Unit price
        #[arg(long, short = 'p')]
        price: f64,

        /// Description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Tags (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
    },

    /// List items, newest first
    #[command(alias = "ls")]
    List,

    /// Show an item
    Get {
        /// Item ID
        id: String,
    },

    /// Change attributes of an item
    #[command(alias = "set")]
    Update {
        /// Item ID
        id: String,

        /// New name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// New category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// New price
        #[arg(long, short = 'p')]
        price: Option<f64>,

        /// Replace tags (comma-separated, empty string clears them)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Permanently delete an item and its history
    #[command(alias = "rm")]
    Delete {
        /// Item ID
        id: String,
    },

    /// Show the audit log of an item
    Audit {
        /// Item ID
        id: String,
    },

    /// Free-text search over name, description, category and tags
    Search {
        /// Search terms (omit to list everything)
        #[arg(default_value = "")]
        query: String,
    },

    /// Filter items by structured criteria
    Find {
        /// Text that must appear in the item
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Exact category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Minimum price (inclusive)
        #[arg(long)]
        min_price: Option<String>,

        /// Maximum price (inclusive)
        #[arg(long)]
        max_price: Option<String>,

        /// Required tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Show inventory statistics
    Analytics,

    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, short = 'p', env = "STOCKPILE_PORT", default_value = "5001")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "STOCKPILE_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Serve an in-memory store instead of the workspace
        #[arg(long)]
        ephemeral: bool,
    },
}

fn init_tracing(json: bool, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    init_tracing(cli.log_json, default_level);

    // Determine workspace path
    let workspace_path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { name } => commands::init(&workspace_path, name, cli.format),
        Commands::Add {
            name,
            price,
            description,
            category,
            tags,
        } => {
            let new_item = NewItem {
                name: Some(name),
                description,
                category,
                price: Some(price),
                tags: (!tags.is_empty()).then_some(tags),
            };
            commands::add(&workspace_path, new_item, cli.format)
        }
        Commands::List => commands::list(&workspace_path, cli.format),
        Commands::Get { id } => commands::get(&workspace_path, &id, cli.format),
        Commands::Update {
            id,
            name,
            description,
            category,
            price,
            tags,
        } => {
            let update = ItemUpdate {
                name,
                description,
                category,
                price,
                tags: tags.as_deref().map(parse_tag_list),
            };
            commands::update(&workspace_path, &id, &update, cli.format)
        }
        Commands::Delete { id } => commands::delete(&workspace_path, &id, cli.format),
        Commands::Audit { id } => commands::audit(&workspace_path, &id, cli.format),
        Commands::Search { query } => commands::search(&workspace_path, &query, cli.format),
        Commands::Find {
            query,
            category,
            min_price,
            max_price,
            tags,
        } => {
            let filter = ItemFilter::from_params(
                query.as_deref(),
                category.as_deref(),
                min_price.as_deref(),
                max_price.as_deref(),
                tags.as_deref(),
            )?;
            commands::find(&workspace_path, &filter, cli.format)
        }
        Commands::Analytics => commands::analytics(&workspace_path, cli.format),
        Commands::Serve {
            port,
            host,
            ephemeral,
        } => commands::serve(&workspace_path, &host, port, ephemeral),
    }
}
