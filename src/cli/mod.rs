//! CLI argument definitions for folio.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::{Filter, Priority, ProjectStatus, ProjectUpdate, SortKey};
use crate::store::ProjectQuery;

/// Folio - browse and drive the project cards page from the terminal.
///
/// Start with `folio list` to see the projects, or `folio render` to see the page.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about = "Browse portfolio projects and replay page interactions", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Project dataset (JSON array) to use instead of the bundled one.
    /// Can also be set via FOLIO_DATA environment variable.
    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// Directory holding config.kdl.
    /// Can also be set via FOLIO_CONFIG_DIR environment variable.
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List projects matching every given filter
    List {
        /// Category slug, or "all"
        #[arg(short, long)]
        category: Option<String>,

        /// Status (active, progress, hold, completed), or "all"
        #[arg(short, long)]
        status: Option<String>,

        /// Priority (high, medium, low), or "all"
        #[arg(short, long)]
        priority: Option<String>,

        /// Case-insensitive text to find in title, description or tags
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Order of the results
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortKey>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Show one project by id
    Show {
        /// Project id (e.g., fraud-detection)
        id: String,
    },

    /// Counts by status plus favorites
    Stats,

    /// Values accepted by the category, status, priority and sort controls
    Options,

    /// Toggle a project's favorite flag
    Favorite {
        /// Project id
        id: String,

        /// Write the change back to the --data file
        #[arg(long)]
        save: bool,
    },

    /// Update fields of a project
    Update {
        /// Project id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_status)]
        status: Option<ProjectStatus>,

        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,

        /// Completion percentage (0-100)
        #[arg(long)]
        progress: Option<u8>,

        /// Replace the tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Write the change back to the --data file
        #[arg(long)]
        save: bool,
    },

    /// Render the page as HTML after applying filters
    Render {
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(short = 'q', long)]
        search: Option<String>,

        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortKey>,

        /// Project ids whose cards are expanded (repeatable)
        #[arg(long)]
        expand: Vec<String>,

        /// Render with selection mode on
        #[arg(long)]
        select_mode: bool,
    },

    /// Replay a script of page events (one JSON event per line) and print
    /// the effects of each
    Replay {
        /// Script file, or "-" for stdin
        script: PathBuf,

        /// Answer to confirmation prompts
        #[arg(long, value_enum, default_value_t = Answer::Yes)]
        confirm: Answer,

        /// Pretend the host supports native share
        #[arg(long)]
        share: bool,

        /// Viewport height used for scroll-into-view decisions
        #[arg(long)]
        viewport_height: Option<f64>,

        /// Include the final page HTML
        #[arg(long)]
        html: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Answer a scripted host gives to confirmation prompts
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn accepted(self) -> bool {
        self == Answer::Yes
    }
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration with the source of each value
    Show,

    /// Get a value from config.kdl
    Get {
        /// Configuration key (e.g., default-sort)
        key: String,
    },

    /// Set a value in config.kdl
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

fn parse_sort(s: &str) -> Result<SortKey, String> {
    s.parse()
}

fn parse_status(s: &str) -> Result<ProjectStatus, String> {
    s.parse()
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse()
}

/// Build a store query from `list` arguments.
pub fn build_query(
    category: Option<&str>,
    status: Option<&str>,
    priority: Option<&str>,
    search: Option<String>,
    sort: Option<SortKey>,
    favorites_only: bool,
) -> Result<ProjectQuery, String> {
    let category: Filter<String> = match category {
        Some(c) => c.parse().map_err(|e: std::convert::Infallible| e.to_string())?,
        None => Filter::All,
    };
    let status: Filter<ProjectStatus> = status.map(str::parse).transpose()?.unwrap_or_default();
    let priority: Filter<Priority> = priority.map(str::parse).transpose()?.unwrap_or_default();
    Ok(ProjectQuery {
        category,
        status,
        priority,
        search: search.unwrap_or_default(),
        favorites_only,
        sort,
    })
}

/// Build a patch from `update` arguments. An empty tag list leaves tags alone.
pub fn build_update(
    title: Option<String>,
    description: Option<String>,
    status: Option<ProjectStatus>,
    priority: Option<Priority>,
    progress: Option<u8>,
    tags: Vec<String>,
) -> ProjectUpdate {
    ProjectUpdate {
        title,
        description,
        status,
        priority,
        progress,
        tags: (!tags.is_empty()).then_some(tags),
        ..ProjectUpdate::default()
    }
}
