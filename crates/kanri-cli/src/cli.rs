use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use kanri_api::types::{FollowCategory, FollowStatus};
use kanri_api::SortOrder;

/// Manage an anime catalog server from the terminal.
#[derive(Debug, Parser)]
#[command(name = "kanri", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override `[server] base_url`
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the server is alive
    Ping,
    /// Print the server greeting
    Hello,
    /// Browse and delete anime
    #[command(subcommand)]
    Animes(AnimeCommand),
    /// Manage categories
    #[command(subcommand)]
    Categories(TermCommand),
    /// Manage tags
    #[command(subcommand)]
    Tags(TermCommand),
    /// Track followed anime
    #[command(subcommand)]
    Follows(FollowCommand),
    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum AnimeCommand {
    /// List one page of anime
    List(AnimeListArgs),
    /// Delete an anime
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Anime counts per season
    Seasons,
}

#[derive(Debug, Args)]
pub struct AnimeListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Defaults to `[list] page_size`
    #[arg(long)]
    pub page_size: Option<u32>,
    /// Season token, e.g. 2024-04
    #[arg(long, conflicts_with_all = ["category", "tag", "name"])]
    pub season: Option<String>,
    #[arg(long, conflicts_with_all = ["tag", "name"])]
    pub category: Option<String>,
    #[arg(long, conflicts_with = "name")]
    pub tag: Option<String>,
    /// Name substring
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum TermCommand {
    /// List every term, or those matching a search
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Usage count per term
    Stats,
    Add {
        name: String,
    },
    Rename {
        id: u64,
        name: String,
    },
    Delete {
        id: u64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum FollowCommand {
    /// Followed anime grouped by category
    Board {
        /// Only this category (number, key or label)
        #[arg(long)]
        category: Option<FollowCategory>,
    },
    /// Filterable table of follows
    Table(FollowTableArgs),
    /// Set the watch status (want-to-watch, watching, watched)
    Status { id: u64, status: FollowStatus },
    /// Set the completion date
    Finish { id: u64, date: NaiveDate },
    /// Follow an anime; it starts on the watch list
    Add {
        anime_id: u64,
        category: FollowCategory,
    },
    Delete {
        id: u64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct FollowTableArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
    #[arg(long)]
    pub status: Option<FollowStatus>,
    #[arg(long)]
    pub category: Option<FollowCategory>,
    /// Anime name substring
    #[arg(long)]
    pub name: Option<String>,
    /// Sort by anime name: asc or desc
    #[arg(long)]
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print where the config file is read from
    Path,
    /// Write the default config
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
