//! Command-line surface for `penman-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use penman::config::ConfigOverrides;
use penman::domain::types::{ListingFilter, PostType};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "penman-cli", version, about = "Blog editorial client", long_about = None)]
pub struct Cli {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "PENMAN_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and persist the session
    Login(LoginArgs),
    /// Sign out and clear the persisted session
    Logout,
    /// Show the signed-in editor
    Whoami,
    /// Manage your posts
    Posts(PostsArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    /// Path to a file containing the password (takes precedence over env)
    #[arg(long, env = "PENMAN_PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,

    /// Password from env (CLI flag intentionally disabled to avoid shell history leaks)
    #[arg(hide = true, env = "PENMAN_PASSWORD")]
    pub password_env: Option<String>,

    /// Path to continue at once signed in
    #[arg(long = "return-to", value_name = "PATH")]
    pub return_to: Option<String>,
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List your posts, one page at a time
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one post
    Get { id: Uuid },
    /// Create a draft; slug and excerpt are derived unless given
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        excerpt: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        #[arg(long = "type", value_enum, default_value_t = PostTypeArg::Post)]
        kind: PostTypeArg,
    },
    /// Edit a post; fields not given keep their current value
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long, conflicts_with = "auto_slug")]
        slug: Option<String>,
        #[arg(long, conflicts_with = "auto_excerpt")]
        excerpt: Option<String>,
        /// Comma-separated tags; an empty value clears them
        #[arg(long)]
        tags: Option<String>,
        #[arg(long = "type", value_enum)]
        kind: Option<PostTypeArg>,
        /// Derive the slug from the title again
        #[arg(long)]
        auto_slug: bool,
        /// Derive the excerpt from the content again
        #[arg(long)]
        auto_excerpt: bool,
    },
    /// Publish a draft
    Publish { id: Uuid },
    /// Return a published post to draft
    Unpublish { id: Uuid },
    /// Delete a post permanently
    Delete {
        id: Uuid,
        /// Confirm the deletion; without it nothing is sent
        #[arg(long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterArg {
    All,
    Published,
    Drafts,
}

impl From<FilterArg> for ListingFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => ListingFilter::All,
            FilterArg::Published => ListingFilter::Published,
            FilterArg::Drafts => ListingFilter::Drafts,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostTypeArg {
    Post,
    Page,
}

impl From<PostTypeArg> for PostType {
    fn from(value: PostTypeArg) -> Self {
        match value {
            PostTypeArg::Post => PostType::Post,
            PostTypeArg::Page => PostType::Page,
        }
    }
}
