//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// `paneweave` command-line interface for persisted workspaces
#[derive(Parser)]
#[command(name = "paneweave-cli")]
#[command(author, version, about = "paneweave workspace inspector")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding stored sessions (overrides `storage_dir` in settings)
    #[arg(short, long, global = true, env = "PANEWEAVE_STORE_DIR")]
    pub store: Option<PathBuf>,

    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "PANEWEAVE_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List stored sessions
    #[command(about = "List the sessions in the store")]
    Sessions,

    /// Print a session's workspace
    #[command(about = "Print the pane tree and tabs of a stored session")]
    Show {
        /// Session id
        session: String,

        /// Output format
        #[arg(short, long, default_value = "tree", value_enum)]
        format: ShowFormat,
    },

    /// Rewrite a session in the current shape
    #[command(about = "Migrate legacy panes of a session and write it back")]
    Migrate {
        /// Session id
        session: String,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a stored session
    #[command(about = "Delete the stored workspace of a session")]
    Reset {
        /// Session id
        session: String,
    },
}

/// Output format for `show`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    /// Indented pane tree with tabs
    Tree,
    /// Snapshot as pretty-printed JSON
    Json,
}
