//! Command handler modules for the CLI.

mod migrate;
mod reset;
mod sessions;
mod show;

use crate::cli::Commands;
use crate::error::CliError;
use crate::util::StorePaths;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(paths: &StorePaths<'_>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Sessions => sessions::cmd_sessions(paths),
        Commands::Show { session, format } => show::cmd_show(paths, &session, format),
        Commands::Migrate { session, dry_run } => migrate::cmd_migrate(paths, &session, dry_run),
        Commands::Reset { session } => reset::cmd_reset(paths, &session),
    }
}
