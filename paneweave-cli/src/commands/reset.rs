//! Delete a stored session command.

use paneweave_core::SessionStore;

use crate::error::CliError;
use crate::util::{StorePaths, open_store, parse_session};

/// Reset session command handler
pub fn cmd_reset(paths: &StorePaths<'_>, session: &str) -> Result<(), CliError> {
    let session = parse_session(session)?;
    let store = open_store(paths)?;

    if !store.delete(&session)? {
        return Err(CliError::SessionNotFound(session.to_string()));
    }
    tracing::info!(session_id = %session, "Session deleted");
    println!("Deleted session '{session}'");
    Ok(())
}
