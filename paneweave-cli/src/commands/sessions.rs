//! List stored sessions command.

use paneweave_core::SessionStore;

use crate::error::CliError;
use crate::util::{StorePaths, open_store};

/// List sessions command handler
pub fn cmd_sessions(paths: &StorePaths<'_>) -> Result<(), CliError> {
    let store = open_store(paths)?;
    let sessions = store.list()?;

    if sessions.is_empty() {
        println!("No sessions stored in {}", store.dir().display());
        return Ok(());
    }
    for session in sessions {
        println!("{session}");
    }
    Ok(())
}
