//! Migrate a stored session command.

use std::fmt::Write as _;

use paneweave_core::{DecodedWorkspace, SessionStore, encode_snapshot};

use crate::error::CliError;
use crate::util::{StorePaths, load_session, open_store, parse_session};

/// Migrate session command handler
pub fn cmd_migrate(paths: &StorePaths<'_>, session: &str, dry_run: bool) -> Result<(), CliError> {
    let session = parse_session(session)?;
    let store = open_store(paths)?;
    let decoded = load_session(&store, &session)?;

    print!("{}", format_report(&decoded));
    if !decoded.needs_rewrite() {
        println!("Session '{session}' is up to date");
        return Ok(());
    }
    if dry_run {
        println!("Dry run: session '{session}' not written");
        return Ok(());
    }

    let blob = encode_snapshot(&decoded.snapshot)?;
    store.write(&session, &blob)?;
    tracing::info!(session_id = %session, "Session migrated");
    println!("Migrated session '{session}'");
    Ok(())
}

/// Describes what decoding changed, one line per finding.
#[must_use]
pub fn format_report(decoded: &DecodedWorkspace) -> String {
    let mut report = String::new();
    for pane in &decoded.legacy_panes {
        let _ = writeln!(report, "legacy pane: {pane}");
    }
    for pane in &decoded.malformed_panes {
        let _ = writeln!(report, "malformed pane (emptied): {pane}");
    }
    for pane in &decoded.orphaned_panes {
        let _ = writeln!(report, "orphaned pane (dropped): {pane}");
    }
    if decoded.layout_replaced {
        report.push_str("layout replaced by a single root pane\n");
    }
    report
}
