//! Show a stored session command.

use std::fmt::Write as _;

use paneweave_core::{LayoutNode, PaneState, WorkspaceSnapshot};

use crate::cli::ShowFormat;
use crate::error::CliError;
use crate::util::{StorePaths, load_session, open_store, parse_session};

/// Show session command handler
pub fn cmd_show(paths: &StorePaths<'_>, session: &str, format: ShowFormat) -> Result<(), CliError> {
    let session = parse_session(session)?;
    let store = open_store(paths)?;
    let decoded = load_session(&store, &session)?;

    if decoded.needs_rewrite() {
        tracing::info!(session_id = %session, "Stored session uses an older shape");
    }

    match format {
        ShowFormat::Tree => print!("{}", format_tree(&decoded.snapshot)),
        ShowFormat::Json => println!("{}", serde_json::to_string_pretty(&decoded.snapshot)?),
    }
    Ok(())
}

/// Renders the layout as an indented tree with each pane's tabs.
///
/// The active pane is marked with `(active)`, each pane's active tab with `*`.
#[must_use]
pub fn format_tree(snapshot: &WorkspaceSnapshot) -> String {
    let mut output = String::new();
    write_node(&mut output, snapshot, &snapshot.layout, 0);
    output
}

fn write_node(output: &mut String, snapshot: &WorkspaceSnapshot, node: &LayoutNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        LayoutNode::Branch(branch) => {
            let _ = writeln!(output, "{indent}{} {}%", branch.direction, branch.size);
            for child in branch.children.iter() {
                write_node(output, snapshot, child, depth + 1);
            }
        }
        LayoutNode::Leaf { pane_id } => {
            let marker = if pane_id == &snapshot.active_pane_id {
                " (active)"
            } else {
                ""
            };
            let _ = writeln!(output, "{indent}{pane_id}{marker}");
            if let Some(pane) = snapshot.panes.get(pane_id) {
                write_tabs(output, pane, depth + 1);
            }
        }
    }
}

fn write_tabs(output: &mut String, pane: &PaneState, depth: usize) {
    let indent = "  ".repeat(depth);
    if pane.is_empty() {
        let _ = writeln!(output, "{indent}  (empty)");
        return;
    }
    for tab in pane.tabs() {
        let active = if &tab.id == pane.active_tab_id() {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            output,
            "{indent}{active} {} [{}] {}",
            tab.label, tab.view_type, tab.path
        );
    }
}
