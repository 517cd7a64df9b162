use serde::Serialize;

use super::selection::{ExpansionState, SelectionState};
use super::types::PermissionNode;
use crate::types::PermissionId;

pub const EMPTY_TREE_MESSAGE: &str = "No permissions available";

/// One indentation step; nested levels also carry a left border marker.
const INDENT: &str = "  │ ";
const EXPANDED: &str = "[-]";
const COLLAPSED: &str = "[+]";
/// Same width as the expand/collapse control so siblings align
const SPACER: &str = "   ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowControl {
    Expanded,
    Collapsed,
    Spacer,
}

impl RowControl {
    fn glyph(self) -> &'static str {
        match self {
            RowControl::Expanded => EXPANDED,
            RowControl::Collapsed => COLLAPSED,
            RowControl::Spacer => SPACER,
        }
    }
}

/// A visible line of the permission tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub id: PermissionId,
    pub depth: usize,
    pub control: RowControl,
    pub checked: bool,
    /// Parents are emphasized
    pub emphasized: bool,
    pub label: String,
}

/// Visible rows in display order. Children of collapsed parents are skipped
/// but their selection is untouched.
pub fn render_rows(
    forest: &[PermissionNode],
    selection: &SelectionState,
    expansion: &ExpansionState,
) -> Vec<RenderedRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(usize, &PermissionNode)> = forest.iter().rev().map(|n| (0, n)).collect();

    while let Some((depth, node)) = stack.pop() {
        let has_children = !node.is_leaf();
        let expanded = has_children && expansion.is_expanded(node.id());

        let control = match (has_children, expanded) {
            (false, _) => RowControl::Spacer,
            (true, true) => RowControl::Expanded,
            (true, false) => RowControl::Collapsed,
        };

        rows.push(RenderedRow {
            id: node.id(),
            depth,
            control,
            checked: selection.is_selected(node.id()),
            emphasized: has_children,
            label: node.record.name.clone(),
        });

        if expanded {
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        }
    }

    rows
}

pub fn render_text(forest: &[PermissionNode], selection: &SelectionState, expansion: &ExpansionState) -> String {
    if forest.is_empty() {
        return EMPTY_TREE_MESSAGE.to_string();
    }

    render_rows(forest, selection, expansion)
        .iter()
        .map(format_row)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_row(row: &RenderedRow) -> String {
    let checkbox = if row.checked { "[x]" } else { "[ ]" };
    format!(
        "{}{} {} {} (#{})",
        INDENT.repeat(row.depth),
        row.control.glyph(),
        checkbox,
        row.label,
        row.id
    )
}
