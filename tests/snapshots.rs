#![allow(clippy::unwrap_used)]
//! Snapshot tests for visual regression testing.
//!
//! Uses insta inline snapshots of composited grids. Rows are framed with
//! `|` so trailing blanks stay visible and significant.

use strata::buffer::Flow;
use strata::components::{Notices, Select, TextInput};
use strata::render::compose;
use strata::widget::{Panel, SharedWidget, Text};

/// Composite a stack and frame each row for the snapshot.
fn snapshot(widgets: &[SharedWidget], columns: u16, rows: u16) -> String {
    let grid = compose(widgets.iter(), columns, rows).unwrap();
    grid.to_text()
        .lines()
        .map(|row| format!("|{row}|\n"))
        .collect()
}

#[test]
fn snapshot_status_line_corners() {
    let left: SharedWidget = Text::new(0, -1, "connected").shared();
    let right: SharedWidget = Text::new(-1, -1, "v1.2")
        .horizontal(Flow::Backward)
        .shared();

    insta::assert_snapshot!(snapshot(&[left, right], 20, 3), @r"
    |                    |
    |                    |
    |connected       v1.2|
    ");
}

#[test]
fn snapshot_overlapping_widgets() {
    let backdrop: SharedWidget = Text::new(0, 0, "##########\n##########").shared();
    let dialog: SharedWidget = Text::new(2, 0, " quit? ").shared();

    insta::assert_snapshot!(snapshot(&[backdrop, dialog], 10, 3), @r"
    |## quit? #|
    |##########|
    |          |
    ");
}

#[test]
fn snapshot_nested_panel() {
    let panel = Panel::new(3, 1, 6, 2);
    panel.push(Text::new(0, 0, "inner").shared()).unwrap();
    panel.push(Text::new(0, 1, "lines").shared()).unwrap();
    let root: SharedWidget = Text::new(0, 0, "outer").shared();
    let panel: SharedWidget = panel.shared();

    insta::assert_snapshot!(snapshot(&[root, panel], 12, 4), @r"
    |outer       |
    |   inner    |
    |   lines    |
    |            |
    ");
}

#[test]
fn snapshot_notification_stack() {
    let notices = Notices::new();
    notices.push("saved").unwrap();
    notices.push("synced").unwrap();
    notices.push("synced").unwrap();
    let notices: SharedWidget = notices.shared();

    insta::assert_snapshot!(snapshot(&[notices], 14, 4), @r"
    |              |
    |              |
    |saved         |
    |synced [2x]   |
    ");
}

#[test]
fn snapshot_menu_over_prompt() {
    let prompt: SharedWidget = TextInput::new(0, 0, "Search")
        .placeholder("type a name")
        .shared();
    let menu: SharedWidget = Select::new(
        0,
        3,
        "Results",
        vec!["alpha".into(), "beta".into()],
    )
    .shared();

    insta::assert_snapshot!(snapshot(&[prompt, menu], 16, 6), @r"
    |Search          |
    |type a name     |
    |                |
    |Results         |
    |alpha           |
    |beta            |
    ");
}

#[test]
fn snapshot_upward_growing_log() {
    let log: SharedWidget = Text::new(0, -1, "newest\nolder\noldest")
        .vertical(Flow::Backward)
        .shared();

    insta::assert_snapshot!(snapshot(&[log], 8, 4), @r"
    |        |
    |oldest  |
    |older   |
    |newest  |
    ");
}
