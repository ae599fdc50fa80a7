//! Tests for session snapshots and the derived execution view.
mod common;
use cascade::prelude::*;
use common::*;

#[test]
fn test_snapshot_accepts_legacy_field_names() {
    let snapshot: SessionSnapshot =
        serde_json::from_value(running_snapshot_json()).expect("Failed to parse snapshot");

    assert_eq!(snapshot.status, SessionStatus::Running);
    assert_eq!(snapshot.current_cell.as_deref(), Some("summarize"));
    assert_eq!(snapshot.cells.len(), 2);
    assert!(snapshot.cells["gather"].cached);
    assert_eq!(snapshot.cells["summarize"].status, CellStatus::Running);
}

#[test]
fn test_unknown_status_values_do_not_fail() {
    let snapshot: SessionSnapshot = serde_json::from_value(serde_json::json!({
        "status": "hibernating",
        "cells": { "a": { "status": "teleporting" } }
    }))
    .unwrap();

    assert_eq!(snapshot.status, SessionStatus::Unknown);
    assert_eq!(snapshot.cells["a"].status, CellStatus::Unknown);
    assert!(!snapshot.status.is_terminal());
}

#[test]
fn test_status_aliases() {
    let parse = |s: &str| serde_json::from_value::<SessionStatus>(serde_json::json!(s)).unwrap();
    assert_eq!(parse("failed"), SessionStatus::Error);
    assert_eq!(parse("success"), SessionStatus::Completed);
    assert_eq!(parse("waiting_for_input"), SessionStatus::Blocked);
    assert!(parse("cancelled").is_terminal());
    assert!(!parse("blocked").is_terminal());
}

#[test]
fn test_view_lists_definition_order_then_extras() {
    let mut snap = snapshot(
        SessionStatus::Running,
        &[("zeta", CellStatus::Completed), ("alpha", CellStatus::Running)],
    );
    snap.cells.insert("sub_task".to_string(), CellState::default());

    let view = ViewState::from_snapshot(&snap, &["zeta", "alpha", "omega"]);
    let names: Vec<_> = view.cells.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "omega", "sub_task"]);

    assert!(view.cell("omega").unwrap().in_definition);
    assert_eq!(view.status_of("omega"), CellStatus::Pending);
    assert!(!view.cell("sub_task").unwrap().in_definition);
    assert_eq!(view.running, vec!["alpha"]);
}

#[test]
fn test_progress_and_counts() {
    let snap = snapshot(
        SessionStatus::Running,
        &[
            ("a", CellStatus::Completed),
            ("b", CellStatus::Error),
            ("c", CellStatus::Running),
            ("d", CellStatus::Pending),
        ],
    );
    let view = ViewState::from_snapshot(&snap, &["a", "b", "c", "d"]);

    assert_eq!(view.counts.completed, 1);
    assert_eq!(view.counts.error, 1);
    assert_eq!(view.counts.running, 1);
    assert_eq!(view.counts.pending, 1);
    assert_eq!(view.counts.total(), 4);
    assert_eq!(view.progress, 0.5);
    assert!(!view.is_terminal);
}

#[test]
fn test_empty_view() {
    let view = ViewState::from_snapshot(&SessionSnapshot::default(), &[] as &[&str]);
    assert!(view.cells.is_empty());
    assert_eq!(view.progress, 0.0);
    assert_eq!(view.total_cost, 0.0);
    assert_eq!(view.status, SessionStatus::Unknown);
}

#[test]
fn test_cost_falls_back_to_cell_sum() {
    let snap: SessionSnapshot = serde_json::from_value(running_snapshot_json()).unwrap();
    let view = ViewState::from_snapshot(&snap, &["gather", "summarize"]);

    assert_eq!(view.total_cost, 0.75);
    assert_eq!(view.total_duration_ms, 1200.0);
    assert_eq!(view.counts.cached, 1);

    let done: SessionSnapshot = serde_json::from_value(completed_snapshot_json()).unwrap();
    let view = ViewState::from_snapshot(&done, &["gather", "summarize"]);
    assert_eq!(view.total_cost, 1.5);
    assert!(view.is_terminal);
    assert_eq!(view.progress, 1.0);
}

#[test]
fn test_checkpoint_is_only_shown_while_live() {
    let checkpoint = Checkpoint {
        checkpoint_id: "cp-1".to_string(),
        cell_name: Some("review".to_string()),
        question: Some("Approve?".to_string()),
        options: vec!["yes".to_string(), "no".to_string()],
    };

    let mut snap = snapshot(SessionStatus::Blocked, &[("review", CellStatus::Running)]);
    snap.checkpoint = Some(checkpoint.clone());
    let view = ViewState::from_snapshot(&snap, &["review"]);
    assert_eq!(view.awaiting_input, Some(checkpoint));

    snap.status = SessionStatus::Cancelled;
    let view = ViewState::from_snapshot(&snap, &["review"]);
    assert!(view.awaiting_input.is_none());
}

#[test]
fn test_error_message_falls_back_to_failed_cell() {
    let mut snap = snapshot(SessionStatus::Error, &[("a", CellStatus::Completed)]);
    snap.cells.insert(
        "b".to_string(),
        CellState {
            status: CellStatus::Error,
            error: Some("tool crashed".to_string()),
            ..CellState::default()
        },
    );

    let view = ViewState::from_snapshot(&snap, &["a", "b"]);
    assert_eq!(view.error.as_deref(), Some("tool crashed"));

    snap.error = Some("session aborted".to_string());
    let view = ViewState::from_snapshot(&snap, &["a", "b"]);
    assert_eq!(view.error.as_deref(), Some("session aborted"));
}

#[test]
fn test_views_do_not_carry_state_between_snapshots() {
    let first = snapshot(SessionStatus::Running, &[("a", CellStatus::Running)]);
    let second = snapshot(SessionStatus::Running, &[("b", CellStatus::Running)]);

    let _ = ViewState::from_snapshot(&first, &["a", "b"]);
    let view = ViewState::from_snapshot(&second, &["a", "b"]);

    assert_eq!(view.status_of("a"), CellStatus::Pending);
    assert_eq!(view.status_of("b"), CellStatus::Running);
}

#[test]
fn test_null_fields_read_as_defaults() {
    let snapshot: SessionSnapshot = serde_json::from_value(serde_json::json!({
        "session_id": null,
        "status": null,
        "phases": {
            "a": { "status": "running", "images": null, "rows": null, "cached": null },
            "b": { "status": null }
        },
        "pending_checkpoint": { "id": "cp-1", "options": null }
    }))
    .expect("null fields should not fail the snapshot");

    assert_eq!(snapshot.status, SessionStatus::Unknown);
    assert!(snapshot.session_id.is_empty());
    let a = &snapshot.cells["a"];
    assert_eq!(a.status, CellStatus::Running);
    assert!(a.images.is_empty() && a.rows.is_empty() && !a.cached);
    assert_eq!(snapshot.cells["b"].status, CellStatus::Pending);
    assert!(snapshot.checkpoint.unwrap().options.is_empty());

    let empty: SessionSnapshot = serde_json::from_value(serde_json::json!({ "cells": null })).unwrap();
    assert!(empty.cells.is_empty());
}

#[test]
fn test_timestamps_without_offset_are_utc() {
    let snapshot: SessionSnapshot = serde_json::from_value(serde_json::json!({
        "status": "running",
        "updated_at": "2024-05-01T12:00:00.123456",
        "cells": {
            "a": {
                "started_at": "2024-05-01T11:59:00+00:00",
                "completed_at": "not a time"
            }
        }
    }))
    .expect("offset-less timestamps should parse");

    let updated = snapshot.updated_at.expect("updated_at parsed");
    assert_eq!(updated.to_rfc3339(), "2024-05-01T12:00:00.123456+00:00");
    assert!(snapshot.cells["a"].started_at.is_some());
    assert!(snapshot.cells["a"].completed_at.is_none());
}
