//! Common test utilities for building cascade definitions and snapshots.
use cascade::prelude::*;

/// Two cells where `summarize` reads the output of `gather`.
///
/// Logic: `gather -> summarize`, both consuming `input.topic`.
#[allow(dead_code)]
pub const RESEARCH_YAML: &str = r#"
cascade_id: research
description: Gather sources and summarize them
inputs_schema:
  topic: What to research
  depth: How many sources to read
cells:
  - name: gather
    instructions: "Collect {{ input.depth }} sources about {{ input.topic }}"
    model: fast-model
  - name: summarize
    instructions: "Summarize {{ outputs.gather }} for {{ input.topic }}"
    rules:
      max_turns: 3
tags: [demo, research]
"#;

/// A diamond using every kind of link.
///
/// `plan` hands off to `search` and `browse`; `report` reads `search` through a
/// template and imports `browse` through its context list.
#[allow(dead_code)]
pub const DIAMOND_YAML: &str = r#"
cascade_id: diamond
inputs_schema:
  question: The question to answer
cells:
  - name: plan
    instructions: "Plan how to answer {{ input.question }}"
    handoffs: [search, browse]
  - name: search
    instructions: "Search the web"
  - name: browse
    instructions: "Browse the results"
  - name: report
    instructions: "Write a report from {{ outputs.search }}"
    context:
      from:
        - browse
"#;

#[allow(dead_code)]
pub fn cell(name: &str, instructions: &str) -> Cell {
    Cell::new(name).with_instructions(instructions)
}

/// `a -> b -> c` wired purely through output references.
#[allow(dead_code)]
pub fn create_chain() -> Vec<Cell> {
    vec![
        cell("a", "Start here"),
        cell("b", "Use {{ outputs.a }}"),
        cell("c", "Use {{ outputs.b }}"),
    ]
}

/// `a` and `b` reference each other; `c` depends on `b`; `d` is independent.
#[allow(dead_code)]
pub fn create_cycle() -> Vec<Cell> {
    vec![
        cell("a", "Read {{ outputs.b }}"),
        cell("b", "Read {{ outputs.a }}"),
        cell("c", "Read {{ outputs.b }}"),
        cell("d", "Standalone"),
    ]
}

#[allow(dead_code)]
pub fn no_inputs() -> InputsSchema {
    InputsSchema::new()
}

#[allow(dead_code)]
pub fn load(yaml: &str) -> CascadeDefinition {
    CascadeDocument::from_yaml(yaml).expect("Failed to parse test cascade")
}

/// A mid-run snapshot of the research cascade: `gather` done, `summarize` running.
#[allow(dead_code)]
pub fn running_snapshot_json() -> serde_json::Value {
    serde_json::json!({
        "session_id": "sess-1",
        "cascade_id": "research",
        "status": "running",
        "current_phase": "summarize",
        "phases": {
            "gather": { "status": "completed", "cost": 0.25, "duration_ms": 1200.0, "cached": true },
            "summarize": { "status": "running", "cost": 0.5 }
        }
    })
}

#[allow(dead_code)]
pub fn completed_snapshot_json() -> serde_json::Value {
    serde_json::json!({
        "session_id": "sess-1",
        "status": "completed",
        "total_cost": 1.5,
        "phases": {
            "gather": { "status": "completed", "cost": 0.25 },
            "summarize": { "status": "completed", "cost": 0.75 }
        }
    })
}

#[allow(dead_code)]
pub fn snapshot(status: SessionStatus, cells: &[(&str, CellStatus)]) -> SessionSnapshot {
    SessionSnapshot {
        session_id: "sess-1".to_string(),
        status,
        cells: cells
            .iter()
            .map(|(name, status)| {
                (
                    name.to_string(),
                    CellState {
                        status: *status,
                        ..CellState::default()
                    },
                )
            })
            .collect(),
        ..SessionSnapshot::default()
    }
}
