use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::exec::RunOutcome;
use crate::workspace::RunWorkspace;

pub struct SavedStages {
    pub raw: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
}

/// Persist the intermediate text artifacts of a request into its run
/// directory. No-op (and no paths) unless stage saving is enabled.
pub fn save_request_stages(
    ws: &RunWorkspace,
    raw: &str,
    fragment: &str,
    enabled: bool,
) -> anyhow::Result<SavedStages> {
    if !enabled {
        return Ok(SavedStages { raw: None, fragment: None });
    }
    let raw_path = ws.save_text("completion.raw.txt", raw)?;
    let fragment_path = ws.save_text("fragment.py", fragment)?;
    Ok(SavedStages {
        raw: Some(raw_path),
        fragment: Some(fragment_path),
    })
}

/// Captured engine output is always written; it is the only diagnostic left
/// once the process is gone.
pub fn save_run_output(ws: &RunWorkspace, outcome: &RunOutcome) -> anyhow::Result<()> {
    ws.save_text("stdout.log", &outcome.stdout)?;
    ws.save_text("stderr.log", &outcome.stderr)?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct RunRecord<'a> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub task: &'a str,
    pub model: &'a str,
    pub success: bool,
    pub timed_out: bool,
    pub duration_ms: u128,
}

pub fn save_run_record(ws: &RunWorkspace, record: &RunRecord<'_>) -> anyhow::Result<PathBuf> {
    ws.save_text("run.json", &serde_json::to_string_pretty(record)?)
}

pub fn print_saved_paths(saved: &SavedStages) {
    match &saved.raw {
        Some(p) => println!("debug: raw completion saved at: {}", p.display()),
        None => println!("debug: raw completion not saved (flag off)"),
    }
    match &saved.fragment {
        Some(p) => println!("debug: sanitized fragment saved at: {}", p.display()),
        None => println!("debug: sanitized fragment not saved (flag off)"),
    }
}
