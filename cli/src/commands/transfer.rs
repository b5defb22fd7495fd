use std::fmt::Write as _;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use nutriwise_core::aggregate::meals_newest_first;
use nutriwise_core::transfer::{EXPORT_FILE_NAME, decode_document, export_document};
use nutriwise_core::{Action, Dashboard, Database, DecodeError, TrackerState, Tracker};

use super::dispatch;
use super::helpers::{confirm, json_error, render_dashboard, render_meals, render_week};

/// Where an export goes: `None` means stdout (`--output -`).
fn export_destination(output: Option<&Path>) -> Option<&Path> {
    match output {
        Some(path) if path == Path::new("-") => None,
        Some(path) => Some(path),
        None => Some(Path::new(EXPORT_FILE_NAME)),
    }
}

pub(crate) fn cmd_export(tracker: &Tracker<Database>, output: Option<&Path>) -> Result<()> {
    let document = export_document(tracker.state())?;

    match export_destination(output) {
        Some(path) => {
            std::fs::write(path, format!("{document}\n"))
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;
            let count = tracker.state().meals.len();
            eprintln!("Exported {count} meal(s) to {}", path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}

#[derive(Debug)]
enum ImportStep {
    Invalid(DecodeError),
    Cancelled,
    Ready(TrackerState),
}

/// Decode the document and only then ask before overwriting anything.
fn stage_import(document: &str, confirmed: impl FnOnce() -> Result<bool>) -> Result<ImportStep> {
    let state = match decode_document(document) {
        Ok(state) => state,
        Err(e) => return Ok(ImportStep::Invalid(e)),
    };
    if confirmed()? {
        Ok(ImportStep::Ready(state))
    } else {
        Ok(ImportStep::Cancelled)
    }
}

pub(crate) fn cmd_import(
    tracker: &mut Tracker<Database>,
    path: &Path,
    yes: bool,
    json: bool,
) -> Result<()> {
    let document = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let step = stage_import(&document, || {
        if yes {
            Ok(true)
        } else {
            confirm("Import will overwrite current local data. Continue?")
        }
    })?;

    match step {
        ImportStep::Invalid(e) => {
            if json {
                println!("{}", json_error(&e.to_string()));
            } else {
                eprintln!("{e}");
            }
            process::exit(2);
        }
        ImportStep::Cancelled => {
            if json {
                println!("{}", serde_json::json!({ "cancelled": true }));
            } else {
                eprintln!("Cancelled");
            }
            Ok(())
        }
        ImportStep::Ready(state) => dispatch(tracker, Action::Replace { state }, json),
    }
}

pub(crate) fn cmd_report(tracker: &Tracker<Database>) -> Result<()> {
    println!("{}", build_report(tracker.state(), Local::now().date_naive()));
    Ok(())
}

/// Printable summary: dashboard, the seven-day table and every meal.
fn build_report(state: &TrackerState, today: NaiveDate) -> String {
    let dashboard = Dashboard::build(state, today);
    let meals = meals_newest_first(state);

    let mut out = String::new();
    let _ = writeln!(out, "NutriWise report");
    let _ = writeln!(out, "================\n");
    let _ = writeln!(out, "{}\n", render_dashboard(&dashboard));
    let _ = writeln!(out, "Last 7 days");
    let _ = writeln!(out, "{}\n", render_week(&dashboard.days));
    let _ = writeln!(out, "Meals");
    if meals.is_empty() {
        let _ = write!(out, "No meals logged yet.");
    } else {
        let _ = write!(out, "{}", render_meals(&meals));
    }
    out
}
