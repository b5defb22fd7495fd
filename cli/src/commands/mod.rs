mod goal;
mod helpers;
mod meal;
mod summary;
mod transfer;

use anyhow::Result;
use std::process;

use nutriwise_core::{Action, Dashboard, Database, MAX_MEAL_CALORIES, Outcome, Tracker};

use helpers::{json_error, render_dashboard};

pub(crate) use goal::cmd_goal;
pub(crate) use meal::{cmd_add, cmd_clear, cmd_delete, cmd_list};
pub(crate) use summary::{cmd_dashboard, cmd_week};
pub(crate) use transfer::{cmd_export, cmd_import, cmd_report};

/// Run one action, then render its outcome and the refreshed dashboard.
///
/// Refused input exits with status 2 after reporting why.
pub(super) fn dispatch(tracker: &mut Tracker<Database>, action: Action, json: bool) -> Result<()> {
    let outcome = tracker.apply(action)?;
    let dashboard = Dashboard::for_today(tracker.state());

    if outcome.is_rejection() {
        let message = rejection_message(&outcome);
        if json {
            println!("{}", json_error(&message));
        } else {
            eprintln!("{message}");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome, &dashboard))?);
    } else {
        println!("{}", outcome_text(&outcome));
        println!();
        println!("{}", render_dashboard(&dashboard));
    }
    Ok(())
}

fn rejection_message(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Rejected => format!(
            "Meal not logged: name must not be empty and calories must be between 1 and {MAX_MEAL_CALORIES}"
        ),
        Outcome::ImportFailed(e) => e.to_string(),
        _ => String::new(),
    }
}

fn outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Added(meal) => {
            let name = &meal.name;
            let category = meal.category;
            let calories = meal.calories;
            let id = &meal.id;
            format!("Logged {name} ({category}) — {calories} kcal\nID: {id}")
        }
        Outcome::Deleted { id, found: true } => format!("Deleted meal {id}"),
        Outcome::Deleted { id, found: false } => format!("No meal with ID {id}; nothing deleted"),
        Outcome::Cleared { removed } => format!("Cleared {removed} meal(s)"),
        Outcome::GoalSet { goal } => format!("Daily goal set to {goal} kcal"),
        Outcome::Imported { meals } => format!("Imported {meals} meal(s)"),
        Outcome::Rejected | Outcome::ImportFailed(_) => String::new(),
    }
}

fn outcome_json(outcome: &Outcome, dashboard: &Dashboard) -> serde_json::Value {
    let result = match outcome {
        Outcome::Added(meal) => serde_json::json!({ "added": meal }),
        Outcome::Deleted { id, found } => serde_json::json!({ "deleted": id, "found": found }),
        Outcome::Cleared { removed } => serde_json::json!({ "cleared": removed }),
        Outcome::GoalSet { goal } => serde_json::json!({ "goal": goal }),
        Outcome::Imported { meals } => serde_json::json!({ "imported": meals }),
        Outcome::Rejected | Outcome::ImportFailed(_) => serde_json::json!({}),
    };
    serde_json::json!({ "result": result, "dashboard": dashboard })
}
