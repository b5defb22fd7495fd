use anyhow::Result;

use nutriwise_core::aggregate::meals_newest_first;
use nutriwise_core::{Action, Database, MealCategory, Tracker};

use super::dispatch;
use super::helpers::{confirm, parse_date, render_meals, timestamp_on};

pub(crate) fn cmd_add(
    tracker: &mut Tracker<Database>,
    name: &str,
    calories: i64,
    category: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let category: MealCategory = category.parse()?;
    let timestamp = date
        .map(|d| parse_date(Some(d)))
        .transpose()?
        .map(timestamp_on);

    dispatch(
        tracker,
        Action::AddMeal {
            name: name.to_string(),
            category,
            calories,
            timestamp,
        },
        json,
    )
}

pub(crate) fn cmd_delete(tracker: &mut Tracker<Database>, id: &str, json: bool) -> Result<()> {
    dispatch(tracker, Action::DeleteMeal { id: id.to_string() }, json)
}

pub(crate) fn cmd_clear(tracker: &mut Tracker<Database>, yes: bool, json: bool) -> Result<()> {
    if !yes && !confirm("Clear all meals? This cannot be undone.")? {
        if json {
            println!("{}", serde_json::json!({ "cancelled": true }));
        } else {
            eprintln!("Cancelled");
        }
        return Ok(());
    }
    dispatch(tracker, Action::ClearAll, json)
}

pub(crate) fn cmd_list(tracker: &Tracker<Database>, json: bool) -> Result<()> {
    let meals = meals_newest_first(tracker.state());

    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
    } else if meals.is_empty() {
        eprintln!("No meals logged yet.");
    } else {
        println!("{}", render_meals(&meals));
        let count = meals.len();
        println!("{count} meal(s). Delete one with `nutriwise delete <ID>`.");
    }

    Ok(())
}
