use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutriwise_core::{Dashboard, DayTotal, MealRecord};

const PROGRESS_WIDTH: i64 = 20;
const CHART_WIDTH: i64 = 30;

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{s}'. Use YYYY-MM-DD, today or yesterday")),
        },
    }
}

/// Instant for a meal logged on `date`: the current local time of day on
/// that date, or local noon if that time does not exist there.
pub(crate) fn timestamp_on(date: NaiveDate) -> DateTime<Utc> {
    let now = Local::now();
    if date == now.date_naive() {
        return now.with_timezone(&Utc);
    }
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    [now.time(), noon]
        .into_iter()
        .find_map(|time| Local.from_local_datetime(&date.and_time(time)).earliest())
        .map_or_else(
            || date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc(),
            |local| local.with_timezone(&Utc),
        )
}

/// Ask a yes/no question on stderr. Anything but `y`/`yes` means no.
pub(crate) fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

fn bar(filled: i64, width: i64) -> String {
    let filled = filled.clamp(0, width);
    format!(
        "{}{}",
        "#".repeat(filled as usize),
        "-".repeat((width - filled) as usize)
    )
}

pub(crate) fn render_dashboard(dash: &Dashboard) -> String {
    let mut out = String::new();
    let date = dash.date;
    let _ = writeln!(out, "=== {date} ===\n");
    let _ = writeln!(out, "  Today:    {} kcal", dash.today_total);
    let _ = writeln!(out, "  Goal:     {} kcal", dash.goal);

    let filled = dash.progress_percent * PROGRESS_WIDTH / 100;
    let marker = if dash.goal_reached {
        "  (goal reached)"
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "  Progress: [{}] {}% of goal{marker}",
        bar(filled, PROGRESS_WIDTH),
        dash.percent_of_goal
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  This week total: {} kcal", dash.weekly_total);
    let _ = write!(out, "  Average/day:     {} kcal", dash.average_per_day);
    out
}

pub(crate) fn render_week(days: &[DayTotal]) -> String {
    #[derive(Tabled)]
    struct WeekRow {
        #[tabled(rename = "Day")]
        day: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "")]
        chart: String,
    }

    let max = days.iter().map(|d| d.calories).max().unwrap_or(0);
    let last = days.len().saturating_sub(1);

    let rows: Vec<WeekRow> = days
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let filled = if max > 0 {
                let scaled = i128::from(d.calories) * i128::from(CHART_WIDTH) / i128::from(max);
                i64::try_from(scaled).unwrap_or(0)
            } else {
                0
            };
            let label = d.label();
            WeekRow {
                day: if i == last {
                    format!("{label} *")
                } else {
                    label
                },
                date: d.date.format("%Y-%m-%d").to_string(),
                calories: d.calories.to_string(),
                chart: "#".repeat(filled.max(0) as usize),
            }
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string()
}

pub(crate) fn render_meals(meals: &[&MealRecord]) -> String {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "When")]
        when: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Calories")]
        calories: String,
    }

    let rows: Vec<MealRow> = meals
        .iter()
        .map(|m| MealRow {
            id: m.id.clone(),
            when: m
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            name: truncate(&m.name, 35),
            category: m.category.to_string(),
            calories: m.calories.to_string(),
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..5)).with(Alignment::right()))
        .to_string()
}
