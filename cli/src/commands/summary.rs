use anyhow::Result;

use nutriwise_core::{Dashboard, Database, Tracker};

use super::helpers::{render_dashboard, render_week};

pub(crate) fn cmd_dashboard(tracker: &Tracker<Database>, json: bool) -> Result<()> {
    let dashboard = Dashboard::for_today(tracker.state());

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        println!("{}", render_dashboard(&dashboard));
    }
    Ok(())
}

pub(crate) fn cmd_week(tracker: &Tracker<Database>, json: bool) -> Result<()> {
    let dashboard = Dashboard::for_today(tracker.state());

    if json {
        #[derive(serde::Serialize)]
        struct ChartPoint {
            label: String,
            date: chrono::NaiveDate,
            calories: i64,
        }
        let series: Vec<ChartPoint> = dashboard
            .days
            .iter()
            .map(|d| ChartPoint {
                label: d.label(),
                date: d.date,
                calories: d.calories,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    println!("{}", render_week(&dashboard.days));
    let total = dashboard.weekly_total;
    let avg = dashboard.average_per_day;
    println!("  This week total: {total} kcal | Average/day: {avg} kcal");
    Ok(())
}
