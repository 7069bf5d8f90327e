use anyhow::{Context, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use prep_lib::planner::{PlanItem, PlanItemStatus, PlanRequest, Subject};

use crate::app::App;
use crate::render::{self, Color};
use crate::OutputFormat;

pub fn run_generate(
    app: &App,
    exam_date: NaiveDate,
    hours: i32,
    subjects: Vec<Subject>,
    weak_areas: Vec<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let request = PlanRequest::new(exam_date, hours, subjects).with_weak_areas(weak_areas);
    let generated = app
        .engine
        .generate_plan(&app.user, &request)
        .context("Failed to generate plan")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
        OutputFormat::Plain => {
            let plan = &generated.plan;
            println!(
                "{}",
                render::paint(&plan.name, Color::BOLD, use_color)
            );
            println!("  ID: {}", plan.id);
            println!("  {} -> {}", plan.start_date, plan.end_date);
            println!();
            print_items(&generated.items, use_color);
        }
    }
    Ok(())
}

pub fn run_items(
    app: &App,
    date: Option<NaiveDate>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let items = app
        .engine
        .list_items(&app.user, date)
        .context("Failed to list plan items")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No plan items.");
            } else {
                print_items(&items, use_color);
            }
        }
    }
    Ok(())
}

pub fn run_log(
    app: &App,
    item_id: Uuid,
    minutes: i32,
    status: PlanItemStatus,
    format: &OutputFormat,
) -> Result<()> {
    let item = app
        .engine
        .log_progress(&app.user, item_id, minutes, status)
        .context("Failed to log progress")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        OutputFormat::Plain => {
            println!(
                "Logged {} min on {} ({}): {}",
                item.actual_minutes, item.topic, item.subject, item.status
            );
            if let Ok(profile) = app.engine.get_profile(&app.user) {
                println!("  Total studied: {} min", profile.total_study_minutes);
            }
        }
    }
    Ok(())
}

pub fn run_reschedule(app: &App, item_id: Uuid, date: NaiveDate, format: &OutputFormat) -> Result<()> {
    let item = app
        .engine
        .reschedule_item(&app.user, item_id, date)
        .context("Failed to reschedule item")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        OutputFormat::Plain => {
            println!("Moved {} ({}) to {}", item.topic, item.subject, item.date);
        }
    }
    Ok(())
}

pub fn run_extend(app: &App, plan_id: Uuid, end_date: NaiveDate, format: &OutputFormat) -> Result<()> {
    let plan = app
        .engine
        .extend_plan(&app.user, plan_id, end_date)
        .context("Failed to extend plan")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Plain => {
            println!("{} now ends {}", plan.name, plan.end_date);
        }
    }
    Ok(())
}

fn print_items(items: &[PlanItem], use_color: bool) {
    for item in items {
        println!(
            "{}  {}  {:<8} {:>3}/{:<3} min  {}",
            item.date,
            render::status(item.status, use_color),
            item.subject.as_str(),
            item.actual_minutes,
            item.target_minutes,
            item.topic
        );
        println!("            {}", render::paint(&item.id.to_string(), Color::GRAY, use_color));
    }
}
