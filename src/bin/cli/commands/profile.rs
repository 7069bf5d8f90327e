use anyhow::{Context, Result};
use chrono::NaiveDate;

use prep_lib::profile::{Profile, ProfileSetup};

use crate::app::App;
use crate::OutputFormat;

pub fn run_setup(
    app: &App,
    name: String,
    exam_date: Option<NaiveDate>,
    optional_subject: Option<String>,
    hours_per_day: Option<i32>,
    format: &OutputFormat,
) -> Result<()> {
    let setup = ProfileSetup {
        name,
        exam_date,
        optional_subject,
        hours_per_day,
    };
    let profile = app
        .engine
        .setup_profile(&app.user, setup)
        .context("Failed to set up profile")?;

    print_profile(app, &profile, format)
}

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    let profile = app
        .engine
        .get_profile(&app.user)
        .with_context(|| format!("No profile for '{}'; run `profile setup` first", app.user))?;

    print_profile(app, &profile, format)
}

fn print_profile(app: &App, profile: &Profile, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
        OutputFormat::Plain => {
            println!("{} ({})", profile.name, profile.user_id);
            if let Some(date) = profile.exam_date {
                let days = (date - app.today()).num_days();
                println!("  Exam: {} ({} days)", date, days);
            }
            if let Some(subject) = &profile.optional_subject {
                println!("  Optional: {}", subject);
            }
            if let Some(hours) = profile.hours_per_day {
                println!("  Hours/day: {}", hours);
            }
            println!("  Studied: {} min", profile.total_study_minutes);
            println!("  Streak: {} days", profile.streak_count);
            println!("  Data: {}", app.data_dir.display());
        }
    }
    Ok(())
}
