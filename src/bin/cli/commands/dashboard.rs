use anyhow::{Context, Result};

use crate::app::App;
use crate::render::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app
        .engine
        .get_dashboard(&app.user)
        .context("Failed to build dashboard")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("{}", render::paint("Dashboard", Color::BOLD, use_color));
            println!("  Recent study: {} min", stats.total_study_minutes);
            println!("  Streak: {} days", stats.streak_count);
            println!(
                "  Completion: {} {:.1}%",
                render::bar(stats.completion_rate, 20),
                stats.completion_rate
            );

            if !stats.subject_stats.is_empty() {
                println!();
                for (subject, subject_stats) in &stats.subject_stats {
                    println!(
                        "  {:<8} {:>5} min  {}/{} done",
                        subject.as_str(),
                        subject_stats.minutes,
                        subject_stats.completed,
                        subject_stats.total
                    );
                }
            }

            println!();
            let weekly: Vec<String> = stats.weekly_minutes.iter().map(|m| m.to_string()).collect();
            println!(
                "  {}",
                render::paint(&format!("Week: {}", weekly.join(" ")), Color::DIM, use_color)
            );
        }
    }
    Ok(())
}
