use anyhow::{Context, Result};
use uuid::Uuid;

use prep_lib::flashcards::algorithm::format_interval;
use prep_lib::flashcards::Flashcard;
use prep_lib::planner::Subject;

use crate::app::App;
use crate::render::{self, Color};
use crate::OutputFormat;

const QUALITY_LABELS: [&str; 6] = ["blackout", "wrong", "hard wrong", "hard", "good", "easy"];

pub fn run_generate(
    app: &App,
    subject: Subject,
    topic: &str,
    count: usize,
    format: &OutputFormat,
) -> Result<()> {
    let cards = app
        .engine
        .create_flashcards(&app.user, subject, topic, count)
        .context("Failed to create flashcards")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            println!("Created {} cards on \"{}\" ({})", cards.len(), topic, subject);
            for card in &cards {
                println!("  {}  {}", card.id, card.front);
            }
        }
    }
    Ok(())
}

pub fn run_due(app: &App, limit: Option<i32>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app
        .engine
        .get_due_cards(&app.user, limit)
        .context("Failed to load due cards")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("Nothing due.");
                return Ok(());
            }
            println!("{} due", cards.len());
            for card in &cards {
                print_card(card, use_color);
            }
        }
    }
    Ok(())
}

pub fn run_review(app: &App, card_id: Uuid, quality: i32, format: &OutputFormat) -> Result<()> {
    let card = app
        .engine
        .record_review(&app.user, card_id, quality)
        .context("Failed to record review")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!(
                "Next review in {} ({}), ease {:.2}, reps {}",
                format_interval(card.interval_days),
                card.next_review_at.format("%Y-%m-%d"),
                card.ease,
                card.reps
            );
        }
    }
    Ok(())
}

pub fn run_preview(app: &App, card_id: Uuid, format: &OutputFormat) -> Result<()> {
    let intervals = app
        .engine
        .preview_review(&app.user, card_id)
        .context("Failed to preview card")?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = intervals
                .iter()
                .enumerate()
                .map(|(quality, days)| {
                    serde_json::json!({
                        "quality": quality,
                        "intervalDays": days,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for (quality, days) in intervals.iter().enumerate() {
                println!(
                    "  {} {:<10} {}",
                    quality,
                    QUALITY_LABELS[quality],
                    format_interval(*days)
                );
            }
        }
    }
    Ok(())
}

fn print_card(card: &Flashcard, use_color: bool) {
    let subject = card.subject.map(|s| s.as_str()).unwrap_or("-");
    println!(
        "{}  {}",
        render::paint(&format!("[{}]", subject), Color::CYAN, use_color),
        card.front
    );
    println!(
        "      {}",
        render::paint(&card.id.to_string(), Color::GRAY, use_color)
    );
}
