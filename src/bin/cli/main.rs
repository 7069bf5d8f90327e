mod app;
mod commands;
mod render;

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use prep_lib::planner::{PlanItemStatus, Subject};
use prep_lib::resources::ResourceKind;

#[derive(Parser)]
#[command(name = "prep-cli", about = "Exam study planner and flashcard reviewer", version)]
struct Cli {
    /// User the command acts for
    #[arg(long, global = true, default_value = "default")]
    user: String,

    /// Storage directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Profile setup and totals
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Study plans and their daily items
    #[command(subcommand)]
    Plan(PlanCommand),

    /// Flashcard creation and review
    #[command(subcommand)]
    Cards(CardsCommand),

    /// Study statistics
    Dashboard,

    /// Study resources
    #[command(subcommand)]
    Resource(ResourceCommand),
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Create or update the profile
    Setup {
        /// Display name
        #[arg(long)]
        name: String,
        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        exam_date: Option<NaiveDate>,
        /// Optional paper chosen for the exam
        #[arg(long)]
        optional_subject: Option<String>,
        /// Daily study hours
        #[arg(long)]
        hours: Option<i32>,
    },

    /// Show the profile
    Show,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Generate a plan up to the exam date
    Generate {
        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        exam_date: NaiveDate,
        /// Daily study hours
        #[arg(long)]
        hours: i32,
        /// Comma-separated subjects, rotated in this order (gs1,gs2,...)
        #[arg(long, value_delimiter = ',', required = true)]
        subjects: Vec<Subject>,
        /// Comma-separated weak areas
        #[arg(long, value_delimiter = ',')]
        weak_areas: Vec<String>,
    },

    /// List plan items
    Items {
        /// Only items scheduled on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only items scheduled today
        #[arg(long, conflicts_with = "date")]
        today: bool,
    },

    /// Log minutes and status for an item
    Log {
        /// Item ID
        item: Uuid,
        /// Minutes studied
        #[arg(long)]
        minutes: i32,
        /// pending, done or skipped
        #[arg(long, default_value = "done")]
        status: PlanItemStatus,
    },

    /// Move a pending item to another date
    Reschedule {
        /// Item ID
        item: Uuid,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// Move a plan's end date later
    Extend {
        /// Plan ID
        plan: Uuid,
        /// New end date (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,
    },
}

#[derive(Subcommand)]
enum CardsCommand {
    /// Generate cards on a topic
    Generate {
        /// Subject the cards belong to
        #[arg(long)]
        subject: Subject,
        /// Topic to generate questions about
        #[arg(long)]
        topic: String,
        /// Number of cards
        #[arg(long, default_value = "5")]
        count: usize,
    },

    /// List cards due now
    Due {
        /// Maximum cards (default from config)
        #[arg(long)]
        limit: Option<i32>,
    },

    /// Rate a card 0-5
    Review {
        /// Card ID
        card: Uuid,
        /// Recall quality, 0 (blackout) to 5 (perfect)
        quality: i32,
    },

    /// Show the interval each rating would give
    Preview {
        /// Card ID
        card: Uuid,
    },
}

#[derive(Subcommand)]
enum ResourceCommand {
    /// Add a resource and process it
    Add {
        /// Resource title
        title: String,
        /// pdf, image, youtube, link, note or ai_generated
        #[arg(long, default_value = "note")]
        kind: ResourceKind,
        /// Inline content (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
        /// Source URL
        #[arg(long)]
        url: Option<String>,
        /// Block until the resource is indexed
        #[arg(long)]
        wait: bool,
    },

    /// List resources, newest first
    List,
}

/// Resolve "-" as the contents of `stdin`
fn resolve_content(content: Option<String>, mut stdin: impl Read) -> anyhow::Result<Option<String>> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(Some(buf))
        }
        _ => Ok(content),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.user, cli.data_dir, cli.config.as_deref())?;

    match cli.command {
        Command::Profile(subcmd) => match subcmd {
            ProfileCommand::Setup { name, exam_date, optional_subject, hours } => {
                commands::profile::run_setup(
                    &app,
                    name,
                    exam_date,
                    optional_subject,
                    hours,
                    &cli.format,
                )?;
            }
            ProfileCommand::Show => {
                commands::profile::run_show(&app, &cli.format)?;
            }
        },
        Command::Plan(subcmd) => match subcmd {
            PlanCommand::Generate { exam_date, hours, subjects, weak_areas } => {
                commands::plan::run_generate(
                    &app,
                    exam_date,
                    hours,
                    subjects,
                    weak_areas,
                    &cli.format,
                    use_color,
                )?;
            }
            PlanCommand::Items { date, today } => {
                let date = if today { Some(app.today()) } else { date };
                commands::plan::run_items(&app, date, &cli.format, use_color)?;
            }
            PlanCommand::Log { item, minutes, status } => {
                commands::plan::run_log(&app, item, minutes, status, &cli.format)?;
            }
            PlanCommand::Reschedule { item, date } => {
                commands::plan::run_reschedule(&app, item, date, &cli.format)?;
            }
            PlanCommand::Extend { plan, end_date } => {
                commands::plan::run_extend(&app, plan, end_date, &cli.format)?;
            }
        },
        Command::Cards(subcmd) => match subcmd {
            CardsCommand::Generate { subject, topic, count } => {
                commands::cards::run_generate(&app, subject, &topic, count, &cli.format)?;
            }
            CardsCommand::Due { limit } => {
                commands::cards::run_due(&app, limit, &cli.format, use_color)?;
            }
            CardsCommand::Review { card, quality } => {
                commands::cards::run_review(&app, card, quality, &cli.format)?;
            }
            CardsCommand::Preview { card } => {
                commands::cards::run_preview(&app, card, &cli.format)?;
            }
        },
        Command::Dashboard => {
            commands::dashboard::run(&app, &cli.format, use_color)?;
        }
        Command::Resource(subcmd) => match subcmd {
            ResourceCommand::Add { title, kind, content, url, wait } => {
                let content = resolve_content(content, std::io::stdin())?;
                commands::resource::run_add(&app, title, kind, content, url, wait, &cli.format)?;
            }
            ResourceCommand::List => {
                commands::resource::run_list(&app, &cli.format)?;
            }
        },
    }

    Ok(())
}
