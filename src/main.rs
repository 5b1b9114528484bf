use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crisiswatch::config::Config;
use crisiswatch::feedback::{submit_with_retry, FeedbackDraft, SimulatedFeedback};
use crisiswatch::filter::criteria::parse_day;
use crisiswatch::filter::DateRange;
use crisiswatch::output::report::{write_report, ReportFormat};
use crisiswatch::output::terminal;
use crisiswatch::pipeline::{Dashboard, DashboardView};
use crisiswatch::posts::Severity;
use crisiswatch::role::RenderContext;

/// crisiswatch: crisis post dashboard.
///
/// Filters crisis posts by date, severity and location keyword, and shows
/// the resulting alert, charts and post table in the terminal.
#[derive(Parser)]
#[command(name = "crisiswatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard for a set of filters
    Show {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Export the filtered posts as a report file
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Report format: json or markdown
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,

        /// Output directory (default: CRISISWATCH_REPORT_DIR or ./output)
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },

    /// Submit feedback or an annotation for a post
    Feedback {
        /// The post to annotate
        post_id: u32,

        /// Annotation text
        text: String,

        /// Total submission attempts on transient failures (default: 3)
        #[arg(long, default_value = "3")]
        attempts: u32,
    },

    /// Clean a piece of text and classify its crisis risk
    Classify {
        /// Text to classify (words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// First day of the window (YYYY-MM-DD, default 2025-04-14)
    #[arg(long)]
    from: Option<String>,

    /// Last day of the window, inclusive (YYYY-MM-DD, default 2025-04-16)
    #[arg(long)]
    to: Option<String>,

    /// Severity to include; repeat for several (default: all)
    #[arg(long = "severity", value_name = "LEVEL")]
    severities: Vec<Severity>,

    /// Location keyword
    #[arg(long, default_value = "")]
    location: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crisiswatch=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Show { filters } => {
            let view = run_filters(&config, &filters).await?;
            let ctx = RenderContext::new(config.role);
            terminal::display_dashboard(&view, &ctx);
        }

        Commands::Report {
            filters,
            format,
            output,
        } => {
            let view = run_filters(&config, &filters).await?;
            let dir = output.unwrap_or_else(|| config.report_dir.clone());
            let path = write_report(&view, format, &dir)?;
            println!(
                "{}",
                format!(
                    "Report saved to: {} ({} posts)",
                    path.display(),
                    view.filtered.len()
                )
                .bold()
            );
        }

        Commands::Feedback {
            post_id,
            text,
            attempts,
        } => {
            let store = config.load_store()?;
            match store.get(post_id) {
                Some(post) => terminal::display_post_detail(post),
                None => anyhow::bail!("No post with id {post_id}"),
            }

            let sink = SimulatedFeedback::new(config.feedback_delay).with_store(store.clone());
            let draft = FeedbackDraft::new(post_id, text);
            draft.validate().context("Feedback text is required")?;

            let spinner = spinner("Submitting...");
            let result = submit_with_retry(&sink, &draft, attempts, config.feedback_delay).await;
            spinner.finish_and_clear();

            match result {
                Ok(tries) => {
                    info!(post_id, tries, "Feedback accepted");
                    println!("\n{}", "Feedback submitted successfully!".green().bold());
                }
                Err(e) => {
                    warn!(post_id, error = %e, "Feedback rejected");
                    // Echo the draft so nothing typed is lost.
                    println!("\n{} {}", "Not submitted:".red().bold(), e);
                    println!("  Your text: {}", draft.text.dimmed());
                    return Err(e).context("Feedback submission failed");
                }
            }
        }

        Commands::Classify { text } => {
            let text = text.join(" ");
            let cleaned = crisiswatch::classify::clean_text(&text);
            let severity = crisiswatch::classify::classify_risk(&text);
            let sentiment = crisiswatch::classify::classify_sentiment(&text);
            terminal::display_classification(&text, &cleaned, severity, sentiment);
        }
    }

    Ok(())
}

/// Apply the CLI filters to a fresh dashboard session and wait for the
/// resulting view. The loading indicator spins while the recompute is pending.
async fn run_filters(config: &Config, args: &FilterArgs) -> Result<DashboardView> {
    let store = config.load_store()?;
    let mut dashboard = Dashboard::new(store, config.pipeline_settings());

    let from = args.from.as_deref().map(parse_day).transpose()?;
    let to = args.to.as_deref().map(parse_day).transpose()?;
    match (from, to) {
        (Some(first), Some(last)) => {
            dashboard.set_range(DateRange::days(first, last)?);
        }
        (Some(first), None) => {
            dashboard.set_first_day(first);
        }
        (None, Some(last)) => {
            dashboard.set_last_day(last);
        }
        (None, None) => {}
    }

    if !args.severities.is_empty() {
        dashboard.set_severities(args.severities.iter().copied().collect());
    }
    if !args.location.is_empty() {
        dashboard.set_location_query(args.location.as_str());
    }

    let spinner = spinner("Loading data...");
    let view = dashboard.settle().await;
    spinner.finish_and_clear();

    info!(
        generation = view.generation,
        posts = view.filtered.len(),
        "Dashboard ready"
    );
    Ok(view)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
