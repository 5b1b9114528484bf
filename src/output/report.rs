// Report export: the "download report" action.
//
// Reports are always built from a published DashboardView, i.e. from the
// current filtered list, never from the raw post store.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::TABLE_DATE_FORMAT;
use crate::charts::{crosstab, SentimentCounts};
use crate::filter::FilterCriteria;
use crate::pipeline::DashboardView;
use crate::posts::{Post, Sentiment, Severity};

/// File stem used for every report.
pub const REPORT_FILE_STEM: &str = "crisiswatch-report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    Json,
    #[default]
    Markdown,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "md" | "markdown" => Ok(ReportFormat::Markdown),
            other => Err(format!("unknown report format '{other}' (expected json or markdown)")),
        }
    }
}

/// JSON report document.
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    generated_at: String,
    criteria: &'a FilterCriteria,
    post_count: usize,
    alert: Option<&'a str>,
    sentiment: SentimentCounts,
    posts: &'a [Post],
}

/// Render the view as pretty-printed JSON.
pub fn render_json(view: &DashboardView) -> Result<String> {
    let doc = ReportDocument {
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        criteria: &view.criteria,
        post_count: view.filtered.len(),
        alert: view.alert.as_deref(),
        sentiment: view.charts.sentiment,
        posts: &view.filtered,
    };
    serde_json::to_string_pretty(&doc).context("Failed to serialize report")
}

/// Render the view as a Markdown report.
pub fn render_markdown(view: &DashboardView) -> String {
    let mut out = String::new();
    let c = &view.criteria;

    // Writing into a String can't fail; the results are ignored.
    let _ = writeln!(out, "# Crisis Dashboard Report\n");
    let _ = writeln!(
        out,
        "Generated {}. Window {} to {}.\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M"),
        c.start().format("%Y-%m-%d %H:%M"),
        c.end().format("%Y-%m-%d %H:%M"),
    );

    if let Some(alert) = &view.alert {
        let _ = writeln!(out, "> **{alert}**\n");
    }

    let _ = writeln!(out, "## Severity Summary\n");
    let _ = writeln!(out, "| Severity | Posts |");
    let _ = writeln!(out, "|----------|-------|");
    for severity in Severity::ALL {
        let n = view.filtered.iter().filter(|p| p.severity == severity).count();
        let _ = writeln!(out, "| {} | {} |", severity.label(), n);
    }
    let _ = writeln!(out, "| **Total** | **{}** |\n", view.filtered.len());

    let _ = writeln!(out, "## Sentiment\n");
    let table = crosstab(&view.filtered);
    let _ = writeln!(out, "| Sentiment | High | Medium | Low | Total |");
    let _ = writeln!(out, "|-----------|------|--------|-----|-------|");
    for sentiment in Sentiment::ALL {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            sentiment,
            table.get(sentiment, Severity::High),
            table.get(sentiment, Severity::Medium),
            table.get(sentiment, Severity::Low),
            table.row_total(sentiment),
        );
    }
    out.push('\n');

    if view.filtered.is_empty() {
        let _ = writeln!(out, "No posts match the current filters.");
        return out;
    }

    let _ = writeln!(out, "## Posts\n");
    let _ = writeln!(
        out,
        "| ID | Text | Severity | Topic | Date | Retweets | Replies |"
    );
    let _ = writeln!(
        out,
        "|----|------|----------|-------|------|----------|---------|"
    );
    for post in &view.filtered {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            post.id,
            escape_cell(&post.text),
            post.severity.label(),
            escape_cell(&post.topic),
            post.date.format(TABLE_DATE_FORMAT),
            post.engagement.retweets,
            post.engagement.replies,
        );
    }

    out
}

/// Write a report for the view into `dir` and return the file path.
pub fn write_report(view: &DashboardView, format: ReportFormat, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

    let body = match format {
        ReportFormat::Json => render_json(view)?,
        ReportFormat::Markdown => render_markdown(view),
    };

    let path = dir.join(format!("{REPORT_FILE_STEM}.{}", format.extension()));
    std::fs::write(&path, body)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!(
        path = %path.display(),
        posts = view.filtered.len(),
        "Report written"
    );
    Ok(path)
}

/// Keep table cells on one line and escape column separators.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
