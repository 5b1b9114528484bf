// Colored terminal rendering of the dashboard.
//
// This is the presentation layer: alert banner, post table, map marker
// list, charts as text, and the public-health admin panel. It only reads
// a published DashboardView and never touches the pipeline.

use colored::Colorize;

use super::{truncate_chars, TABLE_DATE_FORMAT};
use crate::alert::high_severity_count;
use crate::charts::{crosstab, EngagementSeries, SentimentCounts};
use crate::classify::{matched_keywords, risk_label};
use crate::pipeline::DashboardView;
use crate::posts::{Post, Sentiment, Severity};
use crate::role::RenderContext;

/// Width of the longest sentiment bar.
const BAR_WIDTH: usize = 30;

/// Render the full dashboard for one view.
pub fn display_dashboard(view: &DashboardView, ctx: &RenderContext) {
    println!("{}", "=== Suicidal Crisis Dashboard ===".bold());
    display_criteria(view);
    display_alert(view.alert.as_deref());

    if view.loading {
        println!("  {}", "Loading data...".dimmed());
    }

    display_map_markers(&view.filtered);
    display_sentiment(&view.charts.sentiment);
    display_engagement(&view.charts.engagement);
    display_posts_table(&view.filtered, ctx);

    if ctx.shows_admin_panel() {
        display_admin_panel(&view.filtered);
    }
}

fn display_criteria(view: &DashboardView) {
    let c = &view.criteria;
    let severities: Vec<&str> = c.severities().iter().map(|s| s.as_str()).collect();
    let location = if c.location_query().is_empty() {
        "(any)".to_string()
    } else {
        format!("\"{}\"", c.location_query())
    };
    println!(
        "  {} {} to {}  |  {} {}  |  {} {}",
        "Dates:".dimmed(),
        c.start().format("%b %-d, %Y"),
        c.end().format("%b %-d, %Y"),
        "Severity:".dimmed(),
        if severities.is_empty() {
            "(none)".to_string()
        } else {
            severities.join(", ")
        },
        "Location:".dimmed(),
        location,
    );
}

/// The alert banner, if there is one.
pub fn display_alert(alert: Option<&str>) {
    if let Some(message) = alert {
        println!("\n  {} {}", "!!".red().bold(), message.red().bold());
    }
}

/// Map markers as a coordinate list, colored by severity.
pub fn display_map_markers(posts: &[Post]) {
    println!("\n{}", "Interactive Crisis Map".bold());
    if posts.is_empty() {
        println!("  {}", "No markers".dimmed());
        return;
    }
    for post in posts {
        println!(
            "  {} #{:<3} ({:>9.4}, {:>10.4})  {}",
            colorize_severity(post.severity, "●"),
            post.id,
            post.location.lat,
            post.location.lng,
            post.topic.dimmed(),
        );
    }
    println!(
        "  Map Key: {} {} {}",
        colorize_severity(Severity::High, "● High"),
        colorize_severity(Severity::Medium, "● Medium"),
        colorize_severity(Severity::Low, "● Low"),
    );
}

/// Sentiment distribution as horizontal bars.
pub fn display_sentiment(counts: &SentimentCounts) {
    println!("\n{}", "Sentiment Distribution".bold());
    let max = counts.as_array().into_iter().max().unwrap_or(0).max(1);
    for sentiment in Sentiment::ALL {
        let n = counts.get(sentiment);
        let bar = "█".repeat(n * BAR_WIDTH / max);
        let bar = match sentiment {
            Sentiment::Positive => bar.green(),
            Sentiment::Neutral => bar.blue(),
            Sentiment::Negative => bar.red(),
        };
        println!("  {:<9} {:>3} {}", capitalize(sentiment.as_str()), n, bar);
    }
}

/// Engagement over time, one row per post in date order.
pub fn display_engagement(series: &EngagementSeries) {
    println!("\n{}", "Engagement Over Time".bold());
    if series.is_empty() {
        println!("  {}", "No data".dimmed());
        return;
    }
    println!(
        "  {:<12} {:>8} {:>8}",
        "Date".dimmed(),
        "Retweets".dimmed(),
        "Replies".dimmed()
    );
    for ((label, retweets), replies) in series
        .labels
        .iter()
        .zip(&series.retweets)
        .zip(&series.replies)
    {
        println!("  {:<12} {:>8} {:>8}", label, retweets, replies);
    }
}

/// The post table. The Actions column only appears for roles that have it.
pub fn display_posts_table(posts: &[Post], ctx: &RenderContext) {
    println!(
        "\n{} {}",
        "Recent Crisis Posts".bold(),
        format!("({} posts found)", posts.len()).dimmed()
    );

    if posts.is_empty() {
        println!("  {}", "No posts match your filters".dimmed());
        return;
    }

    let actions_header = if ctx.shows_actions_column() {
        "Actions"
    } else {
        ""
    };
    println!(
        "  {:>3}  {:<42} {:<8} {:<18} {:<24} {}",
        "ID".dimmed(),
        "Text".dimmed(),
        "Severity".dimmed(),
        "Topic".dimmed(),
        "Date".dimmed(),
        actions_header.dimmed(),
    );
    println!("  {}", "-".repeat(110).dimmed());

    for post in posts {
        let action = if ctx.shows_actions_column() {
            format!("crisiswatch feedback {} \"...\"", post.id)
        } else {
            String::new()
        };
        println!(
            "  {:>3}  {:<42} {:<8} {:<18} {:<24} {}",
            post.id,
            truncate_chars(&post.text, 39),
            colorize_severity(post.severity, post.severity.label()),
            truncate_chars(&post.topic, 18),
            post.date.format(TABLE_DATE_FORMAT).to_string(),
            action.dimmed(),
        );
    }
}

/// Admin panel for public health officials. Only figures derived from the
/// current view are shown.
pub fn display_admin_panel(posts: &[Post]) {
    println!("\n{}", "=== Public Health Official Dashboard ===".bold());

    let high = high_severity_count(posts);
    println!(
        "  {:<24} {}",
        "High Severity Cases:",
        if high > 0 {
            high.to_string().red().bold()
        } else {
            high.to_string().green()
        }
    );
    println!("  {:<24} {}", "Posts in view:", posts.len());

    let table = crosstab(posts);
    println!("\n  {}", "Sentiment vs. Severity".dimmed());
    println!(
        "  {:<10} {:>6} {:>7} {:>5} {:>6}",
        "", "High", "Medium", "Low", "Total"
    );
    for sentiment in Sentiment::ALL {
        println!(
            "  {:<10} {:>6} {:>7} {:>5} {:>6}",
            capitalize(sentiment.as_str()),
            table.get(sentiment, Severity::High),
            table.get(sentiment, Severity::Medium),
            table.get(sentiment, Severity::Low),
            table.row_total(sentiment),
        );
    }
}

/// Detail view for a single post.
pub fn display_post_detail(post: &Post) {
    println!("\n{}", format!("=== Post #{} ===", post.id).bold());
    println!("  Text:       {}", post.text);
    println!(
        "  Severity:   {}",
        colorize_severity(post.severity, post.severity.as_str())
    );
    println!("  Topic:      {}", post.topic);
    println!("  Sentiment:  {}", post.sentiment);
    println!("  Date:       {}", post.date.format(TABLE_DATE_FORMAT));
    println!(
        "  Engagement: {} retweets, {} replies",
        post.engagement.retweets, post.engagement.replies
    );
}

/// Output of the `classify` command.
pub fn display_classification(
    text: &str,
    cleaned: &str,
    severity: Severity,
    sentiment: Sentiment,
) {
    println!("\n{}", "=== Risk Classification ===".bold());
    println!("  Input:     {}", truncate_chars(text, 120));
    println!("  Cleaned:   {}", cleaned.dimmed());
    println!(
        "  Risk:      {}",
        colorize_severity(severity, risk_label(severity))
    );
    let label = capitalize(sentiment.as_str());
    let label = match sentiment {
        Sentiment::Positive => label.green(),
        Sentiment::Neutral => label.blue(),
        Sentiment::Negative => label.red(),
    };
    println!("  Sentiment: {label}");
    let keywords = matched_keywords(text);
    if !keywords.is_empty() {
        println!("  Keywords:  {}", keywords.join(", "));
    }
}

/// Colorize text by severity (red / amber / green).
pub fn colorize_severity(severity: Severity, text: &str) -> colored::ColoredString {
    match severity {
        Severity::High => text.red().bold(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.green(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
