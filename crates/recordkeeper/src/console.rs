//! Colorful console output for archive events.
//!
//! Provides a `tracing` layer that prints submission outcomes, replays and
//! store trouble reported by the archive engine.

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const ARCHIVE_TARGET: &str = "recordkeeper_archive";

/// Initializes the archive console output.
///
/// Safe to call multiple times - only the first call has effect. If another
/// global subscriber is already installed, it is left in place.
pub fn init() {
    INIT.get_or_init(|| {
        let directive: Directive = format!("{}=info", ARCHIVE_TARGET)
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into());
        let filter = EnvFilter::builder()
            .with_default_directive(directive)
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ArchiveConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats archive events with colors.
pub struct ArchiveConsoleLayer;

impl<S: Subscriber> Layer<S> for ArchiveConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with(ARCHIVE_TARGET) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_archive_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    puzzle: Option<String>,
    score: Option<String>,
    outcome: Option<String>,
    error: Option<String>,
    removed: Option<u64>,
    successes: Option<u64>,
    dropped: Option<u64>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "puzzle" => self.puzzle = Some(value),
            "score" => self.score = Some(value),
            "outcome" => self.outcome = Some(value),
            "error" | "violation" => self.error = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "removed" => self.removed = Some(value),
            "successes" => self.successes = Some(value),
            "dropped" => self.dropped = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }
}

fn format_archive_event(v: &EventVisitor) -> String {
    match v.event.as_deref() {
        Some("archive") => format_submission(v),
        Some("replay") => format_replay(v),
        Some("frontier_repaired") => format_repaired(v),
        Some("save_failed") => format_save_failed(v),
        Some("frontier_violation") => format_violation(v),
        _ => String::new(),
    }
}

fn puzzle_tag(v: &EventVisitor) -> String {
    format!("[{}]", v.puzzle.as_deref().unwrap_or("?"))
}

fn format_submission(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let outcome = match v.outcome.as_deref() {
        Some("success") => match v.removed.unwrap_or(0) {
            0 => "archived".bright_green().bold().to_string(),
            n => format!("archived, replaced {}", n).bright_green().bold().to_string(),
        },
        Some("already_archived") => "already archived".white().to_string(),
        Some("failure") => "dominated".yellow().to_string(),
        Some(other) => other.white().to_string(),
        None => "unknown".white().to_string(),
    };

    format!(
        "{} {} {} {} {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        puzzle_tag(v).bright_cyan(),
        score.bright_white().bold(),
        outcome
    )
}

fn format_replay(v: &EventVisitor) -> String {
    format!(
        "{} {} {} replay archived ({}) records",
        timestamp().bright_black(),
        "INFO".bright_green(),
        puzzle_tag(v).bright_cyan(),
        v.successes.unwrap_or(0).to_string().bright_magenta()
    )
}

fn format_repaired(v: &EventVisitor) -> String {
    format!(
        "{} {} {} stored frontier repaired, dropped ({}) records",
        timestamp().bright_black(),
        "WARN".yellow(),
        puzzle_tag(v).bright_cyan(),
        v.dropped.unwrap_or(0).to_string().yellow()
    )
}

fn format_save_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} {} frontier not saved: {}",
        timestamp().bright_black(),
        "WARN".yellow(),
        puzzle_tag(v).bright_cyan(),
        v.error.as_deref().unwrap_or("unknown error").bright_red()
    )
}

fn format_violation(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {}",
        timestamp().bright_black(),
        "ERROR".bright_red().bold(),
        puzzle_tag(v).bright_cyan(),
        v.error.as_deref().unwrap_or("frontier violation").bright_red()
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}
