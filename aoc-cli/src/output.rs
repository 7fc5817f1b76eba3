//! Output formatting for command results

use crate::submit::SubmissionReport;
use aoc_client::{ClientError, DayStars, Outcome, StarLevel, YearStars};
use std::time::Duration;

/// Output formatter for command results
pub struct OutputFormatter {
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print the result of a submission
    pub fn print_submission(&self, report: &SubmissionReport) {
        if self.quiet {
            match &report.result {
                Ok(outcome) => println!("{}", outcome_label(outcome)),
                Err(e) => eprintln!("Error: {}", e),
            }
            return;
        }

        let request = &report.request;
        let prefix = format!(
            "{}/{:02} Part {} [{}]",
            request.year(),
            request.day(),
            request.part(),
            report.submitted_at.format("%H:%M:%S")
        );
        let waited = if report.waited.is_zero() {
            String::new()
        } else {
            format!(" (waited {})", format_wait(report.waited))
        };

        match &report.result {
            Ok(outcome) => println!("{}: {}{}", prefix, format_outcome(outcome), waited),
            Err(e) => eprintln!("{}: {}{}", prefix, format_error(e), waited),
        }
    }

    /// Print per-year star totals
    pub fn print_years(&self, years: &[YearStars]) {
        for entry in years {
            if self.quiet {
                println!("{} {}", entry.year, entry.stars);
            } else {
                println!("{}: {:>2}*", entry.year, entry.stars);
            }
        }
        if !self.quiet {
            let total: u32 = years.iter().map(|e| e.stars).sum();
            println!("Total: {}*", total);
        }
    }

    /// Print one year's calendar
    pub fn print_calendar(&self, year: u16, days: &[DayStars]) {
        if !self.quiet {
            println!("--- {} ---", year);
        }
        for entry in days {
            println!("Day {:02}: {}", entry.day, star_marks(entry.level));
        }
    }

    /// Print the list of event years
    pub fn print_event_years(&self, years: &[u16]) {
        for year in years {
            println!("{}", year);
        }
    }
}

fn star_marks(level: StarLevel) -> &'static str {
    match level {
        StarLevel::Zero => "",
        StarLevel::One => "*",
        StarLevel::Two => "**",
    }
}

fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Success => "correct",
        Outcome::Wrong(_) => "incorrect",
        Outcome::Waiting { .. } => "waiting",
    }
}

/// Format a submission outcome for display
fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success => "✓ Correct".to_string(),
        Outcome::Wrong(message) => format!("✗ Incorrect: {}", message),
        Outcome::Waiting { .. } => format!("⏳ {}", outcome),
    }
}

fn format_error(error: &ClientError) -> String {
    match error {
        ClientError::RateLimited { wait } => format!("⏳ Throttled (wait {})", wait),
        ClientError::InvalidSession => {
            "⚠ Session rejected; check the AOC_SESSION cookie".to_string()
        }
        other => format!("⚠ Error: {}", other),
    }
}

fn format_wait(d: Duration) -> String {
    aoc_client::WaitDuration::from(d).to_string()
}
