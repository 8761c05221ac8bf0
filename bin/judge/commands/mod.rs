//! CLI subcommands and shared output helpers

pub mod score;
pub mod status;
pub mod submit;

use crate::style::colors;
use crate::style::*;
use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use judge_client::report::{case_rows, total_line};
use judge_client::{AggregateScore, StatusSink, StatusUpdate};
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Prints status updates to stderr, redrawing a single spinner line while
/// the judge is busy
#[derive(Default)]
pub struct CliSink {
    tick: AtomicU64,
    spinning: AtomicBool,
}

impl CliSink {
    fn end_spinner(&self) {
        if self.spinning.swap(false, Ordering::Relaxed) {
            eprintln!();
        }
    }
}

impl StatusSink for CliSink {
    fn update(&self, update: &StatusUpdate) {
        match update {
            StatusUpdate::Queued { .. } | StatusUpdate::Judging => {
                let tick = self.tick.fetch_add(1, Ordering::Relaxed);
                self.spinning.store(true, Ordering::Relaxed);
                eprint!("\r\x1b[2K  {} {}", spinner_frame(tick), update);
                let _ = std::io::stderr().flush();
            }
            // The affordance lock only matters to interactive front ends
            StatusUpdate::SubmitEnabled(_) => {}
            StatusUpdate::Rejected(_) => {
                self.end_spinner();
                print_warning(&update.to_string());
            }
            StatusUpdate::Failed(_) => {
                self.end_spinner();
                print_error(&update.to_string());
            }
            StatusUpdate::Received(handle) => {
                self.end_spinner();
                print_success(&update.to_string());
                print_key_value("Submission", &handle.submission_id);
            }
            StatusUpdate::Submitting => {
                self.end_spinner();
                eprintln!("{} {}", icon_arrow(), update);
            }
        }
    }

    fn present(&self, _score: &AggregateScore) {
        self.end_spinner();
        print_success("Judging finished");
    }
}

/// Print the per-case table and total
pub fn print_report(score: &AggregateScore) {
    if score.is_empty() {
        println!("No cases available.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Case", "Status", "Time", "Memory", "Message"]);

    for row in case_rows(score) {
        let status_color = if row.ok { Color::Green } else { Color::Red };
        table.add_row(vec![
            Cell::new(&row.label),
            Cell::new(&row.status).fg(status_color),
            Cell::new(&row.time),
            Cell::new(&row.memory),
            Cell::new(row.message_with_extracted()),
        ]);
    }

    println!("{table}");
    println!();

    let color = if score.any_failed {
        colors::RED
    } else {
        colors::GREEN
    };
    print_key_value_colored(
        "Passed",
        &format!("{}/{}", score.passed(), score.len()),
        color,
    );
    println!("  {}", style_bold(&total_line(score)));
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
