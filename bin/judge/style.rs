//! Terminal styling for judge output
//!
//! Everything except the verdict lines goes to stderr so stdout can carry
//! JSON.

/// ANSI color codes
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

use colors::*;

/// Wrap `s` in `code` and a reset
pub fn paint(code: &str, s: &str) -> String {
    format!("{}{}{}", code, s, RESET)
}

pub fn style_bold(s: &str) -> String {
    paint(BOLD, s)
}

pub fn style_dim(s: &str) -> String {
    paint(DIM, s)
}

pub fn style_cyan(s: &str) -> String {
    paint(CYAN, s)
}

pub fn icon_arrow() -> String {
    paint(CYAN, "→")
}

pub fn print_success(msg: &str) {
    eprintln!("{} {}", paint(GREEN, "✓"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", paint(RED, "✗"), paint(RED, msg));
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", paint(YELLOW, "⚠"), paint(YELLOW, msg));
}

pub fn print_info(msg: &str) {
    eprintln!("{} {}", paint(BLUE, "ℹ"), msg);
}

pub fn print_header(title: &str) {
    let rule = "─".repeat(50usize.saturating_sub(title.chars().count()));
    eprintln!();
    eprintln!("{}", paint(&format!("{}{}", BOLD, CYAN), &format!(" {} {}", title, rule)));
    eprintln!();
}

pub fn print_key_value(key: &str, value: &str) {
    eprintln!("  {} {}", paint(GRAY, &format!("{}:", key)), value);
}

/// Verdict line on stdout
pub fn print_key_value_colored(key: &str, value: &str, color: &str) {
    println!("  {} {}", paint(GRAY, &format!("{}:", key)), paint(color, value));
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}
