//! Terminal report rendering for the batch tools.
//!
//! Every tool prints a structured summary through these helpers; validators
//! finish with a box-drawn pass/fail banner.

use colored::Colorize;
use std::env;

const MIN_BANNER_WIDTH: usize = 40;
const MAX_BANNER_WIDTH: usize = 52;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Banner {
    Pass,
    Fail,
    Warning,
    Info,
}

fn banner_width() -> usize {
    env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(80usize)
        .clamp(MIN_BANNER_WIDTH, MAX_BANNER_WIDTH)
}

fn banner_row(content: &str, width: usize) -> String {
    let len = content.chars().count();
    let padding = width.saturating_sub(2).saturating_sub(len);
    let left = padding / 2;
    let right = padding - left;
    format!("║{}{}{}║", " ".repeat(left), content, " ".repeat(right))
}

/// Final pass/fail banner.
pub fn render_banner(title: &str, style: Banner) {
    let width = banner_width();
    let top = format!("╔{}╗", "═".repeat(width - 2));
    let bottom = format!("╚{}╝", "═".repeat(width - 2));
    let row = banner_row(title, width);
    match style {
        Banner::Pass => {
            println!("{}", top.bright_green());
            println!("{}", row.bright_green().bold());
            println!("{}", bottom.bright_green());
        }
        Banner::Fail => {
            println!("{}", top.bright_red());
            println!("{}", row.bright_red().bold());
            println!("{}", bottom.bright_red());
        }
        Banner::Warning => {
            println!("{}", top.bright_yellow());
            println!("{}", row.bright_yellow().bold());
            println!("{}", bottom.bright_yellow());
        }
        Banner::Info => {
            println!("{}", top.bright_cyan());
            println!("{}", row.bright_cyan().bold());
            println!("{}", bottom.bright_cyan());
        }
    }
}

pub fn heading(text: &str) {
    println!();
    println!("{}", text.bright_white().bold());
}

pub fn ok(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

pub fn error(message: &str) {
    println!("  {} {}", "✗".bright_red(), message);
}

pub fn warn(message: &str) {
    println!("  {} {}", "⚠".bright_yellow(), message);
}

pub fn step(message: &str) {
    println!("  {} {}", "▸".bright_cyan(), message);
}

pub fn detail(message: &str) {
    println!("    {} {}", "●".bright_black(), message.bright_black());
}

/// Collapse whitespace and bound length so issue lines stay on one row.
pub fn compact(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let preview: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", preview)
}
