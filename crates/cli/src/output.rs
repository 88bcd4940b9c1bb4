//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a ratio in [0, 1] with two decimals
pub fn format_ratio(value: f64) -> String {
    format!("{:.2}", value)
}

/// Color a classification label
pub fn color_classification(high: bool) -> String {
    if high {
        "HIGH".red().bold().to_string()
    } else {
        "normal".green().to_string()
    }
}

/// Color accuracy based on value
pub fn color_accuracy(accuracy: f64) -> String {
    let formatted = format_ratio(accuracy);
    if accuracy >= 0.9 {
        formatted.green().to_string()
    } else if accuracy >= 0.7 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}
