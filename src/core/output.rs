//! Unified output formatting utilities for consistent CLI presentation.
//!
//! # Design Principles
//! - **Consistent color scheme**: Red for errors, green for success, bright_black for details
//! - **Standardized spacing**: Newline before and after all command outputs

use colored::*;
use std::path::Path;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
///
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a section header with consistent styling
///
/// # Format
/// ```text
///
/// <header>:
///
/// ```
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// Formats one saved file line; the focused file is marked with `*`.
pub fn format_saved_file(index: usize, path: &Path, focused: bool) -> String {
    let marker = if focused {
        "*".green().to_string()
    } else {
        " ".to_string()
    };
    format!(
        "  {}{} {}",
        marker,
        format!("[{index}]").bright_black(),
        path.display().to_string().white()
    )
}
