//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and the run summary table.

use crate::matcher::MatchType;
use crate::report::Report;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for copy operations
/// - Summary tables for a patch run
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bezel_patcher::output::OutputFormatter;
    /// OutputFormatter::success("Patched config directory");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a warning message to stderr, keeping stdout free for
    /// machine-readable output.
    pub fn warning_stderr(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a regular message to stderr.
    pub fn plain_stderr(message: &str) {
        eprintln!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for copying config files.
    ///
    /// The length is set by the patcher once the matches are known.
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a summary table of a patch run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bezel_patcher::output::OutputFormatter;
    /// use bezel_patcher::report::Report;
    ///
    /// fn show(report: &Report) {
    ///     OutputFormatter::summary_table(report);
    /// }
    /// ```
    pub fn summary_table(report: &Report) {
        Self::header("SUMMARY");

        let rows = [
            ("Config files", report.config_count.to_string()),
            ("ROMs", report.rom_count.to_string()),
            ("Missing ROMs", report.configs_without_rom.len().to_string()),
            ("Missing config", report.roms_without_config.len().to_string()),
        ];
        let width = rows
            .iter()
            .map(|(label, _)| label.len())
            .chain(MatchType::TIERS.iter().map(|tier| tier_label(*tier).len()))
            .max()
            .unwrap_or(0);

        for (label, value) in &rows {
            println!("{:<width$} | {}", label, value, width = width);
        }
        println!("{}", "-".repeat(width + 10));

        for tier in &report.tiers {
            let count = tier.files.len().to_string();
            let count = if tier.skipped {
                format!("{} {}", count.yellow(), "(skipped)".yellow())
            } else {
                count.green().to_string()
            };
            println!(
                "{:<width$} | {}",
                tier_label(tier.match_type),
                count,
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        let created_word = if report.dry_run { "To create" } else { "Created" };
        println!(
            "{:<width$} | {}",
            created_word.bold(),
            report.created_count().to_string().green().bold(),
            width = width
        );
        println!(
            "{:<width$} | {}",
            "Skipped".bold(),
            report.skipped_count().to_string().yellow(),
            width = width
        );
        if !report.failed_copies.is_empty() {
            println!(
                "{:<width$} | {}",
                "Failed".bold(),
                report.failed_copies.len().to_string().red(),
                width = width
            );
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn tier_label(match_type: MatchType) -> &'static str {
    match match_type {
        MatchType::Exact => "Exact matches",
        MatchType::Alternate => "Good matches",
        MatchType::Fuzzy => "Fuzzy matches",
        MatchType::None => "No match",
    }
}
