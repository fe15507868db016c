//! Terminal output: styling, the progress bar, and report rendering.
//!
//! Everything the binary prints goes through this module, so the engines
//! stay free of presentation concerns.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

use crate::categories::Category;
use crate::organizer::PreviewReport;

/// Consistent styling for all CLI messages.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Green checkmark line.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Red cross line, to stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Yellow warning line.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Cyan informational line.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{message}");
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the per-category move counts followed by a total row.
    pub fn summary_table(categories: &BTreeMap<Category, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = categories
            .keys()
            .map(|c| c.dir_name().len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!("{:<width$} | {}", "Category".bold(), "Files".bold());
        println!("{}", "-".repeat(width + 10));
        for (category, count) in categories {
            let unit = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                unit
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" }
        );
    }

    /// Prints the preview plan, grouped by category.
    pub fn preview_listing(preview: &PreviewReport) {
        for (category, files) in &preview.by_category {
            let unit = if files.len() == 1 { "file" } else { "files" };
            Self::header(&format!("{} ({} {})", category.dir_name(), files.len(), unit));
            for file in files {
                println!("  • {file}");
            }
        }
    }

    /// Prints the per-file error messages collected during a run.
    pub fn error_list(errors: &[String]) {
        if errors.is_empty() {
            return;
        }
        Self::header("ERRORS");
        for error in errors {
            Self::warning(error);
        }
    }

    /// Progress bar for a batch of file moves.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }
}

/// Prints a machine-readable report envelope on stdout.
pub fn emit_json<T: serde::Serialize>(operation: &str, report: &T) {
    let envelope = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "operation": operation,
        "report": report,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).expect("report serialization")
    );
}

/// An `indicatif` bar driven through the engines' progress seam.
///
/// The engines accept any [`Progress`] sink; the CLI feeds this bar from a
/// closure (`|c, t, n| bar.update(c, t, n)`). The bar itself is created
/// lazily on the first update, when the batch size is known, and
/// [`finish`](BarProgress::finish) clears it.
///
/// [`Progress`]: crate::progress::Progress
#[derive(Default)]
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, current: usize, total: usize, file_name: &str) {
        let bar = self
            .bar
            .get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64));
        bar.set_position(current as u64);
        bar.set_message(file_name.to_string());
    }

    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
