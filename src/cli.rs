//! Command-line interface: argument parsing and orchestration.
//!
//! Wires configuration into the engines and renders their reports through
//! the output module. The engines themselves never print.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::organizer::Organizer;
use crate::output::{BarProgress, OutputFormatter, emit_json};
use crate::restore::Restorer;

/// Sort a folder's files into category subfolders by extension.
#[derive(Debug, Parser)]
#[command(name = "sortdir", version, about)]
pub struct Cli {
    /// Folder to organize
    pub dir: PathBuf,

    /// Move previously organized files back to the folder root
    #[arg(long, conflicts_with = "preview")]
    pub undo: bool,

    /// Show where files would go without moving anything
    #[arg(long)]
    pub preview: bool,

    /// Path to a configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Runs the selected operation and renders its result.
pub fn run(cli: Cli) -> Result<(), String> {
    let config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let table = config.category_table().map_err(|e| e.to_string())?;
    let filters = config.filters().map_err(|e| e.to_string())?;

    if cli.undo {
        run_undo(&Restorer::new(table), &cli.dir, cli.json)
    } else if cli.preview {
        run_preview(&Organizer::with_filters(table, filters), &cli.dir, cli.json)
    } else {
        run_organize(&Organizer::with_filters(table, filters), &cli.dir, cli.json)
    }
}

fn run_organize(organizer: &Organizer, dir: &Path, json: bool) -> Result<(), String> {
    if json {
        let report = organizer.organize(dir, None).map_err(|e| e.to_string())?;
        emit_json("organize", &report);
        return Ok(());
    }

    OutputFormatter::info(&format!("Organizing contents of: {}", dir.display()));

    let mut bar = BarProgress::new();
    let mut sink = |current: usize, total: usize, name: &str| bar.update(current, total, name);
    let result = organizer.organize(dir, Some(&mut sink));
    bar.finish();
    let report = result.map_err(|e| e.to_string())?;

    if report.total_files == 0 {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    OutputFormatter::success(&format!(
        "Moved {} of {} files ({} skipped)",
        report.moved_files, report.total_files, report.skipped_files
    ));
    OutputFormatter::summary_table(&report.categories, report.total_files);
    OutputFormatter::error_list(&report.errors);
    Ok(())
}

fn run_undo(restorer: &Restorer, dir: &Path, json: bool) -> Result<(), String> {
    if json {
        let report = restorer.undo(dir, None).map_err(|e| e.to_string())?;
        emit_json("undo", &report);
        return Ok(());
    }

    OutputFormatter::info("Restoring files to the folder root...");

    let mut bar = BarProgress::new();
    let mut sink = |current: usize, total: usize, name: &str| bar.update(current, total, name);
    let result = restorer.undo(dir, Some(&mut sink));
    bar.finish();
    let report = result.map_err(|e| e.to_string())?;

    if report.total_files == 0 {
        OutputFormatter::plain("No organized files found to restore.");
        return Ok(());
    }

    OutputFormatter::success(&format!(
        "Restored {} of {} files ({} skipped)",
        report.moved_files, report.total_files, report.skipped_files
    ));
    OutputFormatter::error_list(&report.errors);
    Ok(())
}

fn run_preview(organizer: &Organizer, dir: &Path, json: bool) -> Result<(), String> {
    if json {
        let preview = organizer.preview(dir).map_err(|e| e.to_string())?;
        emit_json("preview", &preview);
        return Ok(());
    }

    OutputFormatter::info(&format!("Analyzing contents of: {}", dir.display()));

    let preview = organizer.preview(dir).map_err(|e| e.to_string())?;
    if preview.is_empty() {
        OutputFormatter::warning("No files found in this folder.");
        return Ok(());
    }

    OutputFormatter::success(&format!("Found {} files", preview.total_files()));
    OutputFormatter::preview_listing(&preview);
    OutputFormatter::plain("\nNo files were moved. Run without --preview to organize.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_organize_then_undo() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("photo.png"), b"img").unwrap();

        let organize = Cli {
            dir: temp.path().to_path_buf(),
            undo: false,
            preview: false,
            config: None,
            json: true,
        };
        run(organize).expect("organize should succeed");
        assert!(temp.path().join("Images/photo.png").exists());

        let undo = Cli {
            dir: temp.path().to_path_buf(),
            undo: true,
            preview: false,
            config: None,
            json: true,
        };
        run(undo).expect("undo should succeed");
        assert!(temp.path().join("photo.png").exists());
        assert!(!temp.path().join("Images").exists());
    }

    #[test]
    fn test_run_missing_folder_fails() {
        let cli = Cli {
            dir: "/no/such/folder".into(),
            undo: false,
            preview: false,
            config: None,
            json: false,
        };
        let err = run(cli).expect_err("missing folder must fail");
        assert!(err.contains("Folder not found"));
    }
}
