/// Organize engine: moves a folder's files into category subfolders.
///
/// The engine lists the regular files directly under a root folder
/// (non-recursive), classifies each by extension, creates only the category
/// subfolders the batch actually needs, and moves every file with
/// collision-safe renaming. A single file's failure is recorded in the
/// report and never aborts the batch. [`Organizer::preview`] is the
/// read-only variant that computes the same assignment without moving
/// anything.
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::categories::{Category, CategoryTable};
use crate::config::CompiledFilters;
use crate::progress::Progress;

/// Fatal precondition failures. Anything that goes wrong after the scan is
/// per-file and lands in the report's `errors` instead.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root folder does not exist (or is not a directory).
    RootNotFound { path: PathBuf },
    /// The root folder exists but its listing failed.
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Folder not found: {}", path.display())
            }
            Self::RootUnreadable { path, source } => {
                write!(f, "Cannot read folder {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RootNotFound { .. } => None,
            Self::RootUnreadable { source, .. } => Some(source),
        }
    }
}

/// Result type shared by the organize, undo, and preview engines.
pub type EngineResult<T> = Result<T, OrganizeError>;

/// Statistics of one organize run.
///
/// `moved_files + skipped_files == total_files` once the run completes.
/// `categories` holds an entry only for categories that received at least
/// one file.
#[derive(Debug, Default, Serialize)]
pub struct OrganizeReport {
    pub total_files: usize,
    pub moved_files: usize,
    pub skipped_files: usize,
    pub categories: BTreeMap<Category, usize>,
    pub errors: Vec<String>,
}

/// The planned assignment computed by [`Organizer::preview`]: category →
/// filenames in first-seen order.
#[derive(Debug, Default, Serialize)]
pub struct PreviewReport {
    pub by_category: BTreeMap<Category, Vec<String>>,
}

impl PreviewReport {
    pub fn total_files(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

/// A candidate file observed directly under the root.
struct Candidate {
    name: String,
    path: PathBuf,
    category: Category,
}

/// Classifies and relocates files under a root folder.
pub struct Organizer {
    table: CategoryTable,
    filters: CompiledFilters,
}

impl Organizer {
    /// Creates an organizer over the given table with no exclusion filters.
    pub fn new(table: CategoryTable) -> Self {
        Self {
            table,
            filters: CompiledFilters::default(),
        }
    }

    /// Creates an organizer that skips files matched by `filters`.
    pub fn with_filters(table: CategoryTable, filters: CompiledFilters) -> Self {
        Self { table, filters }
    }

    /// Moves every candidate file under `root` into its category subfolder.
    ///
    /// Fails fast with [`OrganizeError::RootNotFound`] before any mutation
    /// if the root is missing; callers must branch on that before reading
    /// counters. Per-file failures are collected as
    /// `"Error moving {filename}: {detail}"` and counted as skipped.
    ///
    /// `progress`, if supplied, is invoked after each file is processed.
    /// Running organize again on an already-organized folder is a no-op for
    /// the files already moved: they are no longer direct children of the
    /// root.
    pub fn organize(
        &self,
        root: &Path,
        mut progress: Option<&mut dyn Progress>,
    ) -> EngineResult<OrganizeReport> {
        let candidates = self.scan(root)?;

        let mut report = OrganizeReport {
            total_files: candidates.len(),
            ..Default::default()
        };

        // Create only the subfolders this batch needs; a category with no
        // matching files never clutters the root with an empty directory.
        let needed: BTreeSet<Category> = candidates.iter().map(|c| c.category).collect();
        let mut dir_errors: HashMap<Category, String> = HashMap::new();
        for category in needed {
            let dir = root.join(category.dir_name());
            if !dir.exists()
                && let Err(e) = fs::create_dir(&dir)
            {
                dir_errors.insert(category, e.to_string());
            }
        }

        for (index, candidate) in candidates.iter().enumerate() {
            if let Some(detail) = dir_errors.get(&candidate.category) {
                report
                    .errors
                    .push(format!("Error moving {}: {}", candidate.name, detail));
                report.skipped_files += 1;
            } else {
                let dest_dir = root.join(candidate.category.dir_name());
                let destination = unique_destination(&dest_dir, &candidate.name, "");
                match fs::rename(&candidate.path, &destination) {
                    Ok(()) => {
                        report.moved_files += 1;
                        *report.categories.entry(candidate.category).or_insert(0) += 1;
                    }
                    Err(e) => {
                        report
                            .errors
                            .push(format!("Error moving {}: {}", candidate.name, e));
                        report.skipped_files += 1;
                    }
                }
            }

            if let Some(p) = progress.as_mut() {
                p.on_file(index + 1, report.total_files, &candidate.name);
            }
        }

        Ok(report)
    }

    /// Computes the category assignment without moving anything.
    ///
    /// Enumerates and classifies exactly as [`organize`](Self::organize)
    /// would, so the preview is the plan a subsequent organize run commits.
    pub fn preview(&self, root: &Path) -> EngineResult<PreviewReport> {
        let candidates = self.scan(root)?;

        let mut report = PreviewReport::default();
        for candidate in candidates {
            report
                .by_category
                .entry(candidate.category)
                .or_default()
                .push(candidate.name);
        }
        Ok(report)
    }

    /// Lists and classifies the regular files directly under `root`, in
    /// directory-listing order. Directories (including existing category
    /// folders) are excluded.
    fn scan(&self, root: &Path) -> EngineResult<Vec<Candidate>> {
        if !root.is_dir() {
            return Err(OrganizeError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        let entries = fs::read_dir(root).map_err(|e| OrganizeError::RootUnreadable {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut candidates = Vec::new();
        for entry in entries.flatten() {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            let path = entry.path();
            if !self.filters.should_include(&path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let category = self.table.classify_name(&name);
            candidates.push(Candidate {
                name,
                path,
                category,
            });
        }
        Ok(candidates)
    }
}

/// Picks a destination path inside `dir` that does not collide with an
/// existing file.
///
/// The plain filename is used when free; otherwise the name is rewritten as
/// `base{tag}_N.ext` for increasing `N` starting at 1, checking existence at
/// each step. The organize side uses an empty tag (`a_1.txt`), undo uses
/// `"_restored"` (`a_restored_1.txt`) so restored duplicates stay
/// distinguishable. Nothing ever overwrites an existing file.
pub(crate) fn unique_destination(dir: &Path, file_name: &str, tag: &str) -> PathBuf {
    let plain = dir.join(file_name);
    if !plain.exists() {
        return plain;
    }

    let (base, ext) = split_file_name(file_name);
    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{base}{tag}_{counter}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Splits a filename at its final dot: `("archive.tar", ".gz")`,
/// `("notes", "")`, `(".bashrc", "")`.
fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) if index > 0 => file_name.split_at(index),
        _ => (file_name, ""),
    }
}
