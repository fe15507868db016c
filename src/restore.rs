/// Undo engine: restores organized files back to the folder root.
///
/// The inverse of the organize engine. It scans the known category
/// subfolders, moves every file found in them back to the root with a
/// collision suffix distinct from the organize-side one, then prunes any
/// category folder left empty.
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::categories::CategoryTable;
use crate::organizer::{EngineResult, OrganizeError, unique_destination};
use crate::progress::Progress;

/// Statistics of one undo run. `total_files` is the number of files found
/// across all existing category subfolders at scan time.
#[derive(Debug, Default, Serialize)]
pub struct UndoReport {
    pub total_files: usize,
    pub moved_files: usize,
    pub skipped_files: usize,
    pub errors: Vec<String>,
}

impl UndoReport {
    /// True when every file found was restored.
    pub fn is_complete_success(&self) -> bool {
        self.skipped_files == 0
    }
}

/// Restores category subfolder contents to the root folder.
pub struct Restorer {
    table: CategoryTable,
}

impl Restorer {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    /// Moves every file in the existing category subfolders back to `root`.
    ///
    /// Same fatal-error shape as organize when the root is missing. Name
    /// collisions in the root are resolved as `base_restored_N.ext`, so
    /// restored duplicates are distinguishable from organize-time `_N`
    /// duplicates. Per-file failures are recorded and the batch continues.
    ///
    /// After the moves, each category folder that ended up empty is
    /// removed; removal failures (externally added files, permissions) are
    /// swallowed — undo's job is restoring files, not deleting folders.
    pub fn undo(
        &self,
        root: &Path,
        mut progress: Option<&mut dyn Progress>,
    ) -> EngineResult<UndoReport> {
        if !root.is_dir() {
            return Err(OrganizeError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        let batch = self.scan_category_folders(root);

        let mut report = UndoReport {
            total_files: batch.len(),
            ..Default::default()
        };

        for (index, (name, path)) in batch.iter().enumerate() {
            let destination = unique_destination(root, name, "_restored");
            match fs::rename(path, &destination) {
                Ok(()) => report.moved_files += 1,
                Err(e) => {
                    report.errors.push(format!("Error moving {name}: {e}"));
                    report.skipped_files += 1;
                }
            }

            if let Some(p) = progress.as_mut() {
                p.on_file(index + 1, report.total_files, name);
            }
        }

        // Cleanup pass: drop category folders that are now empty. remove_dir
        // refuses non-empty directories, and any failure here is not an
        // error condition.
        for category in self.table.categories() {
            let dir = root.join(category.dir_name());
            if dir.is_dir() {
                let _ = fs::remove_dir(&dir);
            }
        }

        Ok(report)
    }

    /// Collects the regular files directly inside each existing category
    /// folder, in table order, into one ordered batch.
    fn scan_category_folders(&self, root: &Path) -> Vec<(String, PathBuf)> {
        let mut batch = Vec::new();
        for category in self.table.categories() {
            let dir = root.join(category.dir_name());
            if !dir.is_dir() {
                continue;
            }
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
                if is_file {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    batch.push((name, entry.path()));
                }
            }
        }
        batch
    }
}
