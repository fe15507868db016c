/// File categorization by extension.
///
/// This module provides the fixed table that maps file extensions to broad
/// categories (Images, Documents, ...) and the classification function the
/// organize, undo, and preview engines share.
///
/// # Examples
///
/// ```
/// use sortdir::categories::{Category, CategoryTable};
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify(".png"), Category::Images);
/// assert_eq!(table.classify(".PDF"), Category::Documents);
/// assert_eq!(table.classify(".xyz"), Category::Others);
/// ```
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// A named bucket that files are sorted into.
///
/// Variant order is the table's lookup order and the order category folders
/// are scanned during undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Images,
    Documents,
    Videos,
    Audio,
    Archives,
    Programs,
    Executables,
    /// Catch-all for unrecognized or missing extensions.
    Others,
}

impl Category {
    /// Every category, in table order.
    pub const ALL: [Category; 8] = [
        Category::Images,
        Category::Documents,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Programs,
        Category::Executables,
        Category::Others,
    ];

    /// Returns the subfolder name for this category.
    ///
    /// Category folders live directly under the organized root and are named
    /// exactly like this.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Programs => "Programs",
            Category::Executables => "Executables",
            Category::Others => "Others",
        }
    }

    /// Parses a category from its folder name.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.dir_name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Returned by [`CategoryTable::add_extension`] when an extension is already
/// claimed by a different category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConflict {
    pub extension: String,
    pub existing: Category,
    pub requested: Category,
}

impl fmt::Display for ExtensionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extension '{}' already belongs to {}, cannot assign it to {}",
            self.extension, self.existing, self.requested
        )
    }
}

impl std::error::Error for ExtensionConflict {}

/// The ordered extension→category mapping.
///
/// Built once at startup and passed by reference into the engines; nothing
/// writes to it afterwards. Extension sets are disjoint: [`classify`] scans
/// the table in order and the first category whose set contains the
/// extension wins, so the function is total and unambiguous.
///
/// [`classify`]: CategoryTable::classify
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<(Category, HashSet<String>)>,
}

impl CategoryTable {
    /// Creates the built-in table.
    pub fn new() -> Self {
        let builtin: [(Category, &[&str]); 8] = [
            (
                Category::Images,
                &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".ico", ".webp"],
            ),
            (
                Category::Documents,
                &[
                    ".pdf", ".doc", ".docx", ".txt", ".xls", ".xlsx", ".ppt", ".pptx", ".odt",
                    ".csv",
                ],
            ),
            (
                Category::Videos,
                &[".mp4", ".mkv", ".flv", ".avi", ".mov", ".wmv", ".webm"],
            ),
            (
                Category::Audio,
                &[".mp3", ".wav", ".aac", ".flac", ".m4a", ".wma"],
            ),
            (
                Category::Archives,
                &[".zip", ".rar", ".tar", ".gz", ".7z", ".bz2"],
            ),
            (
                Category::Programs,
                &[
                    ".py", ".c", ".cpp", ".java", ".html", ".css", ".js", ".php", ".json", ".xml",
                ],
            ),
            (
                Category::Executables,
                &[".exe", ".msi", ".apk", ".app", ".bat", ".sh"],
            ),
            // Others has an empty set and serves as the fallback.
            (Category::Others, &[]),
        ];

        let entries = builtin
            .into_iter()
            .map(|(category, extensions)| {
                (category, extensions.iter().map(|e| e.to_string()).collect())
            })
            .collect();

        Self { entries }
    }

    /// Maps an extension (leading dot included, or empty for none) to its
    /// category. Case-insensitive; unknown extensions fall back to
    /// [`Category::Others`].
    pub fn classify(&self, extension: &str) -> Category {
        let extension = extension.to_lowercase();
        for (category, extensions) in &self.entries {
            if extensions.contains(&extension) {
                return *category;
            }
        }
        Category::Others
    }

    /// Classifies a file by name, using only its final extension.
    pub fn classify_name(&self, file_name: &str) -> Category {
        self.classify(&extension_of(file_name))
    }

    /// Assigns an extra extension to a category.
    ///
    /// The extension is lowercased and a leading dot is added if missing.
    /// Fails if the extension is already mapped to a different category,
    /// which would break the disjointness the classifier relies on.
    pub fn add_extension(
        &mut self,
        category: Category,
        extension: &str,
    ) -> Result<(), ExtensionConflict> {
        let extension = normalize_extension(extension);
        let existing = self.classify(&extension);
        if existing != Category::Others && existing != category {
            return Err(ExtensionConflict {
                extension,
                existing,
                requested: category,
            });
        }
        for (entry, extensions) in &mut self.entries {
            if *entry == category {
                extensions.insert(extension);
                break;
            }
        }
        Ok(())
    }

    /// All categories, in table order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(category, _)| *category)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the final extension of a file name, lowercased and with its
/// leading dot, or an empty string when there is none.
///
/// Only the last dot-delimited suffix counts (`archive.tar.gz` → `.gz`), and
/// a lone leading dot is not an extension (`.bashrc` → `""`).
pub fn extension_of(file_name: &str) -> String {
    match Path::new(file_name).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
        None => String::new(),
    }
}

fn normalize_extension(extension: &str) -> String {
    let extension = extension.to_lowercase();
    if extension.starts_with('.') {
        extension
    } else {
        format!(".{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_names() {
        assert_eq!(Category::Images.dir_name(), "Images");
        assert_eq!(Category::Documents.dir_name(), "Documents");
        assert_eq!(Category::Videos.dir_name(), "Videos");
        assert_eq!(Category::Audio.dir_name(), "Audio");
        assert_eq!(Category::Archives.dir_name(), "Archives");
        assert_eq!(Category::Programs.dir_name(), "Programs");
        assert_eq!(Category::Executables.dir_name(), "Executables");
        assert_eq!(Category::Others.dir_name(), "Others");
    }

    #[test]
    fn test_from_name_round_trips() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.dir_name()), Some(category));
        }
        assert_eq!(Category::from_name("Fonts"), None);
    }

    #[test]
    fn test_classify_known_extensions() {
        let table = CategoryTable::new();
        assert_eq!(table.classify(".png"), Category::Images);
        assert_eq!(table.classify(".pdf"), Category::Documents);
        assert_eq!(table.classify(".mkv"), Category::Videos);
        assert_eq!(table.classify(".flac"), Category::Audio);
        assert_eq!(table.classify(".7z"), Category::Archives);
        assert_eq!(table.classify(".py"), Category::Programs);
        assert_eq!(table.classify(".apk"), Category::Executables);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let table = CategoryTable::new();
        assert_eq!(table.classify(".JPG"), table.classify(".jpg"));
        assert_eq!(table.classify(".Pdf"), Category::Documents);
    }

    #[test]
    fn test_classify_falls_back_to_others() {
        let table = CategoryTable::new();
        assert_eq!(table.classify(".xyz"), Category::Others);
        assert_eq!(table.classify(""), Category::Others);
    }

    #[test]
    fn test_classify_name_uses_final_extension() {
        let table = CategoryTable::new();
        // .gz is in Archives, so the .tar.gz file lands there
        assert_eq!(table.classify_name("archive.tar.gz"), Category::Archives);
        assert_eq!(table.classify_name("notes"), Category::Others);
        assert_eq!(table.classify_name("photo.png"), Category::Images);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.PNG"), ".png");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("notes"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("report.final.pdf"), ".pdf");
    }

    #[test]
    fn test_add_extension() {
        let mut table = CategoryTable::new();
        table.add_extension(Category::Images, ".heic").unwrap();
        assert_eq!(table.classify(".heic"), Category::Images);
        // dot is optional, case is normalized
        table.add_extension(Category::Images, "TIFF").unwrap();
        assert_eq!(table.classify(".tiff"), Category::Images);
    }

    #[test]
    fn test_add_extension_rejects_conflicts() {
        let mut table = CategoryTable::new();
        let err = table.add_extension(Category::Images, ".pdf").unwrap_err();
        assert_eq!(err.existing, Category::Documents);
        assert_eq!(err.requested, Category::Images);
        // re-adding to the same category is fine
        assert!(table.add_extension(Category::Documents, ".pdf").is_ok());
    }

    #[test]
    fn test_categories_in_table_order() {
        let table = CategoryTable::new();
        let order: Vec<Category> = table.categories().collect();
        assert_eq!(order, Category::ALL);
    }
}
