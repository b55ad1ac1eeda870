//! Directory Scanner
//!
//! Walks the component tree with walkdir and reports every directory that
//! qualifies as a component. Qualifying directories are still descended
//! into, so nested components are reported independently of their parent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, FilterEntry, WalkDir};

use crate::error::{OrganizeError, Result};
use crate::models::Component;

/// Documentation file that marks a component directory
pub const DOCUMENTATION_FILE: &str = "README.md";

/// Source file extensions recognized as component code
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "vue", "svelte"];

/// File names containing this marker also qualify their directory
const COMPONENT_FILE_MARKER: &str = "Component";

/// Whether a file name has a recognized source extension
pub fn is_source_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SOURCE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Counters for one pass over the tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    /// Directories inspected
    pub total_dirs: usize,

    /// Directories reported as components
    pub components: usize,

    /// Directories skipped because they could not be read
    pub errors: usize,
}

/// Scanner for a component tree rooted at `root`
#[derive(Debug, Clone)]
pub struct ComponentScanner {
    root: PathBuf,
}

impl ComponentScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a fresh pass over the tree.
    ///
    /// Every call re-reads the disk; nothing is cached between passes.
    /// Fails only when the root itself cannot be read.
    pub fn scan(&self) -> Result<ComponentIter> {
        if !self.root.is_dir() {
            return Err(OrganizeError::Scan {
                path: self.root.clone(),
                message: "path does not exist or is not a directory".to_string(),
            });
        }

        fs::read_dir(&self.root).map_err(|e| OrganizeError::Scan {
            path: self.root.clone(),
            message: e.to_string(),
        })?;

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_directory as fn(&DirEntry) -> bool);

        Ok(ComponentIter {
            root: self.root.clone(),
            walker,
            stats: ScanStats::default(),
        })
    }

    /// Scan the whole tree into a vector
    pub fn scan_all(&self) -> Result<Vec<Component>> {
        let mut iter = self.scan()?;
        let components: Vec<Component> = iter.by_ref().collect();

        tracing::info!(
            root = %self.root.display(),
            dirs = iter.stats().total_dirs,
            components = components.len(),
            skipped = iter.stats().errors,
            "Scanned component tree"
        );

        Ok(components)
    }
}

fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
}

/// Lazy sequence of components produced by one scan
pub struct ComponentIter {
    root: PathBuf,
    walker: FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
    stats: ScanStats,
}

impl ComponentIter {
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }
}

impl Iterator for ComponentIter {
    type Item = Component;

    fn next(&mut self) -> Option<Component> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable directory");
                    self.stats.errors += 1;
                    continue;
                }
            };

            self.stats.total_dirs += 1;

            match inspect_directory(&self.root, entry.path()) {
                Ok(Some(component)) => {
                    self.stats.components += 1;
                    return Some(component);
                }
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable directory");
                    self.stats.errors += 1;
                }
            }
        }
    }
}

/// Decide whether `dir` is a component and describe it
fn inspect_directory(root: &Path, dir: &Path) -> std::result::Result<Option<Component>, String> {
    let entries = fs::read_dir(dir).map_err(|e| format!("Failed to read directory: {}", e))?;

    let mut has_documentation = false;
    let mut has_marker_file = false;
    let mut source_file_names = BTreeSet::new();

    for entry in entries.flatten() {
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name == DOCUMENTATION_FILE {
            has_documentation = true;
        } else if is_source_file(&file_name) {
            source_file_names.insert(file_name.clone());
        }

        if file_name.contains(COMPONENT_FILE_MARKER) {
            has_marker_file = true;
        }
    }

    if !has_documentation && !has_marker_file && source_file_names.is_empty() {
        return Ok(None);
    }

    let relative = dir
        .strip_prefix(root)
        .map_err(|_| format!("{} is outside the scan root", dir.display()))?;
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| format!("Directory has no name: {}", dir.display()))?;

    Ok(Some(Component {
        name,
        current_path: relative.to_path_buf(),
        has_documentation,
        source_file_names,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("Button")).unwrap();
        File::create(root.join("Button/README.md")).unwrap();

        fs::create_dir_all(root.join("feedback/Modal")).unwrap();
        let mut modal = File::create(root.join("feedback/Modal/Modal.tsx")).unwrap();
        modal.write_all(b"export const Modal = () => null;").unwrap();

        // Nested component inside a component
        fs::create_dir_all(root.join("Card/Header")).unwrap();
        File::create(root.join("Card/README.md")).unwrap();
        File::create(root.join("Card/Header/Header.vue")).unwrap();

        // Qualifies by naming convention only
        fs::create_dir_all(root.join("Legacy")).unwrap();
        File::create(root.join("Legacy/OldComponent.txt")).unwrap();

        // Not a component
        fs::create_dir_all(root.join("assets")).unwrap();
        File::create(root.join("assets/logo.png")).unwrap();

        dir
    }

    #[test]
    fn test_scan_finds_components() {
        let temp_dir = create_test_tree();
        let scanner = ComponentScanner::new(temp_dir.path());

        let components = scanner.scan_all().unwrap();
        let paths: Vec<String> = components.iter().map(|c| c.path_key()).collect();

        assert_eq!(
            paths,
            vec!["Button", "Card", "Card/Header", "Legacy", "feedback/Modal"]
        );

        let modal = components.iter().find(|c| c.name == "Modal").unwrap();
        assert!(!modal.has_documentation);
        assert!(modal.source_file_names.contains("Modal.tsx"));

        let button = components.iter().find(|c| c.name == "Button").unwrap();
        assert!(button.has_documentation);
        assert!(button.source_file_names.is_empty());
    }

    #[test]
    fn test_scan_is_restartable() {
        let temp_dir = create_test_tree();
        let scanner = ComponentScanner::new(temp_dir.path());

        let first = scanner.scan_all().unwrap();
        fs::create_dir_all(temp_dir.path().join("Toast")).unwrap();
        File::create(temp_dir.path().join("Toast/Toast.jsx")).unwrap();
        let second = scanner.scan_all().unwrap();

        assert_eq!(second.len(), first.len() + 1);
    }

    #[test]
    fn test_missing_root_is_scan_error() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = ComponentScanner::new(temp_dir.path().join("missing"));

        match scanner.scan() {
            Err(OrganizeError::Scan { .. }) => {}
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected scan error"),
        }
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file("Button.tsx"));
        assert!(is_source_file("Button.VUE"));
        assert!(is_source_file("index.js"));
        assert!(!is_source_file("README.md"));
        assert!(!is_source_file("styles.css"));
        assert!(!is_source_file("Makefile"));
    }
}
