use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A directory representing one reusable component.
///
/// Identity is the path relative to the component tree root. Moving a
/// component changes its identity, so later lookups must go by name or a
/// fresh scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Directory name
    pub name: String,

    /// Path relative to the component tree root
    pub current_path: PathBuf,

    /// Whether the directory has its own README.md
    pub has_documentation: bool,

    /// Recognized source files directly inside the directory
    pub source_file_names: BTreeSet<String>,
}

impl Component {
    /// Category directory the component currently lives under, if any.
    ///
    /// Only components at least two levels deep have one; a component sitting
    /// directly under the root is uncategorized.
    pub fn current_category_dir(&self) -> Option<String> {
        let mut segments = self.current_path.components();
        let first = segments.next()?;
        segments.next()?;
        Some(first.as_os_str().to_string_lossy().to_string())
    }

    /// Nesting depth below the root (1 = direct child)
    pub fn depth(&self) -> usize {
        self.current_path.components().count()
    }

    /// Forward-slash form of the relative path, used in plans and links
    pub fn path_key(&self) -> String {
        path_key(&self.current_path)
    }
}

/// Forward-slash rendering of a relative path
pub fn path_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Classification signal loaded for one component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentContent {
    /// README.md text
    pub documentation: Option<String>,

    /// Source file name -> contents
    pub sources: BTreeMap<String, String>,
}

impl ComponentContent {
    /// All source contents joined with spaces, in file name order
    pub fn concatenated_sources(&self) -> String {
        self.sources
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(path: &str) -> Component {
        let current_path = PathBuf::from(path);
        Component {
            name: current_path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .to_string(),
            current_path,
            has_documentation: true,
            source_file_names: BTreeSet::new(),
        }
    }

    #[test]
    fn test_current_category_dir() {
        assert_eq!(component("Button").current_category_dir(), None);
        assert_eq!(
            component("feedback/Button").current_category_dir(),
            Some("feedback".to_string())
        );
        assert_eq!(
            component("data-display/Card/Header").current_category_dir(),
            Some("data-display".to_string())
        );
    }

    #[test]
    fn test_path_key_and_depth() {
        let c = component("layout/Grid/Cell");
        assert_eq!(c.path_key(), "layout/Grid/Cell");
        assert_eq!(c.depth(), 3);
    }
}
