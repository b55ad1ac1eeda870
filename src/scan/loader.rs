//! Content Loader
//!
//! Reads a component's README and recognized source files as classification
//! signal. Reads are best-effort: a file that cannot be read is skipped.

use std::fs;
use std::path::{Path, PathBuf};

use super::scanner::DOCUMENTATION_FILE;
use crate::error::OrganizeError;
use crate::models::{Component, ComponentContent};

/// Per-file size cap applied to loaded text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentBudget {
    /// Full contents (local scoring)
    #[default]
    Unbounded,
    /// At most this many characters per file (advisory requests)
    Chars(usize),
}

impl ContentBudget {
    fn apply(self, text: String) -> String {
        match self {
            ContentBudget::Unbounded => text,
            ContentBudget::Chars(max) => {
                if text.chars().count() <= max {
                    text
                } else {
                    text.chars().take(max).collect()
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
    budget: ContentBudget,
}

impl ContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            budget: ContentBudget::Unbounded,
        }
    }

    pub fn with_budget(mut self, budget: ContentBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Load documentation and source contents for one component
    pub fn load(&self, component: &Component) -> ComponentContent {
        let dir = self.root.join(&component.current_path);
        let mut content = ComponentContent::default();

        if component.has_documentation {
            content.documentation = self.read_text(&dir.join(DOCUMENTATION_FILE));
        }

        for file_name in &component.source_file_names {
            if let Some(text) = self.read_text(&dir.join(file_name)) {
                content.sources.insert(file_name.clone(), text);
            }
        }

        content
    }

    fn read_text(&self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(text) => Some(self.budget.apply(text)),
            Err(e) => {
                let err = OrganizeError::ContentLoad {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                };
                tracing::debug!("{}", err);
                None
            }
        }
    }
}
