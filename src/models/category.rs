//! Component categories
//!
//! Built-in categories form a closed set with a fixed precedence order. The
//! advisory system may introduce further keys, which land in `Extension` and
//! sort after every built-in (lexicographically among themselves), so both
//! tie-breaking and rendering stay deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Ui,
    DataDisplay,
    Feedback,
    Navigation,
    Layout,
    /// Category key introduced by an external plan
    Extension(String),
}

impl Category {
    /// Built-in categories in precedence order
    pub const BUILTIN: [Category; 5] = [
        Category::Ui,
        Category::DataDisplay,
        Category::Feedback,
        Category::Navigation,
        Category::Layout,
    ];

    /// Fallback when no category clears the score floor
    pub const DEFAULT: Category = Category::Ui;

    /// Directory name and plan key
    pub fn key(&self) -> &str {
        match self {
            Self::Ui => "UI",
            Self::DataDisplay => "data-display",
            Self::Feedback => "feedback",
            Self::Navigation => "navigation",
            Self::Layout => "layout",
            Self::Extension(key) => key,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Ui => "UI Components",
            Self::DataDisplay => "Data Display Components",
            Self::Feedback => "Feedback Components",
            Self::Navigation => "Navigation Components",
            Self::Layout => "Layout Components",
            Self::Extension(key) => key,
        }
    }

    pub fn description(&self) -> Option<&'static str> {
        match self {
            Self::Ui => Some(
                "General purpose components that don't fit neatly into other categories. These include basic form elements and input controls.",
            ),
            Self::DataDisplay => Some(
                "Components for presenting data to the user, such as tables, lists, and navigation controls.",
            ),
            Self::Feedback => Some(
                "Components that provide feedback to the user, including buttons, modals, progress indicators, and tooltips.",
            ),
            Self::Navigation => Some(
                "Components that aid in navigation within the application, such as navigation bars and sidebars.",
            ),
            Self::Layout => Some(
                "Components for structuring and organizing page layout, such as containers, grids, and sections.",
            ),
            Self::Extension(_) => None,
        }
    }

    /// Resolve a plan key. Built-in keys and labels match case-insensitively;
    /// anything else becomes an extension category.
    pub fn from_key(key: &str) -> Self {
        let trimmed = key.trim();
        Self::BUILTIN
            .iter()
            .find(|c| {
                c.key().eq_ignore_ascii_case(trimmed) || c.label().eq_ignore_ascii_case(trimmed)
            })
            .cloned()
            .unwrap_or_else(|| Self::Extension(trimmed.to_string()))
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Extension(_))
    }
}

impl From<String> for Category {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.key().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
