//! Built-in scoring rules, one entry per category in precedence order.

use crate::models::Category;

/// Name and keyword signals for one category
#[derive(Debug, Clone)]
pub struct CategoryRules {
    pub category: Category,
    /// Substrings matched against the lowercased component name
    pub patterns: &'static [&'static str],
    /// Substrings matched against lowercased source and README text
    pub keywords: &'static [&'static str],
}

/// Weight per name pattern hit
pub const NAME_PATTERN_WEIGHT: u32 = 10;

/// Weight per keyword found anywhere in the source files
pub const SOURCE_KEYWORD_WEIGHT: u32 = 5;

/// Weight per keyword found in the README
pub const DOC_KEYWORD_WEIGHT: u32 = 3;

/// The best total must exceed this or the default category is used
pub const SCORE_FLOOR: u32 = 5;

pub fn builtin_rules() -> Vec<CategoryRules> {
    vec![
        CategoryRules {
            category: Category::Ui,
            patterns: &["input", "checkbox", "radio", "select", "textarea", "switch", "slider"],
            keywords: &["form", "input", "control", "field", "element"],
        },
        CategoryRules {
            category: Category::DataDisplay,
            patterns: &["table", "list", "grid", "card", "pagination", "tabs", "dropdown", "tree"],
            keywords: &["data", "display", "list", "table", "grid", "pagination"],
        },
        CategoryRules {
            category: Category::Feedback,
            patterns: &[
                "button",
                "modal",
                "toast",
                "notification",
                "alert",
                "progress",
                "tooltip",
                "spinner",
            ],
            keywords: &["feedback", "interaction", "action", "progress", "notification"],
        },
        CategoryRules {
            category: Category::Navigation,
            patterns: &["navbar", "sidebar", "breadcrumb", "menu", "tabs", "pagination"],
            keywords: &["navigation", "menu", "nav", "sidebar", "breadcrumb"],
        },
        CategoryRules {
            category: Category::Layout,
            patterns: &["container", "grid", "flexbox", "header", "footer", "section"],
            keywords: &["layout", "container", "grid", "structure"],
        },
    ]
}
