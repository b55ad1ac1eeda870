//! Document Generator
//!
//! Renders the components README from a table of contents. Output depends
//! only on the model passed in, so an unchanged layout regenerates
//! byte-identical text.

use std::path::{Path, PathBuf};

use super::write_atomic;
use crate::error::OrganizeError;
use crate::models::{Category, TableOfContents};
use crate::scan::DOCUMENTATION_FILE;

/// Navigation document name, relative to the component root
pub const NAVIGATION_FILE: &str = "README.md";

const TITLE: &str = "# Components Store";
const INTRO: &str = "This directory contains reusable components organized by folders. Use the links below to navigate to each component's documentation.";

/// Render the navigation document
pub fn render(toc: &TableOfContents) -> String {
    let mut lines: Vec<String> = vec![
        TITLE.to_string(),
        String::new(),
        INTRO.to_string(),
        String::new(),
        "## Table of Contents".to_string(),
        String::new(),
    ];

    if toc.is_empty() {
        lines.push("_No components found._".to_string());
        lines.push(String::new());
    }

    for (category, entries) in toc.sections() {
        lines.push(format!("- **{}**", category.label()));
        for entry in entries {
            lines.push(format!(
                "  - [{}](./{}/{})",
                entry.name,
                link_path(&entry.path),
                DOCUMENTATION_FILE
            ));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Component Categories".to_string());
    lines.push(String::new());
    for category in Category::BUILTIN.iter() {
        if let Some(description) = category.description() {
            lines.push(format!("### {}", category.label()));
            lines.push(description.to_string());
            lines.push(String::new());
        }
    }

    lines.extend(
        [
            "---",
            "",
            "To update this table of contents automatically, run:",
            "",
            "```bash",
            "ORGANIZE_MODE=toc-only organize-components",
            "```",
            "",
            "To organize components into categories and update the table of contents, run:",
            "",
            "```bash",
            "organize-components",
            "```",
            "",
        ]
        .iter()
        .map(|s| s.to_string()),
    );

    lines.join("\n")
}

/// Escape characters that would break a markdown link target
fn link_path(path: &str) -> String {
    path.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}

/// Write the rendered document into the component root
pub fn write_document(root: &Path, contents: &str) -> Result<PathBuf, OrganizeError> {
    let path = root.join(NAVIGATION_FILE);
    write_atomic(&path, contents.as_bytes()).map_err(|message| OrganizeError::DocumentWrite {
        path: path.clone(),
        message,
    })?;

    tracing::info!(path = %path.display(), "Updated navigation document");
    Ok(path)
}
