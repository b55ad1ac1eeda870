//! Move operations and the table-of-contents model

use super::category::Category;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Status of a move operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    /// Planned but not yet attempted
    #[default]
    Pending,
    Success,
    /// Rejected by the sandbox or failed on the filesystem
    Failed,
}

/// One planned relocation of a component directory.
///
/// `from` and `to` are paths relative to the component tree root, exactly
/// as planned. They are resolved and sandbox-checked only at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOperation {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: MoveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Whether `path` lies strictly below the directory `dir`
pub fn is_within(path: &str, dir: &str) -> bool {
    path.len() > dir.len() && path.starts_with(dir) && path[dir.len()..].starts_with('/')
}

/// Location of `origin` after replaying the successful `moves` in order
pub fn relocated_path(origin: &str, moves: &[MoveOperation]) -> String {
    let mut path = origin.to_string();
    for op in moves.iter().filter(|op| op.succeeded()) {
        let to = op.to.trim().trim_end_matches('/');
        if path == op.from {
            path = to.to_string();
        } else if is_within(&path, &op.from) {
            path = format!("{}{}", to, &path[op.from.len()..]);
        }
    }
    path
}

impl MoveOperation {
    pub fn new(from: impl Into<String>, to: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            reason,
            status: MoveStatus::Pending,
            error: None,
        }
    }

    pub fn mark_success(&mut self) {
        self.status = MoveStatus::Success;
        self.error = None;
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = MoveStatus::Failed;
        self.error = Some(error.into());
    }

    pub fn succeeded(&self) -> bool {
        self.status == MoveStatus::Success
    }
}

/// A component listed in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TocEntry {
    /// Component name (sort key)
    pub name: String,
    /// Forward-slash path relative to the component root, used for links
    pub path: String,
    /// Path the component was scanned at, before any move
    pub origin: String,
}

/// Category -> sorted component list.
///
/// Sections iterate in category precedence order (built-ins first, then
/// extension keys lexicographically). Entries within a section are sorted
/// case-sensitively by name, then by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOfContents {
    sections: BTreeMap<Category, Vec<TocEntry>>,
}

impl TableOfContents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, entry: TocEntry) {
        let entries = self.sections.entry(category).or_default();
        let idx = entries.binary_search(&entry).unwrap_or_else(|i| i);
        entries.insert(idx, entry);
    }

    /// Sections in display order
    pub fn sections(&self) -> impl Iterator<Item = (&Category, &[TocEntry])> {
        self.sections.iter().map(|(c, e)| (c, e.as_slice()))
    }

    /// Component names for one category
    pub fn names(&self, category: &Category) -> Vec<&str> {
        self.sections
            .get(category)
            .map(|entries| entries.iter().map(|e| e.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Category holding the entry at `path`, if any
    pub fn category_of_path(&self, path: &str) -> Option<&Category> {
        self.sections
            .iter()
            .find(|(_, entries)| entries.iter().any(|e| e.path == path))
            .map(|(c, _)| c)
    }

    /// Point every entry at where its component ended up after `moves`.
    ///
    /// Successful moves are replayed in order against each entry's scanned
    /// location, so a component carried along by a moved ancestor and one
    /// whose own move failed both link to their actual directory.
    pub fn relocate(&mut self, moves: &[MoveOperation]) {
        for entries in self.sections.values_mut() {
            for entry in entries.iter_mut() {
                entry.path = relocated_path(&entry.origin, moves);
            }
            entries.sort();
        }
    }

    /// Total number of listed components
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Audit form: ordered array of `{ category, label, components }`
impl Serialize for TableOfContents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct SectionView<'a> {
            category: &'a str,
            label: &'a str,
            components: Vec<&'a str>,
        }

        let mut seq = serializer.serialize_seq(Some(self.sections.len()))?;
        for (category, entries) in &self.sections {
            seq.serialize_element(&SectionView {
                category: category.key(),
                label: category.label(),
                components: entries.iter().map(|e| e.name.as_str()).collect(),
            })?;
        }
        seq.end()
    }
}
