//! Path sandboxing for plan-supplied paths.
//!
//! Move sources and destinations may come from an untrusted advisory plan.
//! Every path is resolved against the component tree root and must land
//! strictly inside it before anything touches the filesystem.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

use crate::error::OrganizeError;

/// Category keys and component names usable as a single directory name
static SAFE_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 _.\-]{0,63}$").expect("static regex is valid")
});

/// Security validator for path operations
pub struct PathValidator;

impl PathValidator {
    /// Whether `segment` can be used as one directory name
    pub fn is_safe_segment(segment: &str) -> bool {
        SAFE_SEGMENT.is_match(segment) && !segment.contains("..")
    }

    /// Resolve a root-relative path and ensure it stays inside `root`.
    ///
    /// `root` must already be canonical. Absolute inputs are accepted only
    /// when they normalize to a location under the root. The root itself is
    /// rejected: nothing may move the tree or move onto it.
    pub fn resolve_within(root: &Path, relative: &str) -> Result<PathBuf, OrganizeError> {
        let trimmed = relative.trim();
        if trimmed.is_empty() {
            return Err(OrganizeError::SandboxViolation("empty path".to_string()));
        }
        if trimmed.contains('\0') {
            return Err(OrganizeError::SandboxViolation(format!(
                "null byte in path: {:?}",
                trimmed
            )));
        }

        let candidate = Path::new(trimmed);
        let joined = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            root.join(candidate)
        };

        let normalized = Self::normalize_path(&joined)
            .map_err(OrganizeError::SandboxViolation)?;

        if !normalized.starts_with(root) || normalized == root {
            return Err(OrganizeError::SandboxViolation(format!(
                "{} is not under {}",
                trimmed,
                root.display()
            )));
        }

        // A symlinked directory inside the tree could still point elsewhere
        if let Some(existing) = Self::deepest_existing(&normalized) {
            let canonical = existing.canonicalize().map_err(|e| {
                OrganizeError::SandboxViolation(format!(
                    "cannot resolve {}: {}",
                    existing.display(),
                    e
                ))
            })?;
            if !canonical.starts_with(root) {
                return Err(OrganizeError::SandboxViolation(format!(
                    "{} resolves to {} outside {}",
                    trimmed,
                    canonical.display(),
                    root.display()
                )));
            }
        }

        Ok(normalized)
    }

    /// Deepest ancestor of `path` (itself included) that exists on disk.
    ///
    /// The path itself is checked with `symlink_metadata`, so a symlink at
    /// the final component is judged by where it points.
    fn deepest_existing(path: &Path) -> Option<PathBuf> {
        path.ancestors()
            .find(|p| std::fs::symlink_metadata(p).is_ok())
            .map(Path::to_path_buf)
    }

    /// Normalize a path by resolving . and .. components without requiring
    /// the path to exist.
    pub fn normalize_path(path: &Path) -> Result<PathBuf, String> {
        let mut normalized = PathBuf::new();

        for component in path.components() {
            match component {
                Component::ParentDir => {
                    // Pop the last component, but not past root
                    if !normalized.pop() {
                        return Err(format!(
                            "Path traversal: too many parent references in {}",
                            path.display()
                        ));
                    }
                }
                Component::CurDir => {}
                Component::Normal(name) => {
                    normalized.push(name);
                }
                Component::RootDir => {
                    normalized.push(Component::RootDir);
                }
                Component::Prefix(prefix) => {
                    normalized.push(prefix.as_os_str());
                }
            }
        }

        Ok(normalized)
    }
}
