//! Sandboxed Mover
//!
//! Applies move operations strictly in the order given. Each operation is
//! sandbox-checked, executed, and marked `success` or `failed`; a failure
//! never stops the rest of the batch.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::OrganizeError;
use crate::models::MoveOperation;
use crate::security::PathValidator;

/// Counts from one batch of moves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    /// Number of operations that moved a directory
    pub completed_count: usize,
    /// Number of operations rejected or failed
    pub failed_count: usize,
    /// Error messages from failed operations
    pub errors: Vec<String>,
}

impl MoveReport {
    /// At least one directory actually moved
    pub fn changes_made(&self) -> bool {
        self.completed_count > 0
    }
}

pub struct SandboxedMover {
    /// Canonical component tree root
    root: PathBuf,
}

impl SandboxedMover {
    /// Create a mover confined to `root`
    pub fn new(root: &Path) -> Result<Self, OrganizeError> {
        let root = root.canonicalize().map_err(|e| OrganizeError::Scan {
            path: root.to_path_buf(),
            message: format!("cannot resolve component root: {}", e),
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Apply every operation in order, recording the outcome on each
    pub fn apply(&self, moves: &mut [MoveOperation]) -> MoveReport {
        let mut report = MoveReport::default();

        for op in moves.iter_mut() {
            match self.apply_one(op) {
                Ok(()) => {
                    tracing::info!(from = %op.from, to = %op.to, "Moved component");
                    op.mark_success();
                    report.completed_count += 1;
                }
                Err(e) => {
                    tracing::warn!(from = %op.from, to = %op.to, error = %e, "Move failed");
                    let message = e.to_string();
                    op.mark_failed(message.clone());
                    report.failed_count += 1;
                    report.errors.push(message);
                }
            }
        }

        report
    }

    fn apply_one(&self, op: &MoveOperation) -> Result<(), OrganizeError> {
        let source = PathValidator::resolve_within(&self.root, &op.from)?;
        let destination = PathValidator::resolve_within(&self.root, &op.to)?;

        let failure = |message: String| OrganizeError::MoveFailure {
            from: op.from.clone(),
            to: op.to.clone(),
            message,
        };

        if fs::symlink_metadata(&source).is_err() {
            return Err(failure(format!("Source not found: {}", source.display())));
        }

        if source == destination {
            return Err(failure("Source and destination are the same".to_string()));
        }

        if destination.starts_with(&source) {
            return Err(failure("Cannot move a directory into itself".to_string()));
        }

        if fs::symlink_metadata(&destination).is_ok() {
            return Err(failure(format!(
                "Destination already exists: {}",
                destination.display()
            )));
        }

        perform_move(&source, &destination).map_err(failure)
    }
}

/// Create missing parents for `destination`, then rename
fn perform_move(source: &Path, destination: &Path) -> Result<(), String> {
    if let Some(parent) = destination.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create destination directory: {}", e))?;
        }
    }

    fs::rename(source, destination).map_err(|e| {
        format!(
            "Failed to move {} to {}: {}",
            source.display(),
            destination.display(),
            e
        )
    })
}
