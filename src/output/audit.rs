//! Audit Recorder
//!
//! One immutable record per run, persisted as JSON plus a markdown rendering.
//! Both forms are produced in memory before either file is touched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::write_atomic;
use crate::config::RunMode;
use crate::error::OrganizeError;
use crate::models::{MoveOperation, MoveStatus, TableOfContents};

/// Structured record file name
pub const AUDIT_JSON_FILE: &str = "changes-summary.json";

/// Human-readable record file name
pub const AUDIT_MARKDOWN_FILE: &str = "CHANGES_SUMMARY.md";

/// Snapshot of one run. Fields are fixed at construction.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    run_id: Uuid,
    timestamp: DateTime<Utc>,
    mode: RunMode,
    changes_made: bool,
    navigation_sha256: String,
    moves: Vec<MoveOperation>,
    toc_sections: TableOfContents,
    notes: Vec<String>,
}

impl AuditRecord {
    pub fn new(
        mode: RunMode,
        moves: Vec<MoveOperation>,
        toc: TableOfContents,
        navigation: &str,
        notes: Vec<String>,
    ) -> Self {
        let changes_made = moves.iter().any(MoveOperation::succeeded);
        Self {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            mode,
            changes_made,
            navigation_sha256: hex::encode(Sha256::digest(navigation.as_bytes())),
            moves,
            toc_sections: toc,
            notes,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn changes_made(&self) -> bool {
        self.changes_made
    }

    pub fn navigation_sha256(&self) -> &str {
        &self.navigation_sha256
    }

    pub fn moves(&self) -> &[MoveOperation] {
        &self.moves
    }

    pub fn toc(&self) -> &TableOfContents {
        &self.toc_sections
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize audit record: {}", e))
    }

    /// Markdown summary of the run
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![
            "# Component Organization Summary".to_string(),
            String::new(),
            format!(
                "**Generated:** {}",
                self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            format!("**Run:** `{}` ({})", self.run_id, self.mode),
            String::new(),
            "## Changes Made".to_string(),
            String::new(),
        ];

        let succeeded = self.moves.iter().filter(|m| m.succeeded()).count();
        let failed = self
            .moves
            .iter()
            .filter(|m| m.status == MoveStatus::Failed)
            .count();
        lines.push(format!(
            "{} moves attempted: {} succeeded, {} failed.",
            self.moves.len(),
            succeeded,
            failed
        ));
        lines.push(String::new());

        if !self.moves.is_empty() {
            lines.push("### Component Moves".to_string());
            for op in &self.moves {
                let marker = match op.status {
                    MoveStatus::Success => "[ok]",
                    MoveStatus::Failed => "[failed]",
                    MoveStatus::Pending => "[pending]",
                };
                lines.push(format!("- {} `{}` -> `{}`", marker, op.from, op.to));
                if let Some(reason) = &op.reason {
                    lines.push(format!("   - Reason: {}", reason));
                }
                if let Some(error) = &op.error {
                    lines.push(format!("   - Error: {}", error));
                }
            }
            lines.push(String::new());
        }

        if !self.toc_sections.is_empty() {
            lines.push("### New Table of Contents Structure".to_string());
            for (category, entries) in self.toc_sections.sections() {
                lines.push(format!("- **{}**", category.label()));
                for entry in entries {
                    lines.push(format!("  - {}", entry.name));
                }
            }
            lines.push(String::new());
        }

        lines.push("### Notes".to_string());
        if self.notes.is_empty() {
            lines.push("- None".to_string());
        }
        for note in &self.notes {
            lines.push(format!("- {}", note));
        }

        lines.extend(
            [
                "",
                "---",
                "",
                "This summary was automatically generated by the component organization workflow.",
                "",
            ]
            .iter()
            .map(|s| s.to_string()),
        );

        lines.join("\n")
    }
}

/// Locations of the written audit artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// Writes audit records into a fixed directory, replacing the previous run's
pub struct AuditRecorder {
    dir: PathBuf,
}

impl AuditRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record(&self, record: &AuditRecord) -> Result<AuditPaths, OrganizeError> {
        let paths = AuditPaths {
            json: self.dir.join(AUDIT_JSON_FILE),
            markdown: self.dir.join(AUDIT_MARKDOWN_FILE),
        };

        let json = record.to_json().map_err(|message| OrganizeError::AuditWrite {
            path: paths.json.clone(),
            message,
        })?;
        let markdown = record.to_markdown();

        write_atomic(&paths.json, json.as_bytes()).map_err(|message| {
            OrganizeError::AuditWrite {
                path: paths.json.clone(),
                message,
            }
        })?;
        write_atomic(&paths.markdown, markdown.as_bytes()).map_err(|message| {
            OrganizeError::AuditWrite {
                path: paths.markdown.clone(),
                message,
            }
        })?;

        tracing::info!(
            run_id = %record.run_id,
            json = %paths.json.display(),
            markdown = %paths.markdown.display(),
            "Wrote audit record"
        );

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TocEntry};
    use serde_json::Value;
    use tempfile::TempDir;

    fn sample_record() -> AuditRecord {
        let mut ok = MoveOperation::new("Button", "feedback/Button", Some("Moving from root to feedback category".into()));
        ok.mark_success();
        let mut failed = MoveOperation::new("Modal", "feedback/Modal", None);
        failed.mark_failed("Destination already exists");

        let mut toc = TableOfContents::new();
        toc.insert(
            Category::Feedback,
            TocEntry {
                name: "Button".into(),
                path: "feedback/Button".into(),
                origin: "Button".into(),
            },
        );

        AuditRecord::new(
            RunMode::Classify,
            vec![ok, failed],
            toc,
            "# Components Store\n",
            vec!["Organized by name and content".into()],
        )
    }

    #[test]
    fn test_json_keys() {
        let record = sample_record();
        let json: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

        for key in ["run_id", "timestamp", "mode", "changes_made", "navigation_sha256", "moves", "toc_sections", "notes"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["mode"], "classify");
        assert_eq!(json["changes_made"], true);
        assert_eq!(json["moves"][0]["status"], "success");
        assert_eq!(json["moves"][1]["status"], "failed");
        assert_eq!(json["moves"][1]["error"], "Destination already exists");
        assert_eq!(json["toc_sections"][0]["components"][0], "Button");
        assert_eq!(json["navigation_sha256"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_markdown_distinguishes_outcomes() {
        let markdown = sample_record().to_markdown();

        assert!(markdown.contains("2 moves attempted: 1 succeeded, 1 failed."));
        assert!(markdown.contains("- [ok] `Button` -> `feedback/Button`"));
        assert!(markdown.contains("- [failed] `Modal` -> `feedback/Modal`"));
        assert!(markdown.contains("   - Error: Destination already exists"));
        assert!(markdown.contains("- Organized by name and content"));
    }

    #[test]
    fn test_record_overwrites_previous_run() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(AUDIT_JSON_FILE), "{\"old\": true}").unwrap();

        let recorder = AuditRecorder::new(temp_dir.path());
        let paths = recorder.record(&sample_record()).unwrap();

        let json: Value = serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert!(json.get("old").is_none());
        assert!(paths.markdown.exists());
    }

    #[test]
    fn test_record_into_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = AuditRecorder::new(temp_dir.path().join("missing"));

        let result = recorder.record(&sample_record());
        assert!(matches!(result, Err(OrganizeError::AuditWrite { .. })));
    }
}
