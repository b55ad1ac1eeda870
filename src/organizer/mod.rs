//! Organize pipeline
//!
//! Scanner -> Content Loader -> Classifier (or advisory plan) -> Plan
//! Reconciler -> Sandboxed Mover -> Document Generator -> Audit Recorder.
//!
//! Each run starts from a fresh scan; nothing is cached between runs. Per-item
//! failures are collected into the outcome and the audit record, while fatal
//! errors (unreadable root, advisory failure, artifact writes) end the run.


use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::advisory::{AdvisoryProvider, AdvisoryRequest, HttpAdvisor};
use crate::classify::Classifier;
use crate::config::{OrganizerConfig, RunMode};
use crate::error::{OrganizeError, Result};
use crate::execution::SandboxedMover;
use crate::models::{MoveOperation, MoveStatus, TableOfContents};
use crate::output::{self, AuditPaths, AuditRecord, AuditRecorder};
use crate::plan::{ClassifiedComponent, PlanInput, PlanReconciler};
use crate::scan::{ComponentScanner, ContentBudget, ContentLoader};

const CLASSIFIER_NOTE: &str =
    "Components were automatically analyzed and organized based on their content and naming patterns.";
const TOC_ONLY_NOTE: &str =
    "Table of contents regenerated from the current layout; no components were moved.";

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub mode: RunMode,
    /// Moves in execution order with their final status
    pub moves: Vec<MoveOperation>,
    pub toc: TableOfContents,
    /// Rendered navigation document
    pub navigation: String,
    pub navigation_path: PathBuf,
    pub audit: AuditPaths,
    /// Dropped plan fragments and unknown references
    pub warnings: Vec<String>,
    /// At least one move was applied
    pub changes_made: bool,
}

impl RunOutcome {
    pub fn succeeded_count(&self) -> usize {
        self.moves.iter().filter(|m| m.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.moves
            .iter()
            .filter(|m| m.status == MoveStatus::Failed)
            .count()
    }

    /// One-line run summary
    pub fn summary(&self) -> String {
        format!(
            "{} components in {} categories; {} moves succeeded, {} failed",
            self.toc.len(),
            self.toc.sections().count(),
            self.succeeded_count(),
            self.failed_count()
        )
    }
}

pub struct Organizer {
    config: OrganizerConfig,
    classifier: Classifier,
    advisor: Option<Box<dyn AdvisoryProvider>>,
}

impl Organizer {
    pub fn new(config: OrganizerConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(),
            advisor: None,
        }
    }

    /// Organizer with the HTTP advisor attached when the config has one
    pub fn from_config(config: OrganizerConfig) -> Result<Self> {
        let advisor = match &config.advisory {
            Some(advisory) if config.mode == RunMode::Advisory => {
                Some(Box::new(HttpAdvisor::new(advisory.clone())?) as Box<dyn AdvisoryProvider>)
            }
            _ => None,
        };

        Ok(Self {
            config,
            classifier: Classifier::new(),
            advisor,
        })
    }

    pub fn with_advisor(mut self, advisor: impl AdvisoryProvider + 'static) -> Self {
        self.advisor = Some(Box::new(advisor));
        self
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let root = &self.config.root;
        let mode = self.config.mode;
        tracing::info!(root = %root.display(), mode = %mode, "Starting organize run");

        let components = ComponentScanner::new(root).scan_all()?;

        let local_loader = ContentLoader::new(root).with_budget(ContentBudget::Unbounded);
        let classified: Vec<ClassifiedComponent> = components
            .iter()
            .map(|component| {
                let content = local_loader.load(component);
                ClassifiedComponent {
                    category: self.classifier.classify(component, &content),
                    component: component.clone(),
                }
            })
            .collect();

        let reconciler = PlanReconciler::new(&classified);
        let (mut moves, mut toc, mut notes, warnings) = match mode {
            RunMode::TocOnly => (
                Vec::new(),
                reconciler.current_layout(),
                vec![TOC_ONLY_NOTE.to_string()],
                Vec::new(),
            ),
            RunMode::Classify => {
                let result = reconciler.reconcile(&PlanInput::None);
                (result.moves, result.toc, vec![CLASSIFIER_NOTE.to_string()], result.warnings)
            }
            RunMode::Advisory => {
                let plan = self.request_plan(&components).await?;
                let result = reconciler.reconcile(&plan);
                (result.moves, result.toc, result.notes, result.warnings)
            }
        };

        let mover = SandboxedMover::new(root)?;
        let report = mover.apply(&mut moves);

        toc.relocate(&moves);

        let navigation = output::render(&toc);
        let navigation_path = output::write_document(root, &navigation)?;

        notes.extend(warnings.iter().map(|w| format!("Warning: {}", w)));
        let record = AuditRecord::new(mode, moves.clone(), toc.clone(), &navigation, notes);
        let audit = AuditRecorder::new(&self.config.audit_dir).record(&record)?;

        let outcome = RunOutcome {
            mode,
            moves,
            toc,
            navigation,
            navigation_path,
            audit,
            warnings,
            changes_made: report.changes_made(),
        };

        tracing::info!(
            changes_made = outcome.changes_made,
            "Organize run complete: {}",
            outcome.summary()
        );

        Ok(outcome)
    }

    /// Single advisory call; its failure fails the run
    async fn request_plan(&self, components: &[crate::models::Component]) -> Result<PlanInput> {
        let advisor = self.advisor.as_ref().ok_or_else(|| {
            OrganizeError::Config("advisory mode requires an advisory provider".to_string())
        })?;

        let loader = ContentLoader::new(&self.config.root).with_budget(self.config.content_budget);
        let inventory: Vec<_> = components
            .iter()
            .map(|c| (c.clone(), loader.load(c)))
            .collect();
        let request = AdvisoryRequest::new(&inventory);

        let response = advisor.propose(&request).await?;
        Ok(PlanInput::from_response(&response))
    }
}

/// Append `changes_made=<bool>` to the GitHub Actions output file, when
/// running under Actions
pub fn write_automation_output(changes_made: bool) -> std::result::Result<(), String> {
    if std::env::var_os("GITHUB_ACTIONS").is_none() {
        return Ok(());
    }
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => append_changes_made(Path::new(&path), changes_made),
        None => Ok(()),
    }
}

/// Append the `changes_made` output line to `path`, creating it if needed
pub fn append_changes_made(path: &Path, changes_made: bool) -> std::result::Result<(), String> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    writeln!(file, "changes_made={}", changes_made)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
