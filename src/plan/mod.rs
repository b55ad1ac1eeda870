//! Reorganization plans: advisory plan validation and reconciliation with
//! classifier output.

pub mod advisory_plan;
pub mod json_parser;
pub mod reconciler;

pub use advisory_plan::{PlanInput, PlannedMove, ValidatedPlan};
pub use reconciler::{ClassifiedComponent, PlanReconciler, Reconciliation};
