//! Execution of planned moves inside the component tree.

pub mod mover;

pub use mover::{MoveReport, SandboxedMover};
