//! Error taxonomy for an organize run.
//!
//! Fatal kinds end the run with a non-zero outcome. Everything else is
//! recorded against the item it concerns (a move, a plan fragment, a file)
//! and the run carries on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The component tree root could not be read
    #[error("cannot scan component tree {path}: {message}")]
    Scan { path: PathBuf, message: String },

    #[error("cannot read {path}: {message}")]
    ContentLoad { path: PathBuf, message: String },

    /// A fragment of the advisory plan failed structural validation
    #[error("invalid plan fragment `{fragment}`: {message}")]
    PlanValidation { fragment: String, message: String },

    /// The plan named a component the scanner never reported
    #[error("unknown component `{0}`")]
    UnknownComponent(String),

    #[error("escapes sandbox: {0}")]
    SandboxViolation(String),

    #[error("move {from} -> {to} failed: {message}")]
    MoveFailure {
        from: String,
        to: String,
        message: String,
    },

    #[error("failed to write navigation document {path}: {message}")]
    DocumentWrite { path: PathBuf, message: String },

    #[error("failed to write audit record {path}: {message}")]
    AuditWrite { path: PathBuf, message: String },

    /// The advisory call itself failed (transport, auth, bad status)
    #[error("advisory request failed: {0}")]
    Advisory(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl OrganizeError {
    /// Whether this error terminates the run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OrganizeError::Scan { .. }
                | OrganizeError::DocumentWrite { .. }
                | OrganizeError::AuditWrite { .. }
                | OrganizeError::Advisory(_)
                | OrganizeError::Config(_)
        )
    }
}

impl From<OrganizeError> for String {
    fn from(err: OrganizeError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_split() {
        let scan = OrganizeError::Scan {
            path: PathBuf::from("components"),
            message: "denied".into(),
        };
        assert!(scan.is_fatal());
        assert!(OrganizeError::Advisory("timeout".into()).is_fatal());

        assert!(!OrganizeError::UnknownComponent("Ghost".into()).is_fatal());
        assert!(!OrganizeError::SandboxViolation("../etc".into()).is_fatal());
    }

    #[test]
    fn test_sandbox_message_prefix() {
        let err = OrganizeError::SandboxViolation("../../etc/passwd".into());
        assert!(err.to_string().starts_with("escapes sandbox"));
    }
}
