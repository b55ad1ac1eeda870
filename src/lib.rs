pub mod advisory;
pub mod classify;
pub mod config;
pub mod error;
pub mod execution;
pub mod models;
pub mod organizer;
pub mod output;
pub mod plan;
pub mod scan;
pub mod security;

pub use config::{OrganizerConfig, RunMode};
pub use error::{OrganizeError, Result};
pub use organizer::{write_automation_output, Organizer, RunOutcome};

use tracing_subscriber::EnvFilter;

/// Load `.env` and install the tracing subscriber
pub fn init() {
    // Current directory first, then the parent (running from a subfolder)
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }

    // Default: warn for dependencies, info for the organizer (run summary visible)
    // Use RUST_LOG=debug for per-component scores and skipped files
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,component_organizer=info")),
        )
        .try_init();
}

/// Run once from the environment. Returns the outcome or the fatal error.
pub async fn run() -> Result<RunOutcome> {
    let config = OrganizerConfig::from_env()?;
    Organizer::from_config(config)?.run().await
}
