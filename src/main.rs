use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    component_organizer::init();

    match component_organizer::run().await {
        Ok(outcome) => {
            println!("{}", outcome.summary());
            for op in outcome.moves.iter().filter(|m| !m.succeeded()) {
                eprintln!(
                    "failed: {} -> {}: {}",
                    op.from,
                    op.to,
                    op.error.as_deref().unwrap_or("unknown error")
                );
            }
            if let Err(e) = component_organizer::write_automation_output(outcome.changes_made) {
                tracing::warn!("{}", e);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Organize run failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
