use super::sync_ui::SyncUI;
use super::Workspace;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use film_sync_core::{SyncError, SyncReport};
use serde_json::json;

pub async fn run_sync(username: Option<String>, workspace: &Workspace, output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    let username = workspace.config.resolve_username(username).ok_or_else(|| {
        eyre!("No username given. Pass one (reelrecall sync <USERNAME>) or run 'reelrecall config set-username <NAME>'")
    })?;

    let ui = SyncUI::new(output.format() == OutputFormat::Human && !output.is_quiet());
    let library = workspace.open_library()?.with_progress(ui.observer());

    let result = library.sync(&username).await;
    ui.finish();

    match result {
        Ok(report) => {
            print_report(&username, &report, true, output);
            Ok(())
        }
        Err(SyncError::PartialFailure { failed, report }) => {
            print_report(&username, &report, false, output);
            Err(eyre!("{} film(s) failed to sync; rerun to retry them", failed))
        }
        Err(e @ SyncError::Listing(_)) => Err(eyre!("Sync operation failed: {}", e)),
    }
}

fn print_report(username: &str, report: &SyncReport, success: bool, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            let summary = format!(
                "Synced {}: {} discovered, {} scraped, {} skipped, {} failed in {:.1}s",
                username,
                report.discovered,
                report.scraped,
                report.skipped,
                report.failed,
                report.duration.as_secs_f64()
            );
            if success {
                output.success(summary);
            } else {
                output.warn(summary);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "success": success,
                "username": username,
                "discovered": report.discovered,
                "scraped": report.scraped,
                "skipped": report.skipped,
                "failed": report.failed,
                "duration_seconds": report.duration.as_secs_f64(),
            }));
        }
    }
}
