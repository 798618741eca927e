use film_sync_core::{ItemOutcome, ProgressObserver, SyncProgress};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

/// Progress display for a sync run: a bar on a terminal, structured log lines otherwise.
pub struct SyncUI {
    bar: ProgressBar,
    interactive: bool,
}

impl SyncUI {
    pub fn new(enabled: bool) -> Self {
        let interactive = enabled && is_interactive();

        let bar = if interactive {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_message("Walking film listing...");
            bar
        } else {
            tracing::info!(
                operation = "ui_init",
                mode = "non_interactive",
                "Running in non-interactive mode - progress bar disabled, using structured logging"
            );
            ProgressBar::hidden()
        };

        Self { bar, interactive }
    }

    /// Observer to hand to the orchestrator.
    pub fn observer(&self) -> ProgressObserver {
        let bar = self.bar.clone();
        let interactive = self.interactive;

        Arc::new(move |progress: &SyncProgress| {
            if interactive {
                if bar.length() != Some(progress.total as u64) {
                    bar.set_length(progress.total as u64);
                    bar.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("█▉▊▋▌▍▎▏  "),
                    );
                }
                bar.set_position(progress.position as u64);
                bar.set_message(format!("{} {}", outcome_label(progress.outcome), progress.title));
            } else {
                tracing::info!(
                    operation = "progress",
                    current = progress.position,
                    total = progress.total,
                    outcome = outcome_label(progress.outcome),
                    title = %progress.title,
                    "Sync progress update"
                );
            }
        })
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

fn outcome_label(outcome: ItemOutcome) -> &'static str {
    match outcome {
        ItemOutcome::Scraped => "scraped",
        ItemOutcome::Skipped => "skipped",
        ItemOutcome::Failed => "failed",
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
