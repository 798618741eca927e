use film_sync_sources::{FilmSource, Pacer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use crate::error::SyncError;
use crate::progress::{ItemOutcome, ProgressObserver, SyncProgress, SyncReport, SyncTally};
use crate::store::FilmRepository;

/// Delay after each persisted film unless configured otherwise.
pub const DEFAULT_ITEM_DELAY: Duration = Duration::from_millis(500);

const PROGRESS_INTERVAL: usize = 25;

/// Drives one sync run: list once, then enrich and persist every film not yet stored.
///
/// Items are processed strictly one at a time in listing order. A failure on one
/// item is counted and the run moves on; only a listing failure aborts.
pub struct SyncOrchestrator<S> {
    source: S,
    store: Arc<dyn FilmRepository>,
    item_pacer: Pacer,
    progress: Option<ProgressObserver>,
}

impl<S: FilmSource> SyncOrchestrator<S> {
    pub fn new(source: S, store: Arc<dyn FilmRepository>) -> Self {
        Self {
            source,
            store,
            item_pacer: Pacer::new(DEFAULT_ITEM_DELAY),
            progress: None,
        }
    }

    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_pacer = Pacer::new(delay);
        self
    }

    pub fn with_progress(mut self, observer: ProgressObserver) -> Self {
        self.progress = Some(observer);
        self
    }

    #[instrument(skip(self), fields(source = self.source.source_name()))]
    pub async fn sync(&self, username: &str) -> Result<SyncReport, SyncError> {
        let films = self.source.list_films(username).await.map_err(SyncError::Listing)?;
        info!(discovered = films.len(), "Listing complete, processing films");

        let total = films.len();
        let mut tally = SyncTally::new(total, PROGRESS_INTERVAL);

        for (index, mut film) in films.into_iter().enumerate() {
            let outcome = match self.store.exists(&film.source_id) {
                Err(e) => {
                    warn!(source_id = %film.source_id, error = %e, "Existence check failed");
                    tally.record_failed("exists");
                    ItemOutcome::Failed
                }
                Ok(true) => {
                    debug!(source_id = %film.source_id, "Already stored, skipping");
                    tally.record(ItemOutcome::Skipped);
                    ItemOutcome::Skipped
                }
                Ok(false) => match self.source.enrich(&mut film).await {
                    Err(e) => {
                        warn!(source_id = %film.source_id, error = %e, "Detail fetch failed");
                        tally.record_failed("detail");
                        ItemOutcome::Failed
                    }
                    Ok(()) => match self.store.insert(&film) {
                        Err(e) => {
                            warn!(source_id = %film.source_id, error = %e, "Insert failed");
                            tally.record_failed("insert");
                            ItemOutcome::Failed
                        }
                        Ok(()) => {
                            debug!(source_id = %film.source_id, title = %film.title, "Stored film");
                            tally.record(ItemOutcome::Scraped);
                            ItemOutcome::Scraped
                        }
                    },
                },
            };

            tally.log_progress(index + 1);
            if let Some(observer) = &self.progress {
                observer(&SyncProgress {
                    position: index + 1,
                    total,
                    title: film.title.clone(),
                    outcome,
                });
            }

            if outcome == ItemOutcome::Scraped {
                self.item_pacer.pace().await;
            }
        }

        let report = tally.finish();
        if report.failed > 0 {
            return Err(SyncError::PartialFailure {
                failed: report.failed,
                report,
            });
        }
        Ok(report)
    }
}
