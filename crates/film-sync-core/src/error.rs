use film_sync_sources::SourceError;
use thiserror::Error;
use crate::progress::SyncReport;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("film database unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),

    /// A row with this key already exists. Rows are never updated in place.
    #[error("film {source_id} is already stored")]
    ConstraintViolation { source_id: String },

    #[error("film database lock poisoned")]
    Poisoned,

    #[error("cannot create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("database schema version {found} is newer than supported version {expected}")]
    SchemaVersion { expected: i32, found: i32 },
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// The listing walk failed; nothing was persisted.
    #[error("failed to list films: {0}")]
    Listing(#[source] SourceError),

    /// Some items failed. Everything else in the report was processed.
    #[error("{failed} of {} films failed to sync", .report.discovered)]
    PartialFailure { failed: usize, report: SyncReport },
}

impl SyncError {
    /// The run's report, when the listing got far enough to produce one.
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            SyncError::Listing(_) => None,
            SyncError::PartialFailure { report, .. } => Some(report),
        }
    }
}
