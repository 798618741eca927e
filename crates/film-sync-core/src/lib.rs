pub mod error;
pub mod store;
pub mod stats;
pub mod progress;
pub mod sync;
pub mod library;

pub use error::{StoreError, SyncError};
pub use store::{FilmRepository, FilmStore};
pub use progress::{ItemOutcome, ProgressObserver, SyncProgress, SyncReport};
pub use sync::{SyncOrchestrator, DEFAULT_ITEM_DELAY};
pub use library::{FilmLibrary, ProductionSource};
