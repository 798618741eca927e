pub mod config;
pub mod paths;

pub use config::{Config, DatabaseConfig, LetterboxdConfig, LoggingConfig, ScraperConfig, DEFAULT_BASE_URL};
pub use paths::{PathManager, container_base_path};
