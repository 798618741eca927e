pub mod clear;
pub mod config;
pub mod films;
pub mod stats;
pub mod sync;
pub mod sync_ui;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use film_sync_config::{Config, PathManager};
use film_sync_core::{FilmLibrary, ProductionSource};
use std::path::PathBuf;

/// Paths and configuration resolved once per invocation.
pub struct Workspace {
    pub paths: PathManager,
    pub config: Config,
    database_override: Option<PathBuf>,
}

impl Workspace {
    pub fn load(paths: PathManager, database_override: Option<PathBuf>) -> Result<Self> {
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        Ok(Self {
            paths,
            config,
            database_override,
        })
    }

    /// `--database`, then `[database] path`, then the data directory default.
    pub fn database_path(&self) -> PathBuf {
        self.database_override
            .clone()
            .unwrap_or_else(|| self.config.database_path(self.paths.database_file()))
    }

    pub fn open_library(&self) -> Result<FilmLibrary<ProductionSource>> {
        let path = self.database_path();
        tracing::debug!(database = %path.display(), "Opening film library");
        FilmLibrary::open(&self.config, &path).map_err(|e| eyre!("{:#}", e))
    }
}
