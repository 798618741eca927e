use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://letterboxd.com";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub letterboxd: LetterboxdConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterboxdConfig {
    /// Profile synced when no username is given on the command line
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Request pacing and HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_delay_ms")]
    pub item_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Overrides the database location under the data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_delay_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl Default for LetterboxdConfig {
    fn default() -> Self {
        Self {
            username: None,
            base_url: default_base_url(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: default_delay_ms(),
            item_delay_ms: default_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ScraperConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// No pacing at all, for tests and fixtures.
    pub fn unpaced() -> Self {
        Self {
            page_delay_ms: 0,
            item_delay_ms: 0,
            ..Self::default()
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if present, defaults otherwise.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base = url::Url::parse(&self.letterboxd.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid letterboxd.base_url '{}': {}", self.letterboxd.base_url, e))?;
        if base.cannot_be_a_base() {
            return Err(anyhow::anyhow!("letterboxd.base_url must be an http(s) origin"));
        }

        if self.scraper.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("scraper.request_timeout_secs must be greater than zero"));
        }

        if let Some(username) = &self.letterboxd.username {
            if username.trim().is_empty() {
                return Err(anyhow::anyhow!("letterboxd.username cannot be blank"));
            }
        }

        Ok(())
    }

    /// Username from the command line, falling back to the configured one.
    pub fn resolve_username(&self, explicit: Option<String>) -> Option<String> {
        explicit
            .or_else(|| self.letterboxd.username.clone())
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    pub fn database_path(&self, default: PathBuf) -> PathBuf {
        self.database.path.clone().unwrap_or(default)
    }
}
