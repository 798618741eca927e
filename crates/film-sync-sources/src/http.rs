use async_trait::async_trait;
use film_sync_config::ScraperConfig;
use reqwest::Client;
use tracing::debug;
use crate::error::SourceError;
use crate::traits::PageFetcher;

/// Fetches pages over HTTP with a browser-like user agent.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        debug!(%url, "Fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::fetch_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::fetch_failed(url, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::fetch_failed(url, e))
    }
}
