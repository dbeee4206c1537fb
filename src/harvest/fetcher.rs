//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Throttling every attempt through the domain throttle
//! - Bounded retry of 5xx responses
//! - Error classification into `FetchError`

use crate::config::{Config, UserAgentConfig};
use crate::harvest::document::PageDocument;
use crate::harvest::throttle::DomainThrottle;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Upper bound for each request, including reading the body
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use table_harvest::config::UserAgentConfig;
/// use table_harvest::harvest::build_http_client;
///
/// let config = UserAgentConfig { name: "wswp".to_string() };
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.name.as_str())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads pages and turns them into documents
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    max_retries: u32,
}

impl PageFetcher {
    pub fn new(client: Client, max_retries: u32) -> Self {
        Self {
            client,
            max_retries,
        }
    }

    /// Builds a fetcher from the harvest and user agent settings
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, config.harvest.request_timeout())?;
        Ok(Self::new(client, config.harvest.max_retries))
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fetches a URL and parses it into a document
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Status < 400 | Parse body → document |
    /// | HTTP 5xx | Retry up to `max_retries` times, each attempt throttled |
    /// | HTTP 5xx, retries exhausted | `FetchError::ServerError` |
    /// | Other status >= 400 | `FetchError::HttpStatus` |
    /// | Connection error / timeout | `FetchError::Transport`, no retry |
    pub async fn fetch(
        &self,
        url: &Url,
        throttle: &mut DomainThrottle,
    ) -> Result<PageDocument, FetchError> {
        let mut retries_left = self.max_retries;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            throttle.wait(url).await;
            tracing::info!("Downloading page: {} (attempt {})", url, attempts);

            let response = match self.client.get(url.clone()).send().await {
                Ok(response) => response,
                Err(e) => {
                    let error = transport_error(url, &e);
                    tracing::error!("Page download failed: {}", error);
                    return Err(error);
                }
            };

            let status = response.status().as_u16();

            if (500..600).contains(&status) {
                if retries_left > 0 {
                    retries_left -= 1;
                    tracing::warn!(
                        "Website {} returned {}; retrying ({} retries left)",
                        url,
                        status,
                        retries_left
                    );
                    continue;
                }

                let error = FetchError::ServerError {
                    url: url.to_string(),
                    status,
                    attempts,
                };
                tracing::error!("Download error: {}", error);
                return Err(error);
            }

            if status >= 400 {
                let error = FetchError::HttpStatus {
                    url: url.to_string(),
                    status,
                };
                tracing::error!("Download error: {}", error);
                return Err(error);
            }

            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    let error = transport_error(url, &e);
                    tracing::error!("Failed to read page body: {}", error);
                    return Err(error);
                }
            };

            tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
            return Ok(PageDocument::from_bytes(&body));
        }
    }
}

/// Classifies a reqwest error into a transport failure
fn transport_error(url: &Url, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}
