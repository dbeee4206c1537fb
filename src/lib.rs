//! Table-Harvest: a polite paginated table scraper
//!
//! This crate walks a paginated listing site one page at a time, extracts the
//! rows of every HTML table it finds, and follows the "next page" link until
//! the listing runs out. Requests to the same host are throttled.

pub mod config;
pub mod harvest;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Table-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::HarvestPhase,
        to: state::HarvestPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Link leaves the harvested site: {0}")]
    OffSite(String),
}

/// Why a page could not be turned into a document
///
/// Every variant ends the pagination chain for the current run. Keeping the
/// reason lets callers tell a failed download apart from a page that simply
/// had nothing on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection refused, timeout, or the body could not be read
    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    /// 5xx response that persisted through every retry
    #[error("Server error {status} for {url} after {attempts} attempts")]
    ServerError {
        url: String,
        status: u16,
        attempts: u32,
    },

    /// Any other status >= 400
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// Returns the HTTP status involved, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } => None,
            Self::ServerError { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
        }
    }
}

/// Result type alias for Table-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{harvest, HarvestOutcome, Row, StopReason};
pub use state::{HarvestPhase, HarvestState};
pub use crate::url::{base_url, extract_domain, parse_seed_url};
