use serde::Deserialize;
use std::time::Duration;

/// The "all budgets" listing harvested when no seed is given
pub const DEFAULT_SEED_URL: &str = "https://www.the-numbers.com/movie/budgets/all";

/// User agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = "wswp";

/// Output file written when no path is given
pub const DEFAULT_CSV_PATH: &str = "movie_data.csv";

/// Main configuration structure for Table-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub harvest: HarvestConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Harvest loop behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// First page of the listing
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Minimum time between requests to the same domain (seconds, 0 disables)
    #[serde(rename = "delay-secs")]
    pub delay_secs: u64,

    /// How many times a 5xx response is retried
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl HarvestConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            delay_secs: 1,
            max_retries: 2,
            request_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Value of the User-Agent header
    pub name: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file receiving the harvested rows
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
        }
    }
}
