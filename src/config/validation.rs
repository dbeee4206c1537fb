use crate::config::types::{Config, HarvestConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

const MAX_RETRIES_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvest_config(&config.harvest)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates harvest loop configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    let seed = Url::parse(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url: {}", e)))?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "seed-url must use http or https, got '{}'",
            seed.scheme()
        )));
    }

    if seed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "seed-url has no host: {}",
            config.seed_url
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if config.name.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user-agent name contains control characters: {:?}",
            config.name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
