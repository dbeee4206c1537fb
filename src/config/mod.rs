//! Configuration module for Table-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional, so a harvest can also run from defaults and CLI flags alone.
//!
//! # Example
//!
//! ```no_run
//! use table_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Throttle delay: {}s", config.harvest.delay_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HarvestConfig, OutputConfig, UserAgentConfig, DEFAULT_CSV_PATH, DEFAULT_SEED_URL,
    DEFAULT_USER_AGENT,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
