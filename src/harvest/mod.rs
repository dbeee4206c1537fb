//! Harvest module for paginated table scraping
//!
//! This module contains the core harvesting logic, including:
//! - Per-domain request throttling
//! - HTTP fetching with bounded 5xx retry
//! - Table row extraction
//! - Pagination link resolution
//! - The page traversal loop

mod coordinator;
mod document;
mod extractor;
mod fetcher;
mod pagination;
mod throttle;

pub use coordinator::{harvest_file, HarvestOutcome, Harvester, StopReason};
pub use document::PageDocument;
pub use extractor::{
    clean_text, extract_rows, strip_summary_fragment, Row, DATE_URL_LABEL, EMPTY_HEADER_LABEL,
    SUMMARY_FRAGMENT, SUMMARY_URL_LABEL,
};
pub use fetcher::{build_http_client, PageFetcher};
pub use pagination::{next_page_link, PAGINATION_SELECTOR};
pub use throttle::DomainThrottle;

use crate::config::Config;
use crate::url::parse_seed_url;
use crate::HarvestError;

/// Runs a complete harvest from the configured seed URL
///
/// This is the main entry point for a harvest. It will:
/// 1. Parse the seed URL
/// 2. Build the HTTP client and throttle
/// 3. Walk the pagination chain, collecting rows
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(HarvestOutcome)` - Rows gathered and why the run stopped
/// * `Err(HarvestError)` - The seed URL or HTTP client was unusable
pub async fn harvest(config: &Config) -> Result<HarvestOutcome, HarvestError> {
    let seed = parse_seed_url(&config.harvest.seed_url)?;
    let mut harvester = Harvester::from_config(config)?;
    harvester.run(&seed).await
}
