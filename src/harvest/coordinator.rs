//! Harvest coordinator - main pagination loop
//!
//! This module ties the other harvest pieces together:
//! - Fetching the current page through the throttle
//! - Extracting its table rows (header only on the first page)
//! - Resolving the next page link against the seed's base URL
//! - Stopping when no next page exists or a fetch fails

use crate::config::Config;
use crate::harvest::document::PageDocument;
use crate::harvest::extractor::{extract_rows, Row};
use crate::harvest::fetcher::PageFetcher;
use crate::harvest::pagination::next_page_link;
use crate::harvest::throttle::DomainThrottle;
use crate::state::{HarvestPhase, HarvestState};
use crate::url::{base_url, resolve_link};
use crate::{FetchError, HarvestError};
use std::path::Path;
use url::Url;

/// Why the harvest loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The last page had no next-page link
    Exhausted,

    /// A page could not be downloaded; rows gathered before it are kept
    FetchFailed(FetchError),

    /// The next-page link could not be turned into a URL
    InvalidLink(String),

    /// A single saved page was processed
    SinglePage,

    /// A saved page could not be read
    Unreadable(String),
}

impl StopReason {
    /// Returns true if the run ended because something went wrong
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed(_) | Self::InvalidLink(_) | Self::Unreadable(_)
        )
    }
}

/// Result of a harvest run
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    /// All rows in page order; the header row, if any, comes first
    pub rows: Vec<Row>,

    /// Number of pages downloaded successfully
    pub pages_fetched: usize,

    pub stop: StopReason,
}

impl HarvestOutcome {
    fn finish(rows: Vec<Row>, pages_fetched: usize, stop: StopReason) -> Self {
        if rows.is_empty() {
            tracing::error!("No movie information was found ({:?})", stop);
        } else {
            tracing::info!(
                "Harvest finished: {} rows from {} pages ({:?})",
                rows.len(),
                pages_fetched,
                stop
            );
        }

        Self {
            rows,
            pages_fetched,
            stop,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Main harvest coordinator
///
/// Owns the fetcher and the domain throttle for the length of a run.
pub struct Harvester {
    fetcher: PageFetcher,
    throttle: DomainThrottle,
}

impl Harvester {
    pub fn new(fetcher: PageFetcher, throttle: DomainThrottle) -> Self {
        Self { fetcher, throttle }
    }

    /// Creates a harvester from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = PageFetcher::from_config(config)?;
        let throttle = DomainThrottle::new(config.harvest.delay());
        Ok(Self::new(fetcher, throttle))
    }

    pub fn throttle(&self) -> &DomainThrottle {
        &self.throttle
    }

    /// Runs the pagination loop starting at `seed`
    ///
    /// Fetch failures end the loop without an error; whatever rows were
    /// gathered are returned along with the failure in `StopReason`.
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestOutcome)` - Rows and the reason the loop stopped
    /// * `Err(HarvestError)` - The seed has no usable base URL
    #[tracing::instrument(name = "harvest", skip_all, fields(seed = %seed))]
    pub async fn run(&mut self, seed: &Url) -> Result<HarvestOutcome, HarvestError> {
        tracing::debug!("About to get table data from initial url: {}", seed);
        let base = base_url(seed)?;
        tracing::debug!("The base url is: {}", base);

        let mut state = HarvestState::new(seed.clone(), base);

        let stop = loop {
            let Some(url) = state.current_url.clone() else {
                break StopReason::Exhausted;
            };

            state.transition(HarvestPhase::Fetching)?;
            let document = match self.fetcher.fetch(&url, &mut self.throttle).await {
                Ok(document) => document,
                Err(error) => {
                    tracing::warn!("Stopping harvest at {}: {}", url, error);
                    state.transition(HarvestPhase::Done)?;
                    break StopReason::FetchFailed(error);
                }
            };
            state.pages_fetched += 1;

            state.transition(HarvestPhase::Extracting)?;
            let rows = extract_rows(&document, !state.header_captured);
            tracing::info!("Extracted {} rows from {}", rows.len(), url);
            state.absorb_page(rows);

            state.transition(HarvestPhase::Resolving)?;
            match next_page_link(&document) {
                Some(link) => match resolve_link(&state.base_url, &link) {
                    Ok(next) => {
                        tracing::info!("Returned URL is: {}", next);
                        state.current_url = Some(next);
                    }
                    Err(e) => {
                        tracing::error!("Cannot follow pagination link {}: {}", link, e);
                        state.transition(HarvestPhase::Done)?;
                        break StopReason::InvalidLink(link);
                    }
                },
                None => {
                    tracing::info!("Returned URL is None");
                    state.transition(HarvestPhase::Done)?;
                    break StopReason::Exhausted;
                }
            }
        };

        Ok(HarvestOutcome::finish(state.rows, state.pages_fetched, stop))
    }
}

/// Extracts rows from one saved page without following pagination
///
/// A file that cannot be read is logged and yields an empty outcome.
pub fn harvest_file(path: &Path) -> HarvestOutcome {
    tracing::debug!("Loading source from local drive: {}", path.display());

    match PageDocument::load(path) {
        Ok(document) => {
            let rows = extract_rows(&document, true);
            HarvestOutcome::finish(rows, 1, StopReason::SinglePage)
        }
        Err(e) => {
            tracing::error!("The file, {}, could not be read: {}", path.display(), e);
            HarvestOutcome::finish(Vec::new(), 0, StopReason::Unreadable(e.to_string()))
        }
    }
}
