/// Harvest state definitions for the page traversal loop
///
/// The loop cycles `Fetching -> Extracting -> Resolving` once per page and ends
/// in `Done` when a fetch fails or no next-page link is found.
use crate::harvest::Row;
use crate::HarvestError;
use std::fmt;
use url::Url;

/// Represents the step the harvest loop is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarvestPhase {
    /// Seed accepted, nothing requested yet
    Start,

    /// Downloading the current page
    Fetching,

    /// Pulling rows out of the downloaded page
    Extracting,

    /// Looking for the next page link
    Resolving,

    /// No more pages will be requested
    Done,
}

impl HarvestPhase {
    /// Returns true if no further processing will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` is a legal successor of this phase
    ///
    /// Any non-terminal phase may jump to `Done`; a failed fetch and a missing
    /// pagination link both end the run.
    pub fn can_transition_to(&self, next: HarvestPhase) -> bool {
        match (self, next) {
            (Self::Done, _) => false,
            (_, Self::Done) => true,
            (Self::Start, Self::Fetching) => true,
            (Self::Fetching, Self::Extracting) => true,
            (Self::Extracting, Self::Resolving) => true,
            (Self::Resolving, Self::Fetching) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Resolving => "resolving",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for HarvestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable state carried by the harvest loop across pages
#[derive(Debug, Clone)]
pub struct HarvestState {
    phase: HarvestPhase,

    /// Page to fetch next; `None` once the chain has ended
    pub current_url: Option<Url>,

    /// Scheme + host of the seed, used to resolve pagination links
    pub base_url: Url,

    /// Rows accumulated so far, in page order
    pub rows: Vec<Row>,

    /// Whether the header row has already been captured
    pub header_captured: bool,

    /// Number of pages successfully downloaded
    pub pages_fetched: usize,
}

impl HarvestState {
    pub fn new(seed: Url, base_url: Url) -> Self {
        Self {
            phase: HarvestPhase::Start,
            current_url: Some(seed),
            base_url,
            rows: Vec::new(),
            header_captured: false,
            pages_fetched: 0,
        }
    }

    pub fn phase(&self) -> HarvestPhase {
        self.phase
    }

    /// Moves to the next phase, rejecting illegal jumps
    pub fn transition(&mut self, next: HarvestPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::trace!("Harvest phase {} -> {}", self.phase, next);
        self.phase = next;
        if next.is_terminal() {
            self.current_url = None;
        }
        Ok(())
    }

    /// Appends one page's rows and marks the header as captured
    pub fn absorb_page(&mut self, rows: Vec<Row>) {
        self.rows.extend(rows);
        self.header_captured = true;
    }

    pub fn is_done(&self) -> bool {
        self.phase.is_terminal()
    }
}
