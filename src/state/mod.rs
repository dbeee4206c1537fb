//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `HarvestPhase`: The step the harvest loop is in (start, fetching, extracting, resolving, done)
//! - `HarvestState`: Everything the loop carries between pages

mod harvest_state;

// Re-export main types
pub use harvest_state::{HarvestPhase, HarvestState};
