//! Per-domain request throttle
//!
//! Keeps the time each domain was last touched and makes the caller wait until
//! the configured delay has passed before touching it again.

use crate::url::extract_domain;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Enforces a minimum interval between requests to the same domain
///
/// A domain that has never been seen is not delayed. A zero delay disables
/// throttling. The registry is owned by one harvest run and is not shared, so
/// the wait and the timestamp update happen in one `&mut self` call.
#[derive(Debug)]
pub struct DomainThrottle {
    delay: Duration,

    /// Last access time per domain
    domains: HashMap<String, Instant>,
}

impl DomainThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            domains: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the last recorded access to a domain
    pub fn last_access(&self, domain: &str) -> Option<Instant> {
        self.domains.get(domain).copied()
    }

    /// Calculates how long a request to `domain` issued at `now` must wait
    ///
    /// Returns None if the request can go out immediately.
    pub fn time_until_ready(&self, domain: &str, now: Instant) -> Option<Duration> {
        if self.delay.is_zero() {
            return None;
        }

        let last = self.domains.get(domain)?;
        let elapsed = now.saturating_duration_since(*last);
        if elapsed < self.delay {
            Some(self.delay - elapsed)
        } else {
            None
        }
    }

    /// Waits until `url`'s domain may be requested again, then records the access
    ///
    /// The access time is recorded whether or not a wait happened. URLs without
    /// a host are not throttled.
    pub async fn wait(&mut self, url: &Url) {
        let Some(domain) = extract_domain(url) else {
            tracing::warn!("Cannot throttle {}: no host", url);
            return;
        };
        tracing::debug!("The domain name, {}, is derived from {}", domain, url);

        if let Some(sleep_for) = self.time_until_ready(&domain, Instant::now()) {
            tracing::info!(
                "Throttling domain: {} for {:?} (delay {:?})",
                domain,
                sleep_for,
                self.delay
            );
            tokio::time::sleep(sleep_for).await;
        }

        self.record_access(domain, Instant::now());
    }

    /// Stores `now` as the domain's last access, never moving it backwards
    fn record_access(&mut self, domain: String, now: Instant) {
        let entry = self.domains.entry(domain).or_insert(now);
        if now > *entry {
            *entry = now;
        }
    }
}
