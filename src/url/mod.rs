//! URL handling module for Table-Harvest
//!
//! This module provides seed URL parsing, throttle key extraction, and
//! resolution of the relative links found in pagination controls.

mod domain;

pub use domain::extract_domain;

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses and checks a seed URL
///
/// Only `http` and `https` URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use table_harvest::url::parse_seed_url;
///
/// assert!(parse_seed_url("https://www.the-numbers.com/movie/budgets/all").is_ok());
/// assert!(parse_seed_url("ftp://example.com/").is_err());
/// ```
pub fn parse_seed_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Derives the base (scheme + host + port) URL of a seed
///
/// Pagination links are relative to this base. It is computed once per run.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use table_harvest::url::base_url;
///
/// let seed = Url::parse("https://www.the-numbers.com/movie/budgets/all?x=1").unwrap();
/// assert_eq!(base_url(&seed).unwrap().as_str(), "https://www.the-numbers.com/");
/// ```
pub fn base_url(seed: &Url) -> UrlResult<Url> {
    let origin = seed.origin();
    if !origin.is_tuple() {
        return Err(UrlError::MissingDomain);
    }

    Url::parse(&origin.ascii_serialization()).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Resolves a pagination link against the base URL
///
/// The result must stay on the base's origin; absolute and protocol-relative
/// links pointing elsewhere are rejected with `UrlError::OffSite`.
pub fn resolve_link(base: &Url, link: &str) -> UrlResult<Url> {
    let resolved = base
        .join(link.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", link, e)))?;

    if resolved.origin() != base.origin() {
        return Err(UrlError::OffSite(resolved.to_string()));
    }

    Ok(resolved)
}
