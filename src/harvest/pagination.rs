//! Pagination link resolution
//!
//! Listing pages carry a `<div class="pagination">` with one link per page.
//! The link for the page being shown carries a `class` attribute; the next
//! page is the first plain link after it.

use crate::harvest::document::PageDocument;
use scraper::Selector;

/// CSS selector of the pagination region
pub const PAGINATION_SELECTOR: &str = "div.pagination";

/// Finds the relative link to the next page
///
/// Only the first pagination region on the page is considered.
///
/// # Returns
///
/// * `Some(String)` - The href of the link following the active one
/// * `None` - No pagination region, no active link, or the active link is last
///
/// # Example
///
/// ```
/// use table_harvest::harvest::{next_page_link, PageDocument};
///
/// let doc = PageDocument::parse(r#"
///     <div class="pagination">
///         <a class="active" href="/list">1</a>
///         <a href="/list/101">101</a>
///     </div>"#);
/// assert_eq!(next_page_link(&doc), Some("/list/101".to_string()));
/// ```
pub fn next_page_link(document: &PageDocument) -> Option<String> {
    tracing::debug!("About to get the next URL");

    let region_selector = Selector::parse(PAGINATION_SELECTOR).ok()?;
    let anchor_selector = Selector::parse("a").ok()?;

    let Some(region) = document.html().select(&region_selector).next() else {
        tracing::warn!("No paging data was found to determine the next page");
        return None;
    };

    let mut found_active = false;
    for anchor in region.select(&anchor_selector) {
        if anchor.value().attr("class").is_some() {
            found_active = true;
            continue;
        }

        if found_active {
            let href = anchor.value().attr("href").map(|href| href.trim().to_string());
            match &href {
                Some(next) if !next.is_empty() => {
                    tracing::debug!("The next page url to load is: {}", next);
                    return href;
                }
                _ => {
                    tracing::warn!("Link after the active page has no href");
                    return None;
                }
            }
        }
    }

    if found_active {
        tracing::debug!("Active page is the last one; no next page");
    } else {
        tracing::debug!("No active page link found in pagination");
    }
    None
}
