//! Parsed page documents
//!
//! Pages are parsed once into a `scraper::Html` tree that the extractor and
//! the pagination resolver both walk.

use scraper::Html;
use std::path::Path;

/// A parsed HTML page
///
/// Created per request and dropped at the end of the iteration that
/// processed it.
#[derive(Debug)]
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    /// Parses raw page text into a traversable document
    ///
    /// # Example
    ///
    /// ```
    /// use table_harvest::harvest::PageDocument;
    ///
    /// let doc = PageDocument::parse("<table><tr><td>1</td></tr></table>");
    /// assert!(!doc.html().root_element().html().is_empty());
    /// ```
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Parses raw bytes, replacing invalid UTF-8 sequences
    pub fn from_bytes(body: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(body))
    }

    /// Loads a saved page from disk
    ///
    /// # Returns
    ///
    /// * `Ok(PageDocument)` - The parsed page
    /// * `Err(std::io::Error)` - The file could not be read
    pub fn load(path: &Path) -> std::io::Result<Self> {
        tracing::debug!("Reading saved page from {}", path.display());
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}
