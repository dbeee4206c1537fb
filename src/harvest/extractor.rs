//! Table row extraction
//!
//! Walks every `<table>` of a page and turns each `<tr>` into a row of string
//! fields. Linked cells contribute their href as an extra field ahead of the
//! cell text, and the leading rank column is dropped from every row.

use crate::harvest::document::PageDocument;
use scraper::{ElementRef, Selector};

/// One extracted table row
pub type Row = Vec<String>;

/// Fragment appended to links that open a title's summary tab
pub const SUMMARY_FRAGMENT: &str = "#tab=summary";

/// Label used for header cells with no text
pub const EMPTY_HEADER_LABEL: &str = "Column";

/// Header label for the link field preceding the 2nd column
pub const DATE_URL_LABEL: &str = "date URL";

/// Header label for the link field preceding the 3rd column
pub const SUMMARY_URL_LABEL: &str = "summary URL";

struct TableSelectors {
    table: Selector,
    row: Selector,
    header_cell: Selector,
    data_cell: Selector,
    anchor: Selector,
}

impl TableSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            table: Selector::parse("table").ok()?,
            row: Selector::parse("tr").ok()?,
            header_cell: Selector::parse("th").ok()?,
            data_cell: Selector::parse("td").ok()?,
            anchor: Selector::parse("a").ok()?,
        })
    }
}

/// Extracts all table rows of a page
///
/// When `capture_header` is true, `<th>` cells are turned into a header row.
/// Rows without any fields are skipped.
///
/// # Example
///
/// ```
/// use table_harvest::harvest::{extract_rows, PageDocument};
///
/// let doc = PageDocument::parse(
///     r#"<table><tr><td>1</td><td>Avatar</td><td>$237,000,000</td></tr></table>"#,
/// );
/// let rows = extract_rows(&doc, false);
/// assert_eq!(rows, vec![vec!["Avatar".to_string(), "$237,000,000".to_string()]]);
/// ```
pub fn extract_rows(document: &PageDocument, capture_header: bool) -> Vec<Row> {
    tracing::debug!("About to extract page data");

    let Some(selectors) = TableSelectors::new() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for table in document.html().select(&selectors.table) {
        for tr in table.select(&selectors.row) {
            let mut fields = Vec::new();

            if capture_header {
                push_header_fields(&tr, &selectors, &mut fields);
            }
            push_data_fields(&tr, &selectors, &mut fields);

            // First column is the repeating 1..100 rank
            if fields.len() <= 1 {
                if !fields.is_empty() {
                    tracing::debug!("Skipping row with only a rank column");
                }
                continue;
            }
            fields.remove(0);
            rows.push(fields);
        }
    }

    tracing::debug!("Extracted {} rows", rows.len());
    rows
}

fn push_header_fields(tr: &ElementRef<'_>, selectors: &TableSelectors, fields: &mut Row) {
    for (idx, th) in tr.select(&selectors.header_cell).enumerate() {
        let label = clean_text(&th.text().collect::<String>());
        if label.is_empty() {
            fields.push(EMPTY_HEADER_LABEL.to_string());
            continue;
        }

        // Data rows carry a link field ahead of these two columns
        match idx {
            1 => fields.push(DATE_URL_LABEL.to_string()),
            2 => fields.push(SUMMARY_URL_LABEL.to_string()),
            _ => {}
        }
        tracing::debug!("Found a header: {}", label);
        fields.push(label);
    }
}

fn push_data_fields(tr: &ElementRef<'_>, selectors: &TableSelectors, fields: &mut Row) {
    for td in tr.select(&selectors.data_cell) {
        let href = td
            .select(&selectors.anchor)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .filter(|href| !href.is_empty());

        if let Some(href) = href {
            fields.push(strip_summary_fragment(href).to_string());
        }
        fields.push(clean_text(&td.text().collect::<String>()));
    }
}

/// Cuts a link at the summary-tab fragment, if present
///
/// ```
/// use table_harvest::harvest::strip_summary_fragment;
///
/// assert_eq!(strip_summary_fragment("/movie/Avatar#tab=summary"), "/movie/Avatar");
/// assert_eq!(strip_summary_fragment("/box-office-chart/daily/2009/12/18"), "/box-office-chart/daily/2009/12/18");
/// ```
pub fn strip_summary_fragment(href: &str) -> &str {
    match href.find(SUMMARY_FRAGMENT) {
        Some(index) => &href[..index],
        None => href,
    }
}

/// Removes newlines and collapses runs of whitespace to single spaces
///
/// ```
/// use table_harvest::harvest::clean_text;
///
/// assert_eq!(clean_text("\n   Production\n   Budget  "), "Production Budget");
/// ```
pub fn clean_text(text: &str) -> String {
    text.replace('\n', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
