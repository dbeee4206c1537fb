use url::Url;

/// Extracts the throttle key (host plus any explicit port) from a URL
///
/// The host is lowercased. A port is only appended when the URL spells out a
/// non-default one, so `https://example.com/` and `https://example.com:443/`
/// share a key while two local test servers on different ports do not.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase domain, with `:port` when explicit
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use table_harvest::url::extract_domain;
///
/// let url = Url::parse("https://www.the-numbers.com/movie/budgets/all/501").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.the-numbers.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
