//! Integration tests for the harvester
//!
//! These tests use wiremock to serve paginated listing pages and exercise
//! the full fetch → extract → paginate cycle end-to-end.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use table_harvest::config::{Config, UserAgentConfig};
use table_harvest::harvest::{
    build_http_client, harvest, DomainThrottle, Harvester, PageFetcher, StopReason,
};
use table_harvest::output::write_csv;
use table_harvest::FetchError;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a harvester with a short timeout and the given throttle delay
fn create_harvester(delay: Duration, max_retries: u32) -> Harvester {
    let user_agent = UserAgentConfig {
        name: "wswp".to_string(),
    };
    let client = build_http_client(&user_agent, Duration::from_secs(5)).expect("client builds");
    Harvester::new(
        PageFetcher::new(client, max_retries),
        DomainThrottle::new(delay),
    )
}

/// Renders a listing page: two tables with three rows each and a pagination bar
///
/// The first table starts with a header row; `first` sets the movie numbering.
fn listing_page(first: usize, pagination: &str) -> String {
    let data_row = |n: usize| {
        format!(
            r#"<tr><td>{n}</td><td><a href="/box-office-chart/daily/2019/01/{n:02}">Jan {n}, 2019</a></td><td><b><a href="/movie/Movie-{n}#tab=summary">Movie {n}</a></b></td><td>${n},000,000</td></tr>"#
        )
    };

    format!(
        r#"<html><body>
        <table>
            <tr><th></th><th>Release Date</th><th>Movie</th><th>Production Budget</th></tr>
            {}
            {}
        </table>
        <table>
            {}
            {}
            {}
        </table>
        <div class="pagination">{}</div>
        </body></html>"#,
        data_row(first),
        data_row(first + 1),
        data_row(first + 2),
        data_row(first + 3),
        data_row(first + 4),
        pagination
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn seed(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("valid seed")
}

/// Shared buffer that collects formatted log lines
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Subscriber writing plain-text events into `log`
fn capture_subscriber(log: &CapturedLog) -> impl tracing::Subscriber + Send + Sync {
    let log = log.clone();
    tracing_subscriber::fmt()
        .with_writer(move || log.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish()
}

#[tokio::test]
async fn test_two_page_harvest() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/budgets/all"))
        .respond_with(html(listing_page(
            1,
            r#"<a class="active" href="/budgets/all">1</a><a href="/budgets/all/101">2</a>"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/budgets/all/101"))
        .respond_with(html(listing_page(
            101,
            r#"<a href="/budgets/all">1</a><a class="active" href="/budgets/all/101">2</a>"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut harvester = create_harvester(Duration::ZERO, 2);
    let outcome = harvester
        .run(&seed(&mock_server, "/budgets/all"))
        .await
        .expect("harvest runs");

    assert_eq!(outcome.stop, StopReason::Exhausted);
    assert_eq!(outcome.pages_fetched, 2);
    // Page 1: header + 5 data rows; page 2: 5 data rows (header not captured again)
    assert_eq!(outcome.rows.len(), 11);

    assert_eq!(
        outcome.rows[0],
        vec![
            "date URL",
            "Release Date",
            "summary URL",
            "Movie",
            "Production Budget"
        ]
    );
    assert_eq!(
        outcome.rows[1],
        vec![
            "/box-office-chart/daily/2019/01/01",
            "Jan 1, 2019",
            "/movie/Movie-1",
            "Movie 1",
            "$1,000,000"
        ]
    );
    assert_eq!(outcome.rows[6][3], "Movie 101");
    assert_eq!(outcome.rows[10][3], "Movie 105");
    assert!(outcome.rows[1..].iter().all(|row| row.len() == 5));
}

#[tokio::test]
async fn test_retries_server_errors_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html(listing_page(1, "")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let delay = Duration::from_millis(100);
    let mut harvester = create_harvester(delay, 2);
    let started = Instant::now();
    let outcome = harvester
        .run(&seed(&mock_server, "/flaky"))
        .await
        .expect("harvest runs");

    // Three throttled attempts to the same host means at least two full delays
    assert!(started.elapsed() >= delay * 2);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.rows.len(), 6);
    assert_eq!(outcome.stop, StopReason::Exhausted);
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut harvester = create_harvester(Duration::ZERO, 2);
    let outcome = harvester
        .run(&seed(&mock_server, "/down"))
        .await
        .expect("harvest runs");

    assert!(outcome.is_empty());
    assert_eq!(outcome.pages_fetched, 0);
    match outcome.stop {
        StopReason::FetchFailed(FetchError::ServerError {
            status, attempts, ..
        }) => {
            assert_eq!(status, 502);
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected stop reason: {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut harvester = create_harvester(Duration::ZERO, 2);
    let outcome = harvester
        .run(&seed(&mock_server, "/missing"))
        .await
        .expect("harvest runs");

    assert!(outcome.is_empty());
    match &outcome.stop {
        StopReason::FetchFailed(error) => assert_eq!(error.status(), Some(404)),
        other => panic!("unexpected stop reason: {:?}", other),
    }
}

#[tokio::test]
async fn test_failure_mid_run_keeps_earlier_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(html(listing_page(
            1,
            r#"<a class="active" href="/list">1</a><a href="/list/2">2</a>"#,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/list/2"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let mut harvester = create_harvester(Duration::ZERO, 2);
    let outcome = harvester
        .run(&seed(&mock_server, "/list"))
        .await
        .expect("harvest runs");

    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.rows.len(), 6);
    assert!(outcome.stop.is_failure());
    assert!(matches!(
        outcome.stop,
        StopReason::FetchFailed(FetchError::HttpStatus { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_page_without_tables() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(html(
            "<html><body><p>No results</p></body></html>".to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let log = CapturedLog::default();
    let _guard = tracing::subscriber::set_default(capture_subscriber(&log));

    let mut harvester = create_harvester(Duration::ZERO, 2);
    let outcome = harvester
        .run(&seed(&mock_server, "/empty"))
        .await
        .expect("harvest runs");

    assert!(outcome.is_empty());
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.stop, StopReason::Exhausted);

    let logged = log.contents();
    assert!(logged.contains("ERROR"));
    assert!(logged.contains("No movie information was found"));
}

#[tokio::test]
async fn test_client_error_during_retry_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut harvester = create_harvester(Duration::ZERO, 2);
    let outcome = harvester
        .run(&seed(&mock_server, "/gone"))
        .await
        .expect("harvest runs");

    assert!(outcome.is_empty());
    assert_eq!(outcome.pages_fetched, 0);
    assert!(matches!(
        outcome.stop,
        StopReason::FetchFailed(FetchError::HttpStatus { status: 404, .. })
    ));

    let requests = mock_server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_off_site_pagination_link_stops_harvest() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/budgets/all"))
        .respond_with(html(listing_page(
            1,
            r#"<a class="active" href="/budgets/all">1</a><a href="//evil.example/budgets/all/101">2</a>"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut harvester = create_harvester(Duration::ZERO, 2);
    let outcome = harvester
        .run(&seed(&mock_server, "/budgets/all"))
        .await
        .expect("harvest runs");

    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.rows.len(), 6);
    assert_eq!(
        outcome.stop,
        StopReason::InvalidLink("//evil.example/budgets/all/101".to_string())
    );
    assert!(outcome.stop.is_failure());
}

#[tokio::test]
async fn test_pages_are_throttled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p/1"))
        .respond_with(html(listing_page(
            1,
            r#"<a class="active" href="/p/1">1</a><a href="/p/2">2</a>"#,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p/2"))
        .respond_with(html(listing_page(
            6,
            r#"<a href="/p/1">1</a><a class="active" href="/p/2">2</a>"#,
        )))
        .mount(&mock_server)
        .await;

    let delay = Duration::from_millis(250);
    let mut harvester = create_harvester(delay, 0);
    let started = Instant::now();
    let outcome = harvester
        .run(&seed(&mock_server, "/p/1"))
        .await
        .expect("harvest runs");

    assert_eq!(outcome.pages_fetched, 2);
    assert!(started.elapsed() >= delay);
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "wswp"))
        .respond_with(html(listing_page(1, "")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut harvester = create_harvester(Duration::ZERO, 0);
    let outcome = harvester
        .run(&seed(&mock_server, "/ua"))
        .await
        .expect("harvest runs");

    assert_eq!(outcome.rows.len(), 6);
}

#[tokio::test]
async fn test_harvest_from_config_and_write_csv() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/budgets/all"))
        .respond_with(html(listing_page(1, "")))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.harvest.seed_url = format!("{}/budgets/all", mock_server.uri());
    config.harvest.delay_secs = 0;

    let outcome = harvest(&config).await.expect("harvest runs");
    assert_eq!(outcome.rows.len(), 6);

    let temp_dir = tempfile::TempDir::new().expect("temp dir");
    let csv_path = temp_dir.path().join("movie_data.csv");
    let written = write_csv(&csv_path, &outcome.rows).expect("csv written");
    assert_eq!(written, 6);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&csv_path)
        .expect("csv readable");
    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("records parse");

    assert_eq!(records.len(), 6);
    assert_eq!(&records[0][0], "date URL");
    assert_eq!(&records[1][3], "Movie 1");
    assert_eq!(&records[1][4], "$1,000,000");
}
