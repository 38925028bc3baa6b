use std::time::Duration;

use axum::http;
use reqwest::Client;

/// Build the HTTP client shared by both provider calls
///
/// `timeout` bounds each request end to end, including the body transfer.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .tcp_nodelay(true)
        .default_headers(headers)
        .build()
}
