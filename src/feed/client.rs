use crate::config::Config;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors from a single fetch of the feed endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request URL did not parse, or is not http/https. No I/O was attempted.
    #[error("Invalid URL")]
    InvalidUrl,
    /// DNS, connect, TLS, timeout or body stream failure
    ///
    /// Always built via [`FetchError::network`], so the request URL (and the
    /// API key in its query) is not part of the message.
    #[error("Network error: {0}")]
    NetworkFailure(reqwest::Error),
    /// Anything other than 200 OK
    #[error("HTTP error: status {0}")]
    BadStatus(u16),
    /// Response body exceeded the 10MB limit
    #[error("Response too large")]
    ResponseTooLarge,
}

impl FetchError {
    fn network(err: reqwest::Error) -> Self {
        FetchError::NetworkFailure(err.without_url())
    }
}

/// HTTP client for the news endpoint.
///
/// Connections are not pooled: each fetch opens its own connection and
/// releases it when the response is dropped, on every return path.
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .pool_max_idle_per_host(0)
            .user_agent(concat!("headlines/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.read_timeout_secs),
        )
    }

    /// GETs `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] - `url` is malformed; checked before any I/O
    /// - [`FetchError::BadStatus`] - any status other than 200, body is not read
    /// - [`FetchError::NetworkFailure`] - connect/read timeouts included
    /// - [`FetchError::ResponseTooLarge`] - body over 10MB
    pub async fn fetch_raw(&self, url: &str) -> Result<String, FetchError> {
        let url = Url::parse(url).map_err(|_| FetchError::InvalidUrl)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl);
        }

        // The query string carries the API key; log host and path only.
        tracing::debug!(
            host = url.host_str().unwrap_or(""),
            path = url.path(),
            "Fetching news feed"
        );

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::network)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "News feed request failed");
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;

        // Invalid sequences become U+FFFD, as a UTF-8 stream reader would.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if usize::try_from(len).map_or(true, |len| len > limit) {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> FeedClient {
        FeedClient::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"response":{}}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/search?format=json", mock_server.uri());
        let body = client().fetch_raw(&url).await.unwrap();
        assert_eq!(body, r#"{"response":{}}"#);
    }

    #[tokio::test]
    async fn test_fetch_404_is_bad_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&mock_server)
            .await;

        match client().fetch_raw(&mock_server.uri()).await {
            Err(FetchError::BadStatus(404)) => {}
            other => panic!("Expected BadStatus(404), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_200_success_is_bad_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        match client().fetch_raw(&mock_server.uri()).await {
            Err(FetchError::BadStatus(204)) => {}
            other => panic!("Expected BadStatus(204), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_500_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client().fetch_raw(&mock_server.uri()).await;
        assert!(matches!(result, Err(FetchError::BadStatus(500))));
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_io() {
        assert!(matches!(
            client().fetch_raw("not a url").await,
            Err(FetchError::InvalidUrl)
        ));
        assert!(matches!(
            client().fetch_raw("ftp://example.com/feed").await,
            Err(FetchError::InvalidUrl)
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_failure() {
        // Bind then drop to get a local port with nothing listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let result = client().fetch_raw(&format!("http://127.0.0.1:{}/", port)).await;
        assert!(matches!(result, Err(FetchError::NetworkFailure(_))));
    }

    #[tokio::test]
    async fn test_network_failure_omits_request_url() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let url = format!("http://127.0.0.1:{}/search?q=news&api-key=SECRET-KEY-123", port);
        let err = client().fetch_raw(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::NetworkFailure(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"), "{}", err);
        assert!(!format!("{:?}", err).contains("SECRET-KEY-123"), "{:?}", err);
    }

    #[tokio::test]
    async fn test_read_timeout_is_network_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = FeedClient::new(DEFAULT_CONNECT_TIMEOUT, Duration::from_millis(200)).unwrap();
        let result = client.fetch_raw(&mock_server.uri()).await;
        assert!(matches!(result, Err(FetchError::NetworkFailure(_))));
    }

    #[tokio::test]
    async fn test_body_over_limit_is_too_large() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("0123456789"))
            .mount(&mock_server)
            .await;

        let response = reqwest::get(mock_server.uri()).await.unwrap();
        let result = read_limited_bytes(response, 4).await;
        assert!(matches!(result, Err(FetchError::ResponseTooLarge)));

        let response = reqwest::get(mock_server.uri()).await.unwrap();
        let bytes = read_limited_bytes(response, 10).await.unwrap();
        assert_eq!(bytes, b"0123456789");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'o', b'k', 0xff]))
            .mount(&mock_server)
            .await;

        let body = client().fetch_raw(&mock_server.uri()).await.unwrap();
        assert_eq!(body, "ok\u{fffd}");
    }
}
