use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::parser::{parse_articles, ParseError, ParseResult};

/// Response bodies above this size are rejected.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Maximum redirect hops before giving up.
const MAX_REDIRECTS: usize = 3;

/// Errors that can occur while loading the article list.
///
/// None of these are fatal to a host: the controller turns each of them into
/// an error notice with a retry affordance.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Body is not JSON or not a JSON array
    #[error("Malformed response: {0}")]
    Format(#[from] ParseError),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Create the redirect policy: at most 3 hops, loops rejected.
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Build the HTTP client used for article fetches.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("blogfeed/", env!("CARGO_PKG_VERSION")))
        .redirect(redirect_policy())
        .build()?;
    Ok(client)
}

/// Loads the article list from a fixed read-only endpoint.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(client: reqwest::Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue one GET to the endpoint and parse the body into articles.
    ///
    /// The whole exchange (headers and body) runs under the timeout; when it
    /// elapses the request future is dropped, which cancels the request.
    /// No retry is attempted on any failure.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] - the timeout elapsed
    /// - [`FetchError::Network`] - connection, TLS or body stream failure
    /// - [`FetchError::HttpStatus`] - non-2xx response
    /// - [`FetchError::ResponseTooLarge`] / [`FetchError::IncompleteResponse`]
    /// - [`FetchError::Format`] - body is not a JSON array
    pub async fn fetch_articles(&self) -> Result<ParseResult, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching articles");

        let bytes = tokio::time::timeout(self.timeout, self.fetch_body())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        let result = parse_articles(&bytes)?;

        if result.skipped > 0 {
            tracing::warn!(
                endpoint = %self.endpoint,
                skipped = result.skipped,
                "Invalid article records skipped"
            );
        }
        tracing::info!(count = result.articles.len(), "Articles loaded");

        Ok(result)
    }

    async fn fetch_body(&self) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        read_limited_bytes(response, MAX_BODY_SIZE).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_BODY: &str = r#"[
        {"title": "Premier", "slug": "premier", "content": "Texte"},
        {"title": "", "slug": "invalide"},
        {"title": "Second", "slug": "second", "tags": ["rust"]}
    ]"#;

    fn fetcher_for(server: &MockServer, timeout: Duration) -> Fetcher {
        let endpoint = Url::parse(&format!("{}/api/articles", server.uri())).unwrap();
        Fetcher::new(build_client().unwrap(), endpoint, timeout)
    }

    #[tokio::test]
    async fn test_fetch_success_filters_invalid_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(header("accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_BODY)
                    .insert_header("Content-Type", "application/json"),
            )
            .mount(&server)
            .await;

        let result = fetcher_for(&server, Duration::from_secs(10))
            .fetch_articles()
            .await
            .unwrap();

        assert_eq!(result.articles.len(), 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.articles[0].slug, "premier");
        assert_eq!(result.articles[1].slug, "second");
    }

    #[tokio::test]
    async fn test_fetch_404_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher_for(&server, Duration::from_secs(10))
            .fetch_articles()
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus(404) => {}
            e => panic!("Expected HttpStatus(404), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_fetch_500_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = fetcher_for(&server, Duration::from_secs(10))
            .fetch_articles()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(500)));
    }

    #[tokio::test]
    async fn test_non_array_body_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error": "nope"}"#))
            .mount(&server)
            .await;

        let err = fetcher_for(&server, Duration::from_secs(10))
            .fetch_articles()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Format(ParseError::NotAnArray("object"))
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = fetcher_for(&server, Duration::from_secs(10))
            .fetch_articles()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Format(ParseError::Json(_))));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = fetcher_for(&server, Duration::from_millis(200))
            .fetch_articles()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_millis(200)));
        assert_eq!(err.to_string(), "Request timed out after 200ms");
    }

    #[tokio::test]
    async fn test_empty_array_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let result = fetcher_for(&server, Duration::from_secs(10))
            .fetch_articles()
            .await
            .unwrap();
        assert!(result.articles.is_empty());
    }
}
