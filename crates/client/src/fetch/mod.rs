//! HTTP transport for discovery and sending.
//!
//! ### Fetcher / Poster
//! - `Fetcher::get` follows redirects (default: 30) and exposes the final URL.
//! - `Poster::post_form` never follows redirects; 3xx responses come back as-is.
//! - Neither inspects the status code; callers decide what a status means.
//!
//! ### Safety Gates
//! - Request timeout (default: 15s)
//! - Max body bytes: 2MB (configurable). Larger bodies are dropped, headers kept.

pub mod url;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use self::url::{fragmentless, is_valid, resolve, validate};

use mention_core::{AppConfig, Error};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User agent string (default: "webmention-client/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 2MB)
    pub max_bytes: usize,

    /// Request timeout (default: 15s)
    pub timeout: Duration,

    /// Maximum number of redirects a GET follows (default: 30)
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "webmention-client/0.1".to_string(),
            max_bytes: 2_000_000,
            timeout: Duration::from_millis(15000),
            max_redirects: 30,
        }
    }
}

impl From<&AppConfig> for HttpConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// A captured HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response headers, repeated headers included
    pub headers: header::HeaderMap,
    /// Response body bytes
    pub body: Bytes,
    /// Time taken in milliseconds
    pub fetch_ms: u64,
}

impl HttpResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// `Location` header resolved against the requested URL.
    pub fn location(&self) -> Option<String> {
        let location = self.headers.get(header::LOCATION)?.to_str().ok()?;
        resolve(&self.url, location)
    }
}

/// Performs the discovery GET.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url`, following redirects, whatever the response status.
    async fn get(&self, url: &Url, headers: &header::HeaderMap) -> Result<HttpResponse, Error>;
}

/// Performs the webmention POST.
#[async_trait]
pub trait Poster: Send + Sync {
    /// POST `form` as `application/x-www-form-urlencoded` without following redirects.
    async fn post_form(
        &self, url: &Url, form: &[(&str, &str)], headers: &header::HeaderMap,
    ) -> Result<HttpResponse, Error>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn get(&self, url: &Url, headers: &header::HeaderMap) -> Result<HttpResponse, Error> {
        (**self).get(url, headers).await
    }
}

#[async_trait]
impl<T: Poster + ?Sized> Poster for Arc<T> {
    async fn post_form(
        &self, url: &Url, form: &[(&str, &str)], headers: &header::HeaderMap,
    ) -> Result<HttpResponse, Error> {
        (**self).post_form(url, form, headers).await
    }
}

/// reqwest-backed implementation of [`Fetcher`] and [`Poster`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    get: Client,
    post: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self, Error> {
        let get = Self::builder(&config)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {}", e)))?;

        let post = Self::builder(&config)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { get, post, config })
    }

    fn builder(config: &HttpConfig) -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
    }

    async fn capture(&self, url: &Url, response: reqwest::Response, start: Instant) -> Result<HttpResponse, Error> {
        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();

        let too_large = response
            .content_length()
            .is_some_and(|len| len as usize > self.config.max_bytes);

        let mut body = if too_large { Bytes::new() } else { response.bytes().await.map_err(Error::network)? };

        if too_large || body.len() > self.config.max_bytes {
            tracing::warn!("response from {} exceeds {} bytes, dropping body", final_url, self.config.max_bytes);
            body = Bytes::new();
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let fetch_ms = start.elapsed().as_millis() as u64;

        if url != &final_url {
            tracing::debug!("redirected {} -> {}", url, final_url);
        }
        tracing::debug!("received {} from {} in {}ms ({} bytes)", status.as_u16(), final_url, fetch_ms, body.len());

        Ok(HttpResponse { url: url.clone(), final_url, status, content_type, headers, body, fetch_ms })
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn get(&self, url: &Url, headers: &header::HeaderMap) -> Result<HttpResponse, Error> {
        let start = Instant::now();
        tracing::debug!("GET {}", url);

        let response = self
            .get
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await
            .map_err(Error::network)?;

        self.capture(url, response, start).await
    }
}

#[async_trait]
impl Poster for HttpClient {
    async fn post_form(
        &self, url: &Url, form: &[(&str, &str)], headers: &header::HeaderMap,
    ) -> Result<HttpResponse, Error> {
        let start = Instant::now();
        tracing::debug!("POST {}", url);

        let response = self
            .post
            .post(url.clone())
            .headers(headers.clone())
            .form(form)
            .send()
            .await
            .map_err(Error::network)?;

        self.capture(url, response, start).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string, header as header_eq, method, path},
    };

    fn client() -> HttpClient {
        HttpClient::new(HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_http_config_default() {
        let config = HttpConfig::default();
        assert_eq!(config.user_agent, "webmention-client/0.1");
        assert_eq!(config.max_bytes, 2_000_000);
        assert_eq!(config.timeout, Duration::from_millis(15000));
        assert_eq!(config.max_redirects, 30);
    }

    #[test]
    fn test_http_config_from_app_config() {
        let app = AppConfig { user_agent: "blog/1.0".into(), timeout_ms: 2500, ..Default::default() };
        let config = HttpConfig::from(&app);
        assert_eq!(config.user_agent, "blog/1.0");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_response_location() {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::LOCATION, "/moved#frag".parse().unwrap());
        let response = HttpResponse {
            url: Url::parse("http://endpoint/wm").unwrap(),
            final_url: Url::parse("http://endpoint/wm").unwrap(),
            status: StatusCode::FOUND,
            content_type: None,
            headers,
            body: Bytes::from_static(b"caf\xc3\xa9"),
            fetch_ms: 1,
        };

        assert_eq!(response.location(), Some("http://endpoint/moved".into()));
        assert_eq!(response.text(), "café");
    }

    #[tokio::test]
    async fn test_get_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
        let response = client().get(&url, &header::HeaderMap::new()).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.url, url);
        assert_eq!(response.final_url.path(), "/new");
        assert_eq!(response.text(), "hello");
    }

    #[tokio::test]
    async fn test_get_returns_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let response = client().get(&url, &header::HeaderMap::new()).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.text(), "missing");
    }

    #[tokio::test]
    async fn test_get_keeps_repeated_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("Link", "<http://a>; rel=\"me\"")
                    .append_header("Link", "<http://b>; rel=\"webmention\""),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let response = client().get(&url, &header::HeaderMap::new()).await.unwrap();
        assert_eq!(response.headers.get_all(header::LINK).iter().count(), 2);
    }

    #[tokio::test]
    async fn test_get_drops_oversized_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
            .mount(&server)
            .await;

        let client = HttpClient::new(HttpConfig { max_bytes: 16, ..Default::default() }).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let response = client.get(&url, &header::HeaderMap::new()).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_post_form_does_not_follow_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wm"))
            .and(header_eq("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("source=http%3A%2F%2Fa&target=http%3A%2F%2Fb"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/wm", server.uri())).unwrap();
        let response = client()
            .post_form(&url, &[("source", "http://a"), ("target", "http://b")], &header::HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(response.final_url, url);
        assert_eq!(response.location(), Some(format!("{}/elsewhere", server.uri())));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        drop(listener);

        let err = client().get(&url, &header::HeaderMap::new()).await.unwrap_err();
        assert!(err.is_network());
    }
}
