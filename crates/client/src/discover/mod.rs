//! Webmention endpoint discovery.
//!
//! ### Algorithm
//! - Serve from the endpoint cache when asked to and a live entry exists.
//! - Fetch the target once, following redirects. Any status is parsed.
//! - `Link` headers win over markup; first match in header order.
//! - Non-HTML content types end discovery with no endpoint.
//! - Otherwise the first `<link>`/`<a rel="webmention">` in document order.
//! - Optionally follow one `<meta http-equiv="refresh">`.
//!
//! Relative endpoints resolve against the final URL and lose their fragment.

pub mod html;
pub mod link_header;

use reqwest::header::HeaderMap;
use std::sync::Arc;
use url::Url;

use mention_core::{AppConfig, CacheKey, CachedEndpoint, EndpointCache, Error};

use crate::fetch::{Fetcher, HttpClient, HttpResponse, validate};

/// Options for a single discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    /// Consult the endpoint cache first and record the outcome in it.
    pub use_cache: bool,
    /// Follow at most one HTML meta refresh when no endpoint is found.
    pub follow_meta_refresh: bool,
    /// Extra headers sent with the discovery GET.
    pub headers: HeaderMap,
}

impl From<&AppConfig> for DiscoverOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            use_cache: config.use_cache,
            follow_meta_refresh: config.follow_meta_refresh,
            headers: HeaderMap::new(),
        }
    }
}

/// Result of discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryResult {
    /// The discovered endpoint, `None` if there is none.
    pub endpoint: Option<String>,
    /// The fetched response; `None` exactly when served from the cache.
    pub response: Option<HttpResponse>,
}

impl DiscoveryResult {
    pub fn is_cached(&self) -> bool {
        self.response.is_none()
    }
}

/// Outcome of fetching and scanning one URL.
struct Probe {
    endpoint: Option<String>,
    refresh: Option<String>,
    response: HttpResponse,
}

/// Discovers webmention endpoints, backed by a shared [`EndpointCache`].
pub struct Discoverer<F = HttpClient> {
    fetcher: F,
    cache: Arc<EndpointCache>,
}

impl<F: Fetcher> Discoverer<F> {
    pub fn new(fetcher: F, cache: Arc<EndpointCache>) -> Self {
        Self { fetcher, cache }
    }

    /// Get reference to the endpoint cache.
    pub fn cache(&self) -> &Arc<EndpointCache> {
        &self.cache
    }

    /// Discover the webmention endpoint for `url`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` if `url` is not an absolute URL with a host;
    ///   no request is made.
    /// - `Error::Network` if the fetch itself fails; nothing is cached.
    ///
    /// HTTP error statuses are not errors here: the response is still parsed.
    pub async fn discover(&self, url: &str, options: &DiscoverOptions) -> Result<DiscoveryResult, Error> {
        let url = validate("url", url)?;
        let key = CacheKey::for_url(&url);

        if options.use_cache
            && let Some(key) = &key
            && let Some(hit) = self.cache.get(key)
        {
            tracing::debug!("webmention discovery: cache hit for {}: {:?}", url, hit.endpoint());
            return Ok(DiscoveryResult { endpoint: hit.into_endpoint(), response: None });
        }

        tracing::debug!("webmention discovery: attempting for {}", url);
        let mut probe = self.probe(&url, &options.headers).await?;

        if probe.endpoint.is_none()
            && options.follow_meta_refresh
            && let Some(target) = probe.refresh.take()
            && let Ok(target) = Url::parse(&target)
            && target != url
        {
            tracing::debug!("webmention discovery: following meta refresh to {}", target);
            probe = self.probe(&target, &options.headers).await?;
            self.remember(options, CacheKey::for_url(&target), probe.endpoint.as_deref());
        }

        self.remember(options, key, probe.endpoint.as_deref());

        Ok(DiscoveryResult { endpoint: probe.endpoint, response: Some(probe.response) })
    }

    /// Fetch `url` once and look for an endpoint in headers, then markup.
    async fn probe(&self, url: &Url, headers: &HeaderMap) -> Result<Probe, Error> {
        let response = self.fetcher.get(url, headers).await?;
        let base = response.final_url.clone();

        if let Some(endpoint) = link_header::endpoint_from_headers(&response.headers, &base) {
            tracing::debug!("webmention discovery: got endpoint in Link header: {}", endpoint);
            return Ok(Probe { endpoint: Some(endpoint), refresh: None, response });
        }

        if let Some(content_type) = response.content_type.as_deref().map(str::trim).filter(|ct| !ct.is_empty())
            && !is_html(content_type)
        {
            tracing::debug!(
                "webmention discovery: no endpoint in headers and content type {} is not HTML",
                content_type
            );
            return Ok(Probe { endpoint: None, refresh: None, response });
        }

        let scan = html::scan(&response.text(), &base);
        match &scan.endpoint {
            Some(endpoint) => tracing::debug!("webmention discovery: got endpoint in tag: {}", endpoint),
            None => tracing::debug!("webmention discovery: no endpoint in headers or HTML"),
        }

        Ok(Probe { endpoint: scan.endpoint, refresh: scan.refresh, response })
    }

    fn remember(&self, options: &DiscoverOptions, key: Option<CacheKey>, endpoint: Option<&str>) {
        if !options.use_cache {
            return;
        }
        if let Some(key) = key {
            self.cache.put(key, CachedEndpoint::from(endpoint.map(str::to_string)));
        }
    }
}

/// Whether a Content-Type's media type, parameters ignored, is `text/html`.
fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("text/html"))
}
