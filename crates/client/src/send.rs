//! Sending webmentions.
//!
//! One form-encoded POST of `source` and `target` to the endpoint. Redirects
//! are handed back to the caller untouched, since following them would turn
//! the POST into a GET.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use mention_core::Error;

use crate::fetch::{HttpClient, HttpResponse, Poster, validate};

/// Sends webmentions to discovered endpoints.
pub struct Sender<P = HttpClient> {
    poster: P,
}

impl<P: Poster> Sender<P> {
    pub fn new(poster: P) -> Self {
        Self { poster }
    }

    /// Send a webmention from `source` to `target` via `endpoint`.
    ///
    /// `headers` are sent as given; `Accept: */*` is added unless the caller
    /// set an `Accept` of their own.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` naming the first of `endpoint`, `source`,
    ///   `target` that is not an absolute URL; no request is made.
    /// - `Error::HttpStatus` on a 4xx or 5xx response.
    /// - `Error::Network` if the request itself fails.
    ///
    /// 2xx and 3xx responses are returned unchanged.
    pub async fn send(
        &self, endpoint: &str, source: &str, target: &str, headers: &HeaderMap,
    ) -> Result<HttpResponse, Error> {
        let endpoint = validate("endpoint", endpoint)?;
        validate("source", source)?;
        validate("target", target)?;

        tracing::debug!("webmention send: {} -> {}", source, target);

        let mut headers = headers.clone();
        headers.entry(ACCEPT).or_insert(HeaderValue::from_static("*/*"));

        let response = self
            .poster
            .post_form(&endpoint, &[("source", source), ("target", target)], &headers)
            .await
            .inspect_err(|e| tracing::debug!("webmention send: got {}", e))?;

        tracing::debug!(
            "webmention send: got HTTP {} {}",
            response.status.as_u16(),
            response.location().unwrap_or_default()
        );

        if response.status.is_client_error() || response.status.is_server_error() {
            return Err(Error::HttpStatus { status: response.status.as_u16(), body: response.text().into_owned() });
        }

        Ok(response)
    }

    /// Like [`Sender::send`], but re-POSTs to each 3xx `Location`, up to
    /// `max_redirects` times.
    ///
    /// # Errors
    ///
    /// As [`Sender::send`], plus `Error::TooManyRedirects` once the bound is
    /// exhausted.
    pub async fn send_following_redirects(
        &self, endpoint: &str, source: &str, target: &str, headers: &HeaderMap, max_redirects: usize,
    ) -> Result<HttpResponse, Error> {
        let mut current = endpoint.to_string();

        for _ in 0..=max_redirects {
            let response = self.send(&current, source, target, headers).await?;

            match response.location() {
                Some(next) if response.status.is_redirection() => {
                    tracing::debug!("webmention send: re-posting to {}", next);
                    current = next;
                }
                _ => return Ok(response),
            }
        }

        Err(Error::TooManyRedirects { endpoint: endpoint.to_string(), limit: max_redirects })
    }
}
