//! Endpoint cache keys.
//!
//! Keys are scoped to scheme and domain, with the site root tracked
//! separately from every other page on that domain.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// A hostname made of anything but whitespace and punctuation other than `-` and `.`.
static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"^[^\s!"#$%&'()*+,/:;<=>?@\[\\\]^_`{|}~]+$"##).expect("invalid host regex"));

/// Subdomains dropped from the front of a host, in this order.
const MINIMIZED_SUBDOMAINS: &[&str] = &["www.", "mobile.", "m."];

/// Extract the meaningful domain of a URL.
///
/// Lowercases the host and strips leading `www.`, `mobile.` and `m.` labels.
/// Returns `None` for URLs without a host and for hosts that are not plain
/// domain names (IPv6 literals, hosts with punctuation).
pub fn domain_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();

    let domain = MINIMIZED_SUBDOMAINS
        .iter()
        .fold(host.as_str(), |domain, prefix| domain.strip_prefix(prefix).unwrap_or(domain));

    if HOST_RE.is_match(domain) { Some(domain.to_string()) } else { None }
}

/// Key under which a discovered endpoint is cached.
///
/// Formatted as `{scheme} {domain}`, plus a trailing ` /` token when the URL
/// points at the site root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Compute the key for a URL, or `None` if no domain can be extracted.
    pub fn for_url(url: &Url) -> Option<Self> {
        let domain = domain_from_url(url)?;

        let mut key = format!("{} {}", url.scheme(), domain);
        if matches!(url.path(), "" | "/") {
            key.push_str(" /");
        }

        Some(Self(key))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
