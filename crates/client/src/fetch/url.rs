//! URL validation and reference resolution.

use mention_core::Error;
use url::{ParseError, Url};

/// Whether a string is an absolute URL with a non-empty host.
pub fn is_valid(value: &str) -> bool {
    parse_absolute(value).is_some()
}

/// Parse an argument as an absolute URL with a host, naming it on failure.
pub fn validate(name: &'static str, value: &str) -> Result<Url, Error> {
    parse_absolute(value).ok_or_else(|| Error::invalid_argument(name, value))
}

fn parse_absolute(value: &str) -> Option<Url> {
    if value.is_empty() {
        return None;
    }

    Url::parse(value)
        .ok()
        .filter(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}

/// Strip the fragment (`#...`) from a URL string.
pub fn fragmentless(url: &str) -> &str {
    url.split_once('#').map_or(url, |(head, _)| head)
}

/// Resolve a possibly relative reference against `base` and drop its fragment.
///
/// Absolute references are returned as written (minus fragment) so that
/// `http://endpoint` stays `http://endpoint`. Returns `None` when the
/// reference cannot be resolved at all.
pub fn resolve(base: &Url, reference: &str) -> Option<String> {
    let reference = reference.trim();

    match Url::parse(reference) {
        Ok(_) => Some(fragmentless(reference).to_string()),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let mut joined = base.join(reference).ok()?;
            joined.set_fragment(None);
            Some(joined.into())
        }
        Err(_) => None,
    }
}
