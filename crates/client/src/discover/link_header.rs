//! Webmention endpoints advertised in HTTP `Link` headers.

use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use std::sync::LazyLock;
use url::Url;

use crate::fetch::resolve;

/// Matches `<url>; rel=webmention`, quoted or not, and the `webmention.org` rel URL.
static LINK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>; rel=["']?(https?://)?webmention(\.org/?)?["']?"#).expect("invalid link header regex")
});

/// First webmention endpoint in the given `Link` header values, resolved
/// against `base` with its fragment removed.
///
/// Each header value is split on commas and the link-values are checked in
/// order; the first one that matches and resolves wins.
pub fn find_endpoint<'a>(values: impl IntoIterator<Item = &'a str>, base: &Url) -> Option<String> {
    values
        .into_iter()
        .flat_map(|value| value.split(','))
        .filter_map(|link| LINK_HEADER_RE.captures(link))
        .find_map(|caps| resolve(base, &caps[1]))
}

/// First webmention endpoint across every `Link` header in `headers`.
pub fn endpoint_from_headers(headers: &HeaderMap, base: &Url) -> Option<String> {
    find_endpoint(headers.get_all(LINK).iter().filter_map(|v| v.to_str().ok()), base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(value: &str) -> Option<String> {
        find_endpoint([value], &Url::parse("http://foo").unwrap())
    }

    #[test]
    fn test_unquoted() {
        assert_eq!(find("<http://endpoint>; rel=webmention"), Some("http://endpoint".into()));
    }

    #[test]
    fn test_quoted() {
        assert_eq!(find("<http://endpoint>; rel=\"webmention\""), Some("http://endpoint".into()));
        assert_eq!(find("<http://endpoint>; rel='webmention'"), Some("http://endpoint".into()));
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(find("<http://endpoint>; rel=\"webmention/\""), Some("http://endpoint".into()));
    }

    #[test]
    fn test_rel_url() {
        assert_eq!(find("<http://endpoint>; rel=\"https://webmention.org/\""), Some("http://endpoint".into()));
        assert_eq!(find("<http://endpoint>; rel=\"http://webmention.org\""), Some("http://endpoint".into()));
    }

    #[test]
    fn test_relative() {
        assert_eq!(find("</bar>; rel=\"webmention\""), Some("http://foo/bar".into()));
    }

    #[test]
    fn test_fragment_stripped() {
        assert_eq!(find("<http://endpoint/wm#x>; rel=webmention"), Some("http://endpoint/wm".into()));
    }

    #[test]
    fn test_other_rels_skipped() {
        assert_eq!(
            find("<http://foo>; rel=\"bar\", <http://endpoint>; rel=\"webmention\""),
            Some("http://endpoint".into())
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            find("<http://1>; rel=\"webmention\", <http://2>; rel=\"webmention\""),
            Some("http://1".into())
        );
    }

    #[test]
    fn test_empty_rel() {
        assert_eq!(find("<http://endpoint>; rel=\"\""), None);
        assert_eq!(find(""), None);
    }

    #[test]
    fn test_repeated_headers_in_order() {
        let mut headers = HeaderMap::new();
        headers.append(LINK, "<http://a>; rel=\"me\"".parse().unwrap());
        headers.append(LINK, "<http://b>; rel=webmention".parse().unwrap());
        headers.append(LINK, "<http://c>; rel=webmention".parse().unwrap());

        let base = Url::parse("http://foo").unwrap();
        assert_eq!(endpoint_from_headers(&headers, &base), Some("http://b".into()));
    }
}
