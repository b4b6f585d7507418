//! Webmention endpoints advertised in HTML markup.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::fetch::resolve;

/// `rel` tokens that mark a webmention endpoint.
const WEBMENTION_RELS: &[&str] = &["webmention", "http://webmention.org/"];

static LINK_OR_A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("link, a").expect("invalid selector"));
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta[http-equiv]").expect("invalid selector"));

/// What an HTML scan turned up, already resolved against the base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlScan {
    /// First `<link>` or `<a>` with a webmention rel and a non-empty href.
    pub endpoint: Option<String>,
    /// Target of the first `<meta http-equiv="refresh">`, if any.
    pub refresh: Option<String>,
}

/// Scan an HTML document for a webmention endpoint and a meta refresh target.
///
/// Elements are checked in document order.
pub fn scan(html: &str, base: &Url) -> HtmlScan {
    let document = Html::parse_document(html);

    let endpoint = document
        .select(&LINK_OR_A)
        .filter(|el| el.value().attr("rel").is_some_and(is_webmention_rel))
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| !href.is_empty())
        .find_map(|href| resolve(base, href));

    let refresh = document
        .select(&META)
        .find(|el| {
            el.value()
                .attr("http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("refresh"))
        })
        .and_then(|el| el.value().attr("content"))
        .and_then(refresh_target)
        .and_then(|target| resolve(base, target));

    HtmlScan { endpoint, refresh }
}

fn is_webmention_rel(rel: &str) -> bool {
    rel.split_ascii_whitespace().any(|token| WEBMENTION_RELS.contains(&token))
}

/// URL after the last `URL=` in a refresh `content` value, quotes stripped.
fn refresh_target(content: &str) -> Option<&str> {
    let idx = content.to_ascii_lowercase().rfind("url=")?;
    let target = content[idx + 4..].trim().trim_matches(|c| c == '\'' || c == '"');
    if target.is_empty() { None } else { Some(target) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(body: &str) -> Option<String> {
        scan(&format!("<html>{body}</html>"), &Url::parse("http://foo").unwrap()).endpoint
    }

    #[test]
    fn test_no_endpoint() {
        assert_eq!(endpoint(""), None);
    }

    #[test]
    fn test_link() {
        assert_eq!(endpoint(r#"<link rel="webmention" href="http://endpoint">"#), Some("http://endpoint".into()));
    }

    #[test]
    fn test_a() {
        assert_eq!(endpoint(r#"<a rel="webmention" href="http://endpoint">"#), Some("http://endpoint".into()));
    }

    #[test]
    fn test_relative() {
        assert_eq!(endpoint(r#"<link rel="webmention" href="/bar">"#), Some("http://foo/bar".into()));
    }

    #[test]
    fn test_rel_url() {
        assert_eq!(endpoint(r#"<link rel="http://webmention.org/" href="/bar">"#), Some("http://foo/bar".into()));
    }

    #[test]
    fn test_rel_token_list() {
        assert_eq!(endpoint(r#"<link rel="me webmention" href="/wm">"#), Some("http://foo/wm".into()));
    }

    #[test]
    fn test_document_order() {
        let body = r#"
            <a rel="webmention" href="http://endpoint1">
            <link rel="webmention" href="http://endpoint2">
        "#;
        assert_eq!(endpoint(body), Some("http://endpoint1".into()));
    }

    #[test]
    fn test_other_links_skipped() {
        let body = r#"
            <link rel="foo" href="http://bar">
            <link rel="webmention" href="http://endpoint">
        "#;
        assert_eq!(endpoint(body), Some("http://endpoint".into()));
    }

    #[test]
    fn test_empty_href_skipped() {
        assert_eq!(endpoint(r#"<link rel="webmention/" href="">"#), None);
        let body = r#"
            <link rel="webmention" href="">
            <a rel="webmention" href="/second">
        "#;
        assert_eq!(endpoint(body), Some("http://foo/second".into()));
    }

    #[test]
    fn test_fragment_stripped() {
        assert_eq!(endpoint(r#"<link rel="webmention" href="/wm#here">"#), Some("http://foo/wm".into()));
    }

    #[test]
    fn test_meta_refresh() {
        let base = Url::parse("http://foo/post").unwrap();
        let html = r#"<html><head><meta http-equiv="refresh" content="0; URL='/moved#top'"></head></html>"#;
        let scan = scan(html, &base);
        assert_eq!(scan.endpoint, None);
        assert_eq!(scan.refresh, Some("http://foo/moved".into()));
    }

    #[test]
    fn test_refresh_target() {
        assert_eq!(refresh_target("0;URL=http://a"), Some("http://a"));
        assert_eq!(refresh_target("5; url=\"/b\""), Some("/b"));
        assert_eq!(refresh_target("5"), None);
        assert_eq!(refresh_target("0; URL="), None);
    }
}
