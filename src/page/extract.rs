// src/page/extract.rs
// =============================================================================
// Pulls links out of HTML pages.
//
// For every <a href="..."> on the page we:
// 1. Resolve the href against the page URL ("/docs" -> "https://site/docs")
// 2. Drop the #fragment, so "/page#intro" and "/page" are the same page
//
// The result is a set, so a link that appears ten times is reported once.
// No filtering happens here: mailto:, other domains, etc. all come back and
// the LinkFilter decides what to keep.
//
// Sloppy hrefs the url crate refuses ("http://", "https://exa mple.com") are
// dropped with a debug log. Only a broken IPv6 host (e.g. "http://[::1")
// makes the whole page fail; the driver's ExtractionPolicy decides what
// happens next.
// =============================================================================

use super::{Extractor, LinkSet};
use crate::error::ExtractError;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

// Constant selector, parsed once
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("a[href] is a valid CSS selector"));

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HtmlExtractor {
    fn extract(&self, base_url: &str, content: &str) -> Result<LinkSet, ExtractError> {
        let base = Url::parse(base_url).map_err(|source| ExtractError::InvalidBase {
            base: base_url.to_string(),
            source,
        })?;

        let document = Html::parse_document(content);

        let mut links = LinkSet::new();
        for element in document.select(&LINK_SELECTOR) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            match resolve_link(&base, href) {
                Ok(link) => {
                    links.insert(link);
                }
                Err(ExtractError::UnresolvableHref { source, .. })
                    if source != url::ParseError::InvalidIpv6Address =>
                {
                    tracing::debug!(base = %base_url, %href, error = %source, "ignoring unresolvable link");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(links)
    }
}

// Resolves a (possibly relative) href into a canonical absolute URL
//
// Examples with base = "https://example.com/page/":
//   "/docs"                 -> "https://example.com/docs"
//   "../about#team"         -> "https://example.com/about"
//   "#top"                  -> "https://example.com/page/"
//   "https://other.com"     -> "https://other.com/"
pub fn resolve_link(base: &Url, href: &str) -> Result<String, ExtractError> {
    let mut url = base.join(href).map_err(|source| ExtractError::UnresolvableHref {
        href: href.to_string(),
        source,
    })?;
    url.set_fragment(None);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, base: &str) -> LinkSet {
        HtmlExtractor::new().extract(base, html).unwrap()
    }

    #[test]
    fn test_extract_relative_links() {
        let html = r#"<html><body><a href="/page1">Link 1</a><a href="/page2">Link 2</a></body></html>"#;
        let links = extract(html, "https://example.com");

        assert!(links.contains("https://example.com/page1"));
        assert!(links.contains("https://example.com/page2"));
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract(html, "https://example.com");
        assert!(links.contains("https://www.rust-lang.org/"));
    }

    #[test]
    fn test_fragments_are_removed() {
        let html = r#"<a href="/page#section">Link</a>"#;
        let links = extract(html, "https://example.com");

        assert!(links.contains("https://example.com/page"));
        assert!(!links.contains("https://example.com/page#section"));
    }

    #[test]
    fn test_fragment_only_link_points_at_the_page_itself() {
        let html = r##"<a href="#top">Top</a>"##;
        let links = extract(html, "https://example.com/page/");
        assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["https://example.com/page/"]);
    }

    #[test]
    fn test_tags_without_href_are_ignored() {
        let html = r#"<html><body><a>No href</a><a href="/page">With href</a></body></html>"#;
        let links = extract(html, "https://example.com");

        assert_eq!(links.len(), 1);
        assert!(links.contains("https://example.com/page"));
    }

    #[test]
    fn test_empty_page_has_no_links() {
        let links = extract("<html><body></body></html>", "https://example.com");
        assert!(links.is_empty());
    }

    #[test]
    fn test_duplicate_links_are_reported_once() {
        let html = r#"<a href="/page">Link 1</a><a href="/page">Link 2</a><a href="/page#x">3</a>"#;
        let links = extract(html, "https://example.com");
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_parent_relative_links() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract(html, "https://example.com/page/");

        assert!(links.contains("https://example.com/page/docs"));
        assert!(links.contains("https://example.com/about"));
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_unresolvable_href_is_an_error() {
        let html = r#"<a href="/ok">fine</a><a href="http://[::1">broken</a>"#;
        let err = HtmlExtractor::new()
            .extract("https://example.com", html)
            .unwrap_err();

        assert!(matches!(err, ExtractError::UnresolvableHref { ref href, .. } if href == "http://[::1"));
    }

    #[test]
    fn test_sloppy_hrefs_are_ignored() {
        let html = r#"<a href="/ok">fine</a><a href="http://">empty</a><a href="https://exa mple.com/x">space</a>"#;
        let links = extract(html, "https://example.com/");

        assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["https://example.com/ok"]);
    }

    #[test]
    fn test_invalid_base_is_an_error() {
        let err = HtmlExtractor::new()
            .extract("not a url", "<a href='/x'>x</a>")
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidBase { .. }));
    }

    #[test]
    fn test_resolve_link_keeps_query() {
        let base = Url::parse("https://example.com/search").unwrap();
        let url = resolve_link(&base, "?q=rust#results").unwrap();
        assert_eq!(url, "https://example.com/search?q=rust");
    }
}
