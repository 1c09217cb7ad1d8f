// src/page/filter.rs
// =============================================================================
// Keeps the crawl on one site.
//
// A link passes only if its host is EXACTLY the seed's host:
//   seed https://example.com
//   https://example.com/about     -> kept
//   https://blog.example.com/     -> dropped (subdomain = different host)
//   https://other.com/            -> dropped
//   mailto:someone@example.com    -> dropped (no host)
// =============================================================================

use super::{LinkFilter, LinkSet};
use url::Url;

#[derive(Debug, Clone)]
pub struct DomainFilter {
    host: String,
}

impl DomainFilter {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn allows(&self, link: &str) -> bool {
        Url::parse(link)
            .ok()
            .is_some_and(|url| url.host_str() == Some(self.host.as_str()))
    }
}

impl LinkFilter for DomainFilter {
    fn filter(&self, links: LinkSet) -> LinkSet {
        links.into_iter().filter(|link| self.allows(link)).collect()
    }
}
