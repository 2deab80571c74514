// src/resolve/classify.rs
// =============================================================================
// URL classification: scheme normalization and known-shortener detection.
//
// Everything here is pure (no I/O) and never fails:
// - normalize() guarantees a scheme for outbound requests
// - is_known_shortener() checks the host against a configured host set
//
// Map keys always stay in their original form; the normalized form is only
// ever handed to the HTTP client.
// =============================================================================

use std::collections::HashSet;
use url::Url;

// Shorteners recognized when the user does not configure their own list
const DEFAULT_SHORTENERS: &[&str] = &[
    "bit.ly",
    "t.co",
    "goo.gl",
    "tinyurl.com",
    "ow.ly",
    "buff.ly",
    "bitly.com",
    "is.gd",
    "tiny.cc",
    "newspr.es",
    "ti.me",
];

/// A read-only set of link-shortener hostnames.
///
/// Hosts are stored lower-cased with any leading `www.` removed, matching how
/// [`is_known_shortener`] canonicalizes the host it looks up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenerHosts {
    hosts: HashSet<String>,
}

impl ShortenerHosts {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|h| canonical_host(h.as_ref().trim()))
            .filter(|h| !h.is_empty())
            .collect();
        Self { hosts }
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Default for ShortenerHosts {
    fn default() -> Self {
        Self::new(DEFAULT_SHORTENERS)
    }
}

// Adds http:// when the URL has no scheme
//
// Examples:
//   "Realtor.com"       -> "http://Realtor.com"
//   "http://example"    -> unchanged
//   "https://example"   -> unchanged
pub fn normalize(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

// Decides whether a URL points at one of the configured shorteners
//
// Unparsable URLs and URLs without a host are never shorteners.
pub fn is_known_shortener(url: &str, shorteners: &ShortenerHosts) -> bool {
    let Ok(parsed) = Url::parse(&normalize(url)) else {
        return false;
    };

    match parsed.host_str() {
        Some(host) => shorteners.contains(&canonical_host(host)),
        None => false,
    }
}

fn canonical_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}
