//! Indicators of compromise handed to the orchestrator.
//!
//! Extraction and enrichment happen upstream; this module only carries the
//! already-classified values and derives the domain block list from URLs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Classified indicators extracted from an incident.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Indicators {
    /// URLs observed in the incident.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Email addresses observed in the incident.
    #[serde(default)]
    pub emails: Vec<String>,
    /// IP addresses (carried through, not acted upon).
    #[serde(default)]
    pub ips: Vec<String>,
    /// File hashes (carried through, not acted upon).
    #[serde(default)]
    pub hashes: Vec<String>,
}

impl Indicators {
    /// Creates an empty indicator set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL indicator.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    /// Adds an email indicator.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.emails.push(email.into());
        self
    }

    /// Returns the sorted, deduplicated set of hosts found in the URLs.
    pub fn domains(&self) -> BTreeSet<String> {
        derive_domains(&self.urls)
    }
}

/// Extracts the host component of every parseable URL.
///
/// Malformed URLs and URLs without a host are skipped. The result is
/// independent of input order and duplicates.
pub fn derive_domains<S: AsRef<str>>(urls: &[S]) -> BTreeSet<String> {
    urls.iter()
        .filter_map(|raw| {
            let raw = raw.as_ref();
            match url::Url::parse(raw) {
                Ok(parsed) => parsed.host_str().map(|h| h.to_lowercase()),
                Err(e) => {
                    debug!(url = %raw, error = %e, "Skipping malformed URL indicator");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_domains_extracts_hosts() {
        let domains = derive_domains(&[
            "https://bad.example.com/x",
            "http://evil.test:8080/login?next=/",
        ]);
        let domains: Vec<_> = domains.into_iter().collect();
        assert_eq!(domains, vec!["bad.example.com", "evil.test"]);
    }

    #[test]
    fn test_derive_domains_skips_malformed() {
        let domains = derive_domains(&["not a url", "mailto:someone@example.com", "https://ok.test/"]);
        assert_eq!(domains.len(), 1);
        assert!(domains.contains("ok.test"));
    }

    #[test]
    fn test_derive_domains_order_independent() {
        let forward = derive_domains(&[
            "https://b.example.com/1",
            "https://a.example.com/2",
            "https://b.example.com/3",
        ]);
        let reversed = derive_domains(&[
            "https://b.example.com/3",
            "https://a.example.com/2",
            "https://b.example.com/1",
        ]);
        assert_eq!(forward, reversed);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_derive_domains_idempotent() {
        let once = derive_domains(&["https://X.example.com/a", "https://y.example.com"]);
        let as_urls: Vec<String> = once.iter().map(|d| format!("https://{}/", d)).collect();
        assert_eq!(derive_domains(&as_urls), once);
    }

    #[test]
    fn test_indicators_deserialize_partial() {
        let indicators: Indicators =
            serde_json::from_str(r#"{"urls": ["https://a.test/"]}"#).unwrap();
        assert_eq!(indicators.urls.len(), 1);
        assert!(indicators.emails.is_empty());
    }
}
