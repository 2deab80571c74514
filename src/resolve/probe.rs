// src/resolve/probe.rs
// =============================================================================
// This module issues the actual network probes.
//
// Two probes exist:
// - StatusProbe: HEAD request following redirects, yields the status code
// - UnshortenProbe: GET request following redirects, yields the final URL
//
// A probe never returns an error. Timeouts, DNS failures, refused connections
// and malformed responses all collapse into ProbeOutcome::Failure; the reason
// only shows up in the logs.
//
// Rust concepts:
// - Traits: Probe lets the pool drive real HTTP probes and test fakes alike
// - Generics with associated types: Probe::Output is u16 or String
// - async fn in impl blocks: satisfies the `impl Future` in the trait
// =============================================================================

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::classify::normalize;

/// Result of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<T> {
    /// The probe got an answer (status code, or final URL after redirects)
    Success(T),
    /// Any transport-level failure; the kind is deliberately not exposed
    Failure,
}

impl<T> ProbeOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            ProbeOutcome::Success(value) => Some(value),
            ProbeOutcome::Failure => None,
        }
    }
}

/// A single network check against one URL.
///
/// Implementations take the URL in its original form and must be safe to
/// call concurrently from many in-flight futures.
pub trait Probe: Sync {
    type Output: Send;

    fn probe(&self, url: &str) -> impl Future<Output = ProbeOutcome<Self::Output>> + Send;
}

// Builds the HTTP client shared by both probes
//
// - timeout applies to each request individually
// - redirects use reqwest's default policy (up to 10 hops)
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::default())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

// Checks whether a URL answers, and with which status code
#[derive(Debug, Clone)]
pub struct StatusProbe {
    client: Client,
}

impl StatusProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Probe for StatusProbe {
    type Output = u16;

    async fn probe(&self, url: &str) -> ProbeOutcome<u16> {
        let normalized = normalize(url);

        match self.client.head(&normalized).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(url = %url, status, "status probe answered");
                ProbeOutcome::Success(status)
            }
            Err(e) => {
                warn!(url = %url, reason = failure_reason(&e), error = %e, "status probe failed");
                ProbeOutcome::Failure
            }
        }
    }
}

// Follows every redirect of a URL and reports where it ends up
#[derive(Debug, Clone)]
pub struct UnshortenProbe {
    client: Client,
}

impl UnshortenProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Probe for UnshortenProbe {
    type Output = String;

    async fn probe(&self, url: &str) -> ProbeOutcome<String> {
        let normalized = normalize(url);

        // The body is never read; dropping the response closes it
        match self.client.get(&normalized).send().await {
            Ok(response) => {
                let final_url = response.url().to_string();
                debug!(url = %url, final_url = %final_url, "unshortened");
                ProbeOutcome::Success(final_url)
            }
            Err(e) => {
                warn!(url = %url, reason = failure_reason(&e), error = %e, "unshorten probe failed");
                ProbeOutcome::Failure
            }
        }
    }
}

// Short label for a reqwest error, used only in log lines
fn failure_reason(error: &reqwest::Error) -> &'static str {
    let error_string = error.to_string().to_lowercase();

    if error.is_timeout() {
        "timeout"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_builder() {
        "invalid url"
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "dns"
        } else {
            "connect"
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "tls"
    } else {
        "other"
    }
}
