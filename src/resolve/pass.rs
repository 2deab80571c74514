// src/resolve/pass.rs
// =============================================================================
// The two resolution passes and the Resolver that runs them over HTTP.
//
// Status pass:    all URLs -> pool(StatusProbe)    -> StatusMap + summary
// Unshorten pass: all URLs -> policy -> pool(UnshortenProbe) -> UnshortenMap
//
// The pass functions are generic over the probe so they can be driven by
// in-process fakes; Resolver plugs in the real reqwest-backed probes.
// =============================================================================

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::info;

use super::aggregate::{self, StatusMap, StatusSummary, UnshortenMap, PREVIEW_LEN};
use super::classify::ShortenerHosts;
use super::policy::{select_targets, PolicyWarning, ResolutionMode};
use super::pool::ResolutionPool;
use super::probe::{build_client, Probe, StatusProbe, UnshortenProbe};
use crate::config::ResolutionConfig;
use crate::error::ResolveError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub statuses: StatusMap,
    pub summary: StatusSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnshortenReport {
    pub resolved: UnshortenMap,
    /// Size of the full URL set the selection started from
    pub total_urls: usize,
    pub shortener_candidates: usize,
    pub warning: Option<PolicyWarning>,
    pub elapsed: Duration,
}

pub async fn run_status_pass<P>(
    urls: &BTreeSet<String>,
    pool: &ResolutionPool,
    probe: &P,
) -> StatusReport
where
    P: Probe<Output = u16>,
{
    if urls.is_empty() {
        info!("no URLs to check");
        return StatusReport {
            statuses: StatusMap::new(),
            summary: StatusSummary::default(),
        };
    }

    info!(urls = urls.len(), workers = pool.max_workers(), "checking URL status");

    let statuses = aggregate::status_map(pool.run(urls, probe).await);
    let summary = aggregate::summarize(&statuses);

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "status check finished"
    );
    for (url, status) in aggregate::preview(&statuses, PREVIEW_LEN) {
        info!("  {url} -> {status:?}");
    }

    StatusReport { statuses, summary }
}

pub async fn run_unshorten_pass<P>(
    urls: &BTreeSet<String>,
    mode: &ResolutionMode,
    shorteners: &ShortenerHosts,
    pool: &ResolutionPool,
    probe: &P,
) -> UnshortenReport
where
    P: Probe<Output = String>,
{
    let started = Instant::now();
    let selection = select_targets(urls, mode, shorteners);

    let resolved = if selection.targets.is_empty() {
        info!(mode = %mode, "no URLs to unshorten");
        UnshortenMap::new()
    } else {
        info!(
            targets = selection.targets.len(),
            total = urls.len(),
            "unshortening URLs"
        );
        aggregate::unshorten_map(pool.run(&selection.targets, probe).await)
    };

    let elapsed = started.elapsed();
    info!(
        resolved = resolved.len(),
        elapsed = ?elapsed,
        "unshorten finished"
    );
    for (original, final_url) in aggregate::preview(&resolved, PREVIEW_LEN) {
        info!("  {original} -> {final_url}");
    }

    UnshortenReport {
        resolved,
        total_urls: urls.len(),
        shortener_candidates: selection.shortener_candidates,
        warning: selection.warning,
        elapsed,
    }
}

/// Runs both passes with real HTTP probes built from one [`ResolutionConfig`].
pub struct Resolver {
    pool: ResolutionPool,
    mode: ResolutionMode,
    shorteners: ShortenerHosts,
    status_probe: StatusProbe,
    unshorten_probe: UnshortenProbe,
}

impl Resolver {
    pub fn new(config: &ResolutionConfig) -> Result<Self, ResolveError> {
        let client = build_client(config.request_timeout).map_err(ResolveError::Client)?;

        let mut pool = ResolutionPool::new(config.max_workers);
        if let Some(deadline) = config.deadline {
            pool = pool.with_deadline(deadline);
        }

        Ok(Self {
            pool,
            mode: config.mode.clone(),
            shorteners: config.shortener_hosts.clone(),
            status_probe: StatusProbe::new(client.clone()),
            unshorten_probe: UnshortenProbe::new(client),
        })
    }

    pub async fn status_map(&self, urls: &BTreeSet<String>) -> StatusReport {
        run_status_pass(urls, &self.pool, &self.status_probe).await
    }

    pub async fn unshorten_map(&self, urls: &BTreeSet<String>) -> UnshortenReport {
        run_unshorten_pass(
            urls,
            &self.mode,
            &self.shorteners,
            &self.pool,
            &self.unshorten_probe,
        )
        .await
    }
}
