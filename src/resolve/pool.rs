// src/resolve/pool.rs
// =============================================================================
// The bounded concurrent executor behind both resolution passes.
//
// How it works:
// 1. Turn the URL set into a stream of probe futures
// 2. buffer_unordered(n) keeps at most n of them in flight
// 3. Results are harvested in completion order and inserted into a BTreeMap
//    keyed by the original URL, so the final map does not depend on timing
//
// Guarantees:
// - every input URL appears exactly once in the output
// - a panicking probe only costs its own URL (recorded as Failure)
// - with a deadline set, probes still running when it passes become Failure
// =============================================================================

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use futures::FutureExt; // catch_unwind()
use tokio::time::Instant;
use tracing::{debug, error, warn};

use super::probe::{Probe, ProbeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPool {
    max_workers: usize,
    deadline: Option<Duration>,
}

impl ResolutionPool {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            deadline: None,
        }
    }

    /// Caps the wall-clock time of a whole [`run`](Self::run).
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Probes every URL once, with at most `min(max_workers, urls.len())`
    /// probes in flight, and returns one outcome per URL.
    ///
    /// An empty URL set, or a pool with zero workers, yields an empty map
    /// without probing anything.
    pub async fn run<P>(
        &self,
        urls: &BTreeSet<String>,
        probe: &P,
    ) -> BTreeMap<String, ProbeOutcome<P::Output>>
    where
        P: Probe,
    {
        let mut results = BTreeMap::new();

        if urls.is_empty() {
            return results;
        }
        if self.max_workers == 0 {
            warn!(urls = urls.len(), "resolution pool has no workers, nothing probed");
            return results;
        }

        let workers = self.max_workers.min(urls.len());
        let deadline = self.deadline.map(|d| Instant::now() + d);
        debug!(urls = urls.len(), workers, "starting resolution pool");

        let mut in_flight = stream::iter(urls.iter())
            .map(|url| async move {
                let guarded = AssertUnwindSafe(probe.probe(url)).catch_unwind();
                let outcome = match deadline {
                    Some(at) => match tokio::time::timeout_at(at, guarded).await {
                        Ok(harvested) => harvested,
                        Err(_) => {
                            warn!(url = %url, "pool deadline reached before probe finished");
                            Ok(ProbeOutcome::Failure)
                        }
                    },
                    None => guarded.await,
                };
                (url, outcome)
            })
            .buffer_unordered(workers);

        // Single writer: only this loop touches `results`
        while let Some((url, harvested)) = in_flight.next().await {
            let outcome = match harvested {
                Ok(outcome) => outcome,
                Err(panic) => {
                    error!(url = %url, fault = panic_message(&*panic), "probe panicked");
                    ProbeOutcome::Failure
                }
            };
            results.insert(url.clone(), outcome);
        }

        results
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn url_set(urls: &[&str]) -> BTreeSet<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    // Succeeds with the URL length after a short sleep and records how many
    // calls overlapped at most
    struct CountingProbe {
        current: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl CountingProbe {
        fn new(delay: Duration) -> Self {
            Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
                delay,
            }
        }
    }

    impl Probe for CountingProbe {
        type Output = usize;

        async fn probe(&self, url: &str) -> ProbeOutcome<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            ProbeOutcome::Success(url.len())
        }
    }

    struct PanickyProbe;

    impl Probe for PanickyProbe {
        type Output = u16;

        async fn probe(&self, url: &str) -> ProbeOutcome<u16> {
            tokio::task::yield_now().await;
            if url.contains("boom") {
                panic!("probe exploded on {url}");
            }
            ProbeOutcome::Success(200)
        }
    }

    struct FailingProbe;

    impl Probe for FailingProbe {
        type Output = u16;

        async fn probe(&self, _url: &str) -> ProbeOutcome<u16> {
            ProbeOutcome::Failure
        }
    }

    #[tokio::test]
    async fn test_every_url_gets_exactly_one_entry() {
        let urls: BTreeSet<String> = (0..25).map(|i| format!("site{i}.com")).collect();
        let probe = CountingProbe::new(Duration::from_millis(1));

        let results = ResolutionPool::new(4).run(&urls, &probe).await;

        assert_eq!(results.len(), urls.len());
        assert_eq!(probe.calls.load(Ordering::SeqCst), urls.len());
        for url in &urls {
            assert_eq!(results[url], ProbeOutcome::Success(url.len()));
        }
    }

    #[tokio::test]
    async fn test_peak_concurrency_is_bounded() {
        let urls: BTreeSet<String> = (0..10).map(|i| format!("u{i}.org")).collect();
        let probe = CountingProbe::new(Duration::from_millis(20));

        let results = ResolutionPool::new(2).run(&urls, &probe).await;

        assert_eq!(results.len(), 10);
        let peak = probe.peak.load(Ordering::SeqCst);
        assert!(peak <= 2, "peak concurrency was {peak}");
        assert!(peak >= 1);
    }

    #[tokio::test]
    async fn test_workers_capped_by_url_count() {
        let urls = url_set(&["a.com", "b.com", "c.com"]);
        let probe = CountingProbe::new(Duration::from_millis(20));

        let results = ResolutionPool::new(50).run(&urls, &probe).await;

        assert_eq!(results.len(), 3);
        assert!(probe.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty_map() {
        let probe = CountingProbe::new(Duration::ZERO);
        let results = ResolutionPool::new(8).run(&BTreeSet::new(), &probe).await;

        assert!(results.is_empty());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_workers_returns_empty_map() {
        let probe = CountingProbe::new(Duration::ZERO);
        let results = ResolutionPool::new(0)
            .run(&url_set(&["a.com", "b.com"]), &probe)
            .await;

        assert!(results.is_empty());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_probe_does_not_abort_pool() {
        let urls = url_set(&["a.com", "boom.com", "c.com", "d.com"]);

        let results = ResolutionPool::new(2).run(&urls, &PanickyProbe).await;

        assert_eq!(results.len(), 4);
        assert_eq!(results["boom.com"], ProbeOutcome::Failure);
        assert_eq!(results["a.com"], ProbeOutcome::Success(200));
        assert_eq!(results["d.com"], ProbeOutcome::Success(200));
    }

    #[tokio::test]
    async fn test_always_failing_probe_still_fills_map() {
        let urls = url_set(&["x.com", "y.com"]);

        let results = ResolutionPool::new(3).run(&urls, &FailingProbe).await;

        assert_eq!(results.len(), 2);
        assert!(results.values().all(|o| *o == ProbeOutcome::Failure));
    }

    #[tokio::test]
    async fn test_deadline_turns_slow_probes_into_failures() {
        let urls = url_set(&["slow1.com", "slow2.com", "slow3.com"]);
        let probe = CountingProbe::new(Duration::from_secs(5));

        let started = std::time::Instant::now();
        let results = ResolutionPool::new(3)
            .with_deadline(Duration::from_millis(50))
            .run(&urls, &probe)
            .await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(results.len(), 3);
        assert!(results.values().all(|o| *o == ProbeOutcome::Failure));
    }

    #[tokio::test]
    async fn test_generous_deadline_changes_nothing() {
        let urls = url_set(&["a.com", "bb.com"]);
        let probe = CountingProbe::new(Duration::from_millis(1));

        let results = ResolutionPool::new(2)
            .with_deadline(Duration::from_secs(30))
            .run(&urls, &probe)
            .await;

        assert_eq!(results["a.com"], ProbeOutcome::Success(5));
        assert_eq!(results["bb.com"], ProbeOutcome::Success(6));
    }
}
