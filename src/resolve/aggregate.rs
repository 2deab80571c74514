// src/resolve/aggregate.rs
// =============================================================================
// Turns raw pool outcomes into the two final mappings.
//
// The two maps deliberately differ on failure:
// - StatusMap keeps the failure visible: the value is None
// - UnshortenMap never has a hole: the value falls back to the normalized URL
//
// Both are BTreeMaps, so previews and reports come out in sorted-URL order.
// =============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

use super::classify::normalize;
use super::probe::ProbeOutcome;

/// Number of entries shown in log and table previews
pub const PREVIEW_LEN: usize = 10;

/// Original URL -> status code, `None` when the probe failed
pub type StatusMap = BTreeMap<String, Option<u16>>;

/// Original URL -> final URL after redirects
pub type UnshortenMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Status codes in 200..400
    pub succeeded: usize,
    /// Everything else, including failed probes
    pub failed: usize,
}

pub fn status_map(outcomes: BTreeMap<String, ProbeOutcome<u16>>) -> StatusMap {
    outcomes
        .into_iter()
        .map(|(url, outcome)| (url, outcome.into_option()))
        .collect()
}

pub fn summarize(statuses: &StatusMap) -> StatusSummary {
    let succeeded = statuses
        .values()
        .filter(|status| matches!(status, Some(code) if (200..400).contains(code)))
        .count();

    StatusSummary {
        succeeded,
        failed: statuses.len() - succeeded,
    }
}

pub fn unshorten_map(outcomes: BTreeMap<String, ProbeOutcome<String>>) -> UnshortenMap {
    outcomes
        .into_iter()
        .map(|(url, outcome)| {
            let resolved = match outcome {
                ProbeOutcome::Success(final_url) => final_url,
                ProbeOutcome::Failure => normalize(&url),
            };
            (url, resolved)
        })
        .collect()
}

// First `limit` entries in key order
pub fn preview<V>(map: &BTreeMap<String, V>, limit: usize) -> impl Iterator<Item = (&String, &V)> {
    map.iter().take(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes<T: Clone>(pairs: &[(&str, ProbeOutcome<T>)]) -> BTreeMap<String, ProbeOutcome<T>> {
        pairs
            .iter()
            .map(|(url, outcome)| (url.to_string(), outcome.clone()))
            .collect()
    }

    #[test]
    fn test_status_map_keeps_failures_as_none() {
        let map = status_map(outcomes(&[
            ("a.com", ProbeOutcome::Success(200)),
            ("b.com", ProbeOutcome::Failure),
        ]));

        assert_eq!(map.len(), 2);
        assert_eq!(map["a.com"], Some(200));
        assert_eq!(map["b.com"], None);
    }

    #[test]
    fn test_summary_bands() {
        let map = status_map(outcomes(&[
            ("ok.com", ProbeOutcome::Success(200)),
            ("moved.com", ProbeOutcome::Success(301)),
            ("edge.com", ProbeOutcome::Success(399)),
            ("gone.com", ProbeOutcome::Success(404)),
            ("info.com", ProbeOutcome::Success(100)),
            ("err.com", ProbeOutcome::Success(500)),
            ("dead.com", ProbeOutcome::Failure),
        ]));

        assert_eq!(
            summarize(&map),
            StatusSummary {
                succeeded: 3,
                failed: 4
            }
        );
    }

    #[test]
    fn test_summary_of_empty_map() {
        assert_eq!(summarize(&StatusMap::new()), StatusSummary::default());
    }

    #[test]
    fn test_unshorten_failure_falls_back_to_normalized() {
        let map = unshorten_map(outcomes(&[
            ("bit.ly/abc", ProbeOutcome::Failure),
            ("https://t.co/x", ProbeOutcome::Failure),
            ("bit.ly/ok", ProbeOutcome::Success("https://example.org/real".to_string())),
        ]));

        assert_eq!(map["bit.ly/abc"], "http://bit.ly/abc");
        assert_eq!(map["https://t.co/x"], "https://t.co/x");
        assert_eq!(map["bit.ly/ok"], "https://example.org/real");
    }

    #[test]
    fn test_preview_is_sorted_and_bounded() {
        let map: StatusMap = (0..15).rev().map(|i| (format!("u{i:02}.com"), Some(200))).collect();

        let shown: Vec<&String> = preview(&map, PREVIEW_LEN).map(|(url, _)| url).collect();

        assert_eq!(shown.len(), PREVIEW_LEN);
        assert_eq!(shown[0], "u00.com");
        assert_eq!(shown[9], "u09.com");
    }
}
