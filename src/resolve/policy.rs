// src/resolve/policy.rs
// =============================================================================
// Decides which URLs the unshorten pass should probe.
//
// Modes:
// - narrow:           only URLs whose host is a known shortener
// - broad:            every URL
// - broad-with-stats: every URL, plus a count of how many look like shorteners
// - anything else:    treated as broad, with a PolicyWarning for the caller
// =============================================================================

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use super::classify::{is_known_shortener, ShortenerHosts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionMode {
    Narrow,
    Broad,
    BroadWithStats,
    /// A mode name nobody recognized; keeps the raw text for the warning
    Unknown(String),
}

impl From<&str> for ResolutionMode {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "narrow" => ResolutionMode::Narrow,
            "broad" => ResolutionMode::Broad,
            "broad-with-stats" => ResolutionMode::BroadWithStats,
            _ => ResolutionMode::Unknown(s.to_string()),
        }
    }
}

impl FromStr for ResolutionMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::Narrow => f.write_str("narrow"),
            ResolutionMode::Broad => f.write_str("broad"),
            ResolutionMode::BroadWithStats => f.write_str("broad-with-stats"),
            ResolutionMode::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

/// Non-fatal problems the selector wants the caller to know about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyWarning {
    #[error("unknown resolution mode '{0}', falling back to broad")]
    UnknownMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// URLs the unshorten pass has to probe
    pub targets: BTreeSet<String>,
    /// How many of all input URLs are known shorteners
    pub shortener_candidates: usize,
    pub warning: Option<PolicyWarning>,
}

// Computes the target set for a mode
//
// An empty input returns an empty selection right away.
pub fn select_targets(
    urls: &BTreeSet<String>,
    mode: &ResolutionMode,
    shorteners: &ShortenerHosts,
) -> Selection {
    if urls.is_empty() {
        return Selection {
            targets: BTreeSet::new(),
            shortener_candidates: 0,
            warning: None,
        };
    }

    let shortened: BTreeSet<String> = urls
        .iter()
        .filter(|u| is_known_shortener(u, shorteners))
        .cloned()
        .collect();
    let shortener_candidates = shortened.len();

    let (targets, warning) = match mode {
        ResolutionMode::Narrow => {
            info!(
                targets = shortener_candidates,
                total = urls.len(),
                "mode narrow: unshortening known shorteners only"
            );
            (shortened, None)
        }
        ResolutionMode::Broad => {
            info!(targets = urls.len(), "mode broad: unshortening every URL");
            (urls.clone(), None)
        }
        ResolutionMode::BroadWithStats => {
            info!(
                targets = urls.len(),
                shortener_candidates,
                "mode broad-with-stats: unshortening every URL"
            );
            (urls.clone(), None)
        }
        ResolutionMode::Unknown(raw) => {
            let warning = PolicyWarning::UnknownMode(raw.clone());
            warn!("{warning}");
            (urls.clone(), Some(warning))
        }
    };

    Selection {
        targets,
        shortener_candidates,
        warning,
    }
}
