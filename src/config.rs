// src/config.rs
// =============================================================================
// ResolutionConfig: the immutable settings for one resolution run.
//
// It is built once from the parsed command line, validated, and then passed
// by reference into the Resolver. Nothing reads these values from globals,
// so tests can run side by side with different settings.
// =============================================================================

use std::time::Duration;

use crate::cli::ResolveArgs;
use crate::error::ConfigError;
use crate::resolve::{ResolutionMode, ShortenerHosts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionConfig {
    pub max_workers: usize,
    pub request_timeout: Duration,
    /// Optional wall-clock budget for each pool run
    pub deadline: Option<Duration>,
    pub mode: ResolutionMode,
    pub shortener_hosts: ShortenerHosts,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            request_timeout: Duration::from_secs(5),
            deadline: None,
            mode: ResolutionMode::BroadWithStats,
            shortener_hosts: ShortenerHosts::default(),
        }
    }
}

impl TryFrom<&ResolveArgs> for ResolutionConfig {
    type Error = ConfigError;

    fn try_from(args: &ResolveArgs) -> Result<Self, Self::Error> {
        if args.max_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if args.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if args.deadline == Some(0) {
            return Err(ConfigError::ZeroDeadline);
        }

        // An empty list (or only blank entries) keeps the built-in shorteners
        let configured = ShortenerHosts::new(&args.shorteners);
        let shortener_hosts = if configured.is_empty() {
            ShortenerHosts::default()
        } else {
            configured
        };

        Ok(Self {
            max_workers: args.max_workers,
            request_timeout: Duration::from_secs(args.timeout),
            deadline: args.deadline.map(Duration::from_secs),
            // Unknown names are kept and reported later by the policy selector
            mode: ResolutionMode::from(args.mode.as_str()),
            shortener_hosts,
        })
    }
}
