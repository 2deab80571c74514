// src/resolve/mod.rs
// =============================================================================
// The URL resolution engine.
//
// Submodules:
// - classify: scheme normalization and known-shortener detection
// - probe: one HTTP check per URL (status code or final URL)
// - pool: bounded concurrent fan-out of probes over a URL set
// - policy: which URLs the unshorten pass probes
// - aggregate: final status / unshorten mappings and summary counts
// - pass: the two passes and the Resolver that wires them to HTTP
// =============================================================================

mod aggregate;
mod classify;
mod pass;
mod policy;
mod pool;
mod probe;

pub use aggregate::{preview, StatusMap, StatusSummary, UnshortenMap, PREVIEW_LEN};
pub use classify::ShortenerHosts;
pub use pass::{Resolver, StatusReport, UnshortenReport};
pub use policy::ResolutionMode;
