// src/logging.rs
// =============================================================================
// Sets up tracing for the whole run.
//
// - Console: always on, written to stderr so `--json` output on stdout
//   stays machine readable
// - Files: optional, hourly rotation in --log-dir, oldest files pruned
//   beyond --log-max-files
//
// RUST_LOG, when set, overrides --log-level.
// =============================================================================

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogArgs;

// Installs the global subscriber
//
// The returned guard flushes the file writer when dropped, so main keeps it
// alive until the program exits. Without --log-dir there is no guard.
pub fn init_logging(args: &LogArgs) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .with_context(|| format!("Invalid log filter '{}'", args.log_level))?;

    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file, guard) = match &args.log_dir {
        Some(dir) => {
            let appender = Builder::new()
                .rotation(Rotation::HOURLY)
                .filename_prefix(env!("CARGO_PKG_NAME"))
                .filename_suffix("log")
                .max_log_files(args.log_max_files.max(1))
                .build(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
