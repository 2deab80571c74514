// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - resolve: load messages, extract URLs, check status, unshorten, report
// - extract: load messages and print the URLs found, no network access
//
// Every option can also come from an environment variable (LINK_RESOLVER_*),
// which is handy in cron jobs and containers.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "link-resolver",
    version,
    about = "Extract URLs from a message dump, check their status and unshorten them",
    long_about = "link-resolver scans a batch of messages for URLs, checks whether each one \
                  answers over HTTP and follows redirects to find where shortened links \
                  really point."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub logging: LogArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check and unshorten every URL found in a message store
    ///
    /// Example: link-resolver resolve data/messages.json --mode narrow
    Resolve(ResolveArgs),

    /// Only list the URLs found in a message store
    ///
    /// Example: link-resolver extract data/messages.json --limit 100
    Extract(InputArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Message store: a JSON document or a .jsonl/.ndjson file
    #[arg(env = "LINK_RESOLVER_INPUT", default_value = "data/messages.json")]
    pub input: PathBuf,

    /// Only process the first N messages
    #[arg(long, env = "LINK_RESOLVER_LIMIT")]
    pub limit: Option<usize>,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Which URLs to unshorten: narrow (known shorteners only), broad (all),
    /// broad-with-stats (all, plus shortener count)
    #[arg(long, env = "LINK_RESOLVER_MODE", default_value = "broad-with-stats")]
    pub mode: String,

    /// Maximum number of probes in flight at once
    #[arg(long, env = "LINK_RESOLVER_MAX_WORKERS", default_value_t = 10)]
    pub max_workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "LINK_RESOLVER_TIMEOUT", default_value_t = 5)]
    pub timeout: u64,

    /// Wall-clock budget in seconds for each pass; probes still running are
    /// counted as failures
    #[arg(long, env = "LINK_RESOLVER_DEADLINE")]
    pub deadline: Option<u64>,

    /// Known shortener host (repeatable or comma separated); replaces the
    /// built-in list
    #[arg(long = "shortener", env = "LINK_RESOLVER_SHORTENERS", value_delimiter = ',')]
    pub shorteners: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log filter, e.g. "info" or "link_resolver=debug" (RUST_LOG wins)
    #[arg(long, global = true, env = "LINK_RESOLVER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Also write logs to hourly rotated files in this directory
    #[arg(long, global = true, env = "LINK_RESOLVER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// How many rotated log files to keep
    #[arg(long, global = true, env = "LINK_RESOLVER_LOG_MAX_FILES", default_value_t = 4)]
    pub log_max_files: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let cli = Cli::try_parse_from(["link-resolver", "resolve", "msgs.json"]).unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };

        assert_eq!(args.input.input, PathBuf::from("msgs.json"));
        assert_eq!(args.input.limit, None);
        assert_eq!(args.mode, "broad-with-stats");
        assert_eq!(args.max_workers, 10);
        assert_eq!(args.timeout, 5);
        assert!(args.shorteners.is_empty());
        assert_eq!(cli.logging.log_level, "info");
    }

    #[test]
    fn test_shorteners_accept_lists_and_repeats() {
        let cli = Cli::try_parse_from([
            "link-resolver",
            "resolve",
            "msgs.json",
            "--shortener",
            "bit.ly,t.co",
            "--shortener",
            "goo.gl",
            "--mode",
            "narrow",
        ])
        .unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };

        assert_eq!(args.shorteners, vec!["bit.ly", "t.co", "goo.gl"]);
        assert_eq!(args.mode, "narrow");
    }

    #[test]
    fn test_extract_with_global_log_flag() {
        let cli = Cli::try_parse_from([
            "link-resolver",
            "extract",
            "msgs.jsonl",
            "--limit",
            "100",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };

        assert_eq!(args.limit, Some(100));
        assert_eq!(cli.logging.log_level, "debug");
    }
}
