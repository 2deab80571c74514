// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Load the message store and extract every URL
// 3. Run the status pass and the unshorten pass
// 4. Print the two mappings as a table or JSON
// 5. Exit with 0 when the run completed, 2 when it could not
//
// Individual URLs that fail never change the exit code: they show up as a
// missing status or a fallback URL in the report.
// =============================================================================

mod cli;
mod config;
mod error;
mod logging;
mod messages;
mod resolve;

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use cli::{Cli, Commands, InputArgs, ResolveArgs};
use config::ResolutionConfig;
use resolve::{Resolver, StatusReport, StatusSummary, UnshortenReport, PREVIEW_LEN};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Logging could not be set up, so print directly
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Must outlive everything that logs
    let _log_guard = logging::init_logging(&cli.logging)?;

    let outcome = match cli.command {
        Commands::Resolve(args) => handle_resolve(&args).await,
        Commands::Extract(args) => handle_extract(&args),
    };

    Ok(exit_code_for(outcome))
}

// Logged here, while the file writer is still alive
fn exit_code_for(outcome: Result<i32>) -> i32 {
    match outcome {
        Ok(code) => code,
        Err(e) => {
            error!("run aborted: {e:#}");
            2
        }
    }
}

// Handles the 'resolve' subcommand
async fn handle_resolve(args: &ResolveArgs) -> Result<i32> {
    let started = Instant::now();
    let config = ResolutionConfig::try_from(args).context("Invalid resolution settings")?;

    info!(
        input = %args.input.input.display(),
        limit = ?args.input.limit,
        mode = %config.mode,
        max_workers = config.max_workers,
        timeout = ?config.request_timeout,
        shorteners = config.shortener_hosts.len(),
        "starting run"
    );

    let urls = load_urls(&args.input.input, args.input.limit)?;

    let resolver = Resolver::new(&config)?;
    let status = resolver.status_map(&urls).await;
    let unshortened = resolver.unshorten_map(&urls).await;

    info!(
        statuses = status.statuses.len(),
        unshortened = unshortened.resolved.len(),
        "mappings built"
    );

    print_results(&status, &unshortened, args.input.json)?;

    info!(elapsed = ?started.elapsed(), "run finished");
    Ok(0)
}

// Handles the 'extract' subcommand
fn handle_extract(args: &InputArgs) -> Result<i32> {
    let urls = load_urls(&args.input, args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&urls)?);
    } else {
        for url in &urls {
            println!("{url}");
        }
    }

    Ok(0)
}

// Message store -> limited message list -> canonical URL set
//
// A missing or unreadable store is fatal for the run.
fn load_urls(path: &Path, limit: Option<usize>) -> Result<BTreeSet<String>> {
    let messages = messages::load_messages(path)?;
    let messages = messages::apply_limit(messages, limit);
    Ok(messages::collect_urls(&messages))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'a resolve::StatusMap,
    status_summary: StatusSummary,
    unshortened: &'a resolve::UnshortenMap,
    shortener_candidates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

// Prints the results either as a table or JSON
fn print_results(status: &StatusReport, unshortened: &UnshortenReport, json: bool) -> Result<()> {
    if json {
        let report = JsonReport {
            status: &status.statuses,
            status_summary: status.summary,
            unshortened: &unshortened.resolved,
            shortener_candidates: unshortened.shortener_candidates,
            warning: unshortened.warning.as_ref().map(ToString::to_string),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(status, unshortened);
    }
    Ok(())
}

// Prints a preview of both mappings plus the summary counts
fn print_table(status: &StatusReport, unshortened: &UnshortenReport) {
    println!("{:<60} {:<10}", "URL", "STATUS");
    println!("{}", "=".repeat(71));
    for (url, code) in resolve::preview(&status.statuses, PREVIEW_LEN) {
        let code = code.map_or_else(|| "-".to_string(), |c| c.to_string());
        println!("{:<60} {:<10}", truncate(url, 57), code);
    }
    println!();

    println!("{:<60} {:<60}", "URL", "RESOLVES TO");
    println!("{}", "=".repeat(121));
    for (original, final_url) in resolve::preview(&unshortened.resolved, PREVIEW_LEN) {
        println!("{:<60} {:<60}", truncate(original, 57), truncate(final_url, 57));
    }
    println!();

    println!("📊 Summary:");
    println!("   ✅ Reachable (2xx-3xx): {}", status.summary.succeeded);
    println!("   ❌ Failed / other status: {}", status.summary.failed);
    println!("   📋 URLs checked: {}", status.statuses.len());
    println!(
        "   🔗 Unshortened: {} of {} ({} known shorteners)",
        unshortened.resolved.len(),
        unshortened.total_urls,
        unshortened.shortener_candidates
    );
    if let Some(warning) = &unshortened.warning {
        println!("   ⚠️  {warning}");
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}
