//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `http_session` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Fetching every target concurrently
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{error, info};
use clap::Parser;

use http_session::app::{build_request, print_statistics, render_plain, ResponseSummary};
use http_session::config::Opt;
use http_session::initialization::{init_crypto_provider, init_logger_with};
use http_session::{update_error_stats, update_response_stats, Client, ProcessingStats};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let config = opt.to_config();

    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;
    init_crypto_provider();

    let client = Client::new(config).context("Failed to initialize HTTP client")?;
    let stats = ProcessingStats::new();
    let started = Instant::now();

    let mut pending = FuturesUnordered::new();
    for target in &opt.urls {
        let request = build_request(&opt, target)?;
        let started_as = request.url().protocol().to_string();
        let client = client.clone();
        pending.push(async move {
            let outcome = client.send(request).await;
            (target, started_as, outcome)
        });
    }
    info!("Fetching {} URL(s)", pending.len());

    while let Some((target, started_as, outcome)) = pending.next().await {
        match outcome {
            Ok(response) => {
                update_response_stats(&stats, &response, &started_as);
                if opt.json {
                    let summary = ResponseSummary::from_response(target, &response, opt.include);
                    println!("{}", serde_json::to_string(&summary)?);
                } else {
                    if opt.urls.len() > 1 {
                        println!("==> {target} <==");
                    }
                    println!("{}", render_plain(&response, opt.include));
                }
            }
            Err(failure) => {
                update_error_stats(&stats, &failure.error);
                if opt.json {
                    let summary = ResponseSummary::from_failure(target, &failure);
                    println!("{}", serde_json::to_string(&summary)?);
                } else {
                    error!("{target}: {failure}");
                }
            }
        }
    }

    print_statistics(&stats, started.elapsed().as_secs_f64());

    if stats.total_errors() > 0 {
        process::exit(1);
    }
    Ok(())
}
