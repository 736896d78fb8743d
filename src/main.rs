//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ig_harvest` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ig_harvest::config::{Command, Opt, PROXIES_ENV_VAR};
use ig_harvest::initialization::init_logger_with;
use ig_harvest::{read_targets, run_scrape, run_walk};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), so proxy
    // credentials can live there instead of on the command line
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();
    let env_proxies = std::env::var(PROXIES_ENV_VAR).ok();
    let config = opt.to_config(env_proxies.as_deref());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let outcome = match opt.command {
        Command::Scrape { ref file, .. } => match read_targets(file).await {
            Ok(targets) => run_scrape(config, targets).await.map(|report| {
                eprintln!(
                    "✅ Processed {} target{} ({} fetched, {} not fetched, {} records) in {} round{}, {:.1}s",
                    report.total_targets,
                    if report.total_targets == 1 { "" } else { "s" },
                    report.fetched,
                    report.failed,
                    report.records,
                    report.rounds,
                    if report.rounds == 1 { "" } else { "s" },
                    report.elapsed_seconds
                );
            }),
            Err(e) => Err(e),
        },
        Command::Walk { ref user_id, .. } => {
            run_walk(config, user_id.clone()).await.map(|report| {
                eprintln!(
                    "✅ Walked {} post{} over {} page{} of user {} in {:.1}s ({:?})",
                    report.posts,
                    if report.posts == 1 { "" } else { "s" },
                    report.pages,
                    if report.pages == 1 { "" } else { "s" },
                    report.user_id,
                    report.elapsed_seconds,
                    report.stop_reason
                );
            })
        }
    };

    if let Err(e) = outcome {
        eprintln!("ig_harvest error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
