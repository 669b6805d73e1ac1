//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `entitlement_resolver` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Mapping the authorization result to the exit code
//!
//! Exit codes: 0 authorized, 1 not authorized, 2 startup failure.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use entitlement_resolver::config::Opt;
use entitlement_resolver::initialization::init_logger_with;
use entitlement_resolver::{EntitlementResolver, ResolverConfig};

const EXIT_DENIED: i32 = 1;
const EXIT_STARTUP: i32 = 2;

async fn run(opt: Opt) -> Result<bool> {
    let config = ResolverConfig::from(&opt);
    let resolver =
        EntitlementResolver::new(&config).context("Failed to initialize entitlement resolver")?;

    let authorized = resolver.is_authorized(&opt.identifier).await;

    let summary: Vec<String> = resolver
        .stats()
        .summary()
        .into_iter()
        .map(|(event, count)| format!("{}={}", event, count))
        .collect();
    log::debug!("Resolver events: {}", summary.join(", "));

    Ok(authorized)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists), first from
    // the current directory, then from the executable's directory
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

    if let Err(e) = init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")
    {
        eprintln!("entitlement_resolver error: {:#}", e);
        process::exit(EXIT_STARTUP);
    }

    let identifier = opt.identifier.clone();
    match run(opt).await {
        Ok(true) => {
            println!("{}: authorized", identifier);
        }
        Ok(false) => {
            println!("{}: not authorized", identifier);
            process::exit(EXIT_DENIED);
        }
        Err(e) => {
            eprintln!("entitlement_resolver error: {:#}", e);
            process::exit(EXIT_STARTUP);
        }
    }
}
