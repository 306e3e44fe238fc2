//! Synthetic assets report.
//!
//! `report` reads an asset group from chain and logs its collateralization
//! and value locked, `long-share` evaluates a settlement curve offline.

mod config;
mod error;
mod report;

use clap::Parser;
use std::{process::exit, time::Duration};
use synths_sdk::{config::AssetRegistry, pricing::compute_long_share};
use tracing::{error, info};
use url::Url;

use config::{Cli, Command, EnvConfig, LongShareArgs, ReportArgs};
use error::Result;
use report::Reporter;

#[tokio::main]
async fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let result = match cli.command {
        Command::Report(args) => report(args).await,
        Command::LongShare(args) => long_share(args),
    };
    if let Err(e) = result {
        error!(%e, "Report failed");
        exit(1);
    }
}

async fn report(args: ReportArgs) -> Result<()> {
    let env_config = EnvConfig::from_env()?;
    let node_url = Url::parse(&env_config.node_rpc_url)?;
    let registry = AssetRegistry::from_path(&env_config.assets_file)?;
    let assets = registry.group(args.network, &args.group)?;

    // Default timeout is 30 seconds
    let timeout = Duration::from_secs(env_config.timeout_seconds.unwrap_or(30));

    info!(
        network = args.network,
        group = %args.group,
        assets = assets.len(),
        "Reporting asset group"
    );
    let reporter = Reporter::try_new(node_url, timeout)
        .await?
        .with_eth_usd(args.eth_usd()?);
    let report = reporter.run(assets, args.sponsor()?).await;

    for asset in &report.assets {
        println!(
            "{:<16} gcr={:<12} sponsor_cr={:<12} expired={}",
            asset.id,
            asset.gcr.map(synths_sdk::metrics::format_ratio).unwrap_or_else(|| "n/a".to_string()),
            asset
                .sponsor_cr
                .map(synths_sdk::metrics::format_ratio)
                .unwrap_or_else(|| "n/a".to_string()),
            asset.expired,
        );
    }
    match report.total_value_locked {
        Some(tvl) => println!("tvl=${}", tvl.to_precision_string(2)),
        None => println!("tvl=n/a"),
    }
    Ok(())
}

fn long_share(args: LongShareArgs) -> Result<()> {
    let params = args.to_curve_parameters()?;
    let price = args.price()?;
    let share = compute_long_share(price, &params)?;
    info!(curve = ?params.kind(), %price, %share, "Long share");
    println!("{}", share);
    Ok(())
}
