#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prints one outbreak map view as JSON.

use clap::Parser;
use outbreak_map_dashboard::config::DashboardConfig;
use outbreak_map_dashboard::{Cli, snapshot};
use outbreak_map_dataset::Registry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = DashboardConfig::from_env()?;
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    let source = config.boundary_source();

    log::info!("Loading datasets...");
    let mut registry = Registry::load(&client, &source).await?;

    if registry.is_degraded() && cli.retry_geography {
        log::info!("Retrying boundary fetch...");
        registry = registry.reload_geography(&client, &source).await;
    }
    if registry.is_degraded() {
        log::warn!("Map views are unavailable for this run");
    }

    let filter = cli.filter.to_filter();
    let view = snapshot(&registry, &filter, &cli.view)?;
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
