use anyhow::{Context, Result};
use gas_tracker::{client::GasTrackerClient, models::ChainResult};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let base_url = std::env::var("GAS_TRACKER_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string());
    let eth_amount: f64 = std::env::var("ETH_AMOUNT")
        .unwrap_or_else(|_| "1".to_string())
        .parse()
        .context("Invalid ETH_AMOUNT")?;

    println!("Gas Tracker Probe");
    println!("=================");
    println!("Server: {}", base_url);
    println!();

    let client = GasTrackerClient::new(&base_url);

    let health = client.health().await?;
    println!(
        "Status: {} ({}/{} chains priced, {} history entries)",
        health.status, health.chains_available, health.chains_total, health.history_entries
    );
    println!();

    println!("Current gas prices:");
    for (chain, price) in client.prices().await? {
        match price {
            Some(gwei) => println!("   {:<12} {:>12.4} gwei", chain, gwei),
            None => println!("   {:<12} {:>12}", chain, "unavailable"),
        }
    }
    println!();

    println!("Simulating transfer of {} native units...", eth_amount);
    for row in client.simulate(eth_amount).await? {
        match row {
            ChainResult::Estimate(e) => println!(
                "   [OK] {:<12} {:>10.4} gwei  {:.6} native  ${:.2}",
                e.chain, e.gas_price_gwei, e.gas_cost_in_eth, e.gas_cost_in_usd
            ),
            ChainResult::Failed { chain, error } => {
                println!("   [FAILED] {:<8} {}", chain, error)
            }
        }
    }
    println!();

    let history = client.history().await?;
    println!("History entries recorded: {}", history.len());
    if let Some(last) = history.last() {
        println!("Latest: {} at {}", last.chain, last.timestamp);
    }

    Ok(())
}
