// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Simulate bridging USDC into an Index Coop flash mint on Tenderly
//!
//! The flash-mint transaction comes from the Index Coop quote API, both when
//! the bundle is built and again once the bridged amount is known.
//!
//! Run with: `cargo run --example simulate_index_coop`

use std::sync::Arc;

use across_actions::{
    http_client, ActionsError, ExampleConfig, IndexCoopBuilder, IndexCoopQuoteProvider,
    QuoteProvider, Simulation, SimulationSettings, TenderlyEnvironment, INDEX_COOP_API,
};
use dotenvy::dotenv;
use url::Url;

#[tokio::main]
async fn main() -> Result<(), ActionsError> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("📈 Across Actions - Index Coop Simulation");
    println!("=========================================\n");

    let settings = SimulationSettings::from_env()?;
    let quotes: Arc<dyn QuoteProvider> = Arc::new(IndexCoopQuoteProvider::new(
        http_client()?,
        Url::parse(INDEX_COOP_API)?,
    ));

    let simulation = Simulation::builder()
        .environment(TenderlyEnvironment::new(&settings, Arc::clone(&quotes))?)
        .message_builder(IndexCoopBuilder::new(ExampleConfig::index_coop(), quotes))
        .user_signer(settings.user_signer())
        .build();

    let report = simulation.run().await?;

    println!("\n📊 Result:");
    println!("   Outcome:       {}", report.outcome);
    println!("   Input amount:  {}", report.deposit.input_amount);
    println!("   Output amount: {}", report.deposit.output_amount);
    if let Some(fill) = report.fill_tx_hash {
        println!("   Fill tx:       {fill}");
    }
    println!("\n💾 Testnet ids appended to {}", settings.testnet_ids_path.display());

    Ok(())
}
