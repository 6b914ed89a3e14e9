// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Simulate the Morpho collateral-and-borrow bundle on Tenderly
//!
//! Requires `TENDERLY_ACCESS_KEY`, `TENDERLY_ACCOUNT` and `TENDERLY_PROJECT`
//! in the environment or a `.env` file. `PRIVATE_KEY` is optional; a random
//! key is used otherwise, since the forks fund the wallet.
//!
//! Run with: `cargo run --example simulate_morpho`

use std::sync::Arc;

use across_actions::{
    ActionsError, ExampleConfig, MorphoBuilder, NoQuotes, Simulation, SimulationOutcome,
    SimulationSettings, TenderlyEnvironment,
};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), ActionsError> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("across_actions=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    println!("🏦 Across Actions - Morpho Simulation");
    println!("=====================================\n");

    let settings = SimulationSettings::from_env()?;
    let user = settings.user_signer();
    println!("👤 User: {}", user.address());

    // Nonces are read from the live chain; a fresh fork starts from the same state
    let builder = MorphoBuilder::connect(ExampleConfig::morpho(), user.clone())?;

    let simulation = Simulation::builder()
        .environment(TenderlyEnvironment::new(&settings, Arc::new(NoQuotes))?)
        .message_builder(builder)
        .user_signer(user)
        .build();

    let Some(report) = simulation.simulate().await else {
        println!("\n❌ Simulation failed, see logs above");
        return Ok(());
    };

    println!("\n🧪 Testnets:");
    println!("   Origin:      {}", report.origin_testnet.id);
    println!("   Destination: {}", report.destination_testnet.id);

    match report.outcome {
        SimulationOutcome::ActionsSucceeded => println!("\n✅ Collateral supplied and loan borrowed"),
        SimulationOutcome::ActionsFailed => {
            println!("\n⚠️  Filled, but the Morpho calls reverted; funds went to the fallback recipient")
        }
        SimulationOutcome::NotFilled => println!("\n⏳ The deposit was never filled"),
    }

    Ok(())
}
