// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Build and resolve the template bundle without touching the network
//!
//! Shows the two phases of a message: built with the configured amount, then
//! resolved for the amount Across says will arrive on the destination chain.
//!
//! Run with: `cargo run --example template_message`

use across_actions::calldata::decode_with_signature;
use across_actions::{ActionsError, MessageBuilder, NoQuotes, TemplateBuilder};
use alloy_primitives::{address, U256};

#[tokio::main]
async fn main() -> Result<(), ActionsError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("🧩 Across Actions - Template Bundle");
    println!("===================================\n");

    let builder = TemplateBuilder::default();
    let config = builder.config();
    let user = address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d");

    println!("📍 Route:");
    println!("   Chains: {} -> {}", config.source_chain, config.destination_chain);
    println!("   Tokens: {} -> {}", config.input_token, config.output_token);
    println!("   Amount: {}", config.amount);

    let message = builder.create_message(user).await?;
    println!("\n📦 Built {} action(s):", message.actions.len());
    for (index, action) in message.actions.iter().enumerate() {
        println!("   [{index}] {} <- {}", action.target, action.call_data);
    }

    // Roughly what a 0.1% relay fee leaves of 10 USDC
    let output_amount = U256::from(9_990_000u64);
    let resolved = message.resolve(output_amount, &NoQuotes).await?;

    println!("\n🔁 Resolved for output amount {output_amount}:");
    let approve = decode_with_signature(
        "function approve(address spender, uint256 value)",
        &resolved.actions[0].call_data,
    )?;
    println!("   approve spender: {:?}", approve[0].as_address());
    println!("   approve amount:  {:?}", approve[1].as_uint().map(|(value, _)| value));

    println!("\n✉️  Encoded instructions:");
    println!("   {}", resolved.encode_instructions());

    Ok(())
}
