//! Integration tests for building and resolving every example's bundle
//!
//! Quote-backed builders run against `FakeQuoteProvider`, Morpho against
//! `FakeNonceSource`, so nothing here touches the network.

use std::sync::Arc;

use across_actions::calldata::decode_with_signature;
use across_actions::testing::{FakeNonceSource, FakeQuoteProvider};
use across_actions::{
    AaveBuilder, ActionsError, ChiProtocolBuilder, ExampleConfig, IndexCoopBuilder,
    MessageBuilder, MorphoBuilder, NoQuotes, QuoteTx, SwapModeBuilder, TemplateBuilder,
    UpdateKind, ARBITRUM_USDC, BASE_AAVE_POOL, BASE_USDC, BASE_WETH,
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_signer_local::PrivateKeySigner;
use rstest::rstest;

#[derive(Debug, Clone, Copy)]
enum Example {
    Template,
    Aave,
    Chi,
    Morpho,
    IndexCoop,
    SwapMode,
}

fn canned_quote(to: u8) -> QuoteTx {
    QuoteTx {
        to: Address::repeat_byte(to),
        data: Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
        value: U256::ZERO,
    }
}

/// A builder for `example`, with quotes queued for `builds` builds
fn builder_for(example: Example, signer: &PrivateKeySigner, builds: usize) -> Box<dyn MessageBuilder> {
    let quotes = FakeQuoteProvider::new();
    for _ in 0..builds {
        quotes.push_quote(canned_quote(0xf1));
    }

    match example {
        Example::Template => Box::new(TemplateBuilder::default()),
        Example::Aave => Box::new(AaveBuilder::default()),
        Example::Chi => Box::new(ChiProtocolBuilder::new(ExampleConfig::chi_protocol(
            Address::repeat_byte(0xc1),
        ))),
        Example::Morpho => {
            let nonces = FakeNonceSource::new();
            nonces.set_nonce(signer.address(), U256::from(7u64));
            Box::new(MorphoBuilder::new(
                ExampleConfig::morpho(),
                signer.clone(),
                Arc::new(nonces),
            ))
        }
        Example::IndexCoop => Box::new(IndexCoopBuilder::new(
            ExampleConfig::index_coop(),
            Arc::new(quotes),
        )),
        Example::SwapMode => Box::new(SwapModeBuilder::new(
            ExampleConfig::swapmode(),
            Arc::new(quotes),
        )),
    }
}

#[rstest]
#[case::template(Example::Template, 1)]
#[case::aave(Example::Aave, 2)]
#[case::chi(Example::Chi, 2)]
#[case::morpho(Example::Morpho, 5)]
#[case::index_coop(Example::IndexCoop, 2)]
#[case::swapmode(Example::SwapMode, 2)]
#[tokio::test]
async fn test_every_bundle_is_well_formed(#[case] example: Example, #[case] expected_len: usize) {
    let signer = PrivateKeySigner::random();
    let builder = builder_for(example, &signer, 1);

    let message = builder.create_message(signer.address()).await.unwrap();

    assert_eq!(message.actions.len(), expected_len);
    assert_ne!(message.fallback_recipient, Address::ZERO);
    for action in &message.actions {
        assert_ne!(action.target, Address::ZERO, "{example:?} has a zero target");
        assert!(!action.call_data.is_empty(), "{example:?} has empty calldata");
    }
}

#[rstest]
#[case::template(Example::Template)]
#[case::aave(Example::Aave)]
#[case::chi(Example::Chi)]
#[case::index_coop(Example::IndexCoop)]
#[case::swapmode(Example::SwapMode)]
#[tokio::test]
async fn test_building_twice_gives_identical_bundles(#[case] example: Example) {
    let signer = PrivateKeySigner::random();
    let builder = builder_for(example, &signer, 2);

    let first = builder.create_message(signer.address()).await.unwrap();
    let second = builder.create_message(signer.address()).await.unwrap();

    assert_eq!(first, second);
}

#[rstest]
#[case::usdc_out(BASE_USDC)]
#[case::weth_out(BASE_WETH)]
#[tokio::test]
async fn test_template_fixture(#[case] output_token: Address) {
    let config = ExampleConfig {
        output_token,
        ..ExampleConfig::template()
    };
    assert_eq!(config.input_token, ARBITRUM_USDC);
    assert_eq!(config.amount, U256::from(10_000_000u64));
    let builder = TemplateBuilder::new(config.clone());

    let message = builder
        .create_message(Address::repeat_byte(0x42))
        .await
        .unwrap();

    assert_eq!(message.actions.len(), 1);
    assert_eq!(message.actions[0].target, output_token);

    let values = decode_with_signature(
        "function approve(address spender, uint256 value)",
        &message.actions[0].call_data,
    )
    .unwrap();
    assert_eq!(values[0].as_address(), Some(config.contract_address));
    assert_eq!(values[0].as_address(), Some(BASE_AAVE_POOL));
    assert_eq!(values[1].as_uint(), Some((U256::from(10_000_000u64), 256)));
}

#[tokio::test]
async fn test_resolution_rewrites_only_the_amount() {
    let user = Address::repeat_byte(0x42);
    let message = AaveBuilder::default().create_message(user).await.unwrap();
    let output_amount = U256::from(9_990_000u64);

    let resolved = message.resolve(output_amount, &NoQuotes).await.unwrap();

    for (built, resolved) in message.actions.iter().zip(&resolved.actions) {
        assert_eq!(built.target, resolved.target);
        assert_eq!(built.call_data[..4], resolved.call_data[..4]);
        assert_ne!(built.call_data, resolved.call_data);
    }

    let supply = decode_with_signature(
        "function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode)",
        &resolved.actions[1].call_data,
    )
    .unwrap();
    assert_eq!(supply[1].as_uint(), Some((output_amount, 256)));
    assert_eq!(supply[2].as_address(), Some(user));

    // The built bundle keeps its placeholder amount
    let built_supply = decode_with_signature(
        "function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode)",
        &message.actions[1].call_data,
    )
    .unwrap();
    assert_eq!(built_supply[1].as_uint(), Some((U256::from(10_000_000u64), 256)));
}

#[tokio::test]
async fn test_morpho_resolution_leaves_signed_calls_alone() {
    let signer = PrivateKeySigner::random();
    let builder = builder_for(Example::Morpho, &signer, 0);
    let message = builder.create_message(signer.address()).await.unwrap();

    let resolved = message
        .resolve(U256::from(9_990_000u64), &NoQuotes)
        .await
        .unwrap();

    for (built, resolved) in message.actions.iter().zip(&resolved.actions) {
        if built.update == UpdateKind::None {
            assert_eq!(built.call_data, resolved.call_data);
        } else {
            assert_ne!(built.call_data, resolved.call_data);
        }
    }
}

#[tokio::test]
async fn test_quote_failure_stops_the_builder() {
    let quotes = FakeQuoteProvider::new();
    quotes.fail_with("flash mint api returned 503");
    let builder = IndexCoopBuilder::new(ExampleConfig::index_coop(), Arc::new(quotes));

    let result = builder.create_message(Address::repeat_byte(0x42)).await;

    assert!(matches!(result, Err(ActionsError::QuoteUnavailable { .. })));
}

#[tokio::test]
async fn test_requote_failure_reports_action_position() {
    let quotes = FakeQuoteProvider::new();
    quotes.push_quote(canned_quote(0xf1));
    let builder = SwapModeBuilder::new(ExampleConfig::swapmode(), Arc::new(quotes.clone()));
    let message = builder
        .create_message(Address::repeat_byte(0x42))
        .await
        .unwrap();

    // The queue is now empty, so the zap's re-quote finds no route
    let result = message.resolve(U256::from(1u64), &quotes).await;

    assert!(matches!(
        result,
        Err(ActionsError::UpdateFailed { index: 1, .. })
    ));
}
