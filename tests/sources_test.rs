//! Wire Tests - Source Adapter Protocols
//!
//! Points each adapter at a local `httpmock` server and checks the
//! request shapes going out (paths, query parameters, body fields,
//! slippage conventions) and the decoding of realistic responses
//! coming back.

use std::time::Duration;

use alloy::primitives::{address, Address, U256};
use httpmock::prelude::*;
use serde_json::json;

use swapmesh::adapters::sources::{Dexag, OneInch, Paraswap, Totle, ZeroEx};
use swapmesh::config::{DexagConfig, OneInchConfig, ParaswapConfig, TotleConfig, ZeroExConfig};
use swapmesh::domain::token::ETH_PLACEHOLDER;
use swapmesh::domain::{QuoteRequest, SourceError, TradeRequest};
use swapmesh::ports::LiquiditySource;

const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
const USER: Address = address!("2222222222222222222222222222222222222222");

const DAI_HEX: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";
const USDC_HEX: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
const ETH_HEX: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

const TIMEOUT: Duration = Duration::from_secs(5);

fn quote_request(source: Address, destination: Address, amount: u128) -> QuoteRequest {
    QuoteRequest {
        source_token: source,
        destination_token: destination,
        source_amount: U256::from(amount),
    }
}

fn trade_request(
    source: Address,
    destination: Address,
    amount: u128,
    slippage_bps: u32,
) -> TradeRequest {
    TradeRequest {
        source_token: source,
        destination_token: destination,
        source_amount: U256::from(amount),
        user_address: USER,
        slippage_bps,
    }
}

// ---- ParaSwap ----

fn paraswap(server: &MockServer) -> Paraswap {
    let config = ParaswapConfig {
        base_url: server.base_url(),
        network: 1,
    };
    Paraswap::new(reqwest::Client::new(), &config, TIMEOUT)
}

#[tokio::test]
async fn paraswap_quote_reads_price_route_amount() {
    let server = MockServer::start_async().await;
    let prices = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/prices/1/{ETH_HEX}/{DAI_HEX}/1000000000000000000"));
            then.status(200).json_body(json!({
                "priceRoute": {
                    "amount": "207086965999999627200",
                    "bestRoute": []
                }
            }));
        })
        .await;

    let source = paraswap(&server);
    let quote = source
        .quote(&quote_request(ETH_PLACEHOLDER, DAI, 1_000_000_000_000_000_000))
        .await
        .unwrap();

    prices.assert_async().await;
    assert_eq!(
        quote.destination_amount,
        U256::from(207_086_965_999_999_627_200u128)
    );
}

#[tokio::test]
async fn paraswap_trade_echoes_route_and_limits_destination() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/prices/1/");
            then.status(200)
                .json_body(json!({ "priceRoute": { "amount": "10100", "route": "opaque" } }));
        })
        .await;
    let build = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/transactions/1")
                // 1% slippage on 10100 leaves a limit of exactly 10000.
                .json_body_includes(
                    r#"{
                        "priceRoute": { "amount": "10100", "route": "opaque" },
                        "srcAmount": "1000000",
                        "destAmount": "10000",
                        "userAddress": "0x2222222222222222222222222222222222222222",
                        "referrer": "swapmesh"
                    }"#,
                );
            then.status(200).json_body(json!({
                "from": "0x2222222222222222222222222222222222222222",
                "to": "0x3333333333333333333333333333333333333333",
                "value": "0",
                "data": "0xdeadbeef"
            }));
        })
        .await;

    let source = paraswap(&server);
    let trade = source
        .trade(&trade_request(DAI, USDC, 1_000_000, 100))
        .await
        .unwrap();

    build.assert_async().await;
    assert_eq!(trade.destination_amount, U256::from(10_100u64));
    assert_eq!(
        trade.to,
        address!("3333333333333333333333333333333333333333")
    );
    assert_eq!(trade.data.as_ref(), &[0xde, 0xad, 0xbe, 0xef]);
}

// ---- 1inch ----

fn oneinch(server: &MockServer) -> OneInch {
    let config = OneInchConfig {
        base_url: server.base_url(),
    };
    OneInch::new(reqwest::Client::new(), &config, TIMEOUT)
}

#[tokio::test]
async fn oneinch_catalog_is_a_map_keyed_by_address() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/tokens");
            then.status(200).json_body(json!({
                (DAI_HEX): { "address": DAI_HEX, "symbol": "DAI", "decimals": 18 },
                (USDC_HEX): { "address": USDC_HEX, "symbol": "USDC", "decimals": 6 }
            }));
        })
        .await;

    let source = oneinch(&server);
    let tokens = source.tokens().await.unwrap();

    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().any(|t| t.address == DAI && t.decimals == 18));
    assert!(tokens.iter().any(|t| t.address == USDC && t.decimals == 6));
}

#[tokio::test]
async fn oneinch_trade_sends_percent_slippage() {
    let server = MockServer::start_async().await;
    let swap = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/swapQuote")
                .query_param("fromTokenAddress", DAI_HEX)
                .query_param("toTokenAddress", USDC_HEX)
                .query_param("amount", "1000000")
                .query_param("fromAddress", "0x2222222222222222222222222222222222222222")
                .query_param("slippage", "0.5")
                .query_param("disableEstimate", "true");
            then.status(200).json_body(json!({
                "toTokenAmount": "998000",
                "to": "0x4444444444444444444444444444444444444444",
                "data": "0x00",
                "value": "0"
            }));
        })
        .await;

    let source = oneinch(&server);
    let trade = source
        .trade(&trade_request(DAI, USDC, 1_000_000, 50))
        .await
        .unwrap();

    swap.assert_async().await;
    assert_eq!(trade.destination_amount, U256::from(998_000u64));
    assert_eq!(trade.from, USER);
}

// ---- Totle ----

fn totle(server: &MockServer) -> Totle {
    let config = TotleConfig {
        base_url: server.base_url(),
        api_key: Some("partner-key".to_string()),
    };
    Totle::new(reqwest::Client::new(), &config, TIMEOUT)
}

#[tokio::test]
async fn totle_quote_posts_fixed_slippage_ceilings() {
    let server = MockServer::start_async().await;
    let swap = server
        .mock_async(|when, then| {
            when.method(POST).path("/swap").json_body_includes(
                r#"{
                    "swap": {
                        "sourceAsset": "0x6b175474e89094c44da98b954eedeac495271d0f",
                        "destinationAsset": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
                        "sourceAmount": "1000000",
                        "maxMarketSlippagePercent": "10",
                        "maxExecutionSlippagePercent": "3"
                    },
                    "config": { "transactions": false }
                }"#,
            );
            then.status(200).json_body(json!({
                "success": true,
                "response": {
                    "summary": [ { "destinationAmount": "997000" } ]
                }
            }));
        })
        .await;

    let source = totle(&server);
    let quote = source
        .quote(&quote_request(DAI, USDC, 1_000_000))
        .await
        .unwrap();

    swap.assert_async().await;
    assert_eq!(quote.destination_amount, U256::from(997_000u64));
}

#[tokio::test]
async fn totle_trade_extracts_the_swap_transaction() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/swap").json_body_includes(
                r#"{
                    "config": { "transactions": true },
                    "address": "0x2222222222222222222222222222222222222222",
                    "apiKey": "partner-key"
                }"#,
            );
            then.status(200).json_body(json!({
                "success": true,
                "response": {
                    "summary": [ { "destinationAmount": "997000" } ],
                    "transactions": [
                        {
                            "type": "approve",
                            "tx": { "to": DAI_HEX, "data": "0x01", "value": "0" }
                        },
                        {
                            "type": "swap",
                            "tx": {
                                "to": "0x74758acfce059f503a7e6b0fc2c8737600f9f2c4",
                                "data": "0x02",
                                "value": "0"
                            }
                        }
                    ]
                }
            }));
        })
        .await;

    let source = totle(&server);
    let trade = source
        .trade(&trade_request(DAI, USDC, 1_000_000, 100))
        .await
        .unwrap();

    assert_eq!(
        trade.to,
        address!("74758acfce059f503a7e6b0fc2c8737600f9f2c4")
    );
    assert_eq!(trade.data.as_ref(), &[0x02]);
}

#[tokio::test]
async fn totle_unsuccessful_envelope_maps_to_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/swap");
            then.status(200).json_body(json!({ "success": false }));
        })
        .await;

    let source = totle(&server);
    let err = source
        .quote(&quote_request(DAI, USDC, 1_000_000))
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Unavailable(_)));
}

// ---- Dexag ----

fn dexag(server: &MockServer) -> Dexag {
    let config = DexagConfig {
        base_url: server.base_url(),
    };
    Dexag::new(reqwest::Client::new(), &config, TIMEOUT)
}

async fn dexag_catalog(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/token-list-full");
            then.status(200).json_body(json!([
                { "address": ETH_HEX, "symbol": "ETH", "decimals": 18 },
                { "address": USDC_HEX, "symbol": "USDC", "decimals": 6 }
            ]));
        })
        .await
}

#[tokio::test]
async fn dexag_quote_round_trips_through_display_space() {
    let server = MockServer::start_async().await;
    dexag_catalog(&server).await;
    let price = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/price")
                .query_param("from", "ETH")
                .query_param("to", "USDC")
                .query_param("fromAmount", "0.0001")
                .query_param("dex", "ag");
            then.status(200)
                .json_body(json!({ "price": "207.0869659999996272" }));
        })
        .await;

    let source = dexag(&server);
    // 0.0001 ETH in atomic units.
    let quote = source
        .quote(&quote_request(ETH_PLACEHOLDER, USDC, 100_000_000_000_000))
        .await
        .unwrap();

    price.assert_async().await;
    // 0.0001 * 207.0869659999996272, truncated at 6 decimals.
    assert_eq!(quote.destination_amount, U256::from(20_708u64));
}

#[tokio::test]
async fn dexag_trade_sends_a_limit_amount() {
    let server = MockServer::start_async().await;
    dexag_catalog(&server).await;
    let trade_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/trade")
                .query_param("from", "ETH")
                .query_param("to", "USDC")
                .query_param("fromAmount", "0.0001")
                .query_param_exists("limitAmount")
                .query_param("dex", "ag");
            then.status(200).json_body(json!({
                "trade": {
                    "to": "0xccaf8533b6822a6c17b1059dda13c168e75544a4",
                    "data": "0x0304",
                    "value": "100000000000000"
                },
                "metadata": { "source": { "price": "207.0869659999996272" } }
            }));
        })
        .await;

    let source = dexag(&server);
    let trade = source
        .trade(&trade_request(ETH_PLACEHOLDER, USDC, 100_000_000_000_000, 100))
        .await
        .unwrap();

    trade_mock.assert_async().await;
    assert_eq!(trade.destination_amount, U256::from(20_708u64));
    assert_eq!(trade.value, U256::from(100_000_000_000_000u128));
}

#[tokio::test]
async fn dexag_rejects_tokens_outside_its_own_catalog() {
    let server = MockServer::start_async().await;
    dexag_catalog(&server).await;

    let source = dexag(&server);
    let err = source
        .quote(&quote_request(DAI, USDC, 1_000_000))
        .await
        .unwrap_err();

    assert_eq!(err, SourceError::UnsupportedAsset(DAI));
}

// ---- 0x ----

fn zeroex(server: &MockServer) -> ZeroEx {
    let config = ZeroExConfig {
        base_url: server.base_url(),
    };
    ZeroEx::new(reqwest::Client::new(), &config, TIMEOUT)
}

#[tokio::test]
async fn zeroex_catalog_reads_records() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/swap/v0/tokens");
            then.status(200).json_body(json!({
                "records": [
                    { "address": DAI_HEX, "symbol": "DAI", "decimals": 18 }
                ]
            }));
        })
        .await;

    let source = zeroex(&server);
    let tokens = source.tokens().await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].symbol, "DAI");
}

#[tokio::test]
async fn zeroex_trade_sends_fractional_slippage() {
    let server = MockServer::start_async().await;
    let swap = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/swap/v0/quote")
                .query_param("sellToken", DAI_HEX)
                .query_param("buyToken", USDC_HEX)
                .query_param("sellAmount", "1000000")
                .query_param("slippagePercentage", "0.01");
            then.status(200).json_body(json!({
                "buyAmount": "995000",
                "to": "0x95e6f48254609a6ee006f7d493c8e5fb97094cef",
                "data": "0x05",
                "value": "0"
            }));
        })
        .await;

    let source = zeroex(&server);
    let trade = source
        .trade(&trade_request(DAI, USDC, 1_000_000, 100))
        .await
        .unwrap();

    swap.assert_async().await;
    assert_eq!(trade.destination_amount, U256::from(995_000u64));
}

#[tokio::test]
async fn zeroex_quote_omits_slippage_and_tolerates_missing_tx_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/swap/v0/quote");
            then.status(200).json_body(json!({ "buyAmount": "995000" }));
        })
        .await;

    let source = zeroex(&server);
    let quote = source
        .quote(&quote_request(DAI, USDC, 1_000_000))
        .await
        .unwrap();
    assert_eq!(quote.destination_amount, U256::from(995_000u64));
}

// ---- Error Mapping ----

#[tokio::test]
async fn server_errors_map_to_unavailable_with_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/quote");
            then.status(500).body("upstream exploded");
        })
        .await;

    let source = oneinch(&server);
    let err = source
        .quote(&quote_request(DAI, USDC, 1_000_000))
        .await
        .unwrap_err();

    match err {
        SourceError::Unavailable(reason) => {
            assert!(reason.contains("500"));
            assert!(reason.contains("upstream exploded"));
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn catalog_failure_is_memoized_as_construction_failed() {
    let server = MockServer::start_async().await;
    let tokens = server
        .mock_async(|when, then| {
            when.method(GET).path("/swap/v0/tokens");
            then.status(503).body("maintenance");
        })
        .await;

    let source = zeroex(&server);
    for _ in 0..3 {
        let err = source.tokens().await.unwrap_err();
        assert!(matches!(err, SourceError::ConstructionFailed(_)));
    }

    // The endpoint was only hit once.
    assert_eq!(tokens.hits_async().await, 1);
}
