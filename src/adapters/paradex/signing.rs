//! Paradex Signing
//!
//! Starknet typed-data signatures (SNIP-12 revision 0) for onboarding,
//! authentication and orders.
//!
//! Every message is hashed as
//! `H("StarkNet Message", domain_hash, account, struct_hash)` where `H` is
//! `compute_hash_on_elements` = reduce(pedersen, [*data, len], 0). Type
//! strings carry no quotes.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use starknet_core::crypto::compute_hash_on_elements;
use starknet_core::types::Felt;
use starknet_core::utils::{cairo_short_string_to_felt, starknet_keccak};
use starknet_signers::SigningKey;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

use super::config::{ParadexAccount, ParadexSystemConfig};
use super::types::{OrderIntent, QUANTUM_DECIMALS};

// =============================================================================
// Typed Data Constants
// =============================================================================

const DOMAIN_NAME: &str = "Paradex";
const MESSAGE_PREFIX: &str = "StarkNet Message";

const DOMAIN_TYPE: &str = "StarkNetDomain(name:felt,chainId:felt,version:felt)";
const ONBOARDING_TYPE: &str = "Constant(action:felt)";
const AUTH_REQUEST_TYPE: &str =
    "Request(method:felt,path:felt,body:felt,timestamp:felt,expiration:felt)";
const ORDER_TYPE: &str =
    "Order(timestamp:felt,market:felt,side:felt,orderType:felt,size:felt,price:felt)";

const ONBOARDING_ACTION: &str = "Onboarding";
const AUTH_METHOD: &str = "POST";
const AUTH_PATH: &str = "/v1/auth";

/// Auth signatures stay valid for 24 hours
pub const AUTH_SIGNATURE_TTL_SECS: u64 = 24 * 60 * 60;

/// Sizes and prices are signed as integers scaled by 10^8

// =============================================================================
// Helpers
// =============================================================================

fn short_string(value: &str, what: &str) -> ExchangeResult<Felt> {
    cairo_short_string_to_felt(value)
        .map_err(|e| ExchangeError::Signing(format!("Invalid {} '{}': {}", what, value, e)))
}

fn parse_felt(value: &str, what: &str) -> ExchangeResult<Felt> {
    Felt::from_hex(value).map_err(|e| ExchangeError::Signing(format!("Invalid {}: {}", what, e)))
}

/// Scale a decimal to 8-decimal quantums ("0.1" -> 10000000)
///
/// Values with more than 8 decimals are refused: the signed quantums must
/// match the decimal string sent next to them.
pub fn to_quantums(value: Decimal) -> ExchangeResult<Felt> {
    if value.normalize().scale() > QUANTUM_DECIMALS {
        return Err(ExchangeError::InvalidOrder(format!(
            "{} has more than {} decimals",
            value, QUANTUM_DECIMALS
        )));
    }
    value
        .checked_mul(Decimal::from(10u64.pow(QUANTUM_DECIMALS)))
        .and_then(|scaled| scaled.to_u128())
        .map(Felt::from)
        .ok_or_else(|| ExchangeError::InvalidOrder(format!("Value out of range: {}", value)))
}

/// Starknet public key for a private key, as `0x` + 64 hex chars
pub fn derive_public_key(private_key: &str) -> ExchangeResult<String> {
    let secret = parse_felt(private_key, "private key")?;
    let public = SigningKey::from_secret_scalar(secret).verifying_key().scalar();
    Ok(format!("0x{}", hex::encode(public.to_bytes_be())))
}

/// Paradex signature header: `["<r decimal>","<s decimal>"]`
pub fn format_signature(r: &Felt, s: &Felt) -> String {
    let r = num_bigint::BigUint::from_bytes_be(&r.to_bytes_be());
    let s = num_bigint::BigUint::from_bytes_be(&s.to_bytes_be());
    format!("[\"{}\",\"{}\"]", r, s)
}

// =============================================================================
// Message Hashes
// =============================================================================

fn domain_hash(config: &ParadexSystemConfig) -> ExchangeResult<Felt> {
    Ok(compute_hash_on_elements(&[
        starknet_keccak(DOMAIN_TYPE.as_bytes()),
        short_string(DOMAIN_NAME, "domain name")?,
        short_string(&config.chain_id, "chain_id")?,
        Felt::ONE,
    ]))
}

fn message_hash(
    config: &ParadexSystemConfig,
    account_address: &str,
    struct_hash: Felt,
) -> ExchangeResult<Felt> {
    Ok(compute_hash_on_elements(&[
        short_string(MESSAGE_PREFIX, "message prefix")?,
        domain_hash(config)?,
        parse_felt(account_address, "account address")?,
        struct_hash,
    ]))
}

/// Hash of the `Constant{action:"Onboarding"}` message
pub fn onboarding_message_hash(
    config: &ParadexSystemConfig,
    account_address: &str,
) -> ExchangeResult<Felt> {
    let struct_hash = compute_hash_on_elements(&[
        starknet_keccak(ONBOARDING_TYPE.as_bytes()),
        short_string(ONBOARDING_ACTION, "action")?,
    ]);
    message_hash(config, account_address, struct_hash)
}

/// Hash of the `Request` message for POST /v1/auth (timestamps in seconds)
pub fn auth_message_hash(
    config: &ParadexSystemConfig,
    account_address: &str,
    timestamp_secs: u64,
    expiration_secs: u64,
) -> ExchangeResult<Felt> {
    let struct_hash = compute_hash_on_elements(&[
        starknet_keccak(AUTH_REQUEST_TYPE.as_bytes()),
        short_string(AUTH_METHOD, "method")?,
        short_string(AUTH_PATH, "path")?,
        short_string("", "body")?,
        Felt::from(timestamp_secs),
        Felt::from(expiration_secs),
    ]);
    message_hash(config, account_address, struct_hash)
}

/// Hash of the `Order` message (timestamp in milliseconds)
pub fn order_message_hash(
    config: &ParadexSystemConfig,
    account_address: &str,
    intent: &OrderIntent,
    timestamp_ms: u64,
) -> ExchangeResult<Felt> {
    let struct_hash = compute_hash_on_elements(&[
        starknet_keccak(ORDER_TYPE.as_bytes()),
        Felt::from(timestamp_ms),
        short_string(&intent.market, "market")?,
        Felt::from(intent.side.signing_code()),
        short_string(intent.order_type.as_str(), "order type")?,
        to_quantums(intent.size)?,
        to_quantums(intent.effective_price())?,
    ]);
    message_hash(config, account_address, struct_hash)
}

// =============================================================================
// Signing
// =============================================================================

fn sign_hash(private_key: &str, hash: &Felt) -> ExchangeResult<String> {
    let secret = parse_felt(private_key, "private key")?;
    let signature = SigningKey::from_secret_scalar(secret)
        .sign(hash)
        .map_err(|e| ExchangeError::Signing(format!("Starknet signing failed: {}", e)))?;
    Ok(format_signature(&signature.r, &signature.s))
}

/// Signature headers for POST /auth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSignature {
    pub signature: String,
    pub timestamp: u64,
    pub expiration: u64,
}

/// Sign the onboarding message for `account`
#[tracing::instrument(skip_all, fields(account = %account.address, chain = %config.chain_id))]
pub fn sign_onboarding_request(
    config: &ParadexSystemConfig,
    account: &ParadexAccount,
) -> ExchangeResult<String> {
    let hash = onboarding_message_hash(config, &account.address)?;
    tracing::debug!(message_hash = %format!("{:#x}", hash), "Onboarding message hashed");
    sign_hash(&account.private_key, &hash)
}

/// Sign the auth request; expiration is `timestamp_secs` + 24h
#[tracing::instrument(skip_all, fields(account = %account.address, chain = %config.chain_id))]
pub fn sign_auth_request(
    config: &ParadexSystemConfig,
    account: &ParadexAccount,
    timestamp_secs: u64,
) -> ExchangeResult<AuthSignature> {
    let expiration = timestamp_secs + AUTH_SIGNATURE_TTL_SECS;
    let hash = auth_message_hash(config, &account.address, timestamp_secs, expiration)?;
    tracing::debug!(message_hash = %format!("{:#x}", hash), timestamp_secs, expiration, "Auth message hashed");
    Ok(AuthSignature {
        signature: sign_hash(&account.private_key, &hash)?,
        timestamp: timestamp_secs,
        expiration,
    })
}

/// Sign an order intent at `timestamp_ms`
#[tracing::instrument(skip_all, fields(account = %account.address, market = %intent.market))]
pub fn sign_order(
    config: &ParadexSystemConfig,
    account: &ParadexAccount,
    intent: &OrderIntent,
    timestamp_ms: u64,
) -> ExchangeResult<String> {
    let hash = order_message_hash(config, &account.address, intent, timestamp_ms)?;
    tracing::debug!(message_hash = %format!("{:#x}", hash), timestamp_ms, "Order message hashed");
    sign_hash(&account.private_key, &hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::paradex::config::{
        TEST_ACCOUNT_ADDRESS, TEST_ETHEREUM_ACCOUNT, TEST_PRIVATE_KEY,
    };
    use crate::adapters::paradex::types::{Instruction, OrderSide, OrderType};
    use starknet_core::crypto::Signature;
    use std::str::FromStr;

    fn test_account() -> ParadexAccount {
        ParadexAccount::from_private_key(TEST_PRIVATE_KEY, TEST_ACCOUNT_ADDRESS, TEST_ETHEREUM_ACCOUNT)
            .unwrap()
    }

    fn test_intent() -> OrderIntent {
        OrderIntent {
            market: "ETH-USD-PERP".into(),
            side: OrderSide::Sell,
            order_type: OrderType::Limit,
            size: Decimal::from(10),
            price: Some(Decimal::from_str("3292.04").unwrap()),
            instruction: Instruction::Gtc,
            client_id: None,
        }
    }

    fn parse_signature(header: &str) -> Signature {
        let parts: Vec<String> = serde_json::from_str(header).unwrap();
        assert_eq!(parts.len(), 2);
        Signature {
            r: Felt::from_dec_str(&parts[0]).unwrap(),
            s: Felt::from_dec_str(&parts[1]).unwrap(),
        }
    }

    fn verify(header: &str, hash: &Felt) -> bool {
        let secret = Felt::from_hex(TEST_PRIVATE_KEY).unwrap();
        SigningKey::from_secret_scalar(secret)
            .verifying_key()
            .verify(hash, &parse_signature(header))
            .unwrap()
    }

    #[test]
    fn test_to_quantums() {
        assert_eq!(to_quantums(Decimal::from_str("0.1").unwrap()).unwrap(), Felt::from(10_000_000u64));
        assert_eq!(
            to_quantums(Decimal::from_str("3292.04").unwrap()).unwrap(),
            Felt::from(329_204_000_000u64)
        );
        assert_eq!(to_quantums(Decimal::ZERO).unwrap(), Felt::ZERO);
        assert!(to_quantums(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_to_quantums_refuses_sub_quantum_precision() {
        assert_eq!(
            to_quantums(Decimal::from_str("0.12345678").unwrap()).unwrap(),
            Felt::from(12_345_678u64)
        );
        // Trailing zeros beyond the eighth decimal are not precision
        assert_eq!(
            to_quantums(Decimal::from_str("0.1000000000").unwrap()).unwrap(),
            Felt::from(10_000_000u64)
        );
        assert!(matches!(
            to_quantums(Decimal::from_str("0.123456789").unwrap()),
            Err(ExchangeError::InvalidOrder(_))
        ));
        assert!(to_quantums(Decimal::MAX).is_err());
    }

    #[test]
    fn test_derive_public_key_of_one_is_generator() {
        // Public key of secret 1 is the x coordinate of the STARK curve generator
        let public_key = derive_public_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            public_key,
            "0x01ef15c18599971b7beced415a40f0c7deacfd9b0d1819e03d723d8bc943cfca"
        );
    }

    #[test]
    fn test_derive_public_key_invalid() {
        assert!(matches!(derive_public_key("zz"), Err(ExchangeError::Signing(_))));
    }

    #[test]
    fn test_format_signature_is_decimal_json_array() {
        let header = format_signature(&Felt::from(255u64), &Felt::from(16u64));
        assert_eq!(header, "[\"255\",\"16\"]");
    }

    #[test]
    fn test_onboarding_signature_verifies() {
        let config = ParadexSystemConfig::default();
        let account = test_account();
        let header = sign_onboarding_request(&config, &account).unwrap();
        let hash = onboarding_message_hash(&config, &account.address).unwrap();
        assert!(verify(&header, &hash));
    }

    #[test]
    fn test_auth_signature_expiration_and_verification() {
        let config = ParadexSystemConfig::default();
        let account = test_account();
        let auth = sign_auth_request(&config, &account, 1_700_000_000).unwrap();
        assert_eq!(auth.timestamp, 1_700_000_000);
        assert_eq!(auth.expiration, 1_700_000_000 + 86_400);

        let hash = auth_message_hash(&config, &account.address, auth.timestamp, auth.expiration).unwrap();
        assert!(verify(&auth.signature, &hash));
    }

    #[test]
    fn test_signatures_are_deterministic() {
        let config = ParadexSystemConfig::default();
        let account = test_account();
        let intent = test_intent();
        let a = sign_order(&config, &account, &intent, 1_700_000_000_000).unwrap();
        let b = sign_order(&config, &account, &intent, 1_700_000_000_000).unwrap();
        assert_eq!(a, b);

        let hash = order_message_hash(&config, &account.address, &intent, 1_700_000_000_000).unwrap();
        assert!(verify(&a, &hash));
    }

    #[test]
    fn test_order_hash_changes_with_any_field() {
        let config = ParadexSystemConfig::default();
        let account = test_account();
        let intent = test_intent();
        let base = order_message_hash(&config, &account.address, &intent, 1_700_000_000_000).unwrap();

        let later = order_message_hash(&config, &account.address, &intent, 1_700_000_000_001).unwrap();
        assert_ne!(base, later);

        let mut buy = intent.clone();
        buy.side = OrderSide::Buy;
        assert_ne!(base, order_message_hash(&config, &account.address, &buy, 1_700_000_000_000).unwrap());

        let mut bigger = intent.clone();
        bigger.size = Decimal::from(11);
        assert_ne!(base, order_message_hash(&config, &account.address, &bigger, 1_700_000_000_000).unwrap());

        let mut repriced = intent.clone();
        repriced.price = Some(Decimal::from(3300));
        assert_ne!(base, order_message_hash(&config, &account.address, &repriced, 1_700_000_000_000).unwrap());

        let other_chain = ParadexSystemConfig {
            chain_id: "PRIVATE_SN_PARACLEAR_MAINNET".into(),
            ..Default::default()
        };
        assert_ne!(base, order_message_hash(&other_chain, &account.address, &intent, 1_700_000_000_000).unwrap());

        let other_account = order_message_hash(&config, "0x2", &intent, 1_700_000_000_000).unwrap();
        assert_ne!(base, other_account);
    }

    #[test]
    fn test_market_order_signs_zero_price() {
        let config = ParadexSystemConfig::default();
        let account = test_account();
        let mut market = test_intent();
        market.order_type = OrderType::Market;

        let mut market_with_price = market.clone();
        market_with_price.price = Some(Decimal::from(1));

        // Price is ignored for MARKET orders
        assert_eq!(
            order_message_hash(&config, &account.address, &market, 1).unwrap(),
            order_message_hash(&config, &account.address, &market_with_price, 1).unwrap()
        );
    }

    #[test]
    fn test_message_types_are_domain_separated() {
        let config = ParadexSystemConfig::default();
        let onboarding = onboarding_message_hash(&config, TEST_ACCOUNT_ADDRESS).unwrap();
        let auth = auth_message_hash(&config, TEST_ACCOUNT_ADDRESS, 1, 1 + AUTH_SIGNATURE_TTL_SECS).unwrap();
        let order = order_message_hash(&config, TEST_ACCOUNT_ADDRESS, &test_intent(), 1).unwrap();
        assert_ne!(onboarding, auth);
        assert_ne!(onboarding, order);
        assert_ne!(auth, order);

        // Same fields under a different type string hash differently
        let swapped = compute_hash_on_elements(&[
            starknet_keccak(ONBOARDING_TYPE.as_bytes()),
            cairo_short_string_to_felt("Onboarding").unwrap(),
        ]);
        let as_request = compute_hash_on_elements(&[
            starknet_keccak(AUTH_REQUEST_TYPE.as_bytes()),
            cairo_short_string_to_felt("Onboarding").unwrap(),
        ]);
        assert_ne!(swapped, as_request);
    }

    #[test]
    fn test_invalid_market_short_string() {
        let config = ParadexSystemConfig::default();
        let mut intent = test_intent();
        intent.market = "A-MARKET-NAME-THAT-IS-FAR-TOO-LONG-FOR-A-FELT".into();
        let result = order_message_hash(&config, TEST_ACCOUNT_ADDRESS, &intent, 1);
        assert!(matches!(result, Err(ExchangeError::Signing(_))));
    }
}
