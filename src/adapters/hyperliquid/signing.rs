//! Hyperliquid Signing
//!
//! L1 action signing: the action is MessagePack-encoded, hashed together with
//! the nonce and vault flag into a `connectionId`, and that id is signed as an
//! EIP-712 `Agent` message ("phantom agent").

use std::str::FromStr;

use ethers::abi::{encode, Token};
use ethers::core::types::{Address, Signature, H256, U256};
use ethers::core::utils::keccak256;
use ethers::signers::LocalWallet;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

use super::types::{Action, SignatureWire};

/// EIP-712 domain used for L1 actions
const AGENT_DOMAIN_NAME: &str = "Exchange";
const AGENT_DOMAIN_VERSION: &str = "1";
const AGENT_CHAIN_ID: u64 = 1337;

const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const AGENT_TYPE: &str = "Agent(string source,bytes32 connectionId)";

/// Build a wallet from a hex private key (with or without 0x prefix)
pub fn wallet_from_private_key(private_key: &str) -> ExchangeResult<LocalWallet> {
    let key = private_key.strip_prefix("0x").unwrap_or(private_key);
    LocalWallet::from_str(key)
        .map_err(|e| ExchangeError::Signing(format!("Invalid private key: {}", e)))
}

/// keccak256(msgpack(action) || nonce_be || vault_flag [|| vault_address])
pub fn action_hash(
    action: &Action,
    nonce: u64,
    vault_address: Option<Address>,
) -> ExchangeResult<[u8; 32]> {
    let mut bytes = rmp_serde::to_vec_named(action)
        .map_err(|e| ExchangeError::Signing(format!("MessagePack encoding failed: {}", e)))?;
    bytes.extend_from_slice(&nonce.to_be_bytes());
    match vault_address {
        None => bytes.push(0),
        Some(vault) => {
            bytes.push(1);
            bytes.extend_from_slice(vault.as_bytes());
        }
    }
    Ok(keccak256(&bytes))
}

fn domain_separator() -> [u8; 32] {
    keccak256(encode(&[
        Token::FixedBytes(keccak256(DOMAIN_TYPE).to_vec()),
        Token::FixedBytes(keccak256(AGENT_DOMAIN_NAME).to_vec()),
        Token::FixedBytes(keccak256(AGENT_DOMAIN_VERSION).to_vec()),
        Token::Uint(U256::from(AGENT_CHAIN_ID)),
        Token::Address(Address::zero()),
    ]))
}

/// Struct hash of the phantom agent; `source` is "a" on mainnet, "b" on testnet
pub fn agent_struct_hash(connection_id: [u8; 32], is_mainnet: bool) -> [u8; 32] {
    let source = if is_mainnet { "a" } else { "b" };
    keccak256(encode(&[
        Token::FixedBytes(keccak256(AGENT_TYPE).to_vec()),
        Token::FixedBytes(keccak256(source).to_vec()),
        Token::FixedBytes(connection_id.to_vec()),
    ]))
}

/// EIP-712 digest: keccak256("\x19\x01" || domainSeparator || structHash)
pub fn agent_signing_hash(connection_id: [u8; 32], is_mainnet: bool) -> [u8; 32] {
    let mut data = Vec::with_capacity(66);
    data.push(0x19);
    data.push(0x01);
    data.extend_from_slice(&domain_separator());
    data.extend_from_slice(&agent_struct_hash(connection_id, is_mainnet));
    keccak256(&data)
}

/// Sign an L1 action (order, leverage update) with no vault
pub fn sign_l1_action(
    wallet: &LocalWallet,
    action: &Action,
    nonce: u64,
    is_mainnet: bool,
) -> ExchangeResult<SignatureWire> {
    let connection_id = action_hash(action, nonce, None)?;
    let digest = agent_signing_hash(connection_id, is_mainnet);

    let signature = wallet
        .sign_hash(H256::from(digest))
        .map_err(|e| ExchangeError::Signing(format!("EIP-712 signing failed: {}", e)))?;

    tracing::debug!(
        nonce,
        connection_id = %hex::encode(connection_id),
        mainnet = is_mainnet,
        "Hyperliquid action signed"
    );

    Ok(signature_to_wire(&signature))
}

fn signature_to_wire(signature: &Signature) -> SignatureWire {
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    signature.r.to_big_endian(&mut r);
    signature.s.to_big_endian(&mut s);
    // ethers may return 0/1, the exchange expects 27/28
    let v = if signature.v < 27 { signature.v + 27 } else { signature.v };
    SignatureWire {
        r: format!("0x{}", hex::encode(r)),
        s: format!("0x{}", hex::encode(s)),
        v,
    }
}
