//! Signing key management and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or explicit input
//! - Keys are never logged or serialized

use alloy::primitives::B256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::ledger::account::AccountState;
use crate::ledger::types::{BroadcastPayload, ClientError, ClientResult, SignPayload};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "BLZ_PRIVATE_KEY";

/// Amino type name of a secp256k1 public key.
pub const PUB_KEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Holds the one signing key used for every transaction of a client.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    /// Compressed SEC1 public key, base64.
    public_key: String,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> ClientResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ClientError::Signing(format!("Invalid private key format: {}", e)))?;

        let compressed = signer.credential().verifying_key().to_encoded_point(true);
        let public_key = B64.encode(compressed.as_bytes());

        tracing::info!(public_key = %public_key, "Wallet initialized");

        Ok(Self { signer, public_key })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `BLZ_PRIVATE_KEY` from environment.
    pub fn from_env() -> ClientResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            ClientError::Config(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Base64 of the 33-byte compressed public key.
    pub fn public_key_base64(&self) -> &str {
        &self.public_key
    }

    /// Sign a broadcast payload for the given account state and chain.
    ///
    /// Returns the base64 of the 64-byte `R || S` signature over the SHA-256
    /// of the canonical sign document.
    pub fn sign_payload(
        &self,
        payload: &BroadcastPayload,
        account: &AccountState,
        chain_id: &str,
    ) -> ClientResult<String> {
        let sign_bytes = sign_bytes(payload, account, chain_id)?;
        tracing::trace!(sign_bytes = %sign_bytes, "txn sign");

        let digest: [u8; 32] = Sha256::digest(sign_bytes.as_bytes()).into();
        let signature = self
            .signer
            .sign_hash_sync(&B256::from(digest))
            .map_err(|e| ClientError::Signing(format!("Signing failed: {}", e)))?;

        let rs = serialize_rs(
            &signature.r().to_be_bytes::<32>(),
            &signature.s().to_be_bytes::<32>(),
        )?;
        Ok(B64.encode(rs))
    }

    #[cfg(test)]
    pub(crate) fn address(&self) -> alloy::primitives::Address {
        self.signer.address()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Canonical, normalized sign document for a payload.
pub fn sign_bytes(
    payload: &BroadcastPayload,
    account: &AccountState,
    chain_id: &str,
) -> ClientResult<String> {
    let doc = SignPayload {
        account_number: account.account_number.to_string(),
        chain_id,
        fee: &payload.fee,
        memo: &payload.memo,
        msgs: &payload.msg,
        sequence: account.sequence.to_string(),
    };
    let json = serde_json::to_string(&doc)?;
    Ok(normalize_json(&json))
}

/// Escape the characters the ledger's JSON encoder escapes, so that our sign
/// bytes match the ones it re-derives.
///
/// Input must be `serde_json` output: a backslash always starts an escape.
/// The ledger has no short form for backspace and form feed, so `\b` and `\f`
/// become `\u0008` and `\u000c`.
pub fn normalize_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('b') => out.push_str("\\u0008"),
                Some('f') => out.push_str("\\u000c"),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            '&' => out.push_str("\\u0026"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

/// Serialize a signature to `R || S`, each left-padded with zeros to 32 bytes.
pub fn serialize_rs(r: &[u8], s: &[u8]) -> ClientResult<[u8; 64]> {
    if r.len() > 32 || s.len() > 32 {
        return Err(ClientError::Signing(format!(
            "signature component too wide (r={} s={})",
            r.len(),
            s.len()
        )));
    }
    let mut out = [0u8; 64];
    out[32 - r.len()..32].copy_from_slice(r);
    out[64 - s.len()..].copy_from_slice(s);
    Ok(out)
}
