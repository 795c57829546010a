//! Unsigned view calls over JSON-RPC
//!
//! Read calls need no signature and bypass the wallet entirely: they go
//! straight to a chain RPC endpoint as `starknet_call` requests against
//! the latest block. The [`CallReader`] trait is the seam; tests substitute
//! an in-memory reader.

use futures::future::BoxFuture;
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};

use crate::codec::Felt;
use crate::error::SoundShareError;
use crate::Result;

/// A view call request: target contract, entry point name, calldata.
#[derive(Clone, Debug)]
pub struct FunctionCall {
    pub contract_address: Felt,
    pub entry_point: String,
    pub calldata: Vec<Felt>,
}

/// Read-only access to contract state. Implementations must not sign
/// anything and must have no side effects on-chain.
pub trait CallReader: Send + Sync {
    fn call<'a>(&'a self, request: &'a FunctionCall) -> BoxFuture<'a, Result<Vec<Felt>>>;
}

/// Entry point selector: Keccak-256 of the name, truncated into the field
/// by masking the top 6 bits (sn_keccak).
pub fn selector_from_name(name: &str) -> Felt {
    let mut digest: [u8; 32] = Keccak256::digest(name.as_bytes()).into();
    digest[0] &= 0x03;
    Felt::from_bytes_be(digest)
}

/// Production reader speaking `starknet_call` over HTTP.
pub struct JsonRpcReader {
    http: reqwest::Client,
    endpoint: String,
}

impl JsonRpcReader {
    pub fn new(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    async fn call_inner(&self, request: &FunctionCall) -> Result<Vec<Felt>> {
        let selector = selector_from_name(&request.entry_point);
        let calldata: Vec<String> = request.calldata.iter().map(|f| f.to_hex()).collect();
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "starknet_call",
            "params": {
                "request": {
                    "contract_address": request.contract_address.to_hex(),
                    "entry_point_selector": selector.to_hex(),
                    "calldata": calldata,
                },
                "block_id": "latest",
            },
        });

        log::debug!(
            "starknet_call {} on {}",
            request.entry_point,
            request.contract_address
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| SoundShareError::Network(format!("RPC request failed: {}", e)))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SoundShareError::Network(format!("RPC response not JSON: {}", e)))?;

        if let Some(err) = payload.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error");
            return Err(SoundShareError::ContractCall(format!(
                "{} ({})",
                message, request.entry_point
            )));
        }

        let result = payload
            .get("result")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SoundShareError::ContractCall(format!(
                    "missing result array for {}",
                    request.entry_point
                ))
            })?;

        result
            .iter()
            .map(|v| {
                let s = v.as_str().ok_or_else(|| {
                    SoundShareError::decode("RPC result element is not a string")
                })?;
                Felt::from_hex(s)
            })
            .collect()
    }
}

impl CallReader for JsonRpcReader {
    fn call<'a>(&'a self, request: &'a FunctionCall) -> BoxFuture<'a, Result<Vec<Felt>>> {
        Box::pin(self.call_inner(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_masked_into_field() {
        let selector = selector_from_name("get_all_song_ids");
        // Top 6 bits cleared, so the first byte is at most 0x03
        assert!(selector.to_bytes_be()[0] <= 0x03);
        assert!(!selector.is_zero());
    }

    #[test]
    fn test_selector_is_deterministic() {
        assert_eq!(
            selector_from_name("buy_shares"),
            selector_from_name("buy_shares")
        );
        assert_ne!(
            selector_from_name("buy_shares"),
            selector_from_name("upload_song")
        );
    }
}
