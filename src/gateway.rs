//! Contract gateway
//!
//! A [`ContractHandle`] binds a fixed contract address and entry-point
//! list to a [`CallReader`]. Read calls go through the reader unsigned and
//! have no side effects; write calls are signed and submitted by the
//! wallet account and return a transaction hash. Callers must block on
//! confirmation before treating a write as durable;
//! [`ContractHandle::invoke_and_confirm`] does exactly that. There is no
//! retry policy: a failed submission surfaces directly.
//!
//! The typed wrappers ([`MusicContract`], [`TokenContract`],
//! [`SubscriptionContract`]) pin the marketplace ABI: entry point names,
//! calldata layout, and return tuple shapes.

use std::sync::Arc;

use crate::codec::{Felt, Uint256};
use crate::error::SoundShareError;
use crate::provider::{AccountApi, InvokeCall, TxHash};
use crate::rpc::{CallReader, FunctionCall};
use crate::Result;

/// Client-side proxy bound to a deployed contract.
#[derive(Clone)]
pub struct ContractHandle {
    address: Felt,
    entry_points: Vec<&'static str>,
    reader: Arc<dyn CallReader>,
}

impl ContractHandle {
    pub fn bind(address: Felt, entry_points: &[&'static str], reader: Arc<dyn CallReader>) -> Self {
        Self {
            address,
            entry_points: entry_points.to_vec(),
            reader,
        }
    }

    pub fn address(&self) -> Felt {
        self.address
    }

    fn ensure_entry_point(&self, entry_point: &str) -> Result<()> {
        if self.entry_points.iter().any(|ep| *ep == entry_point) {
            Ok(())
        } else {
            Err(SoundShareError::UnknownEntryPoint(entry_point.to_string()))
        }
    }

    /// Unsigned view call. No side effects.
    pub async fn call(&self, entry_point: &str, calldata: Vec<Felt>) -> Result<Vec<Felt>> {
        self.ensure_entry_point(entry_point)?;
        let request = FunctionCall {
            contract_address: self.address,
            entry_point: entry_point.to_string(),
            calldata,
        };
        self.reader.call(&request).await
    }

    /// Signed write call. Returns the transaction hash immediately; the
    /// effect is not durable until confirmed.
    pub async fn invoke(
        &self,
        account: &dyn AccountApi,
        entry_point: &str,
        calldata: Vec<Felt>,
    ) -> Result<TxHash> {
        self.ensure_entry_point(entry_point)?;
        log::debug!("invoke {} on {}", entry_point, self.address);
        account
            .execute(vec![InvokeCall {
                contract_address: self.address,
                entry_point: entry_point.to_string(),
                calldata,
            }])
            .await
    }

    /// Signed write call, blocking on confirmation before returning.
    pub async fn invoke_and_confirm(
        &self,
        account: &dyn AccountApi,
        entry_point: &str,
        calldata: Vec<Felt>,
    ) -> Result<TxHash> {
        let tx_hash = self.invoke(account, entry_point, calldata).await?;
        account.wait_for_transaction(&tx_hash).await?;
        log::info!("{} confirmed: {}", entry_point, tx_hash);
        Ok(tx_hash)
    }
}

/// Decode a serialized array return value: leading length felt, then
/// exactly that many elements.
fn decode_felt_array(raw: &[Felt]) -> Result<Vec<Felt>> {
    let Some((len, elements)) = raw.split_first() else {
        return Err(SoundShareError::decode("empty response for array value"));
    };
    let len = len
        .to_u64()
        .ok_or_else(|| SoundShareError::decode("array length exceeds 64 bits"))?
        as usize;
    if elements.len() != len {
        return Err(SoundShareError::decode(format!(
            "array length mismatch: header says {}, got {} elements",
            len,
            elements.len()
        )));
    }
    Ok(elements.to_vec())
}

// ============================================================================
// Music marketplace contract
// ============================================================================

/// Raw `get_song_details` return tuple, one felt per field. Strings are
/// packed, content hashes are 128-bit halves, amounts are 10^18-scaled.
#[derive(Clone, Debug)]
pub struct SongDetails {
    pub artist: Felt,
    pub name: Felt,
    pub genre: Felt,
    pub audio_hash_low: Felt,
    pub audio_hash_high: Felt,
    pub artwork_hash_low: Felt,
    pub artwork_hash_high: Felt,
    pub total_shares: Felt,
    pub share_price: Felt,
}

const SONG_DETAILS_WIDTH: usize = 9;

const MUSIC_ENTRY_POINTS: &[&str] = &[
    "get_all_song_ids",
    "get_song_details",
    "upload_song",
    "buy_shares",
];

/// Music marketplace contract: track registry, uploads, share purchases.
#[derive(Clone)]
pub struct MusicContract {
    handle: ContractHandle,
}

impl MusicContract {
    pub fn bind(address: Felt, reader: Arc<dyn CallReader>) -> Self {
        Self {
            handle: ContractHandle::bind(address, MUSIC_ENTRY_POINTS, reader),
        }
    }

    pub fn address(&self) -> Felt {
        self.handle.address()
    }

    /// Enumerate all registered song ids.
    pub async fn song_ids(&self) -> Result<Vec<Felt>> {
        let raw = self.handle.call("get_all_song_ids", vec![]).await?;
        decode_felt_array(&raw)
    }

    /// Fetch the raw detail tuple for one song.
    pub async fn song_details(&self, song_id: Felt) -> Result<SongDetails> {
        let raw = self.handle.call("get_song_details", vec![song_id]).await?;
        if raw.len() != SONG_DETAILS_WIDTH {
            return Err(SoundShareError::decode(format!(
                "song details for {} has {} felts, expected {}",
                song_id,
                raw.len(),
                SONG_DETAILS_WIDTH
            )));
        }
        Ok(SongDetails {
            artist: raw[0],
            name: raw[1],
            genre: raw[2],
            audio_hash_low: raw[3],
            audio_hash_high: raw[4],
            artwork_hash_low: raw[5],
            artwork_hash_high: raw[6],
            total_shares: raw[7],
            share_price: raw[8],
        })
    }

    /// Register a new song. Calldata mirrors the detail tuple minus the id.
    pub async fn upload_song(
        &self,
        account: &dyn AccountApi,
        details: &SongDetails,
    ) -> Result<TxHash> {
        let calldata = vec![
            details.artist,
            details.name,
            details.genre,
            details.audio_hash_low,
            details.audio_hash_high,
            details.artwork_hash_low,
            details.artwork_hash_high,
            details.total_shares,
            details.share_price,
        ];
        self.handle
            .invoke_and_confirm(account, "upload_song", calldata)
            .await
    }

    /// Buy shares in a song, paying `total_cost` in token units.
    pub async fn buy_shares(
        &self,
        account: &dyn AccountApi,
        song_id: Felt,
        share_count: u64,
        total_cost: &Uint256,
    ) -> Result<TxHash> {
        let (cost_low, cost_high) = total_cost.to_felts();
        let calldata = vec![song_id, Felt::from_u64(share_count), cost_low, cost_high];
        self.handle
            .invoke_and_confirm(account, "buy_shares", calldata)
            .await
    }
}

// ============================================================================
// ERC-20 token contract
// ============================================================================

const TOKEN_ENTRY_POINTS: &[&str] = &["balanceOf"];

/// ERC-20 token contract used for balances and payments.
#[derive(Clone)]
pub struct TokenContract {
    handle: ContractHandle,
}

impl TokenContract {
    pub fn bind(address: Felt, reader: Arc<dyn CallReader>) -> Self {
        Self {
            handle: ContractHandle::bind(address, TOKEN_ENTRY_POINTS, reader),
        }
    }

    /// Read the token balance of an account. Returns the raw 10^18-scaled
    /// value decoded from the (low, high) return pair.
    pub async fn balance_of(&self, account_address: Felt) -> Result<Uint256> {
        let raw = self.handle.call("balanceOf", vec![account_address]).await?;
        if raw.len() != 2 {
            return Err(SoundShareError::decode(format!(
                "balanceOf returned {} felts, expected 2",
                raw.len()
            )));
        }
        Uint256::from_felts(&raw[0], &raw[1])
    }
}

// ============================================================================
// Subscription contract
// ============================================================================

const SUBSCRIPTION_ENTRY_POINTS: &[&str] = &["upgrade_subscription"];

/// Subscription contract: a single write entry point taking a tier id.
#[derive(Clone)]
pub struct SubscriptionContract {
    handle: ContractHandle,
}

impl SubscriptionContract {
    pub fn bind(address: Felt, reader: Arc<dyn CallReader>) -> Self {
        Self {
            handle: ContractHandle::bind(address, SUBSCRIPTION_ENTRY_POINTS, reader),
        }
    }

    /// Upgrade to a tier, confirmed before returning.
    pub async fn upgrade(&self, account: &dyn AccountApi, tier_id: u64) -> Result<TxHash> {
        self.handle
            .invoke_and_confirm(account, "upgrade_subscription", vec![Felt::from_u64(tier_id)])
            .await
    }
}
