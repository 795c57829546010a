//! Release upload flow
//!
//! Publishing a track is a two-phase operation: pin the audio and artwork
//! bytes to the IPFS pinning service, then register the metadata on-chain
//! with `upload_song`. Form fields are validated before either phase
//! starts, and the on-chain write is confirmed before the upload is
//! reported as successful. A pinning failure aborts the flow before any
//! transaction is submitted.

use std::sync::Arc;

use serde_json::Value;

use crate::codec::{encode_packed_str, split_content_hash, Uint256, E18};
use crate::error::SoundShareError;
use crate::gateway::{MusicContract, SongDetails};
use crate::provider::{AccountApi, TxHash};
use crate::rpc::CallReader;
use crate::Result;

/// Default share issue when the artist leaves the field blank
const DEFAULT_TOTAL_SHARES: u64 = 100;

/// Default share price: 0.01 tokens, 10^18-scaled
const DEFAULT_SHARE_PRICE: u64 = E18 / 100;

/// A new release as entered by the artist. Audio and artwork are raw file
/// bytes; shares and price are optional with marketplace defaults.
#[derive(Clone, Debug, Default)]
pub struct NewRelease {
    pub name: String,
    pub genre: String,
    pub artist: String,
    pub audio: Vec<u8>,
    pub audio_file_name: String,
    pub artwork: Vec<u8>,
    pub artwork_file_name: String,
    pub total_shares: Option<u64>,
    /// Price per share, 10^18-scaled
    pub share_price: Option<Uint256>,
}

impl NewRelease {
    /// Field validation, performed before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SoundShareError::invalid_input("song name is required"));
        }
        if self.genre.trim().is_empty() {
            return Err(SoundShareError::invalid_input("genre is required"));
        }
        if self.audio.is_empty() {
            return Err(SoundShareError::invalid_input("music file is required"));
        }
        if self.artwork.is_empty() {
            return Err(SoundShareError::invalid_input("album cover is required"));
        }
        if self.total_shares == Some(0) {
            return Err(SoundShareError::invalid_input(
                "total shares must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Successful upload outcome.
#[derive(Clone, Debug)]
pub struct UploadReceipt {
    pub tx_hash: TxHash,
    pub audio_hash: String,
    pub artwork_hash: String,
}

// ============================================================================
// Pinning client
// ============================================================================

/// Content pinning over the external service's HTTP API. Returns the
/// 64-char hex content hash the chain stores as two 128-bit halves.
pub trait ContentPinner: Send + Sync {
    fn pin_bytes<'a>(
        &'a self,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> futures::future::BoxFuture<'a, Result<String>>;
}

/// Pinata-style pinning client: multipart POST with bearer JWT.
pub struct PinningClient {
    http: reqwest::Client,
    base_url: String,
    jwt: Option<String>,
}

impl PinningClient {
    pub fn new(base_url: String, jwt: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            jwt,
        }
    }

    async fn pin_inner(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        log::debug!("Pinning {} ({} bytes)", file_name, bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!(
            "{}/pinning/pinFileToIPFS",
            self.base_url.trim_end_matches('/')
        );
        let mut request = self.http.post(&url).multipart(form);
        if let Some(jwt) = &self.jwt {
            request = request.bearer_auth(jwt);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SoundShareError::Ipfs(format!("pin request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SoundShareError::Ipfs(format!(
                "pinning service returned {}",
                status
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SoundShareError::Ipfs(format!("pin response not JSON: {}", e)))?;

        let hash = payload
            .get("IpfsHash")
            .and_then(Value::as_str)
            .ok_or_else(|| SoundShareError::Ipfs("pin response missing IpfsHash".to_string()))?;

        if hash.len() != 64 || hex::decode(hash).is_err() {
            return Err(SoundShareError::Ipfs(format!(
                "unexpected content hash format: {:?}",
                hash
            )));
        }

        log::info!("Pinned {} as {}", file_name, hash);
        Ok(hash.to_string())
    }
}

impl ContentPinner for PinningClient {
    fn pin_bytes<'a>(
        &'a self,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> futures::future::BoxFuture<'a, Result<String>> {
        Box::pin(self.pin_inner(file_name, bytes))
    }
}

// ============================================================================
// Uploader
// ============================================================================

/// End-to-end release publisher: pin assets, then register on-chain.
pub struct Uploader {
    pinner: Arc<dyn ContentPinner>,
    music: MusicContract,
}

impl Uploader {
    pub fn new(pinner: Arc<dyn ContentPinner>, music: MusicContract) -> Self {
        Self { pinner, music }
    }

    /// Convenience constructor from config values.
    pub fn with_pinning_service(
        pinning_api_url: String,
        pinning_jwt: Option<String>,
        music_contract: crate::codec::Felt,
        reader: Arc<dyn CallReader>,
    ) -> Self {
        Self {
            pinner: Arc::new(PinningClient::new(pinning_api_url, pinning_jwt)),
            music: MusicContract::bind(music_contract, reader),
        }
    }

    /// Publish a release. Validates locally, pins both assets, then
    /// submits and confirms `upload_song`.
    pub async fn upload(
        &self,
        account: &dyn AccountApi,
        release: &NewRelease,
    ) -> Result<UploadReceipt> {
        release.validate()?;

        let audio_hash = self
            .pinner
            .pin_bytes(&release.audio_file_name, release.audio.clone())
            .await?;
        let artwork_hash = self
            .pinner
            .pin_bytes(&release.artwork_file_name, release.artwork.clone())
            .await?;

        let (audio_low, audio_high) = split_content_hash(&audio_hash)?;
        let (artwork_low, artwork_high) = split_content_hash(&artwork_hash)?;

        let total_shares = release.total_shares.unwrap_or(DEFAULT_TOTAL_SHARES);
        let share_price = release
            .share_price
            .unwrap_or(Uint256::from(DEFAULT_SHARE_PRICE));
        let (price_low, price_high) = share_price.to_felts();
        if !price_high.is_zero() {
            return Err(SoundShareError::invalid_input(
                "share price exceeds 128 bits",
            ));
        }

        let details = SongDetails {
            artist: encode_packed_str(release.artist.trim())?,
            name: encode_packed_str(release.name.trim())?,
            genre: encode_packed_str(release.genre.trim())?,
            audio_hash_low: audio_low,
            audio_hash_high: audio_high,
            artwork_hash_low: artwork_low,
            artwork_hash_high: artwork_high,
            total_shares: crate::codec::Felt::from_u64(total_shares),
            share_price: price_low,
        };

        let tx_hash = self.music.upload_song(account, &details).await?;
        log::info!("Release {:?} registered: {}", release.name, tx_hash);

        Ok(UploadReceipt {
            tx_hash,
            audio_hash,
            artwork_hash,
        })
    }
}
