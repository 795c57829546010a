//! Track catalog
//!
//! Reads the full song registry: enumerate ids, fetch each detail tuple,
//! decode packed fields, and build gateway URLs for the audio and artwork
//! assets. A malformed record is logged and skipped; one bad row never
//! takes the catalog down.

use crate::codec::{
    decode_packed_str, format_token_amount, reconstruct_content_hash, Felt, Uint256,
};
use crate::gateway::{MusicContract, SongDetails};
use crate::Result;

/// A decoded track record, ready for display.
#[derive(Clone, Debug)]
pub struct Track {
    pub id: Felt,
    pub title: String,
    pub genre: String,
    pub artist: String,
    /// Gateway URL for the artwork asset
    pub cover_url: String,
    /// Gateway URL for the audio asset
    pub audio_url: String,
    /// Shares available for purchase
    pub total_shares: u64,
    /// Raw 10^18-scaled price per share
    pub price_per_share: Uint256,
}

impl Track {
    /// Decode a detail tuple into a display record. Empty packed strings
    /// fall back to placeholder labels rather than failing the record.
    pub fn from_details(id: Felt, details: &SongDetails, gateway_base: &str) -> Result<Track> {
        let title = non_empty_or(decode_packed_str(&details.name)?, "Untitled");
        let genre = non_empty_or(decode_packed_str(&details.genre)?, "Unknown Genre");
        let artist = non_empty_or(decode_packed_str(&details.artist)?, "Unknown Artist");

        let audio_hash =
            reconstruct_content_hash(&details.audio_hash_low, &details.audio_hash_high)?;
        let artwork_hash =
            reconstruct_content_hash(&details.artwork_hash_low, &details.artwork_hash_high)?;

        let total_shares = details
            .total_shares
            .to_u64()
            .ok_or_else(|| crate::SoundShareError::decode("total shares exceeds 64 bits"))?;
        let price_per_share = Uint256::from_felt(&details.share_price);

        let base = gateway_base.trim_end_matches('/');
        Ok(Track {
            id,
            title,
            genre,
            artist,
            cover_url: format!("{}/{}", base, artwork_hash),
            audio_url: format!("{}/{}", base, audio_hash),
            total_shares,
            price_per_share,
        })
    }

    /// Price per share divided by 10^18, 4 decimal digits.
    pub fn price_display(&self) -> String {
        format_token_amount(&self.price_per_share)
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Catalog reader over the music contract.
#[derive(Clone)]
pub struct Catalog {
    music: MusicContract,
    gateway_base: String,
}

impl Catalog {
    pub fn new(music: MusicContract, gateway_base: String) -> Self {
        Self { music, gateway_base }
    }

    /// Fetch and decode every registered track.
    ///
    /// Records that fail to fetch or decode are logged and skipped. An
    /// empty registry yields an empty catalog, not an error.
    pub async fn fetch_tracks(&self) -> Result<Vec<Track>> {
        let song_ids = self.music.song_ids().await?;
        log::debug!("Catalog has {} song ids", song_ids.len());

        let mut tracks = Vec::with_capacity(song_ids.len());
        for song_id in song_ids {
            match self.fetch_one(song_id).await {
                Ok(track) => tracks.push(track),
                Err(e) => {
                    log::warn!("Skipping song {}: {}", song_id, e);
                }
            }
        }

        log::info!("Fetched {} tracks", tracks.len());
        Ok(tracks)
    }

    async fn fetch_one(&self, song_id: Felt) -> Result<Track> {
        let details = self.music.song_details(song_id).await?;
        Track::from_details(song_id, &details, &self.gateway_base)
    }
}
