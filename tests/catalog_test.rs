//! Catalog tests
//!
//! Fetching and decoding the on-chain track registry through a stubbed
//! view-call reader: id enumeration, detail tuple decoding, gateway URL
//! construction, and skip-on-malformed-record behavior.

mod common;

use std::sync::Arc;

use common::MockReader;
use soundshare::{encode_packed_str, Catalog, Felt, MusicContract, Track, Uint256};

const GATEWAY: &str = "https://ipfs.io/ipfs";

fn music_address() -> Felt {
    Felt::from_hex("0x008116e28d9b4767a530ec96d4c84ce31d0e5b157880bc589a58effd7203202c").unwrap()
}

/// Detail tuple for a well-formed song record
fn good_details() -> Vec<Felt> {
    vec![
        encode_packed_str("Nina Duval").unwrap(),
        encode_packed_str("Sunset Memories").unwrap(),
        encode_packed_str("Jazz").unwrap(),
        Felt::from_u128(0x0123456789abcdef0123456789abcdef), // audio low
        Felt::from_u128(0xfedcba9876543210fedcba9876543210), // audio high
        Felt::from_u128(0x11111111111111111111111111111111), // artwork low
        Felt::from_u128(0x22222222222222222222222222222222), // artwork high
        Felt::from_u64(500),
        Felt::from_u128(10_000_000_000_000_000), // 0.01 tokens per share
    ]
}

/// Test 1: a full fetch decodes ids, strings, hashes, and amounts
#[tokio::test]
async fn test_fetch_tracks_decodes_records() {
    let reader = Arc::new(MockReader::new());
    reader.stub("get_all_song_ids", &[], vec![Felt::from_u64(1), Felt::from_u64(7)]);
    reader.stub("get_song_details", &[Felt::from_u64(7)], good_details());

    let music = MusicContract::bind(music_address(), reader);
    let catalog = Catalog::new(music, GATEWAY.to_string());

    let tracks = catalog.fetch_tracks().await.unwrap();
    assert_eq!(tracks.len(), 1);

    let track = &tracks[0];
    assert_eq!(track.id, Felt::from_u64(7));
    assert_eq!(track.title, "Sunset Memories");
    assert_eq!(track.genre, "Jazz");
    assert_eq!(track.artist, "Nina Duval");
    assert_eq!(track.total_shares, 500);
    assert_eq!(track.price_display(), "0.0100");
    assert_eq!(
        track.audio_url,
        format!(
            "{}/{}",
            GATEWAY, "fedcba9876543210fedcba98765432100123456789abcdef0123456789abcdef"
        )
    );
    assert!(track.cover_url.starts_with("https://ipfs.io/ipfs/2222"));
}

/// Test 2: malformed records are skipped, not fatal
#[tokio::test]
async fn test_fetch_tracks_skips_malformed() {
    let reader = Arc::new(MockReader::new());
    reader.stub(
        "get_all_song_ids",
        &[],
        vec![Felt::from_u64(3), Felt::from_u64(1), Felt::from_u64(2), Felt::from_u64(3)],
    );
    // Song 1: fine
    reader.stub("get_song_details", &[Felt::from_u64(1)], good_details());
    // Song 2: wrong tuple width
    reader.stub(
        "get_song_details",
        &[Felt::from_u64(2)],
        vec![Felt::from_u64(1), Felt::from_u64(2)],
    );
    // Song 3: missing artwork hash half
    let mut broken = good_details();
    broken[6] = Felt::ZERO;
    reader.stub("get_song_details", &[Felt::from_u64(3)], broken);

    let music = MusicContract::bind(music_address(), reader);
    let catalog = Catalog::new(music, GATEWAY.to_string());

    let tracks = catalog.fetch_tracks().await.unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, Felt::from_u64(1));
}

/// Test 3: an empty registry is an empty catalog, not an error
#[tokio::test]
async fn test_fetch_tracks_empty_registry() {
    let reader = Arc::new(MockReader::new());
    reader.stub("get_all_song_ids", &[], vec![Felt::from_u64(0)]);

    let music = MusicContract::bind(music_address(), reader);
    let catalog = Catalog::new(music, GATEWAY.to_string());

    let tracks = catalog.fetch_tracks().await.unwrap();
    assert!(tracks.is_empty());
}

/// Test 4: empty packed strings fall back to placeholder labels
#[tokio::test]
async fn test_track_placeholder_labels() {
    let mut details = good_details();
    details[0] = Felt::ZERO; // artist
    details[1] = Felt::ZERO; // name
    details[2] = Felt::ZERO; // genre

    let reader = Arc::new(MockReader::new());
    reader.stub("get_all_song_ids", &[], vec![Felt::from_u64(1), Felt::from_u64(4)]);
    reader.stub("get_song_details", &[Felt::from_u64(4)], details);

    let music = MusicContract::bind(music_address(), reader);
    let catalog = Catalog::new(music, GATEWAY.to_string());

    let tracks = catalog.fetch_tracks().await.unwrap();
    assert_eq!(tracks[0].title, "Untitled");
    assert_eq!(tracks[0].genre, "Unknown Genre");
    assert_eq!(tracks[0].artist, "Unknown Artist");
}

/// Test 5: a trailing slash on the gateway base does not double up
#[tokio::test]
async fn test_gateway_base_normalization() {
    let reader = Arc::new(MockReader::new());
    reader.stub("get_all_song_ids", &[], vec![Felt::from_u64(1), Felt::from_u64(9)]);
    reader.stub("get_song_details", &[Felt::from_u64(9)], good_details());

    let music = MusicContract::bind(music_address(), reader);
    let catalog = Catalog::new(music, "https://ipfs.io/ipfs/".to_string());

    let tracks = catalog.fetch_tracks().await.unwrap();
    assert!(!tracks[0].audio_url.contains("//fedcba"));
}

/// Test 6: a track list failure surfaces as an error (nothing to render)
#[tokio::test]
async fn test_fetch_tracks_propagates_id_failure() {
    let reader = Arc::new(MockReader::new());
    // No stub for get_all_song_ids at all

    let music = MusicContract::bind(music_address(), reader);
    let catalog = Catalog::new(music, GATEWAY.to_string());

    assert!(catalog.fetch_tracks().await.is_err());
}

/// Test 7: Track::from_details rejects oversized share counts
#[test]
fn test_track_rejects_wide_share_count() {
    let mut details_felts = good_details();
    details_felts[7] = Felt::from_u128(u128::MAX);

    let details = soundshare::SongDetails {
        artist: details_felts[0],
        name: details_felts[1],
        genre: details_felts[2],
        audio_hash_low: details_felts[3],
        audio_hash_high: details_felts[4],
        artwork_hash_low: details_felts[5],
        artwork_hash_high: details_felts[6],
        total_shares: details_felts[7],
        share_price: details_felts[8],
    };

    assert!(Track::from_details(Felt::from_u64(1), &details, GATEWAY).is_err());
}

/// Test 8: the raw share price survives decoding untouched
#[test]
fn test_track_price_is_raw_scaled_integer() {
    let details_felts = good_details();
    let details = soundshare::SongDetails {
        artist: details_felts[0],
        name: details_felts[1],
        genre: details_felts[2],
        audio_hash_low: details_felts[3],
        audio_hash_high: details_felts[4],
        artwork_hash_low: details_felts[5],
        artwork_hash_high: details_felts[6],
        total_shares: details_felts[7],
        share_price: details_felts[8],
    };

    let track = Track::from_details(Felt::from_u64(1), &details, GATEWAY).unwrap();
    assert_eq!(track.price_per_share, Uint256::from(10_000_000_000_000_000u128));
}
