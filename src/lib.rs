//! SoundShare: client SDK for an on-chain music share marketplace
//!
//! This crate provides the wallet and contract integration layer for the
//! SoundShare platform: fractional ownership of music tracks, sold as
//! on-chain shares, with audio and artwork stored on IPFS.
//!
//! # Architecture
//!
//! - **Wallet Session**: connect/reconnect/disconnect lifecycle over a
//!   browser-style wallet provider, with account and network change events
//! - **Contract Gateway**: bound contract handles issuing unsigned view
//!   calls and wallet-signed invokes against fixed entry points
//! - **Balance Poller**: periodic ERC-20 balance refresh while connected
//! - **Catalog / Marketplace / Upload**: typed flows over the gateway for
//!   browsing tracks, buying shares, upgrading subscriptions, and
//!   publishing new releases
//!
//! The wallet provider, the chain RPC endpoint, and the IPFS pinning
//! service are external collaborators. They enter the crate through the
//! [`WalletProvider`], [`AccountApi`], and [`CallReader`] traits so flows
//! can be exercised against mocks.
//!
//! # Example
//!
//! ```ignore
//! use soundshare::{AppConfig, JsonRpcReader, MusicContract, Catalog, WalletSession};
//! use std::sync::Arc;
//!
//! let config = AppConfig::from_env();
//! let reader = Arc::new(JsonRpcReader::new(config.rpc_url.clone()));
//! let music = MusicContract::bind(config.music_contract, reader);
//! let catalog = Catalog::new(music.clone(), config.ipfs_gateway_url.clone());
//!
//! let session = WalletSession::new(provider);
//! session.try_reconnect().await; // silent; failures are logged only
//! let tracks = catalog.fetch_tracks().await?;
//! ```

// Public modules
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod gateway;
pub mod market;
pub mod poller;
pub mod provider;
pub mod rpc;
pub mod session;
pub mod upload;

// Re-exports for convenience
pub use catalog::{Catalog, Track};
pub use codec::{
    decode_packed_str, encode_packed_str, format_token_amount, reconstruct_content_hash,
    split_content_hash, truncate_address, Felt, Uint256,
};
pub use config::{AppConfig, Network};
pub use error::SoundShareError;
pub use gateway::{ContractHandle, MusicContract, SongDetails, SubscriptionContract, TokenContract};
pub use market::{Marketplace, PurchaseIntent, PurchaseReceipt, SubscriptionTier};
pub use poller::BalancePoller;
pub use provider::{
    AccountApi, ConnectMode, InvokeCall, TxHash, WalletConnection, WalletEvent, WalletProvider,
};
pub use rpc::{selector_from_name, CallReader, FunctionCall, JsonRpcReader};
pub use session::{ConnectionState, WalletSession};
pub use upload::{ContentPinner, NewRelease, PinningClient, UploadReceipt, Uploader};

// Common result type
pub type Result<T> = std::result::Result<T, SoundShareError>;
