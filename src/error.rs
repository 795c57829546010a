//! Error types for SoundShare client operations
//!
//! Covers wallet connection failures, contract call problems, on-chain
//! data decoding, and pinning-service failures. Every error is surfaced
//! to the caller at the site of the failed operation; nothing is retried
//! automatically and no failure is fatal to the process.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoundShareError {
    /// No wallet provider is installed or reachable
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    /// User dismissed the wallet connection prompt
    #[error("Connection rejected: {0}")]
    ConnectionRejected(String),

    /// A signed operation was attempted without an active session
    #[error("No wallet connected")]
    NotConnected,

    /// Entry point is not part of the contract's fixed interface
    #[error("Unknown entry point: {0}")]
    UnknownEntryPoint(String),

    /// View or invoke call failed on the contract side
    #[error("Contract call failed: {0}")]
    ContractCall(String),

    /// Transaction was submitted but reverted before acceptance
    #[error("Transaction reverted: tx={tx_hash}, reason={reason}")]
    TransactionReverted { tx_hash: String, reason: String },

    /// Account balance cannot cover the submitted value
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Malformed on-chain data (packed string, hash part, integer width)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Transport-level failure talking to the RPC endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// IPFS pinning service failure
    #[error("Pinning service error: {0}")]
    Ipfs(String),

    /// Caller-supplied input rejected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SoundShareError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
