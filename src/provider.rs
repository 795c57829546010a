//! Wallet provider interface
//!
//! The wallet is an external collaborator: a browser extension or mobile
//! bridge that owns the keys, signs transactions, and emits account and
//! network change notifications. This module defines the seam the rest of
//! the crate talks through so sessions and flows can run against mocks.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::codec::Felt;
use crate::Result;

/// How the provider should treat the connection attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectMode {
    /// Interactive: show the wallet selection prompt
    AlwaysAsk,
    /// Silent: succeed only if a prior authorization exists
    NeverAsk,
}

/// Notifications pushed by the wallet provider.
#[derive(Clone, Debug)]
pub enum WalletEvent {
    /// Selected accounts changed; empty means the wallet was locked
    AccountsChanged(Vec<Felt>),
    /// Active chain changed, possibly with a new account list
    NetworkChanged { chain_id: Felt, accounts: Vec<Felt> },
}

/// Transaction identifier returned by a write call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxHash(pub Felt);

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One contract invocation inside a signed transaction.
#[derive(Clone, Debug)]
pub struct InvokeCall {
    pub contract_address: Felt,
    pub entry_point: String,
    pub calldata: Vec<Felt>,
}

/// Result of a successful provider connection.
#[derive(Clone)]
pub struct WalletConnection {
    /// Selected account address
    pub address: Felt,
    /// Signing handle for write calls
    pub account: Arc<dyn AccountApi>,
}

/// Signing side of the wallet: submits transactions and blocks on their
/// confirmation. Write effects are durable only after
/// `wait_for_transaction` returns `Ok`.
pub trait AccountApi: Send + Sync {
    /// Account address
    fn address(&self) -> Felt;

    /// Sign and submit an invoke transaction, returning its hash
    fn execute(&self, calls: Vec<InvokeCall>) -> BoxFuture<'_, Result<TxHash>>;

    /// Block until the transaction is accepted or reverted
    fn wait_for_transaction<'a>(&'a self, tx_hash: &'a TxHash) -> BoxFuture<'a, Result<()>>;
}

/// The wallet provider itself: connection lifecycle plus event stream.
pub trait WalletProvider: Send + Sync {
    /// Attempt a connection. `AlwaysAsk` may prompt the user;
    /// `NeverAsk` must fail fast when no prior authorization exists.
    fn connect(&self, mode: ConnectMode) -> BoxFuture<'_, Result<WalletConnection>>;

    /// Tear down the provider-side session
    fn disconnect(&self) -> BoxFuture<'_, Result<()>>;

    /// Subscribe to account/network change notifications
    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent>;
}
