//! Wallet session lifecycle
//!
//! Tracks the single connection the client holds against a wallet
//! provider: Disconnected → Connecting → Connected → Disconnected. The
//! session is created on explicit user action ([`WalletSession::connect`])
//! or by a silent reconnect attempt on startup
//! ([`WalletSession::try_reconnect`], failures logged and swallowed), is
//! mutated by provider-emitted account/network events, and is destroyed by
//! explicit disconnect.
//!
//! Nothing is persisted across restarts; the silent reconnect re-acquires
//! whatever authorization the provider still holds. Concurrent connect
//! calls are not guarded: the UI scope is single user, single tab.

use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::codec::Felt;
use crate::provider::{AccountApi, ConnectMode, WalletEvent, WalletProvider};
use crate::Result;

/// Connection state machine. No retry, no backoff; a failed connect drops
/// straight back to `Disconnected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

struct SessionInner {
    state: ConnectionState,
    address: Option<Felt>,
    account: Option<Arc<dyn AccountApi>>,
}

impl Default for SessionInner {
    fn default() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            address: None,
            account: None,
        }
    }
}

impl SessionInner {
    fn clear(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.address = None;
        self.account = None;
    }
}

/// Wallet session manager.
///
/// Shared-state wrapper around a [`WalletProvider`]; cheap to clone
/// indirectly by wrapping in `Arc`. The current address is additionally
/// published on a watch channel so the balance poller can follow account
/// switches without holding a reference to the session.
pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    inner: Arc<RwLock<SessionInner>>,
    address_tx: Arc<watch::Sender<Option<Felt>>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl WalletSession {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        let (address_tx, _) = watch::channel(None);
        Self {
            provider,
            inner: Arc::new(RwLock::new(SessionInner::default())),
            address_tx: Arc::new(address_tx),
            pump: Mutex::new(None),
        }
    }

    /// Interactive connect: prompts the user for wallet selection.
    ///
    /// On success the session stores the account handle and address and
    /// subscribes to provider events. On failure the session returns to
    /// `Disconnected` and the error is surfaced to the caller.
    pub async fn connect(&self) -> Result<Felt> {
        self.set_state(ConnectionState::Connecting);

        match self.provider.connect(ConnectMode::AlwaysAsk).await {
            Ok(connection) => {
                let address = connection.address;
                {
                    let mut inner = self.inner.write().expect("session lock poisoned");
                    inner.state = ConnectionState::Connected;
                    inner.address = Some(address);
                    inner.account = Some(connection.account);
                }
                let _ = self.address_tx.send(Some(address));
                self.start_event_pump();
                log::info!("Wallet connected: {}", address);
                Ok(address)
            }
            Err(e) => {
                log::error!("Wallet connection error: {}", e);
                self.inner.write().expect("session lock poisoned").clear();
                let _ = self.address_tx.send(None);
                Err(e)
            }
        }
    }

    /// Silent reconnect attempt, used on startup. Never prompts; failures
    /// are logged and swallowed. Returns whether a session was restored.
    pub async fn try_reconnect(&self) -> bool {
        match self.provider.connect(ConnectMode::NeverAsk).await {
            Ok(connection) => {
                let address = connection.address;
                {
                    let mut inner = self.inner.write().expect("session lock poisoned");
                    inner.state = ConnectionState::Connected;
                    inner.address = Some(address);
                    inner.account = Some(connection.account);
                }
                let _ = self.address_tx.send(Some(address));
                self.start_event_pump();
                log::info!("Restored wallet session: {}", address);
                true
            }
            Err(e) => {
                log::debug!("No existing wallet connection: {}", e);
                false
            }
        }
    }

    /// Tear down the session: provider disconnect, event subscription
    /// stopped, address/account state cleared. State is cleared even when
    /// the provider-side disconnect fails, so the UI always falls back to
    /// the "Connect Wallet" affordance.
    pub async fn disconnect(&self) -> Result<()> {
        let result = self.provider.disconnect().await;
        if let Err(ref e) = result {
            log::error!("Wallet disconnection error: {}", e);
        }

        self.stop_event_pump();
        self.inner.write().expect("session lock poisoned").clear();
        let _ = self.address_tx.send(None);
        result
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.read().expect("session lock poisoned").state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Currently selected address, if any
    pub fn address(&self) -> Option<Felt> {
        self.inner.read().expect("session lock poisoned").address
    }

    /// Signing handle for write calls; `None` while disconnected
    pub fn account(&self) -> Option<Arc<dyn AccountApi>> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .account
            .clone()
    }

    /// Observe the selected address; `None` while disconnected
    pub fn watch_address(&self) -> watch::Receiver<Option<Felt>> {
        self.address_tx.subscribe()
    }

    fn set_state(&self, state: ConnectionState) {
        self.inner.write().expect("session lock poisoned").state = state;
    }

    /// Consume provider events and fold them into session state. An empty
    /// account list means the wallet was locked: the address is dropped
    /// but the provider-side session stays up, matching the provider's
    /// own semantics.
    fn start_event_pump(&self) {
        let mut events = self.provider.subscribe();
        let inner = Arc::clone(&self.inner);
        let address_tx = Arc::clone(&self.address_tx);

        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    WalletEvent::AccountsChanged(accounts) => match accounts.first() {
                        Some(address) => {
                            log::info!("Account changed: {}", address);
                            inner.write().expect("session lock poisoned").address =
                                Some(*address);
                            let _ = address_tx.send(Some(*address));
                        }
                        None => {
                            log::info!("Wallet locked, clearing selected address");
                            inner.write().expect("session lock poisoned").address = None;
                            let _ = address_tx.send(None);
                        }
                    },
                    WalletEvent::NetworkChanged { chain_id, accounts } => {
                        if let Some(address) = accounts.first() {
                            log::info!("Network changed to {}, account {}", chain_id, address);
                            inner.write().expect("session lock poisoned").address =
                                Some(*address);
                            let _ = address_tx.send(Some(*address));
                        }
                    }
                }
            }
        });

        let mut pump = self.pump.lock().expect("pump lock poisoned");
        if let Some(old) = pump.replace(task) {
            old.abort();
        }
    }

    fn stop_event_pump(&self) {
        if let Some(task) = self.pump.lock().expect("pump lock poisoned").take() {
            task.abort();
        }
    }
}

impl Drop for WalletSession {
    fn drop(&mut self) {
        if let Ok(mut pump) = self.pump.lock() {
            if let Some(task) = pump.take() {
                task.abort();
            }
        }
    }
}
