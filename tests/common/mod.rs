//! Shared mock collaborators for integration tests
//!
//! The wallet provider, signing account, and RPC reader are external
//! services; these in-memory doubles record every interaction so tests
//! can assert what was (and was not) called.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use soundshare::{
    AccountApi, CallReader, ConnectMode, Felt, FunctionCall, InvokeCall, SoundShareError, TxHash,
    WalletConnection, WalletEvent, WalletProvider,
};

// ============================================================================
// Account
// ============================================================================

pub struct MockAccount {
    address: Felt,
    pub executed: Mutex<Vec<InvokeCall>>,
    pub waited: Mutex<Vec<TxHash>>,
    pub fail_execute: bool,
    pub fail_wait: bool,
}

impl MockAccount {
    pub fn new(address: Felt) -> Self {
        Self {
            address,
            executed: Mutex::new(Vec::new()),
            waited: Mutex::new(Vec::new()),
            fail_execute: false,
            fail_wait: false,
        }
    }

    pub fn failing_execute(address: Felt) -> Self {
        Self {
            fail_execute: true,
            ..Self::new(address)
        }
    }

    pub fn failing_wait(address: Felt) -> Self {
        Self {
            fail_wait: true,
            ..Self::new(address)
        }
    }

    pub fn executed_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

impl AccountApi for MockAccount {
    fn address(&self) -> Felt {
        self.address
    }

    fn execute(&self, calls: Vec<InvokeCall>) -> BoxFuture<'_, soundshare::Result<TxHash>> {
        Box::pin(async move {
            if self.fail_execute {
                return Err(SoundShareError::InsufficientFunds(
                    "mock account is broke".to_string(),
                ));
            }
            self.executed.lock().unwrap().extend(calls);
            Ok(TxHash(Felt::from_u64(0xfeed)))
        })
    }

    fn wait_for_transaction<'a>(
        &'a self,
        tx_hash: &'a TxHash,
    ) -> BoxFuture<'a, soundshare::Result<()>> {
        Box::pin(async move {
            if self.fail_wait {
                return Err(SoundShareError::TransactionReverted {
                    tx_hash: tx_hash.to_string(),
                    reason: "mock revert".to_string(),
                });
            }
            self.waited.lock().unwrap().push(tx_hash.clone());
            Ok(())
        })
    }
}

// ============================================================================
// Wallet provider
// ============================================================================

pub struct MockProvider {
    pub address: Felt,
    pub allow_interactive: bool,
    pub allow_silent: bool,
    pub connects: Mutex<Vec<ConnectMode>>,
    pub disconnects: Mutex<u32>,
    pub fail_disconnect: bool,
    pub event_senders: Mutex<Vec<mpsc::UnboundedSender<WalletEvent>>>,
}

impl MockProvider {
    pub fn new(address: Felt) -> Self {
        Self {
            address,
            allow_interactive: true,
            allow_silent: true,
            connects: Mutex::new(Vec::new()),
            disconnects: Mutex::new(0),
            fail_disconnect: false,
            event_senders: Mutex::new(Vec::new()),
        }
    }

    /// Push a provider event to every subscriber
    pub fn send_event(&self, event: WalletEvent) {
        for sender in self.event_senders.lock().unwrap().iter() {
            let _ = sender.send(event.clone());
        }
    }
}

impl WalletProvider for MockProvider {
    fn connect(&self, mode: ConnectMode) -> BoxFuture<'_, soundshare::Result<WalletConnection>> {
        Box::pin(async move {
            self.connects.lock().unwrap().push(mode);
            let allowed = match mode {
                ConnectMode::AlwaysAsk => self.allow_interactive,
                ConnectMode::NeverAsk => self.allow_silent,
            };
            if !allowed {
                return Err(match mode {
                    ConnectMode::AlwaysAsk => {
                        SoundShareError::ConnectionRejected("user dismissed the prompt".to_string())
                    }
                    ConnectMode::NeverAsk => {
                        SoundShareError::WalletNotFound("no prior authorization".to_string())
                    }
                });
            }
            Ok(WalletConnection {
                address: self.address,
                account: Arc::new(MockAccount::new(self.address)),
            })
        })
    }

    fn disconnect(&self) -> BoxFuture<'_, soundshare::Result<()>> {
        Box::pin(async move {
            *self.disconnects.lock().unwrap() += 1;
            if self.fail_disconnect {
                Err(SoundShareError::Network(
                    "provider unreachable".to_string(),
                ))
            } else {
                Ok(())
            }
        })
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.event_senders.lock().unwrap().push(tx);
        rx
    }
}

// ============================================================================
// RPC reader
// ============================================================================

/// In-memory view-call reader. Responses are keyed by entry point plus
/// calldata so per-id queries can differ.
pub struct MockReader {
    responses: Mutex<HashMap<String, Vec<Felt>>>,
    pub calls: Mutex<Vec<FunctionCall>>,
}

impl MockReader {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn key(entry_point: &str, calldata: &[Felt]) -> String {
        let args: Vec<String> = calldata.iter().map(|f| f.to_hex()).collect();
        format!("{}({})", entry_point, args.join(","))
    }

    pub fn stub(&self, entry_point: &str, calldata: &[Felt], response: Vec<Felt>) {
        self.responses
            .lock()
            .unwrap()
            .insert(Self::key(entry_point, calldata), response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CallReader for MockReader {
    fn call<'a>(&'a self, request: &'a FunctionCall) -> BoxFuture<'a, soundshare::Result<Vec<Felt>>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(request.clone());
            let key = Self::key(&request.entry_point, &request.calldata);
            self.responses
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .ok_or_else(|| SoundShareError::ContractCall(format!("no stub for {}", key)))
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Poll a condition until it holds or a short deadline passes. Used for
/// assertions on state updated by background tasks.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
