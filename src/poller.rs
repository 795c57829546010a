//! Balance poller
//!
//! While a session address is present, re-reads the account's token
//! balance on a fixed interval and publishes the formatted value on a
//! watch channel. The loop also follows the session's address channel:
//! an account switch triggers an immediate refresh, and a cleared address
//! resets the displayed balance to zero.
//!
//! There is no backoff and no retry: a failed read is logged and the last
//! published value stands until the next tick. The polling task is
//! aborted when the poller is dropped.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::codec::{format_token_amount, Felt};
use crate::gateway::TokenContract;

const ZERO_BALANCE: &str = "0.0000";

pub struct BalancePoller {
    balance_rx: watch::Receiver<String>,
    task: JoinHandle<()>,
}

impl BalancePoller {
    /// Spawn the polling task. `address_rx` is the session's address
    /// channel (see `WalletSession::watch_address`).
    pub fn spawn(
        token: TokenContract,
        mut address_rx: watch::Receiver<Option<Felt>>,
        period: Duration,
    ) -> Self {
        let (balance_tx, balance_rx) = watch::channel(ZERO_BALANCE.to_string());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let address = *address_rx.borrow();
                        if let Some(address) = address {
                            refresh(&token, address, &balance_tx).await;
                        }
                    }
                    changed = address_rx.changed() => {
                        if changed.is_err() {
                            // Session dropped; nothing left to poll
                            break;
                        }
                        let address = *address_rx.borrow_and_update();
                        match address {
                            Some(address) => refresh(&token, address, &balance_tx).await,
                            None => {
                                let _ = balance_tx.send(ZERO_BALANCE.to_string());
                            }
                        }
                    }
                }
            }
        });

        Self { balance_rx, task }
    }

    /// Observe formatted balance updates.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.balance_rx.clone()
    }

    /// Latest formatted balance.
    pub fn latest(&self) -> String {
        self.balance_rx.borrow().clone()
    }
}

async fn refresh(token: &TokenContract, address: Felt, balance_tx: &watch::Sender<String>) {
    match token.balance_of(address).await {
        Ok(raw) => {
            let formatted = format_token_amount(&raw);
            log::debug!("Balance for {}: {}", address, formatted);
            let _ = balance_tx.send(formatted);
        }
        Err(e) => {
            // Keep the last good value; the next tick will try again
            log::warn!("Balance read failed for {}: {}", address, e);
        }
    }
}

impl Drop for BalancePoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
