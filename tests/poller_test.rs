//! Balance poller tests
//!
//! Drives the polling loop with a short period against a stubbed token
//! contract: refresh on connect, periodic re-reads, reset on disconnect,
//! and hold-last-value on read failure.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{wait_until, MockReader};
use soundshare::{BalancePoller, Felt, TokenContract};
use tokio::sync::watch;

const PERIOD: Duration = Duration::from_millis(20);

fn wallet_address() -> Felt {
    Felt::from_u64(0x42)
}

fn stub_balance(reader: &MockReader, low: u128) {
    reader.stub(
        "balanceOf",
        &[wallet_address()],
        vec![Felt::from_u128(low), Felt::ZERO],
    );
}

fn token(reader: Arc<MockReader>) -> TokenContract {
    TokenContract::bind(Felt::from_u64(0x33), reader)
}

/// Test 1: the poller starts at zero and refreshes as soon as an address
/// appears on the session channel
#[tokio::test]
async fn test_refresh_on_address_change() {
    let reader = Arc::new(MockReader::new());
    stub_balance(&reader, 1_234_500_000_000_000_000);

    let (address_tx, address_rx) = watch::channel(None);
    let poller = BalancePoller::spawn(token(reader), address_rx, PERIOD);
    assert_eq!(poller.latest(), "0.0000");

    address_tx.send(Some(wallet_address())).unwrap();
    assert!(wait_until(|| poller.latest() == "1.2345").await);
}

/// Test 2: the balance keeps refreshing on the polling interval
#[tokio::test]
async fn test_periodic_refresh_picks_up_changes() {
    let reader = Arc::new(MockReader::new());
    stub_balance(&reader, 1_000_000_000_000_000_000);

    let (address_tx, address_rx) = watch::channel(Some(wallet_address()));
    let poller = BalancePoller::spawn(token(reader.clone()), address_rx, PERIOD);
    assert!(wait_until(|| poller.latest() == "1.0000").await);

    // Balance moves on-chain; the next tick should pick it up
    stub_balance(&reader, 5_500_000_000_000_000_000);
    assert!(wait_until(|| poller.latest() == "5.5000").await);

    drop(address_tx);
}

/// Test 3: a cleared address resets the displayed balance to zero
#[tokio::test]
async fn test_disconnect_resets_to_zero() {
    let reader = Arc::new(MockReader::new());
    stub_balance(&reader, 2_000_000_000_000_000_000);

    let (address_tx, address_rx) = watch::channel(Some(wallet_address()));
    let poller = BalancePoller::spawn(token(reader), address_rx, PERIOD);
    assert!(wait_until(|| poller.latest() == "2.0000").await);

    address_tx.send(None).unwrap();
    assert!(wait_until(|| poller.latest() == "0.0000").await);
}

/// Test 4: a failed read keeps the last good value instead of blanking
#[tokio::test]
async fn test_read_failure_keeps_last_value() {
    let reader = Arc::new(MockReader::new());
    stub_balance(&reader, 3_000_000_000_000_000_000);

    let (address_tx, address_rx) = watch::channel(None);
    let poller = BalancePoller::spawn(token(reader.clone()), address_rx, PERIOD);

    address_tx.send(Some(wallet_address())).unwrap();
    assert!(wait_until(|| poller.latest() == "3.0000").await);

    // Switch to an address with no stub: every read now fails
    let other = Felt::from_u64(0x43);
    address_tx.send(Some(other)).unwrap();

    // Let a few failing ticks pass; the published value must not change
    tokio::time::sleep(PERIOD * 4).await;
    assert_eq!(poller.latest(), "3.0000");
}

/// Test 5: subscribers see updates without polling the handle
#[tokio::test]
async fn test_subscribe_receives_updates() {
    let reader = Arc::new(MockReader::new());
    stub_balance(&reader, 7_250_000_000_000_000_000);

    let (address_tx, address_rx) = watch::channel(None);
    let poller = BalancePoller::spawn(token(reader), address_rx, PERIOD);
    let mut balance_rx = poller.subscribe();

    address_tx.send(Some(wallet_address())).unwrap();

    balance_rx.changed().await.unwrap();
    assert_eq!(*balance_rx.borrow(), "7.2500");
}

/// Test 6: when no address is present, the poller never hits the chain
#[tokio::test]
async fn test_idle_without_address() {
    let reader = Arc::new(MockReader::new());

    let (_address_tx, address_rx) = watch::channel(None);
    let _poller = BalancePoller::spawn(token(reader.clone()), address_rx, PERIOD);

    tokio::time::sleep(PERIOD * 3).await;
    assert_eq!(reader.call_count(), 0);
}
