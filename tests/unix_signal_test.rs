/*!
 * Unix Signal Integration Tests
 * Real OS delivery through the Tokio signal driver
 */

#![cfg(unix)]

use futures::StreamExt;
use serial_test::serial;
use signal_hub::{
    SignalDefinition, SignalManager, SignalSubscriptionService, UnixSignal, UnixSignalManager,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn raise(signal: UnixSignal) {
    let native = nix::sys::signal::Signal::try_from(signal.code() as i32)
        .expect("signal code maps to a native signal");
    nix::sys::signal::raise(native).expect("raise failed");
}

#[tokio::test]
#[serial]
async fn test_native_sigusr1_is_delivered() {
    let manager: Arc<dyn SignalManager> =
        Arc::new(UnixSignalManager::with_tokio_source().unwrap());
    let service = SignalSubscriptionService::with_defaults(vec![manager]).unwrap();

    let subscription = service
        .subscribe(SignalDefinition::new("UNIX", UnixSignal::SIGUSR1.code()))
        .unwrap();
    let mut stream = subscription.signals();

    // Give the listener task a beat to attach to the driver.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let before = SystemTime::now();
    raise(UnixSignal::SIGUSR1);

    let signal = timeout(RECV_TIMEOUT, stream.next())
        .await
        .expect("native signal not delivered in time")
        .expect("stream ended unexpectedly");

    assert_eq!(signal.family(), "UNIX");
    assert_eq!(signal.code(), UnixSignal::SIGUSR1.code());
    let after = SystemTime::now();
    assert!(signal.timestamp() >= before && signal.timestamp() <= after);

    service.dispose(&subscription);
}

#[tokio::test]
#[serial]
async fn test_native_delivery_stops_after_dispose() {
    let manager: Arc<dyn SignalManager> =
        Arc::new(UnixSignalManager::with_tokio_source().unwrap());
    let service = SignalSubscriptionService::with_defaults(vec![manager]).unwrap();

    let subscription = service
        .subscribe(SignalDefinition::new("UNIX", UnixSignal::SIGUSR2.code()))
        .unwrap();
    let mut stream = subscription.signals();
    tokio::time::sleep(Duration::from_millis(50)).await;

    service.dispose(&subscription);
    raise(UnixSignal::SIGUSR2);

    // The stale stream completes without delivering.
    assert!(timeout(RECV_TIMEOUT, stream.next())
        .await
        .expect("completion not observed")
        .is_none());
}
