/*!
 * signal-hub
 * Typed publish/subscribe registry for source-specific signal families
 *
 * Low-level occurrences (e.g. operating-system signals) are translated by
 * per-family managers into strongly-typed [`Signal`]s and delivered to
 * subscribers as continuous broadcast streams. One dedicated dispatch
 * worker serializes every push, so emissions across all families are
 * totally ordered. In-memory and best-effort by design: no persistence,
 * no cross-process delivery.
 *
 * ## Example
 * ```no_run
 * use std::sync::Arc;
 * use futures::StreamExt;
 * use signal_hub::{
 *     SignalDefinition, SignalManager, SignalSubscriptionService, UnixSignalManager,
 * };
 *
 * #[tokio::main]
 * async fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let manager: Arc<dyn SignalManager> = Arc::new(UnixSignalManager::with_tokio_source()?);
 *     let service = SignalSubscriptionService::with_defaults(vec![manager])?;
 *
 *     let subscription = service.subscribe(SignalDefinition::new("UNIX", 15))?;
 *     let mut signals = subscription.signals();
 *     while let Some(signal) = signals.next().await {
 *         println!("caught {} at {:?}", signal, signal.timestamp());
 *     }
 *
 *     service.dispose(&subscription);
 *     Ok(())
 * }
 * ```
 */

pub mod core;
pub mod signals;
pub mod subscription;
pub mod unix;

// Re-exports
pub use crate::core::{Clock, FamilyTag, ManualClock, SignalCode, SystemClock};
pub use signals::{
    DispatcherStatsSnapshot, DomainHandlerFn, DomainSignal, FamilyDescriptor, ManagerDirectory,
    ServiceConfig, Signal, SignalContext, SignalDefinition, SignalHubError, SignalManager,
    SignalResult, SignalSubscriptionService,
};
pub use subscription::{
    merge_subscriptions, BaseSignalSubscription, CompositeSignalSubscription, SignalStream,
    SignalSubscription,
};
pub use unix::{
    Disposition, ManualSignalSource, RawNotifyFn, RawSignalSource, UnixDomainSignal, UnixSignal,
    UnixSignalManager, UNIX_FAMILY,
};

#[cfg(unix)]
pub use unix::TokioSignalSource;
