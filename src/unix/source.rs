/*!
 * Raw Signal Sources
 * Boundary to the native delivery mechanism: install one hook per code
 */

use crate::core::types::SignalCode;
use crate::signals::SignalResult;
use crate::unix::codes::UnixSignal;
use ahash::RandomState;
use dashmap::DashMap;
use log::debug;
use std::sync::Arc;

/// Callback a source invokes on every raw delivery of its signal.
pub type RawNotifyFn = Arc<dyn Fn() + Send + Sync>;

/// Native delivery boundary.
///
/// `install` wires exactly one hook for a code; the manager guarantees it
/// is called at most once per code and reuses the installation across
/// re-registrations. Implementations must invoke `notify` with no added
/// latency or blocking I/O.
pub trait RawSignalSource: Send + Sync {
    fn install(&self, signal: UnixSignal, notify: RawNotifyFn) -> SignalResult<()>;
}

/// Source backed by the Tokio signal driver.
///
/// Each installed code gets a detached listener task that forwards every
/// native delivery to the hook. Must be used from within a Tokio runtime.
#[cfg(unix)]
#[derive(Debug, Default)]
pub struct TokioSignalSource;

#[cfg(unix)]
impl TokioSignalSource {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl RawSignalSource for TokioSignalSource {
    fn install(&self, signal: UnixSignal, notify: RawNotifyFn) -> SignalResult<()> {
        use tokio::signal::unix::{signal as native_signal, SignalKind};

        let kind = SignalKind::from_raw(signal.code() as i32);
        let mut stream = native_signal(kind).map_err(|e| {
            crate::signals::SignalHubError::RegistrationFailed(format!("{}: {}", signal.name(), e))
        })?;

        debug!("installed native listener for {}", signal);
        tokio::spawn(async move {
            while stream.recv().await.is_some() {
                notify();
            }
        });
        Ok(())
    }
}

/// In-process source with a synthetic trigger.
///
/// Stands in for the operating system where real delivery is unavailable
/// or undesirable: tests, non-Unix hosts, embedded simulation.
#[derive(Default)]
pub struct ManualSignalSource {
    hooks: DashMap<SignalCode, RawNotifyFn, RandomState>,
}

impl ManualSignalSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the hook installed for `code`, as if the signal had been
    /// delivered natively. Returns whether a hook was installed.
    pub fn fire(&self, code: SignalCode) -> bool {
        let Some(hook) = self.hooks.get(&code).map(|entry| entry.value().clone()) else {
            return false;
        };
        hook();
        true
    }

    /// Number of codes with an installed hook.
    pub fn installed_count(&self) -> usize {
        self.hooks.len()
    }
}

impl RawSignalSource for ManualSignalSource {
    fn install(&self, signal: UnixSignal, notify: RawNotifyFn) -> SignalResult<()> {
        self.hooks.insert(signal.code(), notify);
        debug!("installed manual hook for {}", signal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_manual_source_fires_installed_hook() {
        let source = ManualSignalSource::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let count = Arc::clone(&fired);
        source
            .install(
                UnixSignal::SIGTERM,
                Arc::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        assert!(source.fire(UnixSignal::SIGTERM.code()));
        assert!(source.fire(UnixSignal::SIGTERM.code()));
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_manual_source_fire_without_hook() {
        let source = ManualSignalSource::new();
        assert!(!source.fire(UnixSignal::SIGHUP.code()));
        assert_eq!(source.installed_count(), 0);
    }
}
