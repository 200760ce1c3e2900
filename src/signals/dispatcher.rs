/*!
 * Signal Dispatcher
 * Dedicated single-worker thread serializing all signal-to-stream pushes
 */

use crate::core::limits::DISPATCH_THREAD_NAME;
use crate::signals::directory::ManagerDirectory;
use crate::signals::types::{DomainSignal, Signal, SignalHubError, SignalResult};
use log::{debug, error, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::SystemTime;
use tokio::sync::broadcast;

/// One translation unit queued by a native handler: the raw payload, the
/// instant captured when the handler fired, and the stream to push into.
pub(crate) struct DispatchJob {
    pub domain: Box<dyn DomainSignal>,
    pub captured_at: SystemTime,
    pub sender: broadcast::Sender<Signal>,
}

enum Job {
    Dispatch(DispatchJob),
    Stop,
}

/// Atomic counters for the dispatch worker.
#[derive(Debug, Default)]
pub(crate) struct DispatcherStats {
    dispatched: AtomicU64,
    build_failures: AtomicU64,
    unknown_domain: AtomicU64,
    dropped: AtomicU64,
}

impl DispatcherStats {
    fn inc_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_build_failures(&self) {
        self.build_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_unknown_domain(&self) {
        self.unknown_domain.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            build_failures: self.build_failures.load(Ordering::Relaxed),
            unknown_domain: self.unknown_domain.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the dispatch counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherStatsSnapshot {
    /// Signals built and pushed into a subscriber stream.
    pub dispatched: u64,
    /// Payloads whose `build_signal` returned an error.
    pub build_failures: u64,
    /// Payloads whose runtime type matched no registered manager.
    pub unknown_domain: u64,
    /// Jobs dropped because the worker had already stopped.
    pub dropped: u64,
}

/// The sole serialization point of the subsystem.
///
/// Native handlers fire on arbitrary source-controlled threads; every
/// translation funnels through this one worker, so pushes into subscriber
/// streams across all families are totally ordered. A deliberate
/// bottleneck: these are infrequent control-plane events, and the ordering
/// guarantee is worth more than fan-out throughput.
pub(crate) struct SignalDispatcher {
    tx: flume::Sender<Job>,
    worker: Mutex<Option<JoinHandle<()>>>,
    stats: Arc<DispatcherStats>,
    stopped: Arc<AtomicBool>,
}

impl SignalDispatcher {
    /// Spawns the dispatch worker.
    pub fn start(directory: Arc<ManagerDirectory>) -> SignalResult<Self> {
        let (tx, rx) = flume::unbounded::<Job>();
        let stats = Arc::new(DispatcherStats::default());
        let worker_stats = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(DISPATCH_THREAD_NAME.into())
            .spawn(move || Self::run(directory, rx, worker_stats))
            .map_err(|e| SignalHubError::DispatcherStart(e.to_string()))?;

        Ok(Self {
            tx,
            worker: Mutex::new(Some(handle)),
            stats,
            stopped: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Cheap cloneable handle captured by native-side handler closures.
    pub fn handle(&self) -> DispatcherHandle {
        DispatcherHandle {
            tx: self.tx.clone(),
            stats: Arc::clone(&self.stats),
            stopped: Arc::clone(&self.stopped),
        }
    }

    pub fn stats(&self) -> &DispatcherStats {
        &self.stats
    }

    /// Stops the worker. Jobs enqueued before the stop marker drain; jobs
    /// arriving after it are dropped and counted. Idempotent.
    pub fn shutdown(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            self.stopped.store(true, Ordering::Release);
            let _ = self.tx.send(Job::Stop);
            if handle.join().is_err() {
                warn!("dispatch worker terminated abnormally");
            }
        }
    }

    fn run(directory: Arc<ManagerDirectory>, rx: flume::Receiver<Job>, stats: Arc<DispatcherStats>) {
        debug!("dispatch worker started ({} families)", directory.len());
        for job in rx.iter() {
            match job {
                Job::Dispatch(job) => Self::dispatch(&directory, job, &stats),
                Job::Stop => break,
            }
        }
        debug!("dispatch worker stopped");
    }

    fn dispatch(directory: &ManagerDirectory, job: DispatchJob, stats: &DispatcherStats) {
        let domain_type = job.domain.as_any().type_id();
        let Some(manager) = directory.by_domain_type(domain_type) else {
            // A payload nothing owns is a wiring bug; surface it loudly
            // instead of silently dropping.
            stats.inc_unknown_domain();
            error!(
                "domain signal {:?} matches no registered manager",
                job.domain
            );
            return;
        };

        let context = crate::signals::types::SignalContext::new(job.domain, job.captured_at);
        match manager.build_signal(&context) {
            Ok(signal) => {
                // No receivers is fine: broadcast only serves observers
                // that are currently attached.
                let _ = job.sender.send(signal);
                stats.inc_dispatched();
            }
            Err(e) => {
                stats.inc_build_failures();
                warn!("build_signal failed for family {}: {}", manager.family(), e);
            }
        }
    }
}

/// Push-side handle onto the dispatch queue.
///
/// Never blocks and never propagates failure to the native delivery
/// thread: once the worker has stopped, pushes are counted and discarded.
#[derive(Clone)]
pub(crate) struct DispatcherHandle {
    tx: flume::Sender<Job>,
    stats: Arc<DispatcherStats>,
    stopped: Arc<AtomicBool>,
}

impl DispatcherHandle {
    pub fn push(&self, job: DispatchJob) {
        if self.stopped.load(Ordering::Acquire) {
            self.stats.inc_dropped();
            debug!("dispatcher stopped; dropping signal push");
            return;
        }
        if self.tx.send(Job::Dispatch(job)).is_err() {
            self.stats.inc_dropped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::family::FamilyDescriptor;
    use crate::signals::traits::{DomainHandlerFn, SignalManager};
    use crate::signals::types::{SignalContext, SignalDefinition};
    use std::any::Any;
    use std::time::{Duration, UNIX_EPOCH};

    #[derive(Debug)]
    struct EchoDomain(u32);
    impl DomainSignal for EchoDomain {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct StrangerDomain;
    impl DomainSignal for StrangerDomain {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct EchoManager {
        descriptor: FamilyDescriptor,
    }

    impl EchoManager {
        fn new() -> Arc<dyn SignalManager> {
            Arc::new(Self {
                descriptor: FamilyDescriptor::new::<EchoDomain>("ECHO").unwrap(),
            })
        }
    }

    impl SignalManager for EchoManager {
        fn descriptor(&self) -> &FamilyDescriptor {
            &self.descriptor
        }

        fn build_signal(&self, context: &SignalContext) -> SignalResult<Signal> {
            let domain = context
                .domain_as::<EchoDomain>()
                .ok_or(SignalHubError::DomainTypeMismatch {
                    family: "ECHO".to_string(),
                })?;
            Ok(Signal::new(self.family(), domain.0, context.captured_at()))
        }

        fn register_handler(
            &self,
            _definition: &SignalDefinition,
            _handler: DomainHandlerFn,
        ) -> SignalResult<()> {
            Ok(())
        }

        fn unregister_handlers(&self, _definition: &SignalDefinition) -> bool {
            false
        }
    }

    fn job(code: u32, sender: &broadcast::Sender<Signal>) -> DispatchJob {
        DispatchJob {
            domain: Box::new(EchoDomain(code)),
            captured_at: UNIX_EPOCH + Duration::from_secs(u64::from(code)),
            sender: sender.clone(),
        }
    }

    #[test]
    fn test_dispatch_preserves_push_order() {
        let directory = Arc::new(ManagerDirectory::new(vec![EchoManager::new()]).unwrap());
        let dispatcher = SignalDispatcher::start(directory).unwrap();
        let handle = dispatcher.handle();

        let (sender, mut rx) = broadcast::channel::<Signal>(16);
        for code in 1..=5 {
            handle.push(job(code, &sender));
        }
        dispatcher.shutdown();

        for code in 1..=5 {
            let signal = rx.try_recv().unwrap();
            assert_eq!(signal.code(), code);
            assert_eq!(
                signal.timestamp(),
                UNIX_EPOCH + Duration::from_secs(u64::from(code))
            );
        }
        assert_eq!(dispatcher.stats().snapshot().dispatched, 5);
    }

    #[test]
    fn test_unknown_domain_counted() {
        let directory = Arc::new(ManagerDirectory::new(vec![EchoManager::new()]).unwrap());
        let dispatcher = SignalDispatcher::start(directory).unwrap();
        let handle = dispatcher.handle();

        let (sender, _rx) = broadcast::channel::<Signal>(16);
        handle.push(DispatchJob {
            domain: Box::new(StrangerDomain),
            captured_at: UNIX_EPOCH,
            sender,
        });
        dispatcher.shutdown();

        let stats = dispatcher.stats().snapshot();
        assert_eq!(stats.unknown_domain, 1);
        assert_eq!(stats.dispatched, 0);
    }

    #[test]
    fn test_push_after_shutdown_dropped() {
        let directory = Arc::new(ManagerDirectory::new(vec![EchoManager::new()]).unwrap());
        let dispatcher = SignalDispatcher::start(directory).unwrap();
        let handle = dispatcher.handle();
        dispatcher.shutdown();

        let (sender, _rx) = broadcast::channel::<Signal>(16);
        handle.push(job(1, &sender));

        assert_eq!(dispatcher.stats().snapshot().dropped, 1);
    }

    #[test]
    fn test_shutdown_idempotent() {
        let directory = Arc::new(ManagerDirectory::new(vec![EchoManager::new()]).unwrap());
        let dispatcher = SignalDispatcher::start(directory).unwrap();
        dispatcher.shutdown();
        dispatcher.shutdown();
    }
}
