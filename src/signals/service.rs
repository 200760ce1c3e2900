/*!
 * Signal Subscription Service
 * The registry: subscription table, dispatch lifecycle, manager mediation
 */

use crate::core::clock::{Clock, SystemClock};
use crate::core::limits::{DEFAULT_STREAM_CAPACITY, MIN_STREAM_CAPACITY};
use crate::signals::directory::ManagerDirectory;
use crate::signals::dispatcher::{DispatchJob, DispatcherStatsSnapshot, SignalDispatcher};
use crate::signals::traits::{DomainHandlerFn, SignalManager};
use crate::signals::types::{SignalDefinition, SignalResult};
use crate::subscription::{BaseSignalSubscription, SignalSubscription, StreamCore};
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info, warn};
use std::sync::Arc;

/// Tunables for the subscription service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Broadcast capacity of each per-definition stream.
    ///
    /// Shared across all consumers of one definition; consumers that fall
    /// more than this many emissions behind skip ahead.
    pub stream_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            stream_capacity: DEFAULT_STREAM_CAPACITY,
        }
    }
}

/// Typed publish/subscribe registry over pluggable signal families.
///
/// Owns the definition-keyed subscription table and the dedicated dispatch
/// worker, and mediates between subscribers and the managers supplied at
/// construction. The manager list is immutable for the service's lifetime.
pub struct SignalSubscriptionService {
    subscriptions: DashMap<SignalDefinition, BaseSignalSubscription, RandomState>,
    directory: Arc<ManagerDirectory>,
    dispatcher: SignalDispatcher,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl SignalSubscriptionService {
    /// Builds a service over `managers` with an injected clock.
    ///
    /// Fails fast when two managers claim the same family tag or the same
    /// domain payload type, or when the dispatch worker cannot start.
    pub fn new(
        managers: Vec<Arc<dyn SignalManager>>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> SignalResult<Self> {
        let directory = Arc::new(ManagerDirectory::new(managers)?);
        let dispatcher = SignalDispatcher::start(Arc::clone(&directory))?;
        info!(
            "signal subscription service started ({} families)",
            directory.len()
        );
        Ok(Self {
            subscriptions: DashMap::with_hasher(RandomState::new()),
            directory,
            dispatcher,
            clock,
            config,
        })
    }

    /// Builds a service with the wall clock and default configuration.
    pub fn with_defaults(managers: Vec<Arc<dyn SignalManager>>) -> SignalResult<Self> {
        Self::new(managers, Arc::new(SystemClock), ServiceConfig::default())
    }

    /// Subscribes to the occurrences selected by `definition`.
    ///
    /// Idempotent: a second subscribe for an equal definition returns the
    /// existing subscription and installs no second native handler. The
    /// first subscribe resolves the owning manager by family tag (a
    /// missing family is a configuration error, surfaced here and never
    /// deferred to the first event), creates the definition's multicast
    /// stream, and registers a handler with the manager.
    pub fn subscribe(&self, definition: SignalDefinition) -> SignalResult<SignalSubscription> {
        if let Some(existing) = self.subscriptions.get(&definition) {
            return Ok(SignalSubscription::Base(existing.clone()));
        }

        let manager = self.directory.by_family(definition.family())?;
        let core = Arc::new(StreamCore::new(
            self.config.stream_capacity.max(MIN_STREAM_CAPACITY),
        ));
        let base = BaseSignalSubscription::new(definition.clone(), core);

        match self.subscriptions.entry(definition.clone()) {
            Entry::Occupied(entry) => {
                // Lost a subscribe race; the winner's handler is already
                // on its way.
                return Ok(SignalSubscription::Base(entry.get().clone()));
            }
            Entry::Vacant(slot) => {
                slot.insert(base.clone());
            }
        }

        let handler = self.make_handler(&base);
        if let Err(err) = manager.register_handler(&definition, handler) {
            self.subscriptions.remove(&definition);
            base.close();
            return Err(err);
        }

        if !self.subscriptions.contains_key(&definition) {
            // Disposed while native registration was in flight; keep
            // registration and teardown symmetric.
            manager.unregister_handlers(&definition);
            base.close();
        }

        info!("subscribed to {}", definition);
        Ok(SignalSubscription::Base(base))
    }

    /// Tears down a subscription.
    ///
    /// For a composite, every constituent base subscription is disposed —
    /// even constituents another composite still references (shared base
    /// subscriptions are not reference-counted; the other view's stream
    /// simply completes). Idempotent: disposing an already-removed
    /// subscription is a no-op.
    pub fn dispose(&self, subscription: &SignalSubscription) {
        for base in subscription.flatten() {
            self.dispose_base(&base);
        }
    }

    /// Disposes every live subscription, then stops the dispatch worker.
    ///
    /// Best-effort: pushes still queued behind the stop marker drain;
    /// pushes arriving afterwards are dropped. Idempotent, and also run
    /// on drop.
    pub fn shutdown(&self) {
        let live: Vec<BaseSignalSubscription> = self
            .subscriptions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for base in live {
            self.dispose_base(&base);
        }
        self.dispatcher.shutdown();
    }

    /// Number of live registry entries.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Counters of the dispatch worker.
    pub fn dispatcher_stats(&self) -> DispatcherStatsSnapshot {
        self.dispatcher.stats().snapshot()
    }

    fn dispose_base(&self, base: &BaseSignalSubscription) {
        let Some((definition, entry)) = self.subscriptions.remove(base.definition()) else {
            debug!("dispose of unknown subscription {}; nothing to do", base);
            return;
        };

        // Removal and unregistration happen together: the definition must
        // not stay registered with its manager once the entry is gone.
        match self.directory.by_family(definition.family()) {
            Ok(manager) => {
                if !manager.unregister_handlers(&definition) {
                    warn!(
                        "manager for family {} had nothing registered for {}",
                        definition.family(),
                        definition
                    );
                }
            }
            Err(err) => warn!("no manager while disposing {}: {}", definition, err),
        }

        entry.close();
        info!("disposed subscription {}", definition);
    }

    fn make_handler(&self, base: &BaseSignalSubscription) -> DomainHandlerFn {
        let dispatcher = self.dispatcher.handle();
        let clock = Arc::clone(&self.clock);
        let sender = base.sender();
        Arc::new(move |domain| {
            // Runs on whatever thread the native source fires from; the
            // capture timestamp is taken here, everything else on the
            // dispatch worker.
            let captured_at = clock.now();
            dispatcher.push(DispatchJob {
                domain,
                captured_at,
                sender: sender.clone(),
            });
        })
    }
}

impl Drop for SignalSubscriptionService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
