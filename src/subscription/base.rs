/*!
 * Base Subscription
 * Registry-backed handle over one definition and one multicast stream
 */

use crate::signals::{Signal, SignalDefinition};
use crate::subscription::stream::SignalStream;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Shared stream state: the broadcast sender events are pushed into and a
/// closed flag flipped on disposal so consumer streams can complete.
#[derive(Debug)]
pub(crate) struct StreamCore {
    sender: broadcast::Sender<Signal>,
    closed: watch::Sender<bool>,
}

impl StreamCore {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        let (closed, _) = watch::channel(false);
        Self { sender, closed }
    }

    pub fn sender(&self) -> broadcast::Sender<Signal> {
        self.sender.clone()
    }

    pub fn subscribe(&self) -> (broadcast::Receiver<Signal>, watch::Receiver<bool>) {
        (self.sender.subscribe(), self.closed.subscribe())
    }

    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

/// Consumer handle tied to exactly one [`SignalDefinition`].
///
/// The registry owns the canonical instance per definition; handles given
/// to subscribers are clones sharing the same stream. Equality and hashing
/// are defined solely by the definition, so any two handles for the same
/// definition are interchangeable.
#[derive(Debug, Clone)]
pub struct BaseSignalSubscription {
    definition: SignalDefinition,
    core: Arc<StreamCore>,
}

impl BaseSignalSubscription {
    pub(crate) fn new(definition: SignalDefinition, core: Arc<StreamCore>) -> Self {
        Self { definition, core }
    }

    /// The definition this subscription is keyed by.
    pub fn definition(&self) -> &SignalDefinition {
        &self.definition
    }

    /// A fresh independent consumer stream starting from "now".
    ///
    /// Broadcast semantics: emissions before this call are not replayed,
    /// and a consumer that falls behind skips ahead instead of blocking
    /// the producer. The stream completes only once the subscription has
    /// been disposed.
    pub fn signals(&self) -> SignalStream {
        SignalStream::from_bases([self])
    }

    /// Whether the registry has disposed this subscription.
    pub fn is_disposed(&self) -> bool {
        self.core.is_closed()
    }

    pub(crate) fn sender(&self) -> broadcast::Sender<Signal> {
        self.core.sender()
    }

    pub(crate) fn subscribe_parts(
        &self,
    ) -> (broadcast::Receiver<Signal>, watch::Receiver<bool>) {
        self.core.subscribe()
    }

    pub(crate) fn close(&self) {
        self.core.close();
    }
}

impl PartialEq for BaseSignalSubscription {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
    }
}

impl Eq for BaseSignalSubscription {}

impl Hash for BaseSignalSubscription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.definition.hash(state);
    }
}

impl fmt::Display for BaseSignalSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription({})", self.definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn base(family: &str, code: u32) -> BaseSignalSubscription {
        BaseSignalSubscription::new(
            SignalDefinition::new(family, code),
            Arc::new(StreamCore::new(8)),
        )
    }

    #[test]
    fn test_equality_solely_by_definition() {
        // Distinct cores, same definition: interchangeable handles.
        let a = base("UNIX", 15);
        let b = base("UNIX", 15);
        let c = base("UNIX", 1);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_close_marks_disposed() {
        let sub = base("UNIX", 15);
        assert!(!sub.is_disposed());
        sub.close();
        assert!(sub.is_disposed());

        // Closing again is a no-op.
        sub.close();
        assert!(sub.is_disposed());
    }
}
