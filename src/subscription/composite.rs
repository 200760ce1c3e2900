/*!
 * Composite Subscription
 * Flattened, deduplicated merge view over base subscriptions
 */

use crate::subscription::base::BaseSignalSubscription;
use crate::subscription::stream::SignalStream;
use crate::subscription::SignalSubscription;
use std::fmt;

/// Read-only view merging the streams of several base subscriptions.
///
/// Construction flattens nested composites into their constituent base
/// subscriptions and deduplicates them by definition, so a composite never
/// contains another composite and never delivers an emission twice. It
/// owns no resource of its own: the registry keeps owning each
/// constituent.
#[derive(Debug, Clone)]
pub struct CompositeSignalSubscription {
    constituents: Vec<BaseSignalSubscription>,
}

impl CompositeSignalSubscription {
    pub(crate) fn from_subscriptions<I>(subscriptions: I) -> Self
    where
        I: IntoIterator<Item = SignalSubscription>,
    {
        let mut constituents: Vec<BaseSignalSubscription> = Vec::new();
        for subscription in subscriptions {
            match subscription {
                SignalSubscription::Base(base) => Self::push_unique(&mut constituents, base),
                SignalSubscription::Composite(composite) => {
                    for base in composite.constituents {
                        Self::push_unique(&mut constituents, base);
                    }
                }
            }
        }
        Self { constituents }
    }

    fn push_unique(constituents: &mut Vec<BaseSignalSubscription>, candidate: BaseSignalSubscription) {
        if !constituents.contains(&candidate) {
            constituents.push(candidate);
        }
    }

    /// The deduplicated base subscriptions this view merges.
    pub fn constituents(&self) -> &[BaseSignalSubscription] {
        &self.constituents
    }

    /// A fresh merged consumer stream over all constituents.
    ///
    /// Per-source emission order is preserved; the stream completes once
    /// every constituent has been disposed.
    pub fn signals(&self) -> SignalStream {
        SignalStream::from_bases(self.constituents.iter())
    }

    /// Whether every constituent has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.constituents.iter().all(BaseSignalSubscription::is_disposed)
    }
}

impl PartialEq for CompositeSignalSubscription {
    fn eq(&self, other: &Self) -> bool {
        self.constituents.len() == other.constituents.len()
            && self
                .constituents
                .iter()
                .all(|base| other.constituents.contains(base))
    }
}

impl Eq for CompositeSignalSubscription {}

impl fmt::Display for CompositeSignalSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "composite(")?;
        for (i, base) in self.constituents.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", base.definition())?;
        }
        write!(f, ")")
    }
}
