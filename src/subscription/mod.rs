/*!
 * Subscription Module
 * Consumer-facing handles over live signal streams
 */

mod base;
mod composite;
mod stream;

pub use base::BaseSignalSubscription;
pub use composite::CompositeSignalSubscription;
pub use stream::SignalStream;

pub(crate) use base::StreamCore;

use std::fmt;

/// Consumer handle: either a registry-backed base subscription or a
/// composite merge view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalSubscription {
    Base(BaseSignalSubscription),
    Composite(CompositeSignalSubscription),
}

impl SignalSubscription {
    /// A fresh independent consumer stream starting from "now".
    pub fn signals(&self) -> SignalStream {
        match self {
            SignalSubscription::Base(base) => base.signals(),
            SignalSubscription::Composite(composite) => composite.signals(),
        }
    }

    /// Merges this subscription with another into a composite view.
    ///
    /// The result is always flat: composites on either side contribute
    /// their base subscriptions, duplicates collapse to one.
    pub fn merge_with(&self, other: &SignalSubscription) -> SignalSubscription {
        merge_subscriptions([self.clone(), other.clone()])
    }

    /// Whether every underlying base subscription has been disposed.
    pub fn is_disposed(&self) -> bool {
        match self {
            SignalSubscription::Base(base) => base.is_disposed(),
            SignalSubscription::Composite(composite) => composite.is_disposed(),
        }
    }

    /// The base subscriptions this handle resolves to.
    pub(crate) fn flatten(&self) -> Vec<BaseSignalSubscription> {
        match self {
            SignalSubscription::Base(base) => vec![base.clone()],
            SignalSubscription::Composite(composite) => composite.constituents().to_vec(),
        }
    }
}

impl fmt::Display for SignalSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSubscription::Base(base) => base.fmt(f),
            SignalSubscription::Composite(composite) => composite.fmt(f),
        }
    }
}

/// Merges any number of subscriptions into one flat, deduplicated
/// composite view. The only public constructor of composites besides
/// [`SignalSubscription::merge_with`].
pub fn merge_subscriptions<I>(subscriptions: I) -> SignalSubscription
where
    I: IntoIterator<Item = SignalSubscription>,
{
    SignalSubscription::Composite(CompositeSignalSubscription::from_subscriptions(subscriptions))
}
