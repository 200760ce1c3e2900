/*!
 * Signal Stream
 * Lag-skipping, close-aware consumer stream; merges across subscriptions
 */

use crate::signals::Signal;
use crate::subscription::base::BaseSignalSubscription;
use futures::stream::{SelectAll, Stream};
use log::debug;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

/// One constituent source: the broadcast receiver plus the disposal flag
/// of a single base subscription.
struct BaseStream {
    events: BroadcastStream<Signal>,
    closed: WatchStream<bool>,
}

impl Stream for BaseStream {
    type Item = Signal;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Signal>> {
        let this = self.get_mut();
        loop {
            match Pin::new(&mut this.events).poll_next(cx) {
                Poll::Ready(Some(Ok(signal))) => return Poll::Ready(Some(signal)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    // Slow consumers skip ahead; the producer never waits.
                    debug!("signal consumer lagged; skipped {} emissions", skipped);
                    continue;
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => {}
            }

            // Nothing buffered. Complete once the subscription is
            // disposed; anything pushed before disposal was already
            // drained above.
            match Pin::new(&mut this.closed).poll_next(cx) {
                Poll::Ready(Some(true)) | Poll::Ready(None) => return Poll::Ready(None),
                Poll::Ready(Some(false)) => continue,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// A cold, effectively infinite sequence of [`Signal`]s.
///
/// Every call to `signals()` builds an independent instance starting from
/// "now"; the stream never ends on its own and completes only when the
/// underlying subscription(s) are disposed. For merged subscriptions the
/// per-source emission order is preserved.
pub struct SignalStream {
    inner: SelectAll<BaseStream>,
}

impl SignalStream {
    pub(crate) fn from_bases<'a, I>(bases: I) -> Self
    where
        I: IntoIterator<Item = &'a BaseSignalSubscription>,
    {
        let mut inner = SelectAll::new();
        for base in bases {
            let (events, closed) = base.subscribe_parts();
            inner.push(BaseStream {
                events: BroadcastStream::new(events),
                closed: WatchStream::new(closed),
            });
        }
        Self { inner }
    }
}

impl Stream for SignalStream {
    type Item = Signal;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Signal>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::SignalDefinition;
    use crate::subscription::base::StreamCore;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::UNIX_EPOCH;

    fn base(code: u32) -> BaseSignalSubscription {
        BaseSignalSubscription::new(
            SignalDefinition::new("UNIX", code),
            Arc::new(StreamCore::new(8)),
        )
    }

    #[tokio::test]
    async fn test_stream_receives_in_order() {
        let sub = base(15);
        let mut stream = sub.signals();

        let sender = sub.sender();
        for code in [1u32, 2, 3] {
            sender.send(Signal::new("UNIX", code, UNIX_EPOCH)).unwrap();
        }

        for code in [1u32, 2, 3] {
            assert_eq!(stream.next().await.unwrap().code(), code);
        }
    }

    #[tokio::test]
    async fn test_stream_is_broadcast_not_replay() {
        let sub = base(15);
        let sender = sub.sender();

        // Emitted before any consumer exists: dropped.
        let _ = sender.send(Signal::new("UNIX", 1, UNIX_EPOCH));

        let mut stream = sub.signals();
        sender.send(Signal::new("UNIX", 2, UNIX_EPOCH)).unwrap();
        assert_eq!(stream.next().await.unwrap().code(), 2);
    }

    #[tokio::test]
    async fn test_stream_completes_on_close() {
        let sub = base(15);
        let mut stream = sub.signals();

        let sender = sub.sender();
        sender.send(Signal::new("UNIX", 1, UNIX_EPOCH)).unwrap();
        sub.close();

        // Emission buffered before the close is still drained, then the
        // stream completes.
        assert_eq!(stream.next().await.unwrap().code(), 1);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_of_closed_subscription_is_empty() {
        let sub = base(15);
        sub.close();
        let mut stream = sub.signals();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_merged_stream_draws_from_all_sources() {
        let a = base(1);
        let b = base(2);
        let mut merged = SignalStream::from_bases([&a, &b]);

        a.sender().send(Signal::new("UNIX", 1, UNIX_EPOCH)).unwrap();
        b.sender().send(Signal::new("UNIX", 2, UNIX_EPOCH)).unwrap();

        let mut seen = vec![
            merged.next().await.unwrap().code(),
            merged.next().await.unwrap().code(),
        ];
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
    }
}
