//! The event stream: one lazy sequence over historical logs and a live
//! subscription tail.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tracing::debug;

use hawser_abi::{DecodedLog, Event};
use hawser_core::{LogMeta, LogSubscription, RawLog};

use crate::{ContractError, ContractResult};

/// A lazy, single-consumer sequence of decoded events of one type.
///
/// Historical records are delivered first, then the live tail. The
/// stream latches its first terminal error: once a subscription failure
/// or a decode failure is recorded, any logs still buffered are
/// discarded, [`next`](EventStream::next) keeps returning `None`, and
/// [`error`](EventStream::error) exposes what happened. A stream is
/// restartable only by constructing a new one.
///
/// Reorg retractions (`removed` logs) are delivered as ordinary records
/// with their `retracted` flag set; they are never suppressed.
///
/// Closing, explicitly or by dropping, releases the underlying
/// subscription cursor; the backend's unsubscribe handle runs exactly
/// once no matter how many times `close` is called.
pub struct EventStream {
    event: Event,
    buffer: VecDeque<(RawLog, LogMeta)>,
    live: Option<LogSubscription>,
    error: Option<ContractError>,
    closed: bool,
}

impl EventStream {
    /// A stream over an already-retrieved historical range.
    pub(crate) fn historical(event: Event, logs: Vec<(RawLog, LogMeta)>) -> Self {
        Self {
            event,
            buffer: logs.into(),
            live: None,
            error: None,
            closed: false,
        }
    }

    /// A stream over a historical range followed by a live tail.
    pub(crate) fn live(
        event: Event,
        historical: Vec<(RawLog, LogMeta)>,
        subscription: LogSubscription,
    ) -> Self {
        Self {
            event,
            buffer: historical.into(),
            live: Some(subscription),
            error: None,
            closed: false,
        }
    }

    /// The next decoded record, or `None` when the stream is exhausted,
    /// failed or closed. Inspect [`error`](EventStream::error) to tell
    /// the cases apart.
    pub async fn next(&mut self) -> Option<DecodedLog> {
        futures::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }

    /// The latched terminal error, if any. After an explicit close with
    /// no prior failure this reports [`ContractError::Closed`].
    pub fn error(&self) -> Option<&ContractError> {
        self.error.as_ref()
    }

    /// Release the subscription cursor. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        if let Some(mut subscription) = self.live.take() {
            subscription.unsubscribe();
        }
        if !self.closed {
            self.closed = true;
            if self.error.is_none() {
                self.error = Some(ContractError::Closed);
            }
        }
    }

    fn fail(&mut self, error: ContractError) {
        debug!(event = %self.event.name, %error, "event stream failed");
        if let Some(mut subscription) = self.live.take() {
            subscription.unsubscribe();
        }
        self.buffer.clear();
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn decode(&self, raw: &RawLog, meta: LogMeta) -> ContractResult<DecodedLog> {
        let params = self.event.decode_log(raw)?;
        Ok(DecodedLog {
            event: self.event.name.clone(),
            params,
            retracted: meta.removed,
            meta,
        })
    }
}

impl Stream for EventStream {
    type Item = DecodedLog;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.closed || this.error.is_some() {
                return Poll::Ready(None);
            }
            if let Some((raw, meta)) = this.buffer.pop_front() {
                match this.decode(&raw, meta) {
                    Ok(record) => return Poll::Ready(Some(record)),
                    Err(error) => {
                        this.fail(error);
                        return Poll::Ready(None);
                    }
                }
            }
            let Some(live) = this.live.as_mut() else {
                // Historical range exhausted and no live tail: drained.
                return Poll::Ready(None);
            };
            match live.logs.poll_recv(cx) {
                Poll::Ready(Some(pair)) => this.buffer.push_back(pair),
                Poll::Ready(None) => {
                    // The backend closed the channel. Logs queued before
                    // the failure have all been drained by now; surface
                    // the reported error, if any.
                    let failure = match live.errors.poll_recv(cx) {
                        Poll::Ready(Some(error)) => Some(error),
                        _ => None,
                    };
                    if let Some(mut subscription) = this.live.take() {
                        subscription.unsubscribe();
                    }
                    if let Some(error) = failure {
                        if this.error.is_none() {
                            this.error = Some(error.into());
                        }
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("event", &self.event.name)
            .field("buffered", &self.buffer.len())
            .field("live", &self.live.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}
