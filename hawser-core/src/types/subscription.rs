use std::fmt::{Debug, Formatter};

use tokio::sync::mpsc;

use crate::{BackendError, LogMeta, RawLog};

/// Teardown handle for a live log subscription. Invoked at most once.
pub type UnsubscribeFn = Box<dyn FnOnce() + Send>;

/// Cursor over a live log subscription.
///
/// Exclusively owned by one consumer. The backend pushes logs into `logs`
/// in delivery order and reports a terminal failure, if any, on `errors`
/// before dropping both senders. Dropping the cursor unsubscribes.
pub struct LogSubscription {
    /// Live logs in backend delivery order.
    pub logs: mpsc::UnboundedReceiver<(RawLog, LogMeta)>,
    /// Terminal subscription failure, reported at most once.
    pub errors: mpsc::UnboundedReceiver<BackendError>,
    unsubscribe: Option<UnsubscribeFn>,
}

impl LogSubscription {
    /// Assemble a cursor from its channels and teardown handle.
    pub fn new(
        logs: mpsc::UnboundedReceiver<(RawLog, LogMeta)>,
        errors: mpsc::UnboundedReceiver<BackendError>,
        unsubscribe: UnsubscribeFn,
    ) -> Self {
        Self {
            logs,
            errors,
            unsubscribe: Some(unsubscribe),
        }
    }

    /// Invoke the teardown handle. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(teardown) = self.unsubscribe.take() {
            teardown();
        }
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl Debug for LogSubscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
