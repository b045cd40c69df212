use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

/// The result of interacting with a ledger backend.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors returned when attempting to reach a ledger node or dispatch a
/// transaction through it.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A JSON-RPC level failure reported by the node.
    #[error("rpc error: {0}")]
    Rpc(String),
    /// The caller's deadline or cancellation token fired mid-request.
    #[error("request cancelled")]
    Cancelled,
    /// The node tore down a live log subscription.
    #[error("subscription closed by the backend")]
    SubscriptionClosed,
    /// Any other error; does not implement `From` to prevent
    /// conflicting/absorbing other errors.
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

impl BackendError {
    /// Create a backend error from any other existing error.
    pub fn from_other<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Other(Box::new(err))
    }

    /// Creates a backend error of the other variant from a static string.
    pub fn from_other_str(err: &'static str) -> Self {
        #[derive(Debug)]
        #[repr(transparent)]
        struct StringError(&'static str);
        impl Display for StringError {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.0)
            }
        }
        impl StdError for StringError {}

        Self::from_other(StringError(err))
    }

    /// Whether the failure was a cancellation rather than a fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
