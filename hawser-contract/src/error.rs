use hawser_abi::{AbiError, RevertReason};
use hawser_core::{BackendError, H256};

/// The result of an operation on a bound contract.
pub type ContractResult<T> = Result<T, ContractError>;

/// Errors raised while dispatching calls, transactions or log queries
/// through a bound contract.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// A schema or codec failure.
    #[error(transparent)]
    Abi(#[from] AbiError),
    /// The backend failed; the underlying cause is preserved.
    #[error("backend error: {0}")]
    Backend(#[source] BackendError),
    /// No function with the requested name exists in the schema.
    #[error("no function `{name}` in contract abi")]
    UnknownMethod {
        /// The requested name.
        name: String,
    },
    /// More than one overload accepts the supplied arguments.
    #[error("{count} overloads of `{name}` accept the supplied arguments")]
    AmbiguousOverload {
        /// The requested name.
        name: String,
        /// Number of matching overloads.
        count: usize,
    },
    /// No event with the requested name exists in the schema.
    #[error("no event `{name}` in contract abi")]
    UnknownEventName {
        /// The requested name.
        name: String,
    },
    /// The requested event name is declared more than once.
    #[error("{count} events share the name `{name}`")]
    AmbiguousEvent {
        /// The requested name.
        name: String,
        /// Number of declarations.
        count: usize,
    },
    /// The backend returned no data where outputs were expected.
    #[error("backend returned no data for `{name}`, which declares outputs")]
    EmptyReply {
        /// The called function.
        name: String,
    },
    /// The ledger reverted the call.
    #[error("execution reverted: {0}")]
    Revert(RevertReason),
    /// The caller's cancellation token or deadline fired; surfaced
    /// verbatim, with no partial decoding.
    #[error("request cancelled")]
    Cancelled,
    /// Operation on an already-closed event stream.
    #[error("event stream is closed")]
    Closed,
    /// The transaction is no longer known to the backend.
    #[error("timed out waiting for transaction {0:?}")]
    TransactionTimeout(H256),
    /// A mined transaction was expected to create a contract but did not.
    #[error("transaction {0:?} did not deploy a contract")]
    NotADeployment(H256),
}

impl From<BackendError> for ContractError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Cancelled => Self::Cancelled,
            other => Self::Backend(other),
        }
    }
}

impl ContractError {
    /// The revert reason, when the ledger rejected the call.
    pub fn revert_reason(&self) -> Option<&RevertReason> {
        match self {
            Self::Revert(reason) => Some(reason),
            _ => None,
        }
    }
}
