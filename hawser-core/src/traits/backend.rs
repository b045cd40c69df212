//! The backend is the seam between the runtime and a ledger node. The
//! runtime never speaks JSON-RPC itself; read-only calls, transaction
//! submission, log retrieval and subscription all go through the traits
//! here, so any node client can slot in underneath the bound contract
//! facade.
//!
//! Every method is a suspension point and may block on network I/O
//! indefinitely. Implementations must either be safe for concurrent use or
//! wrap themselves in a serializing adapter.

use std::fmt::Debug;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{
    BackendResult, BlockTag, CallRequest, LogMeta, LogQuery, LogSubscription, RawLog,
    SignedTransaction, TransactionReceipt, H160, H256, U256,
};

/// Read-only access to contract state.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait Caller: Send + Sync + Debug {
    /// Execute a read-only call against the state at `block`.
    async fn call(&self, req: &CallRequest, block: BlockTag) -> BackendResult<Vec<u8>>;

    /// Number of the latest block known to the backend.
    async fn latest_block_number(&self) -> BackendResult<u64>;
}

/// State-changing access: submission and the queries an authorizer needs
/// to price and sequence its transactions.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait Transactor: Send + Sync + Debug {
    /// Next nonce for `address`, counting pending transactions.
    async fn pending_nonce(&self, address: H160) -> BackendResult<u64>;

    /// Currently suggested gas price.
    async fn gas_price(&self) -> BackendResult<U256>;

    /// Estimated gas for executing `req` against the pending state.
    async fn estimate_gas(&self, req: &CallRequest) -> BackendResult<U256>;

    /// Submit a signed transaction; returns its hash without waiting for
    /// inclusion.
    async fn send_transaction(&self, tx: &SignedTransaction) -> BackendResult<H256>;

    /// Receipt of a mined transaction, or `None` while it is pending.
    async fn transaction_receipt(&self, hash: H256)
        -> BackendResult<Option<TransactionReceipt>>;
}

/// Historical log retrieval and live log subscription.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait LogFilterer: Send + Sync + Debug {
    /// Fetch logs matching `query` over its closed block range, ordered by
    /// block number ascending, then log index ascending within a block.
    async fn filter_logs(&self, query: &LogQuery) -> BackendResult<Vec<(RawLog, LogMeta)>>;

    /// Open a live subscription delivering logs matching `query` from
    /// `query.from_block` onward. The returned cursor is exclusively owned
    /// by the caller.
    async fn subscribe_logs(&self, query: &LogQuery) -> BackendResult<LogSubscription>;
}

/// Full backend surface required to bind a contract.
pub trait Backend: Caller + Transactor + LogFilterer {}

impl<T> Backend for T where T: Caller + Transactor + LogFilterer {}
