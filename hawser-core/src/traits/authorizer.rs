use std::fmt::Debug;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{BackendResult, SignedTransaction, TransactionRequest, H160};

/// Turns unsigned transaction skeletons into signed, gas-priced
/// transactions.
///
/// Nonce selection, gas estimation (possibly by delegating to
/// [`crate::Transactor::estimate_gas`]) and signing all happen behind this
/// trait; key custody never enters the runtime. An authorizer is typically
/// single-writer: it alone is responsible for keeping its nonces monotonic
/// across concurrent transactions.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait Authorizer: Send + Sync + Debug {
    /// Address transactions are sent from.
    fn address(&self) -> H160;

    /// Produce a signed transaction for `req`.
    async fn authorize(&self, req: TransactionRequest) -> BackendResult<SignedTransaction>;
}
