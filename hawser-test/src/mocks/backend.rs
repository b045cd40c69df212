#![allow(non_snake_case)]
#![allow(missing_docs)]

use async_trait::async_trait;
use mockall::*;

use hawser_core::*;

mock! {
    pub Ledger {
        // Caller
        pub fn _call(&self, req: &CallRequest, block: BlockTag) -> BackendResult<Vec<u8>> {}

        pub fn _latest_block_number(&self) -> BackendResult<u64> {}

        // Transactor
        pub fn _pending_nonce(&self, address: H160) -> BackendResult<u64> {}

        pub fn _gas_price(&self) -> BackendResult<U256> {}

        pub fn _estimate_gas(&self, req: &CallRequest) -> BackendResult<U256> {}

        pub fn _send_transaction(&self, tx: &SignedTransaction) -> BackendResult<H256> {}

        pub fn _transaction_receipt(
            &self,
            hash: H256,
        ) -> BackendResult<Option<TransactionReceipt>> {}

        // LogFilterer
        pub fn _filter_logs(&self, query: &LogQuery) -> BackendResult<Vec<(RawLog, LogMeta)>> {}

        pub fn _subscribe_logs(&self, query: &LogQuery) -> BackendResult<LogSubscription> {}
    }
}

impl std::fmt::Debug for MockLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockLedger")
    }
}

#[async_trait]
impl Caller for MockLedger {
    async fn call(&self, req: &CallRequest, block: BlockTag) -> BackendResult<Vec<u8>> {
        self._call(req, block)
    }

    async fn latest_block_number(&self) -> BackendResult<u64> {
        self._latest_block_number()
    }
}

#[async_trait]
impl Transactor for MockLedger {
    async fn pending_nonce(&self, address: H160) -> BackendResult<u64> {
        self._pending_nonce(address)
    }

    async fn gas_price(&self) -> BackendResult<U256> {
        self._gas_price()
    }

    async fn estimate_gas(&self, req: &CallRequest) -> BackendResult<U256> {
        self._estimate_gas(req)
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> BackendResult<H256> {
        self._send_transaction(tx)
    }

    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> BackendResult<Option<TransactionReceipt>> {
        self._transaction_receipt(hash)
    }
}

#[async_trait]
impl LogFilterer for MockLedger {
    async fn filter_logs(&self, query: &LogQuery) -> BackendResult<Vec<(RawLog, LogMeta)>> {
        self._filter_logs(query)
    }

    async fn subscribe_logs(&self, query: &LogQuery) -> BackendResult<LogSubscription> {
        self._subscribe_logs(query)
    }
}
