use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sha3::{Digest, Keccak256};
use tokio::sync::mpsc;

use hawser_core::*;

/// A backend stub driven by queues of canned replies.
///
/// Expectations are consumed in FIFO order; anything the script did not
/// provide fails the call with an `Rpc` error, which keeps tests honest
/// about every backend interaction they trigger.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    calls: Mutex<VecDeque<BackendResult<Vec<u8>>>>,
    call_log: Mutex<Vec<(CallRequest, BlockTag)>>,
    latest_block: AtomicU64,
    log_batches: Mutex<VecDeque<Vec<(RawLog, LogMeta)>>>,
    queries: Mutex<Vec<LogQuery>>,
    subscriptions: Mutex<VecDeque<LogSubscription>>,
    sent: Mutex<Vec<SignedTransaction>>,
    receipts: Mutex<VecDeque<Option<TransactionReceipt>>>,
    unsubscribes: Arc<AtomicUsize>,
}

/// Producer half of a scripted live subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionFeed {
    logs: mpsc::UnboundedSender<(RawLog, LogMeta)>,
    errors: mpsc::UnboundedSender<BackendError>,
}

impl SubscriptionFeed {
    /// Push one live log to the subscriber.
    pub fn push(&self, log: RawLog, meta: LogMeta) {
        let _ = self.logs.send((log, meta));
    }

    /// Report a terminal subscription failure and close the feed.
    pub fn fail(self, error: BackendError) {
        let _ = self.errors.send(error);
    }
}

impl ScriptedBackend {
    /// A backend with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next `call`.
    pub fn expect_call(&self, reply: BackendResult<Vec<u8>>) {
        self.calls.lock().unwrap().push_back(reply);
    }

    /// Set the tip block number.
    pub fn set_latest_block(&self, number: u64) {
        self.latest_block.store(number, Ordering::SeqCst);
    }

    /// Queue a batch for the next `filter_logs`.
    pub fn expect_logs(&self, batch: Vec<(RawLog, LogMeta)>) {
        self.log_batches.lock().unwrap().push_back(batch);
    }

    /// Queue a live subscription for the next `subscribe_logs` and hand
    /// back its producer side. Dropping the feed ends the subscription
    /// gracefully.
    pub fn expect_subscription(&self) -> SubscriptionFeed {
        let (log_tx, log_rx) = mpsc::unbounded_channel();
        let (err_tx, err_rx) = mpsc::unbounded_channel();
        let counter = Arc::clone(&self.unsubscribes);
        let subscription = LogSubscription::new(
            log_rx,
            err_rx,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        self.subscriptions.lock().unwrap().push_back(subscription);
        SubscriptionFeed {
            logs: log_tx,
            errors: err_tx,
        }
    }

    /// Queue a reply for the next `transaction_receipt`.
    pub fn expect_receipt(&self, receipt: Option<TransactionReceipt>) {
        self.receipts.lock().unwrap().push_back(receipt);
    }

    /// How many times subscriptions handed out by this backend were
    /// unsubscribed.
    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }

    /// Every log query observed, filter and subscribe alike, in order.
    pub fn queries(&self) -> Vec<LogQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Every call request observed, in order.
    pub fn calls_seen(&self) -> Vec<(CallRequest, BlockTag)> {
        self.call_log.lock().unwrap().clone()
    }

    /// Every signed transaction submitted, in order.
    pub fn sent(&self) -> Vec<SignedTransaction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Caller for ScriptedBackend {
    async fn call(&self, req: &CallRequest, block: BlockTag) -> BackendResult<Vec<u8>> {
        self.call_log.lock().unwrap().push((req.clone(), block));
        self.calls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Rpc("unscripted call".to_owned())))
    }

    async fn latest_block_number(&self) -> BackendResult<u64> {
        Ok(self.latest_block.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl Transactor for ScriptedBackend {
    async fn pending_nonce(&self, _address: H160) -> BackendResult<u64> {
        Ok(0)
    }

    async fn gas_price(&self) -> BackendResult<U256> {
        Ok(U256::from(1_000_000_000u64))
    }

    async fn estimate_gas(&self, _req: &CallRequest) -> BackendResult<U256> {
        Ok(U256::from(21_000u64))
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> BackendResult<H256> {
        self.sent.lock().unwrap().push(tx.clone());
        Ok(tx.hash)
    }

    async fn transaction_receipt(
        &self,
        _hash: H256,
    ) -> BackendResult<Option<TransactionReceipt>> {
        Ok(self
            .receipts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

#[async_trait]
impl LogFilterer for ScriptedBackend {
    async fn filter_logs(&self, query: &LogQuery) -> BackendResult<Vec<(RawLog, LogMeta)>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self
            .log_batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn subscribe_logs(&self, query: &LogQuery) -> BackendResult<LogSubscription> {
        self.queries.lock().unwrap().push(query.clone());
        self.subscriptions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BackendError::Rpc("unscripted subscription".to_owned()))
    }
}

/// A deterministic authorizer for tests: it "signs" by hashing the
/// request and sequences nonces from zero.
#[derive(Debug)]
pub struct StaticAuthorizer {
    address: H160,
    nonce: AtomicU64,
}

impl StaticAuthorizer {
    /// An authorizer sending from `address`.
    pub fn new(address: H160) -> Self {
        Self {
            address,
            nonce: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    fn address(&self) -> H160 {
        self.address
    }

    async fn authorize(&self, req: TransactionRequest) -> BackendResult<SignedTransaction> {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let mut hasher = Keccak256::new();
        hasher.update(self.address.as_bytes());
        hasher.update(nonce.to_be_bytes());
        hasher.update(&req.data);
        let hash = H256::from_slice(hasher.finalize().as_slice());
        Ok(SignedTransaction::new(req.data, hash, self.address, nonce))
    }
}
