use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{H160, H256};

/// A raw log record as emitted by a contract: the undecoded wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct RawLog {
    /// Address of the emitting contract.
    pub address: H160,
    /// Indexed topic words, topic-0 (the signature hash) first for
    /// non-anonymous events. At most 4 entries.
    pub topics: Vec<H256>,
    /// ABI-encoded non-indexed payload.
    pub data: Vec<u8>,
}

/// Position metadata the backend attaches to every returned log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct LogMeta {
    /// Block this log was emitted in.
    pub block_number: u64,
    /// Index of the emitting transaction within its block.
    pub transaction_index: u64,
    /// Index of the log within the block.
    pub log_index: u64,
    /// True when a reorg retracted this log. Retractions are delivered to
    /// consumers, never dropped.
    pub removed: bool,
}

/// A log retrieval or subscription request.
///
/// Topic filter semantics match `eth_getLogs`: within one position the
/// listed values are alternatives (OR), across positions all must match
/// (AND), and `None` is a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LogQuery {
    /// Contract address the logs must originate from.
    pub address: H160,
    /// First block of the range, inclusive.
    pub from_block: u64,
    /// Last block of the range, inclusive. `None` means the latest block
    /// for retrieval and "no upper bound" for subscriptions.
    pub to_block: Option<u64>,
    /// Per-position topic filter lists.
    pub topics: Vec<Option<Vec<H256>>>,
}
