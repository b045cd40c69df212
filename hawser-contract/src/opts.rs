use hawser_core::{BlockTag, H160, U256};

/// Options for a read-only call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOpts {
    /// Optional `msg.sender` override.
    pub from: Option<H160>,
    /// State to execute against.
    pub block: BlockTag,
}

/// Options for a state-changing transaction. Gas fields are hints the
/// authorizer may honor or refine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactOpts {
    /// Wei attached to the transaction.
    pub value: U256,
    /// Optional gas limit cap.
    pub gas_limit: Option<U256>,
    /// Optional gas price cap.
    pub gas_price: Option<U256>,
}

impl TransactOpts {
    /// Options carrying only an attached value.
    pub fn with_value(value: U256) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

/// Block range for historical log retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOpts {
    /// First block of the range, inclusive.
    pub from_block: u64,
    /// Last block of the range, inclusive; `None` means the latest block.
    pub to_block: Option<u64>,
}

/// Start point for a historical-plus-live event watch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOpts {
    /// Replay history from this block before tailing live logs; `None`
    /// tails from the next block only.
    pub from_block: Option<u64>,
}
