use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{H160, H256, U256};

/// Block context a read-only call executes against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockTag {
    /// The latest mined block.
    #[default]
    Latest,
    /// The pending (not yet mined) state.
    Pending,
    /// A specific block number.
    Number(u64),
}

/// Argument of a read-only `eth_call`-style invocation.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CallRequest {
    /// Optional sender override; some contracts answer differently
    /// depending on `msg.sender`.
    pub from: Option<H160>,
    /// Callee address. `None` only for gas estimation of deployments.
    pub to: Option<H160>,
    /// Wei sent along with the call.
    pub value: U256,
    /// ABI-encoded calldata.
    pub data: Vec<u8>,
}

/// An unsigned transaction skeleton handed to an [`crate::Authorizer`].
///
/// The authorizer fills in nonce, gas and signature; the gas fields here
/// are caller-supplied caps it may honor or refine.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TransactionRequest {
    /// Recipient. `None` creates a contract.
    pub to: Option<H160>,
    /// Wei transferred by the transaction.
    pub value: U256,
    /// Calldata, or init code for creations.
    pub data: Vec<u8>,
    /// Optional gas limit cap.
    pub gas_limit: Option<U256>,
    /// Optional gas price cap.
    pub gas_price: Option<U256>,
}

/// A fully signed transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct SignedTransaction {
    /// Marshalled signed transaction bytes.
    pub raw: Vec<u8>,
    /// Transaction hash.
    pub hash: H256,
    /// Recovered sender address.
    pub sender: H160,
    /// Nonce the authorizer selected.
    pub nonce: u64,
}

/// Inclusion proof of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct TransactionReceipt {
    /// Hash of the included transaction.
    pub transaction_hash: H256,
    /// Block the transaction was mined in.
    pub block_number: u64,
    /// True if execution succeeded, false if it reverted.
    pub status: bool,
    /// Gas consumed by the transaction.
    pub gas_used: U256,
    /// Address of the created contract, for deployments.
    pub contract_address: Option<H160>,
}
