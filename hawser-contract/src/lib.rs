//! The bound contract facade of the hawser runtime.
//!
//! A [`BoundContract`] composes an address, a parsed
//! [`Abi`](hawser_abi::Abi) and a [`Backend`](hawser_core::Backend) and
//! exposes the full client surface: read-only calls, authorized
//! transactions, raw transfers, historical log filtering, live event
//! watching and one-shot log parsing. Generated per-contract stubs wrap
//! these entry points with statically-typed signatures; nothing below
//! this crate knows about any specific contract.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub use config::{ConnectionConf, TxPollConf};
pub use contract::BoundContract;
pub use deploy::{create_address, deploy};
pub use error::{ContractError, ContractResult};
pub use opts::{CallOpts, FilterOpts, TransactOpts, WatchOpts};
pub use stream::EventStream;
pub use wait::{wait_deployed, wait_mined};

mod config;
mod contract;
mod deploy;
mod dispatch;
mod error;
mod opts;
mod stream;
mod wait;
