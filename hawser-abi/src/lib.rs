//! ABI schema and wire codec for the hawser contract-binding runtime.
//!
//! An [`Abi`] is parsed once from the contract's JSON descriptor and is
//! immutable afterwards; it owns the function, event and error tables with
//! their computed selectors and topic hashes. The codec in this crate turns
//! typed [`Value`]s into ABI head-tail buffers and back, and the event
//! machinery decodes raw log records against the schema.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub use codec::{decode, encode};
pub use error::*;
pub use kind::ParamKind;
pub use revert::*;
pub use schema::*;
pub use topics::make_topics;
pub use value::Value;

mod codec;
mod error;
mod kind;
mod revert;
mod schema;
mod topics;
mod value;

pub mod util;

/// 4-byte function fingerprint prefixing calldata.
pub type Selector = [u8; 4];
