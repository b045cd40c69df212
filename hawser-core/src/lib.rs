//! Core types and traits for the hawser contract-binding runtime.
//!
//! Everything a bound contract needs from the outside world crosses one of
//! the seams defined here: a [`Backend`] that talks to an
//! Ethereum-compatible node, and an [`Authorizer`] that turns unsigned
//! transaction requests into signed, gas-priced transactions. The concrete
//! implementations of both live outside this workspace.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub use error::*;
pub use traits::*;
pub use types::*;

mod error;
mod traits;
mod types;

pub mod utils;
