pub use log::*;
pub use request::*;
pub use subscription::*;

/// Re-exported fixed-width hash and integer types used on the wire.
pub use primitive_types::{H160, H256, U256};

mod log;
mod request;
mod subscription;
