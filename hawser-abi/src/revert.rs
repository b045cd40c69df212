//! Decoding of revert payloads.
//!
//! A reverting call carries one of three payload shapes: the compiler's
//! built-in `Error(string)` carrier, a `Panic(uint256)` with a numeric
//! fault code, or a user-defined error registered in the schema. A revert
//! can also carry no payload at all.

use std::fmt;

use hawser_core::U256;

use crate::{codec, Abi, ParamKind, Selector, Value};

/// Selector of the built-in `Error(string)` revert carrier.
pub const ERROR_SELECTOR: Selector = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of the built-in `Panic(uint256)` revert carrier.
pub const PANIC_SELECTOR: Selector = [0x4e, 0x48, 0x7b, 0x71];

/// A classified revert payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// `revert("...")` or a failed `require` with a message.
    Error(String),
    /// A compiler-inserted `Panic` with its fault code.
    Panic(U256),
    /// A user-defined error declared in the schema.
    Custom {
        /// Declared error name.
        name: String,
        /// Decoded error arguments.
        values: Vec<Value>,
    },
    /// The ledger reverted without a payload.
    Empty,
}

impl RevertReason {
    /// Human-readable meaning of a `Panic` fault code, for the codes the
    /// compiler emits.
    pub fn panic_message(code: U256) -> Option<&'static str> {
        Some(match code.low_u64() {
            _ if code > U256::from(u64::MAX) => return None,
            0x00 => "generic compiler panic",
            0x01 => "assertion failed",
            0x11 => "arithmetic overflow or underflow",
            0x12 => "division or modulo by zero",
            0x21 => "conversion into an invalid enum value",
            0x22 => "incorrectly encoded storage byte array",
            0x31 => "pop on an empty array",
            0x32 => "array index out of bounds",
            0x41 => "allocation of too much memory",
            0x51 => "call to an uninitialized function pointer",
            _ => return None,
        })
    }
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevertReason::Error(message) => f.write_str(message),
            RevertReason::Panic(code) => match Self::panic_message(*code) {
                Some(message) => write!(f, "panic {code:#x} ({message})"),
                None => write!(f, "panic {code:#x}"),
            },
            RevertReason::Custom { name, values } => write!(f, "{name}{values:?}"),
            RevertReason::Empty => f.write_str("no revert payload"),
        }
    }
}

/// Classify `data` as a revert payload, consulting `abi` for user-defined
/// errors.
///
/// Returns `None` when the bytes do not decode cleanly under any revert
/// grammar: a reply that merely starts with a known selector but whose
/// tail does not parse is not treated as a revert, so a successful return
/// value can never be misclassified.
pub fn decode_revert(abi: &Abi, data: &[u8]) -> Option<RevertReason> {
    if data.is_empty() {
        return Some(RevertReason::Empty);
    }
    if data.len() < 4 {
        return None;
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&data[..4]);
    let payload = &data[4..];

    if selector == ERROR_SELECTOR {
        let values = codec::decode(&[ParamKind::String], payload).ok()?;
        return values
            .into_iter()
            .next()
            .and_then(Value::into_string)
            .map(RevertReason::Error);
    }
    if selector == PANIC_SELECTOR {
        let values = codec::decode(&[ParamKind::Uint(256)], payload).ok()?;
        return values
            .into_iter()
            .next()
            .and_then(Value::into_uint)
            .map(RevertReason::Panic);
    }
    if let Some(decl) = abi.error_by_selector(selector) {
        let values = decl.decode_payload(payload).ok()?;
        return Some(RevertReason::Custom {
            name: decl.name.clone(),
            values,
        });
    }
    None
}
