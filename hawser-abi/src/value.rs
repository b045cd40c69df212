use hawser_core::{H160, H256, U256};

use crate::ParamKind;

/// A host-language value crossing the wire codec.
///
/// The runtime stays dynamically typed over ABI values: dispatch carries
/// `(ParamKind, Value)` pairs and generated stubs erase the dynamism at
/// the call site. Signed integers are held as full-width two's
/// complement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer, right-aligned on the wire.
    Uint(U256),
    /// Signed integer in 256-bit two's complement.
    Int(U256),
    /// 20-byte account address.
    Address(H160),
    /// Boolean.
    Bool(bool),
    /// Fixed-width byte string (`bytesM`).
    FixedBytes(Vec<u8>),
    /// Dynamic byte string.
    Bytes(Vec<u8>),
    /// Dynamic UTF-8 string.
    String(String),
    /// Fixed-length homogeneous array.
    FixedArray(Vec<Value>),
    /// Dynamic homogeneous array.
    Array(Vec<Value>),
    /// Heterogeneous field list.
    Tuple(Vec<Value>),
}

impl Value {
    /// Whether this value is assignable to `kind`.
    ///
    /// Checks structure only: variant, fixed widths, arity and element
    /// compatibility. Numeric range is the encoder's concern and fails
    /// with `Overflow` there, not here.
    pub fn is(&self, kind: &ParamKind) -> bool {
        match (self, kind) {
            (Value::Uint(_), ParamKind::Uint(_)) => true,
            (Value::Int(_), ParamKind::Int(_)) => true,
            (Value::Address(_), ParamKind::Address) => true,
            (Value::Bool(_), ParamKind::Bool) => true,
            (Value::FixedBytes(bytes), ParamKind::FixedBytes(width)) => bytes.len() == *width,
            (Value::Bytes(_), ParamKind::Bytes) => true,
            (Value::String(_), ParamKind::String) => true,
            (Value::FixedArray(items), ParamKind::FixedArray(element, len)) => {
                items.len() == *len && items.iter().all(|item| item.is(element))
            }
            (Value::Array(items), ParamKind::Array(element)) => {
                items.iter().all(|item| item.is(element))
            }
            (Value::Tuple(items), ParamKind::Tuple(fields)) => {
                items.len() == fields.len()
                    && items
                        .iter()
                        .zip(fields)
                        .all(|(item, (_, kind))| item.is(kind))
            }
            _ => false,
        }
    }

    /// The unsigned integer inside, if any.
    pub fn into_uint(self) -> Option<U256> {
        match self {
            Value::Uint(value) => Some(value),
            _ => None,
        }
    }

    /// The two's-complement signed integer inside, if any.
    pub fn into_int(self) -> Option<U256> {
        match self {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }

    /// The address inside, if any.
    pub fn into_address(self) -> Option<H160> {
        match self {
            Value::Address(value) => Some(value),
            _ => None,
        }
    }

    /// The boolean inside, if any.
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// The byte payload inside, for both fixed and dynamic byte strings.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Value::FixedBytes(bytes) | Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The string inside, if any.
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// The element list inside, for both array flavours.
    pub fn into_array(self) -> Option<Vec<Value>> {
        match self {
            Value::FixedArray(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The field list inside, if this is a tuple.
    pub fn into_tuple(self) -> Option<Vec<Value>> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(value.into())
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Value::Uint(value.into())
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        // Sign-extend into 256-bit two's complement.
        if value >= 0 {
            Value::Int(U256::from(value as u64))
        } else {
            Value::Int(U256::MAX - U256::from(value.unsigned_abs()) + U256::one())
        }
    }
}

impl From<H160> for Value {
    fn from(value: H160) -> Self {
        Value::Address(value)
    }
}

impl From<H256> for Value {
    fn from(value: H256) -> Self {
        Value::FixedBytes(value.as_bytes().to_vec())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}
