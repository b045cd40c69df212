use crate::schema::function::{param_kinds, render_kinds};
use crate::util::keccak256;
use crate::{codec, AbiResult, Param, Selector, Value};

/// A user-defined error the contract can revert with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDecl {
    /// Error name as declared.
    pub name: String,
    /// Error parameters in declaration order.
    pub inputs: Vec<Param>,
}

impl ErrorDecl {
    /// Canonical signature: `name(t1,t2,…)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, render_kinds(&self.inputs))
    }

    /// First 4 bytes of the keccak-256 hash of the canonical signature;
    /// revert payloads raising this error are prefixed with it.
    pub fn selector(&self) -> Selector {
        let hash = keccak256(self.signature().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash.as_bytes()[..4]);
        selector
    }

    /// Decode the argument region of a revert payload (everything after
    /// the selector).
    pub fn decode_payload(&self, data: &[u8]) -> AbiResult<Vec<Value>> {
        codec::decode(&param_kinds(&self.inputs), data)
    }
}
