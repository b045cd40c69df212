use crate::util::keccak256;
use crate::{codec, AbiError, AbiResult, Param, ParamKind, Selector, Value};

/// Declared state mutability of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMutability {
    /// Reads no state.
    Pure,
    /// Reads but does not modify state.
    View,
    /// Modifies state, rejects attached value.
    NonPayable,
    /// Modifies state, accepts attached value.
    Payable,
}

impl StateMutability {
    /// Whether calls to a function of this mutability go through the
    /// read-only dispatch path.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Pure | Self::View)
    }

    pub(crate) fn parse(value: &str) -> AbiResult<Self> {
        Ok(match value {
            "pure" => Self::Pure,
            "view" => Self::View,
            "nonpayable" => Self::NonPayable,
            "payable" => Self::Payable,
            other => {
                return Err(AbiError::MalformedAbi {
                    reason: format!("unknown state mutability `{other}`"),
                })
            }
        })
    }

    /// Mutability of descriptors predating the `stateMutability` field,
    /// reconstructed from the legacy `constant` / `payable` flags.
    pub(crate) fn from_legacy_flags(constant: bool, payable: bool) -> Self {
        if constant {
            Self::View
        } else if payable {
            Self::Payable
        } else {
            Self::NonPayable
        }
    }
}

/// A callable function of the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name as declared.
    pub name: String,
    /// Input parameters in declaration order.
    pub inputs: Vec<Param>,
    /// Output parameters in declaration order.
    pub outputs: Vec<Param>,
    /// Declared mutability.
    pub state_mutability: StateMutability,
}

impl Function {
    /// Canonical signature: `name(t1,t2,…)`, no whitespace, tuples as
    /// parenthesized component lists. Selectors are keyed on this form,
    /// so two overloads never share one.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, render_kinds(&self.inputs))
    }

    /// First 4 bytes of the keccak-256 hash of the canonical signature.
    pub fn selector(&self) -> Selector {
        let hash = keccak256(self.signature().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash.as_bytes()[..4]);
        selector
    }

    /// Build full calldata for this function: selector followed by the
    /// head-tail encoding of `args`.
    pub fn encode_input(&self, args: &[Value]) -> AbiResult<Vec<u8>> {
        self.check_arity(args.len())?;
        let kinds = param_kinds(&self.inputs);
        let mut data = self.selector().to_vec();
        data.extend(codec::encode(&kinds, args)?);
        Ok(data)
    }

    /// Decode the argument region of calldata (everything after the
    /// selector) back into values.
    pub fn decode_input(&self, data: &[u8]) -> AbiResult<Vec<Value>> {
        codec::decode(&param_kinds(&self.inputs), data)
    }

    /// Decode a call reply against the declared outputs.
    pub fn decode_output(&self, data: &[u8]) -> AbiResult<Vec<Value>> {
        codec::decode(&param_kinds(&self.outputs), data)
    }

    fn check_arity(&self, got: usize) -> AbiResult<()> {
        if got != self.inputs.len() {
            return Err(AbiError::ArgCountMismatch {
                name: self.name.clone(),
                expected: self.inputs.len(),
                got,
            });
        }
        Ok(())
    }
}

/// The contract's constructor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constructor {
    /// Constructor parameters in declaration order.
    pub inputs: Vec<Param>,
}

impl Constructor {
    /// Build deployment calldata: the init bytecode concatenated with the
    /// tuple-encoded constructor inputs. No selector is prefixed.
    pub fn encode_input(&self, bytecode: &[u8], args: &[Value]) -> AbiResult<Vec<u8>> {
        if args.len() != self.inputs.len() {
            return Err(AbiError::ArgCountMismatch {
                name: "constructor".to_owned(),
                expected: self.inputs.len(),
                got: args.len(),
            });
        }
        let mut data = bytecode.to_vec();
        data.extend(codec::encode(&param_kinds(&self.inputs), args)?);
        Ok(data)
    }
}

pub(crate) fn param_kinds(params: &[Param]) -> Vec<ParamKind> {
    params.iter().map(|param| param.kind.clone()).collect()
}

pub(crate) fn render_kinds(params: &[Param]) -> String {
    params
        .iter()
        .map(|param| param.kind.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
