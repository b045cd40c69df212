use hawser_core::U256;

use crate::{AbiError, AbiResult, ParamKind, Value};

/// Encode `values` against `kinds` into an ABI head-tail buffer.
///
/// Arguments are checked for structural assignability first; numeric
/// values that do not fit their declared width fail with
/// [`AbiError::Overflow`] during serialization.
pub fn encode(kinds: &[ParamKind], values: &[Value]) -> AbiResult<Vec<u8>> {
    if kinds.len() != values.len() {
        return Err(AbiError::ArgCountMismatch {
            name: "value list".to_owned(),
            expected: kinds.len(),
            got: values.len(),
        });
    }
    for (index, (kind, value)) in kinds.iter().zip(values).enumerate() {
        if !value.is(kind) {
            return Err(AbiError::ArgTypeMismatch {
                index,
                expected: kind.to_string(),
            });
        }
    }
    let fields: Vec<(&ParamKind, &Value)> = kinds.iter().zip(values).collect();
    encode_fields(&fields)
}

/// Serialize one head-tail block. Static fields embed directly in the
/// head; each dynamic field leaves an offset word behind and appends its
/// payload to the tail.
fn encode_fields(fields: &[(&ParamKind, &Value)]) -> AbiResult<Vec<u8>> {
    let head_len: usize = fields.iter().map(|(kind, _)| kind.head_width()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for &(kind, value) in fields {
        if kind.is_dynamic() {
            head.extend_from_slice(&len_word(head_len + tail.len()));
            tail.extend(encode_value(kind, value)?);
        } else {
            head.extend(encode_value(kind, value)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

fn encode_value(kind: &ParamKind, value: &Value) -> AbiResult<Vec<u8>> {
    Ok(match (kind, value) {
        (ParamKind::Uint(bits), Value::Uint(word)) => uint_word(word, *bits)?.to_vec(),
        (ParamKind::Int(bits), Value::Int(word)) => int_word(word, *bits)?.to_vec(),
        (ParamKind::Address, Value::Address(address)) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(address.as_bytes());
            word.to_vec()
        }
        (ParamKind::Bool, Value::Bool(flag)) => {
            let mut word = [0u8; 32];
            word[31] = *flag as u8;
            word.to_vec()
        }
        (ParamKind::FixedBytes(_), Value::FixedBytes(bytes)) => {
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(bytes);
            word.to_vec()
        }
        (ParamKind::Bytes, Value::Bytes(bytes)) => encode_byte_payload(bytes),
        (ParamKind::String, Value::String(text)) => encode_byte_payload(text.as_bytes()),
        (ParamKind::FixedArray(element, _), Value::FixedArray(items)) => {
            let fields: Vec<_> = items.iter().map(|item| (element.as_ref(), item)).collect();
            encode_fields(&fields)?
        }
        (ParamKind::Array(element), Value::Array(items)) => {
            let mut out = len_word(items.len()).to_vec();
            let fields: Vec<_> = items.iter().map(|item| (element.as_ref(), item)).collect();
            out.extend(encode_fields(&fields)?);
            out
        }
        (ParamKind::Tuple(field_kinds), Value::Tuple(items)) => {
            let fields: Vec<_> = field_kinds
                .iter()
                .map(|(_, field_kind)| field_kind)
                .zip(items)
                .collect();
            encode_fields(&fields)?
        }
        _ => {
            return Err(AbiError::ArgTypeMismatch {
                index: 0,
                expected: kind.to_string(),
            })
        }
    })
}

/// Length-prefixed payload padded with zero bytes to a word boundary.
fn encode_byte_payload(bytes: &[u8]) -> Vec<u8> {
    let mut out = len_word(bytes.len()).to_vec();
    out.extend_from_slice(bytes);
    out.resize(32 + padded_len(bytes.len()), 0);
    out
}

pub(crate) fn padded_len(len: usize) -> usize {
    len + (32 - len % 32) % 32
}

fn len_word(value: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    U256::from(value).to_big_endian(&mut word);
    word
}

fn uint_word(value: &U256, bits: usize) -> AbiResult<[u8; 32]> {
    if bits < 256 && !(*value >> bits).is_zero() {
        return Err(AbiError::Overflow {
            kind: format!("uint{bits}"),
        });
    }
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    Ok(word)
}

/// A signed value is in range iff the bits above its declared width are a
/// pure sign extension of bit `bits - 1`.
fn int_word(value: &U256, bits: usize) -> AbiResult<[u8; 32]> {
    if bits < 256 {
        let extension = *value >> (bits - 1);
        if !extension.is_zero() && extension != U256::MAX >> (bits - 1) {
            return Err(AbiError::Overflow {
                kind: format!("int{bits}"),
            });
        }
    }
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    Ok(word)
}
