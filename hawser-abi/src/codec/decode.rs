use hawser_core::{H160, U256};

use crate::codec::encode::padded_len;
use crate::{AbiError, AbiResult, ParamKind, Value};

/// Decode an ABI head-tail buffer against an ordered type list.
///
/// Every dynamic-field offset is validated before it is followed: it must
/// be word-aligned, land at or after the head region, and must not
/// overlap the previous dynamic payload. Trailing bytes beyond the last
/// payload are tolerated.
pub fn decode(kinds: &[ParamKind], data: &[u8]) -> AbiResult<Vec<Value>> {
    let refs: Vec<&ParamKind> = kinds.iter().collect();
    let (values, _) = decode_fields(&refs, data)?;
    Ok(values)
}

/// Decode one head-tail block, returning the values and the number of
/// bytes the block provably consumed.
fn decode_fields(kinds: &[&ParamKind], region: &[u8]) -> AbiResult<(Vec<Value>, usize)> {
    let head_len: usize = kinds.iter().map(|kind| kind.head_width()).sum();
    if region.len() < head_len {
        return Err(AbiError::ShortRead {
            offset: 0,
            needed: head_len,
            available: region.len(),
        });
    }

    let mut values = Vec::with_capacity(kinds.len());
    let mut cursor = 0;
    // Dynamic payloads must appear in offset order without overlap, or
    // decoding of subsequent fields would desynchronize.
    let mut tail_floor = head_len;
    let mut consumed = head_len;

    for &kind in kinds {
        if kind.is_dynamic() {
            let offset = read_offset(region, cursor)?;
            if offset < tail_floor || offset % 32 != 0 {
                return Err(AbiError::MalformedTail { offset });
            }
            let (value, used) =
                decode_value(kind, &region[offset..]).map_err(|err| err.rebase(offset))?;
            tail_floor = offset + used;
            consumed = consumed.max(tail_floor);
            values.push(value);
            cursor += 32;
        } else {
            let (value, used) =
                decode_value(kind, &region[cursor..]).map_err(|err| err.rebase(cursor))?;
            values.push(value);
            cursor += used;
        }
    }

    Ok((values, consumed))
}

pub(crate) fn decode_value(kind: &ParamKind, slice: &[u8]) -> AbiResult<(Value, usize)> {
    match kind {
        ParamKind::Uint(bits) => {
            let word = read_word(slice)?;
            let value = U256::from_big_endian(word);
            if *bits < 256 && !(value >> *bits).is_zero() {
                return Err(AbiError::Overflow {
                    kind: format!("uint{bits}"),
                });
            }
            Ok((Value::Uint(value), 32))
        }
        ParamKind::Int(bits) => {
            let word = read_word(slice)?;
            let value = U256::from_big_endian(word);
            if *bits < 256 {
                let extension = value >> (*bits - 1);
                if !extension.is_zero() && extension != U256::MAX >> (*bits - 1) {
                    return Err(AbiError::Overflow {
                        kind: format!("int{bits}"),
                    });
                }
            }
            Ok((Value::Int(value), 32))
        }
        ParamKind::Address => {
            let word = read_word(slice)?;
            Ok((Value::Address(H160::from_slice(&word[12..])), 32))
        }
        ParamKind::Bool => {
            let word = read_word(slice)?;
            if word[..31].iter().any(|byte| *byte != 0) || word[31] > 1 {
                return Err(AbiError::InvalidBool { offset: 0 });
            }
            Ok((Value::Bool(word[31] == 1), 32))
        }
        ParamKind::FixedBytes(width) => {
            let word = read_word(slice)?;
            Ok((Value::FixedBytes(word[..*width].to_vec()), 32))
        }
        ParamKind::Bytes => {
            let (bytes, used) = decode_byte_payload(slice)?;
            Ok((Value::Bytes(bytes), used))
        }
        ParamKind::String => {
            let (bytes, used) = decode_byte_payload(slice)?;
            let text =
                String::from_utf8(bytes).map_err(|_| AbiError::InvalidUtf8 { offset: 32 })?;
            Ok((Value::String(text), used))
        }
        ParamKind::FixedArray(element, len) => {
            let kinds: Vec<&ParamKind> = (0..*len).map(|_| element.as_ref()).collect();
            let (items, used) = decode_fields(&kinds, slice)?;
            Ok((Value::FixedArray(items), used))
        }
        ParamKind::Array(element) => {
            let word = read_word(slice)?;
            let declared = U256::from_big_endian(word);
            let body = &slice[32..];
            // Each element claims at least one head word; reject length
            // prefixes the input cannot possibly satisfy before allocating.
            if declared > U256::from(body.len() / 32) {
                return Err(AbiError::ShortRead {
                    offset: 32,
                    needed: declared.low_u64().saturating_mul(32) as usize,
                    available: body.len(),
                });
            }
            let len = declared.as_usize();
            let kinds: Vec<&ParamKind> = (0..len).map(|_| element.as_ref()).collect();
            let (items, used) = decode_fields(&kinds, body).map_err(|err| err.rebase(32))?;
            Ok((Value::Array(items), 32 + used))
        }
        ParamKind::Tuple(fields) => {
            let kinds: Vec<&ParamKind> = fields.iter().map(|(_, kind)| kind).collect();
            let (items, used) = decode_fields(&kinds, slice)?;
            Ok((Value::Tuple(items), used))
        }
    }
}

fn read_word(slice: &[u8]) -> AbiResult<&[u8]> {
    if slice.len() < 32 {
        return Err(AbiError::ShortRead {
            offset: 0,
            needed: 32,
            available: slice.len(),
        });
    }
    Ok(&slice[..32])
}

/// Read a dynamic-field offset out of the head and bounds-check it
/// against the enclosing region.
fn read_offset(region: &[u8], cursor: usize) -> AbiResult<usize> {
    let word = U256::from_big_endian(&region[cursor..cursor + 32]);
    if word > U256::from(region.len()) {
        return Err(AbiError::MalformedTail {
            offset: word.low_u64() as usize,
        });
    }
    Ok(word.as_usize())
}

/// Length-prefixed byte payload. Consumes the length word plus the
/// zero-padded payload.
fn decode_byte_payload(slice: &[u8]) -> AbiResult<(Vec<u8>, usize)> {
    let word = read_word(slice)?;
    let declared = U256::from_big_endian(word);
    let body = &slice[32..];
    if declared > U256::from(body.len()) {
        return Err(AbiError::ShortRead {
            offset: 32,
            needed: declared.low_u64() as usize,
            available: body.len(),
        });
    }
    let len = declared.as_usize();
    let padded = padded_len(len);
    if body.len() < padded {
        return Err(AbiError::ShortRead {
            offset: 32,
            needed: padded,
            available: body.len(),
        });
    }
    Ok((body[..len].to_vec(), 32 + padded))
}
