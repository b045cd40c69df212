//! Typed topic-filter construction for log queries.

use hawser_core::H256;

use crate::util::keccak256;
use crate::{AbiError, AbiResult, Value};

/// Turn per-position lists of acceptable values into the wire topic
/// filter shape: within one position the values are alternatives (OR),
/// across positions all must match (AND), and an empty list is a
/// wildcard (`None`).
///
/// Value types pack into their topic word the way they pack into a head
/// slot; `bytes` and `string` values are hashed, because that is what the
/// ledger indexes for them. Arrays and tuples are not filterable.
pub fn make_topics(positions: &[Vec<Value>]) -> AbiResult<Vec<Option<Vec<H256>>>> {
    positions
        .iter()
        .enumerate()
        .map(|(index, alternatives)| {
            if alternatives.is_empty() {
                return Ok(None);
            }
            alternatives
                .iter()
                .map(|value| topic_word(value, index))
                .collect::<AbiResult<Vec<_>>>()
                .map(Some)
        })
        .collect()
}

fn topic_word(value: &Value, index: usize) -> AbiResult<H256> {
    let mut word = [0u8; 32];
    match value {
        Value::Uint(number) | Value::Int(number) => number.to_big_endian(&mut word),
        Value::Address(address) => word[12..].copy_from_slice(address.as_bytes()),
        Value::Bool(flag) => word[31] = *flag as u8,
        Value::FixedBytes(bytes) if bytes.len() <= 32 => word[..bytes.len()].copy_from_slice(bytes),
        Value::Bytes(bytes) => return Ok(keccak256(bytes)),
        Value::String(text) => return Ok(keccak256(text.as_bytes())),
        _ => {
            return Err(AbiError::ArgTypeMismatch {
                index,
                expected: "a topic-indexable value".to_owned(),
            })
        }
    }
    Ok(H256::from(word))
}

#[cfg(test)]
mod tests {
    use hawser_core::H160;

    use super::*;

    #[test]
    fn positions_map_to_or_lists_with_wildcards() {
        let owner = H160::repeat_byte(0xaa);
        let topics = make_topics(&[
            vec![Value::Address(owner)],
            vec![Value::from(1u64), Value::from(2u64)],
            vec![],
        ])
        .unwrap();

        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0].as_ref().map(|t| t.len()), Some(1));
        assert_eq!(topics[0].as_ref().unwrap()[0].as_bytes()[12..], owner.as_bytes()[..]);
        assert_eq!(topics[1].as_ref().map(|t| t.len()), Some(2));
        assert_eq!(topics[1].as_ref().unwrap()[1], H256::from_low_u64_be(2));
        assert!(topics[2].is_none());
    }

    #[test]
    fn dynamic_values_are_hashed() {
        let topics = make_topics(&[vec![Value::from("ens-name")]]).unwrap();
        assert_eq!(topics[0].as_ref().unwrap()[0], keccak256(b"ens-name"));
    }

    #[test]
    fn composite_values_are_not_filterable() {
        let err = make_topics(&[vec![], vec![Value::Tuple(vec![])]]).unwrap_err();
        assert_eq!(
            err,
            AbiError::ArgTypeMismatch {
                index: 1,
                expected: "a topic-indexable value".into()
            }
        );
    }

    #[test]
    fn negative_ints_fill_their_word() {
        let topics = make_topics(&[vec![Value::from(-1i64)]]).unwrap();
        assert_eq!(topics[0].as_ref().unwrap()[0], H256::repeat_byte(0xff));
    }
}
