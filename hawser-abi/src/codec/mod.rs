//! The wire codec: ABI head-tail encoding of typed values.
//!
//! Every field contributes to the head region: static fields embed their
//! full flattened width, dynamic fields a single offset word pointing into
//! the tail. Offsets are measured from the start of the innermost
//! enclosing dynamic block. The decoder validates every offset before
//! following it and refuses overlapping payloads.

pub use decode::decode;
pub use encode::encode;

pub(crate) use decode::decode_value;

mod decode;
mod encode;

#[cfg(test)]
mod tests {
    use hawser_core::{H160, U256};

    use crate::{decode, encode, ParamKind, Value};

    fn roundtrip(kinds: &[ParamKind], values: &[Value]) {
        let encoded = encode(kinds, values).unwrap();
        let decoded = decode(kinds, &encoded).unwrap();
        assert_eq!(decoded, values);
        // Re-encoding the decoded values must reproduce the buffer.
        assert_eq!(encode(kinds, &decoded).unwrap(), encoded);
    }

    #[test]
    fn primitives_roundtrip() {
        roundtrip(
            &[
                ParamKind::Uint(256),
                ParamKind::Uint(8),
                ParamKind::Int(48),
                ParamKind::Address,
                ParamKind::Bool,
                ParamKind::FixedBytes(3),
            ],
            &[
                Value::Uint(U256::MAX),
                Value::from(255u64),
                Value::from(-1i64),
                Value::Address(H160::repeat_byte(0x11)),
                Value::from(true),
                Value::FixedBytes(vec![0xde, 0xad, 0xbe]),
            ],
        );
    }

    #[test]
    fn dynamic_types_roundtrip() {
        roundtrip(
            &[ParamKind::String, ParamKind::Bytes],
            &[
                Value::from("hawser"),
                Value::Bytes(vec![0x00, 0x01, 0x02, 0x03]),
            ],
        );
        roundtrip(&[ParamKind::Bytes], &[Value::Bytes(vec![])]);
        roundtrip(&[ParamKind::String], &[Value::from("")]);
    }

    #[test]
    fn nested_composites_roundtrip() {
        let inner = ParamKind::Tuple(vec![
            ("who".into(), ParamKind::Address),
            ("tag".into(), ParamKind::FixedBytes(3)),
        ]);
        let kinds = vec![
            ParamKind::Uint(256),
            ParamKind::String,
            inner,
            ParamKind::Array(Box::new(ParamKind::FixedArray(
                Box::new(ParamKind::Uint(8)),
                2,
            ))),
            ParamKind::Bytes,
        ];
        let values = vec![
            Value::from(42u64),
            Value::from("head-tail"),
            Value::Tuple(vec![
                Value::Address(H160::repeat_byte(0x22)),
                Value::FixedBytes(vec![1, 2, 3]),
            ]),
            Value::Array(vec![
                Value::FixedArray(vec![Value::from(1u64), Value::from(2u64)]),
                Value::FixedArray(vec![Value::from(3u64), Value::from(4u64)]),
            ]),
            Value::Bytes(vec![0xff; 33]),
        ];
        roundtrip(&kinds, &values);
    }

    #[test]
    fn dynamic_tuples_nest_as_their_own_blocks() {
        let entry = ParamKind::Tuple(vec![
            ("label".into(), ParamKind::String),
            ("weight".into(), ParamKind::Uint(32)),
        ]);
        let kinds = vec![ParamKind::Array(Box::new(entry))];
        let values = vec![Value::Array(vec![
            Value::Tuple(vec![Value::from("a"), Value::from(1u64)]),
            Value::Tuple(vec![Value::from("bb"), Value::from(2u64)]),
        ])];
        roundtrip(&kinds, &values);
    }

    #[test]
    fn empty_tuple_encodes_to_empty_buffer() {
        assert!(encode(&[], &[]).unwrap().is_empty());
        assert_eq!(decode(&[], b"").unwrap(), Vec::<Value>::new());
    }
}
