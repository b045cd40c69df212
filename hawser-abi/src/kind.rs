use std::fmt;

use crate::{AbiError, AbiResult};

/// An ABI wire type.
///
/// The canonical textual form (the one selectors and topic hashes are
/// computed over) is produced by the `Display` impl: `uint256`, `t[]`,
/// `t[k]`, tuples as parenthesized component lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint(usize),
    /// Two's-complement signed integer of the given bit width.
    Int(usize),
    /// 20-byte account address.
    Address,
    /// Boolean, one word on the wire.
    Bool,
    /// Fixed byte string of 1..=32 bytes, left-justified in its word.
    FixedBytes(usize),
    /// Dynamically sized byte string.
    Bytes,
    /// Dynamically sized UTF-8 string.
    String,
    /// Fixed-length array of a homogeneous element type.
    FixedArray(Box<ParamKind>, usize),
    /// Dynamically sized array of a homogeneous element type.
    Array(Box<ParamKind>),
    /// Ordered list of named heterogeneous fields.
    Tuple(Vec<(String, ParamKind)>),
}

impl ParamKind {
    /// Whether values of this type live in the tail of a head-tail layout.
    ///
    /// Computable from the type alone: a type is static iff it is a
    /// fixed-width primitive, a fixed array of a static element, or a
    /// tuple of only static fields.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamKind::Bytes | ParamKind::String | ParamKind::Array(_) => true,
            ParamKind::FixedArray(element, _) => element.is_dynamic(),
            ParamKind::Tuple(fields) => fields.iter().any(|(_, kind)| kind.is_dynamic()),
            _ => false,
        }
    }

    /// Number of 32-byte words a static value of this type occupies when
    /// embedded directly in a head region. Meaningless for dynamic types.
    pub(crate) fn static_word_count(&self) -> usize {
        match self {
            ParamKind::FixedArray(element, len) => len * element.static_word_count(),
            ParamKind::Tuple(fields) => fields
                .iter()
                .map(|(_, kind)| kind.static_word_count())
                .sum(),
            _ => 1,
        }
    }

    /// Width a field of this type contributes to its enclosing head
    /// region: one offset word when dynamic, the full flattened width
    /// when static.
    pub(crate) fn head_width(&self) -> usize {
        if self.is_dynamic() {
            32
        } else {
            32 * self.static_word_count()
        }
    }

    /// Parse an ABI type string such as `uint256`, `bytes32[4][]` or
    /// `tuple[2]`. Tuple base types take their field list from
    /// `components`, already converted by the schema parser.
    pub(crate) fn parse(
        type_string: &str,
        components: Option<Vec<(String, ParamKind)>>,
    ) -> AbiResult<ParamKind> {
        let (base, suffixes) = match type_string.find('[') {
            Some(split) => (&type_string[..split], &type_string[split..]),
            None => (type_string, ""),
        };

        let mut kind = Self::parse_base(type_string, base, components)?;
        for suffix in parse_suffixes(type_string, suffixes)? {
            kind = match suffix {
                Some(len) => ParamKind::FixedArray(Box::new(kind), len),
                None => ParamKind::Array(Box::new(kind)),
            };
        }
        Ok(kind)
    }

    fn parse_base(
        type_string: &str,
        base: &str,
        components: Option<Vec<(String, ParamKind)>>,
    ) -> AbiResult<ParamKind> {
        let err = |reason| AbiError::TypeParse {
            type_string: type_string.to_owned(),
            reason,
        };

        Ok(match base {
            "address" => ParamKind::Address,
            "bool" => ParamKind::Bool,
            "string" => ParamKind::String,
            "bytes" => ParamKind::Bytes,
            "tuple" => {
                ParamKind::Tuple(components.ok_or_else(|| err("tuple type without components"))?)
            }
            "function" => return Err(err("function types are not supported")),
            _ if base.starts_with("ufixed") || base.starts_with("fixed") => {
                return Err(err("fixed-point types are not supported"))
            }
            _ if base.starts_with("bytes") => {
                let width: usize = base["bytes".len()..]
                    .parse()
                    .map_err(|_| err("malformed bytes width"))?;
                if !(1..=32).contains(&width) {
                    return Err(err("bytes width must be 1..=32"));
                }
                ParamKind::FixedBytes(width)
            }
            _ if base.starts_with("uint") => ParamKind::Uint(parse_bits(type_string, &base[4..])?),
            _ if base.starts_with("int") => ParamKind::Int(parse_bits(type_string, &base[3..])?),
            _ => return Err(err("unknown elementary type")),
        })
    }
}

/// Bit width of an integer type. An empty width means 256, matching the
/// descriptor shorthand `uint` / `int`.
fn parse_bits(type_string: &str, width: &str) -> AbiResult<usize> {
    let err = |reason| AbiError::TypeParse {
        type_string: type_string.to_owned(),
        reason,
    };

    if width.is_empty() {
        return Ok(256);
    }
    let bits: usize = width.parse().map_err(|_| err("malformed integer width"))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(err("integer width must be a multiple of 8 in 8..=256"));
    }
    Ok(bits)
}

/// Split `[3][]`-style array suffixes, innermost first.
fn parse_suffixes(type_string: &str, mut suffixes: &str) -> AbiResult<Vec<Option<usize>>> {
    let err = |reason| AbiError::TypeParse {
        type_string: type_string.to_owned(),
        reason,
    };

    let mut parsed = Vec::new();
    while !suffixes.is_empty() {
        if !suffixes.starts_with('[') {
            return Err(err("malformed array suffix"));
        }
        let close = suffixes.find(']').ok_or_else(|| err("unclosed array suffix"))?;
        let inner = &suffixes[1..close];
        if inner.is_empty() {
            parsed.push(None);
        } else {
            let len: usize = inner.parse().map_err(|_| err("malformed array length"))?;
            if len == 0 {
                return Err(err("zero-length array"));
            }
            parsed.push(Some(len));
        }
        suffixes = &suffixes[close + 1..];
    }
    Ok(parsed)
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Uint(bits) => write!(f, "uint{bits}"),
            ParamKind::Int(bits) => write!(f, "int{bits}"),
            ParamKind::Address => f.write_str("address"),
            ParamKind::Bool => f.write_str("bool"),
            ParamKind::FixedBytes(width) => write!(f, "bytes{width}"),
            ParamKind::Bytes => f.write_str("bytes"),
            ParamKind::String => f.write_str("string"),
            ParamKind::FixedArray(element, len) => write!(f, "{element}[{len}]"),
            ParamKind::Array(element) => write!(f, "{element}[]"),
            ParamKind::Tuple(fields) => {
                f.write_str("(")?;
                for (i, (_, kind)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{kind}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ParamKind {
        ParamKind::parse(s, None).unwrap()
    }

    #[test]
    fn parses_elementary_types() {
        assert_eq!(parse("uint256"), ParamKind::Uint(256));
        assert_eq!(parse("uint8"), ParamKind::Uint(8));
        assert_eq!(parse("int48"), ParamKind::Int(48));
        assert_eq!(parse("address"), ParamKind::Address);
        assert_eq!(parse("bool"), ParamKind::Bool);
        assert_eq!(parse("bytes32"), ParamKind::FixedBytes(32));
        assert_eq!(parse("bytes"), ParamKind::Bytes);
        assert_eq!(parse("string"), ParamKind::String);
    }

    #[test]
    fn bare_integer_widths_default_to_256() {
        assert_eq!(parse("uint"), ParamKind::Uint(256));
        assert_eq!(parse("int"), ParamKind::Int(256));
    }

    #[test]
    fn parses_array_suffixes_inner_first() {
        assert_eq!(
            parse("uint256[3][]"),
            ParamKind::Array(Box::new(ParamKind::FixedArray(
                Box::new(ParamKind::Uint(256)),
                3
            )))
        );
        assert_eq!(
            parse("bytes[2]"),
            ParamKind::FixedArray(Box::new(ParamKind::Bytes), 2)
        );
    }

    #[test]
    fn rejects_unsupported_types() {
        assert!(ParamKind::parse("fixed128x18", None).is_err());
        assert!(ParamKind::parse("uint7", None).is_err());
        assert!(ParamKind::parse("bytes33", None).is_err());
        assert!(ParamKind::parse("uint256[0]", None).is_err());
        assert!(ParamKind::parse("horse", None).is_err());
        assert!(ParamKind::parse("tuple", None).is_err());
    }

    #[test]
    fn canonical_rendering() {
        assert_eq!(parse("uint").to_string(), "uint256");
        assert_eq!(parse("uint8[4][]").to_string(), "uint8[4][]");
        let pair = ParamKind::Tuple(vec![
            ("a".into(), ParamKind::Address),
            ("b".into(), ParamKind::Uint(96)),
        ]);
        assert_eq!(pair.to_string(), "(address,uint96)");
        assert_eq!(
            ParamKind::Array(Box::new(pair)).to_string(),
            "(address,uint96)[]"
        );
    }

    #[test]
    fn dynamic_ness_is_structural() {
        assert!(!parse("uint256").is_dynamic());
        assert!(!parse("bytes32").is_dynamic());
        assert!(parse("bytes").is_dynamic());
        assert!(parse("string").is_dynamic());
        assert!(parse("uint256[]").is_dynamic());
        assert!(!parse("uint256[4]").is_dynamic());
        assert!(parse("string[4]").is_dynamic());

        let static_tuple = ParamKind::Tuple(vec![("x".into(), ParamKind::Bool)]);
        let dynamic_tuple = ParamKind::Tuple(vec![("s".into(), ParamKind::String)]);
        assert!(!static_tuple.is_dynamic());
        assert!(dynamic_tuple.is_dynamic());
    }

    #[test]
    fn static_widths_flatten_recursively() {
        assert_eq!(parse("uint256").head_width(), 32);
        assert_eq!(parse("uint8[4]").head_width(), 128);
        let pair = ParamKind::Tuple(vec![
            ("a".into(), ParamKind::Address),
            ("b".into(), ParamKind::FixedArray(Box::new(ParamKind::Bool), 2)),
        ]);
        assert_eq!(pair.head_width(), 96);
        // A dynamic field always contributes a single offset word.
        assert_eq!(parse("uint256[]").head_width(), 32);
    }
}
