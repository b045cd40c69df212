use hawser_core::H256;

/// The result of a schema or codec operation.
pub type AbiResult<T> = Result<T, AbiError>;

/// Errors raised while parsing an ABI descriptor or moving values across
/// the wire encoding.
///
/// Decode errors carry the byte offset (relative to the buffer handed to
/// the decoder) or the parameter index at which decoding failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// A JSON entry carried an unrecognized `type` discriminator.
    #[error("unrecognized abi entry type `{kind}`")]
    UnknownAbiEntry {
        /// The offending discriminator.
        kind: String,
    },
    /// The JSON was readable but semantically inconsistent.
    #[error("malformed abi: {reason}")]
    MalformedAbi {
        /// What was inconsistent.
        reason: String,
    },
    /// An ABI type string could not be parsed.
    #[error("unparseable abi type `{type_string}`: {reason}")]
    TypeParse {
        /// The type string as it appeared in the descriptor.
        type_string: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A numeric value does not fit the declared bit width.
    #[error("value out of range for `{kind}`")]
    Overflow {
        /// Canonical name of the declared type.
        kind: String,
    },
    /// A boolean word held something other than 0 or 1.
    #[error("invalid boolean word at offset {offset}")]
    InvalidBool {
        /// Byte offset of the offending word.
        offset: usize,
    },
    /// A string payload was not valid UTF-8.
    #[error("string payload at offset {offset} is not valid utf-8")]
    InvalidUtf8 {
        /// Byte offset of the payload.
        offset: usize,
    },
    /// The input ended before the declared payload did.
    #[error("input too short: needed {needed} bytes at offset {offset}, had {available}")]
    ShortRead {
        /// Byte offset the read started at.
        offset: usize,
        /// Bytes the declared layout required.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },
    /// A dynamic-field offset escaped its enclosing region or overlapped
    /// an earlier payload.
    #[error("malformed tail: offset {offset} escapes the enclosing region")]
    MalformedTail {
        /// The offending offset value.
        offset: usize,
    },
    /// No event in the schema matches the log's topic-0.
    #[error("no event matches topic {topic:?}")]
    UnknownEvent {
        /// The unmatched topic-0 word.
        topic: H256,
    },
    /// A log's topic count does not cover the event's indexed inputs.
    #[error("event `{event}` expects {expected} topics, log carries {got}")]
    TopicMismatch {
        /// Event name.
        event: String,
        /// Topics the declaration requires.
        expected: usize,
        /// Topics the log carried.
        got: usize,
    },
    /// The caller supplied the wrong number of arguments.
    #[error("`{name}` takes {expected} argument(s), {got} supplied")]
    ArgCountMismatch {
        /// Function, constructor or error name.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },
    /// A host value is not assignable to its declared ABI type.
    #[error("argument {index} is not assignable to `{expected}`")]
    ArgTypeMismatch {
        /// Zero-based parameter index.
        index: usize,
        /// Canonical name of the declared type.
        expected: String,
    },
}

impl AbiError {
    /// Re-anchor a nested decode error's byte offset to the enclosing
    /// buffer by shifting it by `base`.
    pub(crate) fn rebase(self, base: usize) -> Self {
        match self {
            Self::InvalidBool { offset } => Self::InvalidBool {
                offset: offset + base,
            },
            Self::InvalidUtf8 { offset } => Self::InvalidUtf8 {
                offset: offset + base,
            },
            Self::ShortRead {
                offset,
                needed,
                available,
            } => Self::ShortRead {
                offset: offset + base,
                needed,
                available,
            },
            Self::MalformedTail { offset } => Self::MalformedTail {
                offset: offset + base,
            },
            other => other,
        }
    }
}
