use hawser_core::{LogMeta, RawLog, H256};

use crate::schema::function::render_kinds;
use crate::util::keccak256;
use crate::{codec, AbiError, AbiResult, Param, ParamKind, Value};

/// An event the contract can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name as declared.
    pub name: String,
    /// Inputs in declaration order, indexed and non-indexed interleaved.
    pub inputs: Vec<Param>,
    /// Anonymous events do not place their signature hash in topic-0;
    /// only their indexed parameters are filterable.
    pub anonymous: bool,
}

impl Event {
    /// Canonical signature over all inputs in declaration order.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, render_kinds(&self.inputs))
    }

    /// Keccak-256 hash of the canonical signature; emitted as topic-0 for
    /// non-anonymous events.
    pub fn topic0(&self) -> H256 {
        keccak256(self.signature().as_bytes())
    }

    /// Number of indexed inputs, i.e. topics the event consumes beyond
    /// topic-0.
    pub fn indexed_count(&self) -> usize {
        self.inputs.iter().filter(|param| param.indexed).count()
    }

    /// Decode a raw log against this event.
    ///
    /// Indexed inputs consume one topic each, in declaration order.
    /// Indexed values of dynamic or composite type arrive as the
    /// keccak-256 digest of the value; the original is unrecoverable
    /// from the topic and is surfaced as an opaque 32-byte word. The
    /// non-indexed inputs are tuple-decoded from the data payload. The
    /// result preserves declaration order.
    pub fn decode_log(&self, raw: &RawLog) -> AbiResult<Vec<LogParam>> {
        let expected = self.indexed_count() + usize::from(!self.anonymous);
        if raw.topics.len() != expected {
            return Err(AbiError::TopicMismatch {
                event: self.name.clone(),
                expected,
                got: raw.topics.len(),
            });
        }
        if !self.anonymous && raw.topics[0] != self.topic0() {
            return Err(AbiError::UnknownEvent {
                topic: raw.topics[0],
            });
        }

        let data_kinds: Vec<ParamKind> = self
            .inputs
            .iter()
            .filter(|param| !param.indexed)
            .map(|param| param.kind.clone())
            .collect();
        let mut data_values = codec::decode(&data_kinds, &raw.data)?.into_iter();
        let mut topics = raw.topics[usize::from(!self.anonymous)..].iter();

        let mut params = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let value = if input.indexed {
                match topics.next() {
                    Some(topic) => decode_topic(&input.kind, topic)?,
                    None => {
                        return Err(AbiError::TopicMismatch {
                            event: self.name.clone(),
                            expected,
                            got: raw.topics.len(),
                        })
                    }
                }
            } else {
                match data_values.next() {
                    Some(value) => value,
                    None => {
                        return Err(AbiError::ShortRead {
                            offset: raw.data.len(),
                            needed: 32,
                            available: 0,
                        })
                    }
                }
            };
            params.push(LogParam {
                name: input.name.clone(),
                value,
            });
        }
        Ok(params)
    }
}

/// Indexed value types decode from their topic word; everything else was
/// hashed at emission and survives only as a digest.
fn decode_topic(kind: &ParamKind, topic: &H256) -> AbiResult<Value> {
    match kind {
        ParamKind::Uint(_)
        | ParamKind::Int(_)
        | ParamKind::Address
        | ParamKind::Bool
        | ParamKind::FixedBytes(_) => {
            let (value, _) = codec::decode_value(kind, topic.as_bytes())?;
            Ok(value)
        }
        _ => Ok(Value::FixedBytes(topic.as_bytes().to_vec())),
    }
}

/// One decoded event field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogParam {
    /// Parameter name from the declaration.
    pub name: String,
    /// Decoded value.
    pub value: Value,
}

/// A log decoded into a typed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLog {
    /// Name of the matched event.
    pub event: String,
    /// Decoded fields in declaration order.
    pub params: Vec<LogParam>,
    /// True when this record retracts an earlier delivery across a reorg.
    pub retracted: bool,
    /// Position metadata of the underlying log.
    pub meta: LogMeta,
}

impl DecodedLog {
    /// Look up a decoded field by parameter name.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .map(|param| &param.value)
    }
}
