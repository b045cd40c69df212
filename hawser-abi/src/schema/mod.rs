//! The parsed contract schema.
//!
//! An [`Abi`] is built once from the JSON descriptor the compiler emits
//! and is immutable afterwards, so it can be shared freely behind an
//! `Arc`. Functions and events are kept both by name (in declaration
//! order, preserving overloads) and by their computed selector / topic-0
//! fingerprint.

pub use errors::ErrorDecl;
pub use event::{DecodedLog, Event, LogParam};
pub use function::{Constructor, Function, StateMutability};
pub use param::Param;

mod errors;
mod event;
mod function;
mod param;

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::str::FromStr;

use hawser_core::H256;
use serde::Deserialize;

use crate::{AbiError, AbiResult, ParamKind, Selector};

/// One entry of the JSON descriptor, before semantic checking.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Option<Vec<RawParam>>,
    #[serde(default)]
    outputs: Option<Vec<RawParam>>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
    #[serde(default)]
    anonymous: Option<bool>,
    // Legacy flags from descriptors predating `stateMutability`.
    #[serde(default)]
    constant: Option<bool>,
    #[serde(default)]
    payable: Option<bool>,
}

/// A parameter entry. `internalType` is accepted and ignored.
#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    components: Option<Vec<RawParam>>,
    #[serde(default)]
    indexed: Option<bool>,
}

/// A contract's parsed interface: functions, events and errors with their
/// computed fingerprints. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    /// Constructor descriptor, when declared.
    pub constructor: Option<Constructor>,
    /// Whether the contract declares a receive function.
    pub receive: bool,
    /// Whether the contract declares a fallback function.
    pub fallback: bool,
    functions: BTreeMap<String, Vec<Function>>,
    selectors: HashMap<Selector, Function>,
    events: BTreeMap<String, Vec<Event>>,
    topics: HashMap<H256, Event>,
    errors: BTreeMap<String, ErrorDecl>,
    error_selectors: HashMap<Selector, ErrorDecl>,
}

impl Abi {
    /// Parse a JSON ABI descriptor.
    pub fn load(reader: impl Read) -> AbiResult<Self> {
        let entries: Vec<RawEntry> =
            serde_json::from_reader(reader).map_err(|err| AbiError::MalformedAbi {
                reason: err.to_string(),
            })?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<RawEntry>) -> AbiResult<Self> {
        let mut abi = Abi::default();
        for entry in entries {
            match entry.kind.as_str() {
                "function" => abi.add_function(entry)?,
                "event" => abi.add_event(entry)?,
                "error" => abi.add_error(entry)?,
                "constructor" => {
                    if entry.outputs.as_ref().is_some_and(|o| !o.is_empty()) {
                        return Err(AbiError::MalformedAbi {
                            reason: "constructor with outputs".to_owned(),
                        });
                    }
                    abi.constructor = Some(Constructor {
                        inputs: convert_params(entry.inputs, "constructor", false)?,
                    });
                }
                "fallback" => abi.fallback = true,
                "receive" => abi.receive = true,
                other => {
                    return Err(AbiError::UnknownAbiEntry {
                        kind: other.to_owned(),
                    })
                }
            }
        }
        Ok(abi)
    }

    fn add_function(&mut self, entry: RawEntry) -> AbiResult<()> {
        let name = entry.name.ok_or_else(|| AbiError::MalformedAbi {
            reason: "function entry without a name".to_owned(),
        })?;
        let state_mutability = match entry.state_mutability {
            Some(value) => StateMutability::parse(&value)?,
            None => StateMutability::from_legacy_flags(
                entry.constant.unwrap_or(false),
                entry.payable.unwrap_or(false),
            ),
        };
        let function = Function {
            inputs: convert_params(entry.inputs, "function", false)?,
            outputs: convert_params(entry.outputs, "function", false)?,
            name: name.clone(),
            state_mutability,
        };
        self.selectors.insert(function.selector(), function.clone());
        self.functions.entry(name).or_default().push(function);
        Ok(())
    }

    fn add_event(&mut self, entry: RawEntry) -> AbiResult<()> {
        let name = entry.name.ok_or_else(|| AbiError::MalformedAbi {
            reason: "event entry without a name".to_owned(),
        })?;
        let anonymous = entry.anonymous.unwrap_or(false);
        let event = Event {
            inputs: convert_params(entry.inputs, "event", true)?,
            name: name.clone(),
            anonymous,
        };
        // Topic-0 occupies one of the ledger's 4 topic slots unless the
        // event is anonymous.
        let max_indexed = if anonymous { 4 } else { 3 };
        if event.indexed_count() > max_indexed {
            return Err(AbiError::MalformedAbi {
                reason: format!("event `{name}` has more than {max_indexed} indexed inputs"),
            });
        }
        if !anonymous {
            self.topics.insert(event.topic0(), event.clone());
        }
        self.events.entry(name).or_default().push(event);
        Ok(())
    }

    fn add_error(&mut self, entry: RawEntry) -> AbiResult<()> {
        let name = entry.name.ok_or_else(|| AbiError::MalformedAbi {
            reason: "error entry without a name".to_owned(),
        })?;
        let decl = ErrorDecl {
            inputs: convert_params(entry.inputs, "error", false)?,
            name: name.clone(),
        };
        self.error_selectors.insert(decl.selector(), decl.clone());
        self.errors.insert(name, decl);
        Ok(())
    }

    /// All overloads declared under `name`, in declaration order.
    pub fn function(&self, name: &str) -> Option<&[Function]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    /// The function with this exact selector.
    pub fn function_by_selector(&self, selector: Selector) -> Option<&Function> {
        self.selectors.get(&selector)
    }

    /// All events declared under `name`, in declaration order.
    pub fn event(&self, name: &str) -> Option<&[Event]> {
        self.events.get(name).map(Vec::as_slice)
    }

    /// The non-anonymous event whose signature hash is `topic0`.
    pub fn event_by_topic0(&self, topic0: H256) -> Option<&Event> {
        self.topics.get(&topic0)
    }

    /// The user-defined error declared under `name`.
    pub fn error(&self, name: &str) -> Option<&ErrorDecl> {
        self.errors.get(name)
    }

    /// The user-defined error with this exact selector.
    pub fn error_by_selector(&self, selector: Selector) -> Option<&ErrorDecl> {
        self.error_selectors.get(&selector)
    }

    /// Every declared function, overloads included.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values().flatten()
    }

    /// Every declared event.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values().flatten()
    }

    /// Every declared user-defined error.
    pub fn errors(&self) -> impl Iterator<Item = &ErrorDecl> {
        self.errors.values()
    }

    /// Declared anonymous events; they are not reachable through the
    /// topic-0 table.
    pub fn anonymous_events(&self) -> impl Iterator<Item = &Event> {
        self.events().filter(|event| event.anonymous)
    }
}

impl FromStr for Abi {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::load(s.as_bytes())
    }
}

fn convert_params(
    params: Option<Vec<RawParam>>,
    context: &str,
    allow_indexed: bool,
) -> AbiResult<Vec<Param>> {
    params
        .unwrap_or_default()
        .into_iter()
        .map(|raw| convert_param(raw, context, allow_indexed))
        .collect()
}

fn convert_param(raw: RawParam, context: &str, allow_indexed: bool) -> AbiResult<Param> {
    if raw.indexed == Some(true) && !allow_indexed {
        return Err(AbiError::MalformedAbi {
            reason: format!("indexed parameter `{}` on a {context}", raw.name),
        });
    }
    let components = match raw.components {
        Some(list) => Some(
            list.into_iter()
                .map(|component| {
                    let name = component.name.clone();
                    Ok((name, convert_param(component, context, false)?.kind))
                })
                .collect::<AbiResult<Vec<_>>>()?,
        ),
        None => None,
    };
    let indexed = raw.indexed.unwrap_or(false);
    Ok(Param {
        kind: ParamKind::parse(&raw.kind, components)?,
        name: raw.name,
        indexed,
    })
}
