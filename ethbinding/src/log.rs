//! This module implements decoding of raw transaction receipt logs into named
//! event arguments.
//!
//! Logs are matched against an [`EventRegistry`] by their first topic. Logs
//! emitted by events the registry doesn't know about are skipped, while
//! known events whose data fails to decode are reported as errors.

use crate::errors::ExecutionError;
use crate::number::BigNumber;
use ethbinding_common::abi::{self, Event, ParamType, Token};
use ethbinding_common::EventRegistry;
use tracing::trace;
use web3::types::{Address, Log, H256, U256, U64};

/// A decoded event argument value.
///
/// Every integer type, including those nested in arrays and tuples, is
/// normalized to a [`BigNumber`]. Other values are kept as decoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventValue {
    /// An `address` value.
    Address(Address),
    /// A `bytesN` value, or the hash of an indexed dynamic value.
    FixedBytes(Vec<u8>),
    /// A `bytes` value.
    Bytes(Vec<u8>),
    /// An `intN` or `uintN` value.
    Number(BigNumber),
    /// A `bool` value.
    Bool(bool),
    /// A `string` value.
    String(String),
    /// A fixed or dynamically sized array.
    Array(Vec<EventValue>),
    /// A tuple.
    Tuple(Vec<EventValue>),
}

impl EventValue {
    /// Returns the number if this is a numeric value.
    pub fn as_number(&self) -> Option<&BigNumber> {
        match self {
            EventValue::Number(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the address if this is an address value.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            EventValue::Address(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<Token> for EventValue {
    fn from(token: Token) -> Self {
        match token {
            Token::Address(value) => EventValue::Address(value),
            Token::FixedBytes(value) => EventValue::FixedBytes(value),
            Token::Bytes(value) => EventValue::Bytes(value),
            Token::Uint(value) => EventValue::Number(value.into()),
            Token::Int(value) => EventValue::Number(BigNumber::from_twos_complement(value)),
            Token::Bool(value) => EventValue::Bool(value),
            Token::String(value) => EventValue::String(value),
            Token::FixedArray(tokens) | Token::Array(tokens) => {
                EventValue::Array(tokens.into_iter().map(EventValue::from).collect())
            }
            Token::Tuple(tokens) => {
                EventValue::Tuple(tokens.into_iter().map(EventValue::from).collect())
            }
        }
    }
}

/// Named event arguments in the order the event declares them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EventArgs(Vec<(String, EventValue)>);

impl EventArgs {
    /// Retrieves the value of the first parameter with the given name.
    pub fn get(&self, name: &str) -> Option<&EventValue> {
        self.0
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// Iterates over the parameter names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates over the parameter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the event has no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for EventArgs {
    type Item = (String, EventValue);
    type IntoIter = std::vec::IntoIter<(String, EventValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A receipt log decoded into a named event. The raw topics and data are
/// replaced by `event` and `args`; the remaining log metadata is kept.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedLog {
    /// The name of the event.
    pub event: String,
    /// The decoded event arguments.
    pub args: EventArgs,
    /// The address of the contract that emitted the log.
    pub address: Address,
    /// The hash of the block where the log was produced.
    pub block_hash: Option<H256>,
    /// The number of the block where the log was produced.
    pub block_number: Option<U64>,
    /// The hash of the transaction this log belongs to.
    pub transaction_hash: Option<H256>,
    /// The block index of the transaction this log belongs to.
    pub transaction_index: Option<U64>,
    /// The index of the log in the block.
    pub log_index: Option<U256>,
    /// The log index in the transaction this log belongs to. This property is
    /// non-standard.
    pub transaction_log_index: Option<U256>,
    /// The log type. Note that this property is non-standard but is supported
    /// by Parity nodes.
    pub log_type: Option<String>,
    /// Whether the log was removed by a re-org.
    pub removed: Option<bool>,
}

/// Decodes the logs of a transaction receipt.
///
/// Logs whose first topic is not a registered event signature are dropped.
/// An error decoding a registered event aborts the whole batch.
pub fn decode_logs(
    registry: &EventRegistry,
    logs: &[Log],
) -> Result<Vec<DecodedLog>, ExecutionError> {
    let mut decoded = Vec::with_capacity(logs.len());
    for log in logs {
        let event = match log.topics.first().and_then(|topic| registry.get(topic)) {
            Some(event) => event,
            None => {
                trace!(address = ?log.address, topic = ?log.topics.first(), "skipping unrecognized log");
                continue;
            }
        };
        decoded.push(decode_log(event, log)?);
    }
    Ok(decoded)
}

/// Decodes a single log emitted by a known event.
pub fn decode_log(event: &Event, log: &Log) -> Result<DecodedLog, ExecutionError> {
    let args = decode_args(event, &log.topics, &log.data.0)?;

    Ok(DecodedLog {
        event: event.name.clone(),
        args,
        address: log.address,
        block_hash: log.block_hash,
        block_number: log.block_number,
        transaction_hash: log.transaction_hash,
        transaction_index: log.transaction_index,
        log_index: log.log_index,
        transaction_log_index: log.transaction_log_index,
        log_type: log.log_type.clone(),
        removed: log.removed,
    })
}

/// Decodes indexed arguments from topics and the rest from data, and
/// reassembles them in declaration order.
fn decode_args(event: &Event, topics: &[H256], data: &[u8]) -> Result<EventArgs, ExecutionError> {
    let (indexed, non_indexed): (Vec<_>, Vec<_>) =
        event.inputs.iter().partition(|input| input.indexed);

    let arg_topics = if event.anonymous {
        topics
    } else {
        topics.get(1..).unwrap_or_default()
    };
    let indexed_data = arg_topics
        .iter()
        .flat_map(|topic| topic.as_bytes())
        .copied()
        .collect::<Vec<_>>();

    let indexed_types = indexed
        .iter()
        .map(|input| topic_param_type(&input.kind))
        .collect::<Vec<_>>();
    let non_indexed_types = non_indexed
        .iter()
        .map(|input| input.kind.clone())
        .collect::<Vec<_>>();

    let mut indexed_values = abi::decode(&indexed_types, &indexed_data)?.into_iter();
    let mut non_indexed_values = abi::decode(&non_indexed_types, data)?.into_iter();

    let args = event
        .inputs
        .iter()
        .map(|input| {
            let value = if input.indexed {
                indexed_values.next()
            } else {
                non_indexed_values.next()
            };
            match value {
                Some(token) => Ok((input.name.clone(), EventValue::from(token))),
                None => Err(ExecutionError::MissingArgument {
                    event: event.name.clone(),
                    name: input.name.clone(),
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EventArgs(args))
}

/// Indexed values of dynamic types are stored in topics as the keccak hash
/// of their encoding.
fn topic_param_type(kind: &ParamType) -> ParamType {
    match kind {
        ParamType::String
        | ParamType::Bytes
        | ParamType::Array(_)
        | ParamType::FixedArray(_, _)
        | ParamType::Tuple(_) => ParamType::FixedBytes(32),
        _ => kind.clone(),
    }
}
