//! Transaction options and their layered composition.
//!
//! Options are an open mapping of send parameters (`from`, `gas`, `value`,
//! ...) that is handed to the underlying send or call primitive untouched.
//! Bindings carry class level defaults that per-call options override key by
//! key.

use crate::classify::is_transaction_options;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shallow merges mappings left to right into a new mapping.
///
/// Keys are visited in argument order and, within each mapping, in insertion
/// order. A later value replaces an earlier one for the same key. Nested
/// values are never merged.
pub fn merge<'a, I>(mappings: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut merged = Map::new();
    for mapping in mappings {
        for (key, value) in mapping {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Protocol level send parameters for a contract call or transaction.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransactionOptions(Map<String, Value>);

impl TransactionOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        TransactionOptions::default()
    }

    /// Sets an option, returning the updated options.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Sets an option, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Retrieves an option by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the number of options set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns new options with `overrides` layered on top of these.
    pub fn merged_with(&self, overrides: &TransactionOptions) -> TransactionOptions {
        TransactionOptions(merge([&self.0, &overrides.0]))
    }

    /// Returns the underlying mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for TransactionOptions {
    fn from(map: Map<String, Value>) -> Self {
        TransactionOptions(map)
    }
}

impl From<TransactionOptions> for Value {
    fn from(options: TransactionOptions) -> Self {
        Value::Object(options.0)
    }
}

/// Splits the trailing transaction options off positional call arguments.
///
/// The last argument is taken as options only if it is a plain object that
/// is not a big number; otherwise all arguments are call data and the
/// returned options are empty.
pub fn split_options(mut args: Vec<Value>) -> (Vec<Value>, TransactionOptions) {
    if args.last().map(is_transaction_options).unwrap_or(false) {
        if let Some(Value::Object(options)) = args.pop() {
            return (args, options.into());
        }
    }
    (args, TransactionOptions::new())
}
