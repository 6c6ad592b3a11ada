//! Module with common error types.

use ethbinding_common::abi::Error as AbiError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;
use std::time::Duration;
use thiserror::Error;
use web3::error::Error as Web3Error;
use web3::types::H256;

pub use crate::number::ParseBigNumberError;
pub use ethbinding_common::errors::*;

/// Error that can occur while executing a contract call or transaction, or
/// while decoding the logs it produced.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// An error occured while performing a web3 call.
    #[error("web3 error: {0}")]
    Web3(#[from] Web3Error),

    /// Log data for a known event could not be ABI decoded.
    #[error("abi decode error: {0}")]
    Abi(#[from] AbiError),

    /// A declared event parameter was not produced by decoding.
    #[error("event {event} is missing a value for parameter '{name}'")]
    MissingArgument {
        /// The event name.
        event: String,
        /// The parameter name.
        name: String,
    },

    /// The provider is connected to a different network than the binding
    /// was configured for.
    #[error("binding expects network {expected} but provider is on network {actual}")]
    NetworkMismatch {
        /// The configured network id.
        expected: String,
        /// The network id reported by the provider.
        actual: String,
    },

    /// No receipt was observed for a transaction before the synchronization
    /// timeout elapsed.
    #[error("transaction {tx:?} wasn't processed in {} seconds", .elapsed.as_secs())]
    SyncTimeout {
        /// The hash of the transaction that was being waited on.
        tx: H256,
        /// The time spent polling for the receipt.
        elapsed: Duration,
    },
}

/// An error loading binding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An IO error occurred when reading a configuration file.
    #[error("failed to open configuration file: {0}")]
    Io(#[from] IoError),

    /// A JSON error occurred while parsing configuration.
    #[error("failed to parse configuration JSON: {0}")]
    Json(#[from] JsonError),
}
