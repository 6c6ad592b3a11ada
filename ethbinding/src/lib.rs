#![deny(missing_docs, unsafe_code)]

//! Runtime support for generated Ethereum contract bindings.
//!
//! A generated binding exposes contract methods that take dynamically typed
//! positional arguments, optionally followed by a transaction options
//! object. This crate provides what those methods are built on:
//!
//! - [`ContractBinding`] holds a contract's event registry, class level
//!   transaction option defaults and synchronization settings.
//! - [`ContractBinding::wrap_call`] wraps a call primitive so the trailing
//!   options are merged over the defaults before it is invoked.
//! - [`ContractBinding::wrap_and_confirm`] wraps a send primitive so it
//!   resolves only once the transaction receipt is available, with the
//!   receipt logs decoded into named events.
//! - [`decode_logs`] decodes raw receipt logs against an event registry.
//! - [`link_bytecode`] resolves library placeholders in deployment bytecode.
//!
//! ```ignore
//! use ethbinding::{ContractBinding, TransactionOptions};
//! use serde_json::json;
//!
//! let binding = ContractBinding::from_artifact(artifact, web3.clone())
//!     .class_defaults(TransactionOptions::new().with("from", account));
//!
//! let transfer = binding.wrap_and_confirm(|args, options| send_transfer(args, options));
//! let confirmation = transfer.send(vec![json!(recipient), json!(100)]).await?;
//! for log in confirmation.logs {
//!     println!("{} {:?}", log.event, log.args);
//! }
//! ```

pub mod binding;
pub mod classify;
pub mod clock;
pub mod config;
pub mod errors;
pub mod future;
pub mod log;
pub mod number;
pub mod options;
pub mod provider;
pub mod transaction;

pub use crate::binding::ContractBinding;
pub use crate::config::BindingConfig;
pub use crate::log::{decode_logs, DecodedLog, EventArgs, EventValue};
pub use crate::number::BigNumber;
pub use crate::options::TransactionOptions;
pub use crate::transaction::{Confirmation, SyncParams};
pub use ethbinding_common as common;
pub use ethbinding_common::{link_bytecode, Abi, Artifact, Bytecode, EventRegistry};
pub use serde_json as json;
pub use web3;
