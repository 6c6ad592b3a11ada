#![deny(missing_docs, unsafe_code)]

//! Crate for common types shared by the `ethbinding` runtime and the code
//! generated on top of it. Nothing in here talks to a node.

pub mod artifact;
pub mod bytecode;
pub mod errors;
pub mod registry;

pub use crate::artifact::Artifact;
pub use crate::bytecode::{link_bytecode, Bytecode};
pub use crate::registry::EventRegistry;
pub use ethabi::{self as abi, Contract as Abi};
pub use web3::types::Address;
pub use web3::types::H256 as TransactionHash;
