//! Module for reading compiled contract artifacts.
//!
//! An artifact is a truffle-style JSON document holding a compiled contract's
//! ABI and its (possibly unlinked) deployment bytecode, together with the
//! addresses it was deployed at on known networks.

use crate::abi::Contract as Abi;
use crate::bytecode::Bytecode;
use crate::errors::ArtifactError;
use serde_derive::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;
use web3::types::Address;

/// Represents a compiled contract artifact.
#[derive(Clone, Debug, Deserialize)]
#[serde(default = "Artifact::empty")]
pub struct Artifact {
    /// The contract name
    #[serde(rename = "contractName")]
    pub contract_name: String,
    /// The contract ABI
    pub abi: Abi,
    /// The contract deployment bytecode.
    pub bytecode: Bytecode,
    /// The configured networks by network ID for the contract.
    pub networks: HashMap<String, Network>,
}

impl Artifact {
    /// Creates an empty artifact instance.
    pub fn empty() -> Self {
        Artifact {
            contract_name: String::new(),
            abi: Abi {
                constructor: None,
                functions: BTreeMap::new(),
                events: BTreeMap::new(),
                errors: BTreeMap::new(),
                receive: false,
                fallback: false,
            },
            bytecode: Default::default(),
            networks: HashMap::new(),
        }
    }

    /// Parse an artifact from JSON.
    pub fn from_json<S>(json: S) -> Result<Self, ArtifactError>
    where
        S: AsRef<str>,
    {
        let artifact = serde_json::from_str(json.as_ref())?;
        Ok(artifact)
    }

    /// Loads an artifact from disk.
    pub fn load<P>(path: P) -> Result<Self, ArtifactError>
    where
        P: AsRef<Path>,
    {
        let json = File::open(path)?;
        let artifact = serde_json::from_reader(json)?;
        Ok(artifact)
    }

    /// Returns the address the contract was deployed at on a network.
    pub fn address(&self, network_id: &str) -> Option<Address> {
        self.networks.get(network_id).map(|network| network.address)
    }
}

/// A contract's network configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Network {
    /// The address at which the contract is deployed on this network.
    pub address: Address,
}
