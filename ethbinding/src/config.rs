//! Binding configuration loaded from JSON.

use crate::errors::ConfigError;
use crate::options::TransactionOptions;
use crate::transaction::confirm::{
    timeout_from_millis, DEFAULT_POLL_INTERVAL, DEFAULT_SYNCHRONIZATION_TIMEOUT,
};
use crate::transaction::SyncParams;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Settings applied to a [`ContractBinding`](crate::ContractBinding).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BindingConfig {
    /// Milliseconds to wait for a transaction receipt. Zero or a negative
    /// value waits forever.
    pub synchronization_timeout: i64,
    /// Milliseconds between transaction receipt queries.
    pub poll_interval: u64,
    /// Transaction options applied to every call.
    #[serde(alias = "defaults")]
    pub class_defaults: TransactionOptions,
    /// The network the provider is expected to be connected to.
    pub network_id: Option<String>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        BindingConfig {
            synchronization_timeout: DEFAULT_SYNCHRONIZATION_TIMEOUT.as_millis() as i64,
            poll_interval: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            class_defaults: TransactionOptions::new(),
            network_id: None,
        }
    }
}

impl BindingConfig {
    /// Parse configuration from JSON.
    pub fn from_json<S>(json: S) -> Result<Self, ConfigError>
    where
        S: AsRef<str>,
    {
        let config = serde_json::from_str(json.as_ref())?;
        Ok(config)
    }

    /// Loads configuration from disk.
    pub fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let json = File::open(path)?;
        let config = serde_json::from_reader(json)?;
        Ok(config)
    }

    /// The synchronization parameters described by this configuration.
    pub fn sync_params(&self) -> SyncParams {
        SyncParams {
            timeout: timeout_from_millis(self.synchronization_timeout),
            poll_interval: Duration::from_millis(self.poll_interval),
        }
    }
}
