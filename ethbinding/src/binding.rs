//! The runtime state shared by all methods of a generated contract binding.
//!
//! A [`ContractBinding`] owns the contract's event registry, the class level
//! transaction option defaults and the synchronization parameters, together
//! with the provider and clock they are used with. It is immutable once
//! built, so any number of concurrent invocations may share it.

use crate::clock::{Clock, SystemClock};
use crate::config::BindingConfig;
use crate::errors::ExecutionError;
use crate::log::{self, DecodedLog};
use crate::options::{split_options, TransactionOptions};
use crate::provider::Provider;
use crate::transaction::{CallWrapper, ConfirmWrapper, SyncParams};
use ethbinding_common::{Abi, Artifact, Bytecode, EventRegistry};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use web3::types::Log;

/// Runtime support for a contract's generated methods.
#[derive(Clone, Debug)]
pub struct ContractBinding<P, C = SystemClock> {
    contract_name: String,
    abi: Abi,
    registry: EventRegistry,
    bytecode: Bytecode,
    defaults: TransactionOptions,
    network_id: Option<String>,
    sync: SyncParams,
    provider: P,
    clock: C,
}

impl<P: Provider> ContractBinding<P> {
    /// Creates a binding for a contract ABI with default settings.
    pub fn new(abi: Abi, provider: P) -> Self {
        ContractBinding {
            contract_name: String::new(),
            registry: EventRegistry::from_abi(&abi),
            abi,
            bytecode: Bytecode::default(),
            defaults: TransactionOptions::new(),
            network_id: None,
            sync: SyncParams::default(),
            provider,
            clock: SystemClock,
        }
    }

    /// Creates a binding from a compiled contract artifact.
    pub fn from_artifact(artifact: Artifact, provider: P) -> Self {
        let mut binding = Self::new(artifact.abi, provider);
        binding.contract_name = artifact.contract_name;
        binding.bytecode = artifact.bytecode;
        binding
    }
}

impl<P, C> ContractBinding<P, C> {
    /// Replaces the clock used for synchronization timeouts and poll delays.
    pub fn with_clock<K: Clock>(self, clock: K) -> ContractBinding<P, K> {
        ContractBinding {
            contract_name: self.contract_name,
            abi: self.abi,
            registry: self.registry,
            bytecode: self.bytecode,
            defaults: self.defaults,
            network_id: self.network_id,
            sync: self.sync,
            provider: self.provider,
            clock,
        }
    }

    /// Applies loaded configuration, replacing the defaults, expected network
    /// and synchronization parameters.
    pub fn with_config(mut self, config: &BindingConfig) -> Self {
        self.defaults = config.class_defaults.clone();
        self.network_id = config.network_id.clone();
        self.sync = config.sync_params();
        self
    }

    /// Sets the transaction options applied to every call before per-call
    /// overrides.
    pub fn class_defaults(mut self, defaults: TransactionOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the expected network id. Invocations fail with
    /// [`ExecutionError::NetworkMismatch`] if the provider reports another.
    pub fn network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    /// Sets how long to wait for a transaction receipt, `None` waits forever.
    pub fn synchronization_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.sync.timeout = timeout;
        self
    }

    /// Sets the delay between transaction receipt queries.
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.sync.poll_interval = poll_interval;
        self
    }

    /// The contract name, empty when built from a bare ABI.
    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// The contract ABI.
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// The contract's event signature registry.
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// The contract's unlinked deployment bytecode.
    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    /// Returns the deployment bytecode with the given libraries linked.
    pub fn link_bytecode<I, S, A>(&self, links: I) -> Bytecode
    where
        I: IntoIterator<Item = (S, A)>,
        S: AsRef<str>,
        A: AsRef<str>,
    {
        self.bytecode.link(links)
    }

    /// The class level transaction option defaults.
    pub fn defaults(&self) -> &TransactionOptions {
        &self.defaults
    }

    /// The expected network id, if any.
    pub fn expected_network_id(&self) -> Option<&str> {
        self.network_id.as_deref()
    }

    /// The transaction synchronization parameters.
    pub fn sync_params(&self) -> SyncParams {
        self.sync
    }

    /// The provider used for chain queries.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The clock used for synchronization.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Decodes receipt logs emitted by this contract's events.
    pub fn decode_logs(&self, logs: &[Log]) -> Result<Vec<DecodedLog>, ExecutionError> {
        log::decode_logs(&self.registry, logs)
    }

    /// Splits the trailing options off positional call arguments and layers
    /// them over the class defaults.
    pub(crate) fn split_call_args(&self, args: Vec<Value>) -> (Vec<Value>, TransactionOptions) {
        let (args, options) = split_options(args);
        (args, self.defaults.merged_with(&options))
    }
}

impl<P, C> ContractBinding<P, C>
where
    P: Provider,
    C: Clock,
{
    /// Waits for the provider to be ready and returns its network id.
    pub async fn ensure_network(&self) -> Result<String, ExecutionError> {
        let actual = self.provider.network_id().await?;
        debug!(network = %actual, "detected network");

        match &self.network_id {
            Some(expected) if *expected != actual => Err(ExecutionError::NetworkMismatch {
                expected: expected.clone(),
                actual,
            }),
            _ => Ok(actual),
        }
    }

    /// Wraps a call primitive so it merges transaction options with the
    /// class defaults and waits for the network before being invoked.
    pub fn wrap_call<F>(&self, primitive: F) -> CallWrapper<'_, P, C, F> {
        CallWrapper::new(self, primitive)
    }

    /// Wraps a send primitive so it additionally waits for the transaction to
    /// be mined and decodes its logs.
    pub fn wrap_and_confirm<F>(&self, primitive: F) -> ConfirmWrapper<'_, P, C, F> {
        ConfirmWrapper::new(self, primitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::BigNumber;
    use crate::test::prelude::*;
    use ethbinding_common::abi::{self, Token};
    use futures::future;
    use std::sync::{Arc, Mutex};
    use web3::types::{Address, H256};

    const ARTIFACT: &str = r#"{
        "contractName": "MetaCoin",
        "abi": [
            {
                "type": "event",
                "name": "Transfer",
                "anonymous": false,
                "inputs": [
                    { "name": "from", "type": "address", "indexed": true },
                    { "name": "to", "type": "address", "indexed": true },
                    { "name": "value", "type": "uint256", "indexed": false }
                ]
            }
        ],
        "bytecode": "0x6060__ConvertLib__________________________6060"
    }"#;

    fn metacoin(web3: Web3<TestTransport>) -> ContractBinding<Web3<TestTransport>, MockClock> {
        let artifact = Artifact::from_json(ARTIFACT).unwrap();
        ContractBinding::from_artifact(artifact, web3).with_clock(MockClock::new())
    }

    fn topic(address: Address) -> H256 {
        let mut topic = H256::zero();
        topic.as_bytes_mut()[12..].copy_from_slice(address.as_bytes());
        topic
    }

    fn transfer_log(signature: H256, from: Address, to: Address, value: u64) -> Value {
        json!({
            "address": Address::repeat_byte(0xca),
            "topics": [signature, topic(from), topic(to)],
            "data": web3::types::Bytes(abi::encode(&[Token::Uint(value.into())])),
            "blockNumber": "0x2",
            "logIndex": "0x0",
        })
    }

    #[test]
    fn from_artifact() {
        let binding = metacoin(Web3::new(TestTransport::new()));

        assert_eq!(binding.contract_name(), "MetaCoin");
        assert_eq!(binding.registry().len(), 1);
        assert_eq!(
            binding
                .link_bytecode(vec![(
                    "ConvertLib",
                    "0x000102030405060708090A0B0C0D0E0F10111213"
                )])
                .as_str(),
            "6060000102030405060708090a0b0c0d0e0f101112136060"
        );
        assert_eq!(binding.sync_params(), SyncParams::default());
    }

    #[test]
    fn ensure_network_checks_expected_network() {
        let mut transport = TestTransport::new();
        let binding = metacoin(Web3::new(transport.clone())).network_id("42");

        transport.add_response(json!("42"));
        assert_eq!(binding.ensure_network().immediate().unwrap(), "42");

        transport.add_response(json!("1"));
        match binding.ensure_network().immediate() {
            Err(ExecutionError::NetworkMismatch { expected, actual }) => {
                assert_eq!(expected, "42");
                assert_eq!(actual, "1");
            }
            other => panic!("expected network mismatch but got {:?}", other),
        }
    }

    #[test]
    fn confirm_decodes_receipt_logs() {
        let mut transport = TestTransport::new();
        let binding = metacoin(Web3::new(transport.clone()))
            .class_defaults(TransactionOptions::new().with("from", "0x01"));
        let signature = binding.abi().event("Transfer").unwrap().signature();

        let sent = Arc::new(Mutex::new(Vec::new()));
        let hash = H256::repeat_byte(0xab);
        let wrapped = binding.wrap_and_confirm({
            let sent = sent.clone();
            move |args: Vec<Value>, options: TransactionOptions| {
                sent.lock().unwrap().push((args, options));
                future::ok::<_, ExecutionError>(hash)
            }
        });

        let from = Address::repeat_byte(0x01);
        let to = Address::repeat_byte(0x02);
        transport.add_response(json!("1"));
        transport.add_response(json!(null));
        transport.add_response(receipt_json(
            hash,
            json!([
                transfer_log(signature, from, to, 10),
                {
                    "address": Address::repeat_byte(0xcb),
                    "topics": [H256::repeat_byte(0x77)],
                    "data": "0x",
                },
            ]),
        ));

        let confirmation = wrapped
            .send(vec![json!(to), json!(10), json!({ "gas": 50000 })])
            .immediate()
            .expect("transaction failed");

        assert_eq!(confirmation.tx, hash);
        assert_eq!(confirmation.receipt.transaction_hash, hash);
        assert_eq!(confirmation.logs.len(), 1);
        assert_eq!(confirmation.logs[0].event, "Transfer");
        assert_eq!(
            confirmation.logs[0].args.get("value").and_then(|value| value.as_number()),
            Some(&BigNumber::from(10u64))
        );
        assert_eq!(binding.clock().delays(), vec![Duration::from_secs(1)]);

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].0, [json!(to), json!(10)]);
        assert_eq!(
            Value::from(sent[0].1.clone()),
            json!({ "from": "0x01", "gas": 50000 })
        );

        transport.assert_request("net_version", &[]);
        transport.assert_request("eth_getTransactionReceipt", &[json!(hash)]);
        transport.assert_request("eth_getTransactionReceipt", &[json!(hash)]);
        transport.assert_no_more_requests();
    }

    #[test]
    fn send_error_skips_polling() {
        let mut transport = TestTransport::new();
        let binding = metacoin(Web3::new(transport.clone()));

        let wrapped = binding.wrap_and_confirm(|_: Vec<Value>, _: TransactionOptions| {
            future::err::<H256, _>(ExecutionError::Web3(web3::Error::Unreachable))
        });

        transport.add_response(json!("1"));
        let result = wrapped.send(Vec::new()).immediate();

        assert!(matches!(result, Err(ExecutionError::Web3(_))));
        transport.assert_request("net_version", &[]);
        transport.assert_no_more_requests();
    }

    #[test]
    fn malformed_receipt_log_fails_confirmation() {
        let mut transport = TestTransport::new();
        let binding = metacoin(Web3::new(transport.clone()));
        let signature = binding.abi().event("Transfer").unwrap().signature();

        let hash = H256::repeat_byte(0xab);
        let wrapped = binding.wrap_and_confirm(move |_: Vec<Value>, _: TransactionOptions| {
            future::ok::<_, ExecutionError>(hash)
        });

        transport.add_response(json!("1"));
        transport.add_response(receipt_json(
            hash,
            json!([{
                "address": Address::zero(),
                "topics": [signature],
                "data": "0x",
            }]),
        ));

        let result = wrapped.send(Vec::new()).immediate();
        assert!(matches!(result, Err(ExecutionError::Abi(_))));
    }

    #[tokio::test]
    async fn concurrent_invocations_are_independent() {
        let mut transport = TestTransport::new();
        let binding = metacoin(Web3::new(transport.clone()));

        let wrapped = binding.wrap_call(|args: Vec<Value>, _: TransactionOptions| {
            future::ok::<_, ExecutionError>(args.len())
        });

        transport.add_response(json!("1"));
        transport.add_response(json!("1"));
        let (first, second) = futures::join!(
            wrapped.call(vec![json!(1)]),
            wrapped.call(vec![json!(1), json!(2)]),
        );

        assert_eq!(first.unwrap(), 1);
        assert_eq!(second.unwrap(), 2);
    }
}
