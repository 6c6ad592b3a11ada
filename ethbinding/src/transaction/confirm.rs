//! Transaction synchronization: polling for a receipt until a sent
//! transaction is mined or the synchronization timeout elapses.

use crate::binding::ContractBinding;
use crate::clock::Clock;
use crate::errors::ExecutionError;
use crate::log::DecodedLog;
use crate::options::TransactionOptions;
use crate::provider::Provider;
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use web3::types::{TransactionReceipt, H256};

/// The default time to wait for a transaction receipt before giving up.
pub const DEFAULT_SYNCHRONIZATION_TIMEOUT: Duration = Duration::from_millis(240_000);

/// The default delay between receipt queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Parameters for synchronizing a transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyncParams {
    /// The time after which to stop polling for a receipt, or `None` to poll
    /// until the transaction is mined.
    pub timeout: Option<Duration>,
    /// The delay between consecutive receipt queries.
    pub poll_interval: Duration,
}

impl SyncParams {
    /// Creates parameters with the default timeout and poll interval.
    pub fn new() -> Self {
        SyncParams {
            timeout: Some(DEFAULT_SYNCHRONIZATION_TIMEOUT),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Creates parameters from a timeout in milliseconds where zero or a
    /// negative value disables the timeout.
    pub fn from_timeout_millis(timeout: i64) -> Self {
        SyncParams::new().timeout(timeout_from_millis(timeout))
    }

    /// Set new value for [`timeout`].
    ///
    /// [`timeout`]: #structfield.timeout
    #[inline]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set new value for [`poll_interval`].
    ///
    /// [`poll_interval`]: #structfield.poll_interval
    #[inline]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for SyncParams {
    fn default() -> Self {
        SyncParams::new()
    }
}

/// Converts a millisecond timeout to a duration, mapping zero and negative
/// values to no timeout.
pub(crate) fn timeout_from_millis(timeout: i64) -> Option<Duration> {
    u64::try_from(timeout)
        .ok()
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
}

/// The result of a synchronized transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Confirmation {
    /// The transaction hash.
    pub tx: H256,
    /// The receipt of the mined transaction.
    pub receipt: TransactionReceipt,
    /// The receipt logs emitted by known events of the binding's contract.
    pub logs: Vec<DecodedLog>,
}

/// Waits for a transaction to be mined, returning its receipt.
///
/// The receipt is queried once immediately and then after every poll
/// interval. A provider error fails the wait right away without retrying.
pub async fn wait_for_receipt<P, C>(
    provider: &P,
    clock: &C,
    tx: H256,
    params: SyncParams,
) -> Result<TransactionReceipt, ExecutionError>
where
    P: Provider + ?Sized,
    C: Clock + ?Sized,
{
    let mut context = SyncContext {
        provider,
        clock,
        tx,
        params,
        started: clock.now(),
        attempts: 0,
    };

    loop {
        match context.check().await? {
            Check::Mined(receipt) => return Ok(receipt),
            Check::Pending => clock.delay(params.poll_interval).await,
        }
    }
}

/// The state used for waiting for a transaction receipt.
struct SyncContext<'a, P: ?Sized, C: ?Sized> {
    provider: &'a P,
    clock: &'a C,
    /// The transaction hash that is being synchronized.
    tx: H256,
    params: SyncParams,
    /// When the transaction hash was obtained. This is used for timeouts.
    started: Instant,
    attempts: usize,
}

impl<P, C> SyncContext<'_, P, C>
where
    P: Provider + ?Sized,
    C: Clock + ?Sized,
{
    /// Queries the receipt once, failing if it is missing and the timeout
    /// has elapsed.
    async fn check(&mut self) -> Result<Check, ExecutionError> {
        self.attempts += 1;
        trace!(tx = ?self.tx, attempt = self.attempts, "querying transaction receipt");

        if let Some(receipt) = self.provider.transaction_receipt(self.tx).await? {
            debug!(tx = ?self.tx, attempts = self.attempts, "transaction mined");
            return Ok(Check::Mined(receipt));
        }

        if let Some(timeout) = self.params.timeout {
            let elapsed = self.clock.now().saturating_duration_since(self.started);
            if elapsed > timeout {
                debug!(tx = ?self.tx, ?elapsed, "transaction synchronization timed out");
                return Err(ExecutionError::SyncTimeout {
                    tx: self.tx,
                    elapsed,
                });
            }
        }

        Ok(Check::Pending)
    }
}

/// The result of checking for a transaction receipt.
#[allow(clippy::large_enum_variant)]
enum Check {
    /// The transaction was mined.
    Mined(TransactionReceipt),
    /// The transaction is not mined yet and the timeout hasn't elapsed.
    Pending,
}

/// A send primitive wrapped so each invocation merges transaction options
/// with the binding's defaults and resolves once the transaction is mined.
pub struct ConfirmWrapper<'a, P, C, F> {
    binding: &'a ContractBinding<P, C>,
    primitive: F,
}

impl<'a, P, C, F> ConfirmWrapper<'a, P, C, F>
where
    P: Provider,
    C: Clock,
{
    pub(crate) fn new(binding: &'a ContractBinding<P, C>, primitive: F) -> Self {
        ConfirmWrapper { binding, primitive }
    }

    /// Sends a transaction and waits for it to be mined.
    ///
    /// A trailing transaction options argument is merged over the binding's
    /// defaults and passed to the primitive after the remaining arguments.
    /// The primitive resolves to the transaction hash, whose receipt is then
    /// polled for. The receipt logs are decoded with the binding's events.
    pub async fn send<Fut, E>(&self, args: Vec<Value>) -> Result<Confirmation, ExecutionError>
    where
        F: Fn(Vec<Value>, TransactionOptions) -> Fut,
        Fut: Future<Output = Result<H256, E>>,
        ExecutionError: From<E>,
    {
        let (args, options) = self.binding.split_call_args(args);
        self.binding.ensure_network().await?;

        let tx = (self.primitive)(args, options).await?;
        debug!(?tx, "transaction sent");

        let receipt = wait_for_receipt(
            self.binding.provider(),
            self.binding.clock(),
            tx,
            self.binding.sync_params(),
        )
        .await?;
        let logs = self.binding.decode_logs(&receipt.logs)?;

        Ok(Confirmation { tx, receipt, logs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::*;

    #[test]
    fn default_params() {
        let params = SyncParams::default();
        assert_eq!(params.timeout, Some(Duration::from_secs(240)));
        assert_eq!(params.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn timeout_millis() {
        assert_eq!(
            SyncParams::from_timeout_millis(2000).timeout,
            Some(Duration::from_secs(2))
        );
        assert_eq!(SyncParams::from_timeout_millis(0).timeout, None);
        assert_eq!(SyncParams::from_timeout_millis(-1).timeout, None);
    }

    #[test]
    fn receipt_after_pending_polls() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());
        let clock = MockClock::new();

        let hash = H256::repeat_byte(0xff);
        for _ in 0..3 {
            transport.add_response(json!(null));
        }
        transport.add_response(receipt_json(hash, json!([])));

        let receipt = wait_for_receipt(&web3, &clock, hash, SyncParams::default())
            .immediate()
            .expect("transaction synchronization failed");

        assert_eq!(receipt.transaction_hash, hash);
        for _ in 0..4 {
            transport.assert_request("eth_getTransactionReceipt", &[json!(hash)]);
        }
        transport.assert_no_more_requests();
        assert_eq!(clock.delays(), vec![Duration::from_millis(1000); 3]);
    }

    #[test]
    fn immediately_mined() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());
        let clock = MockClock::new();

        let hash = H256::repeat_byte(0x01);
        transport.add_response(receipt_json(hash, json!([])));

        let receipt = wait_for_receipt(&web3, &clock, hash, SyncParams::default())
            .immediate()
            .expect("transaction synchronization failed");

        assert_eq!(receipt.transaction_hash, hash);
        transport.assert_request("eth_getTransactionReceipt", &[json!(hash)]);
        transport.assert_no_more_requests();
        assert!(clock.delays().is_empty());
    }

    #[test]
    fn synchronization_timeout() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());
        let clock = MockClock::new();

        let hash = H256::repeat_byte(0xff);
        // polls at 0s, 1s, 2s and 3s, where only the last one is past the
        // timeout
        for _ in 0..4 {
            transport.add_response(json!(null));
        }

        let result = wait_for_receipt(
            &web3,
            &clock,
            hash,
            SyncParams::from_timeout_millis(2000),
        )
        .immediate();

        match result {
            Err(err @ ExecutionError::SyncTimeout { .. }) => {
                assert!(err.to_string().contains(&format!("{:?}", hash)));
                if let ExecutionError::SyncTimeout { tx, elapsed } = err {
                    assert_eq!(tx, hash);
                    assert!(elapsed > Duration::from_millis(2000));
                    assert!(elapsed <= Duration::from_millis(3000));
                }
            }
            other => panic!("expected synchronization to time out but got {:?}", other),
        }
        for _ in 0..4 {
            transport.assert_request("eth_getTransactionReceipt", &[json!(hash)]);
        }
        transport.assert_no_more_requests();
    }

    #[test]
    fn disabled_timeout_keeps_polling() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());
        let clock = MockClock::new();

        let hash = H256::repeat_byte(0xff);
        for _ in 0..5 {
            transport.add_response(json!(null));
        }
        transport.add_response(receipt_json(hash, json!([])));

        // five polls 100 seconds apart would exceed the default timeout
        let params = SyncParams::from_timeout_millis(0).poll_interval(Duration::from_secs(100));
        let receipt = wait_for_receipt(&web3, &clock, hash, params)
            .immediate()
            .expect("transaction synchronization failed");

        assert_eq!(receipt.transaction_hash, hash);
        assert_eq!(clock.elapsed(), Duration::from_secs(500));
    }

    #[test]
    fn provider_error_is_not_retried() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());
        let clock = MockClock::new();

        let hash = H256::repeat_byte(0xff);
        transport.add_response(json!(null));

        let result = wait_for_receipt(&web3, &clock, hash, SyncParams::default()).immediate();

        assert!(matches!(result, Err(ExecutionError::Web3(_))));
        transport.assert_request("eth_getTransactionReceipt", &[json!(hash)]);
        transport.assert_request("eth_getTransactionReceipt", &[json!(hash)]);
        transport.assert_no_more_requests();
        assert_eq!(clock.delays().len(), 1);
    }
}
