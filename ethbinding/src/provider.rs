//! The chain state queries the runtime depends on.
//!
//! [`Provider`] is the seam between bindings and the node they talk to. It is
//! implemented for [`Web3`] so any `web3` transport can back a binding.

use crate::errors::ExecutionError;
use futures::future::{BoxFuture, FutureExt as _};
use web3::api::Web3;
use web3::types::{TransactionReceipt, H256};
use web3::Transport;

/// Node queries needed to check network readiness and confirm transactions.
pub trait Provider: Send + Sync {
    /// Retrieves the id of the network the node is connected to. Resolving
    /// successfully means the node is ready to accept requests.
    fn network_id(&self) -> BoxFuture<'_, Result<String, ExecutionError>>;

    /// Retrieves the receipt for a transaction, or `None` if the transaction
    /// has not been mined yet.
    fn transaction_receipt(
        &self,
        tx: H256,
    ) -> BoxFuture<'_, Result<Option<TransactionReceipt>, ExecutionError>>;
}

impl<T> Provider for Web3<T>
where
    T: Transport + Send + Sync,
    T::Out: Send,
{
    fn network_id(&self) -> BoxFuture<'_, Result<String, ExecutionError>> {
        let version = self.net().version();
        async move { Ok(version.await?) }.boxed()
    }

    fn transaction_receipt(
        &self,
        tx: H256,
    ) -> BoxFuture<'_, Result<Option<TransactionReceipt>, ExecutionError>> {
        let receipt = self.eth().transaction_receipt(tx);
        async move { Ok(receipt.await?) }.boxed()
    }
}
