//! A call primitive wrapped with transaction option defaults.

use crate::binding::ContractBinding;
use crate::clock::Clock;
use crate::errors::ExecutionError;
use crate::options::TransactionOptions;
use crate::provider::Provider;
use serde_json::Value;
use std::future::Future;
use tracing::trace;

/// A call primitive wrapped so each invocation merges transaction options
/// with the binding's defaults.
///
/// The primitive receives the positional call arguments with the trailing
/// options removed, followed by the merged options. Its result is returned
/// as soon as it completes, without waiting for anything to be mined.
pub struct CallWrapper<'a, P, C, F> {
    binding: &'a ContractBinding<P, C>,
    primitive: F,
}

impl<'a, P, C, F> CallWrapper<'a, P, C, F>
where
    P: Provider,
    C: Clock,
{
    pub(crate) fn new(binding: &'a ContractBinding<P, C>, primitive: F) -> Self {
        CallWrapper { binding, primitive }
    }

    /// Invokes the primitive once the binding's network is ready.
    pub async fn call<Fut, R, E>(&self, args: Vec<Value>) -> Result<R, ExecutionError>
    where
        F: Fn(Vec<Value>, TransactionOptions) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        ExecutionError: From<E>,
    {
        let (args, options) = self.binding.split_call_args(args);
        self.binding.ensure_network().await?;

        trace!(args = args.len(), options = options.len(), "invoking call primitive");
        Ok((self.primitive)(args, options).await?)
    }
}
