//! Helpers for composing futures.

use futures::future::{self, TryFuture};

/// Runs the futures concurrently, resolving to their outputs in input order.
///
/// The first error is returned as soon as it occurs and the remaining
/// futures are dropped. No futures resolves to an empty vector.
pub async fn parallel<I>(
    futures: I,
) -> Result<Vec<<I::Item as TryFuture>::Ok>, <I::Item as TryFuture>::Error>
where
    I: IntoIterator,
    I::Item: TryFuture,
{
    future::try_join_all(futures).await
}
