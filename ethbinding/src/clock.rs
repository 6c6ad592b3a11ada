//! Time source used for synchronization timeouts and poll delays.

use futures::future::{self, BoxFuture, FutureExt as _};
use futures_timer::Delay;
use std::time::{Duration, Instant};

/// A source of time and of delays that suspend without blocking a thread.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Returns a future that resolves after the specified duration.
    fn delay(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// The wall clock, with delays driven by `futures-timer`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    /// A zero duration resolves immediately since a `Delay` always returns
    /// `Poll::Pending` at least once.
    fn delay(&self, duration: Duration) -> BoxFuture<'static, ()> {
        if duration.is_zero() {
            future::ready(()).boxed()
        } else {
            Delay::new(duration).boxed()
        }
    }
}
