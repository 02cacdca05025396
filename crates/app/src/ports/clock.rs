//! Clock port — timed waits that yield to the runtime instead of blocking.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Source of timed waits.
///
/// Injected wherever a command must pause (the amplifier settle delay) so
/// tests can substitute an instant clock.
pub trait Clock: Send + Sync {
    /// Suspend the current task for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// [`Clock`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).sleep(duration)
    }
}
