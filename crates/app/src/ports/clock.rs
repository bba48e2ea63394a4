//! Clock port — "now" and one-shot wake-ups.
//!
//! Observers never call the system clock directly. Tests swap in a clock
//! they can step by hand.

use std::future::Future;

use workshift_domain::time::{Timestamp, now};

/// Source of the current instant and of timed wake-ups.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Timestamp;

    /// Resolve once `deadline` has passed.
    ///
    /// Dropping the returned future cancels the wake-up; a deadline in the
    /// past resolves immediately.
    fn sleep_until(&self, deadline: Timestamp) -> impl Future<Output = ()> + Send;
}

impl<T: Clock + Send + Sync> Clock for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn sleep_until(&self, deadline: Timestamp) -> impl Future<Output = ()> + Send {
        (**self).sleep_until(deadline)
    }
}

/// Wall clock backed by `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        now()
    }

    fn sleep_until(&self, deadline: Timestamp) -> impl Future<Output = ()> + Send {
        let wait = (deadline - now()).to_std().unwrap_or_default();
        tokio::time::sleep(wait)
    }
}
