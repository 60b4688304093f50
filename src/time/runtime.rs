use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Wake, Waker};

use super::Clock;
use crate::Error;

/// How the [`Runtime`] moves between deadlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Jump straight to the next deadline.
    #[default]
    Virtual,
    /// Park the thread for the virtual delta before every jump, so output
    /// appears at the pace the timers describe.
    RealTime,
}

/// Set whenever the task is woken outside of a clock jump.
struct WakeFlag(AtomicBool);

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.store(true, Ordering::Release);
    }
}

/// A single-threaded executor driven by a virtual [`Clock`].
///
/// # Example
///
/// ```rust
/// use flatten_concurrency::time::{Clock, Runtime};
/// use std::time::Duration;
///
/// let clock = Clock::new();
/// let runtime = Runtime::new(clock.clone());
/// runtime.block_on(clock.sleep(Duration::from_secs(60))).unwrap();
/// assert_eq!(clock.now().since_start(), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct Runtime {
    clock: Clock,
    pacing: Pacing,
}

impl Runtime {
    /// Create a runtime which advances `clock` virtually.
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            pacing: Pacing::Virtual,
        }
    }

    /// Set how the runtime moves between deadlines.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Returns the clock this runtime drives.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Run a future to completion.
    ///
    /// Whenever the future is pending and nothing woke it, the clock jumps to
    /// its next deadline. A future which is pending while no timer is live
    /// can never complete, so that is reported as [`Error::Stalled`].
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, Error> {
        let mut future = pin!(future);
        let flag = Arc::new(WakeFlag(AtomicBool::new(false)));
        let waker = Waker::from(flag.clone());
        let mut cx = Context::from_waker(&waker);

        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return Ok(output);
            }
            if flag.0.swap(false, Ordering::AcqRel) {
                continue;
            }

            let now = self.clock.now();
            let Some(deadline) = self.clock.next_deadline() else {
                tracing::warn!(at = %now, "future is pending with no live timers");
                return Err(Error::Stalled { at: now });
            };
            if self.pacing == Pacing::RealTime {
                std::thread::sleep(deadline - now);
            }
            self.clock.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Instant;
    use core::time::Duration;
    use futures_lite::future;

    #[test]
    fn ready_future_does_not_move_the_clock() {
        let clock = Clock::new();
        let runtime = Runtime::new(clock.clone());
        assert_eq!(runtime.block_on(future::ready(7)).unwrap(), 7);
        assert_eq!(clock.now(), Instant::ZERO);
    }

    #[test]
    fn pending_without_timers_stalls() {
        let clock = Clock::new();
        let runtime = Runtime::new(clock.clone());
        runtime.block_on(clock.sleep(Duration::from_millis(3))).unwrap();

        let err = runtime.block_on(future::pending::<()>()).unwrap_err();
        assert!(matches!(
            err,
            Error::Stalled { at } if at == Instant::ZERO + Duration::from_millis(3)
        ));
    }

    #[test]
    fn yielding_future_is_polled_again_without_advancing() {
        let clock = Clock::new();
        let runtime = Runtime::new(clock.clone());
        runtime.block_on(future::yield_now()).unwrap();
        assert_eq!(clock.now(), Instant::ZERO);
    }

    #[test]
    fn real_time_pacing_parks_the_thread() {
        let clock = Clock::new();
        let runtime = Runtime::new(clock.clone()).with_pacing(Pacing::RealTime);
        let started = std::time::Instant::now();
        runtime.block_on(clock.sleep(Duration::from_millis(20))).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
