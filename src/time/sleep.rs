use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use super::clock::TimerKey;
use super::{Clock, Instant};

/// Wait until a [`Clock`] reaches a deadline.
///
/// This `struct` is created by [`Clock::sleep`] and [`Clock::sleep_until`].
/// Dropping it before it completes cancels the timer.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled or .awaited"]
pub struct Sleep {
    clock: Clock,
    deadline: Instant,
    key: Option<TimerKey>,
}

impl Sleep {
    pub(crate) fn new(clock: Clock, deadline: Instant) -> Self {
        Self {
            clock,
            deadline,
            key: None,
        }
    }

    /// Returns the instant this sleep completes at.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Returns `true` if the clock has reached the deadline.
    pub fn is_elapsed(&self) -> bool {
        self.clock.now() >= self.deadline
    }

    /// Move the deadline, dropping any timer registered for the old one.
    pub fn reset(&mut self, deadline: Instant) {
        if let Some(key) = self.key.take() {
            self.clock.cancel(key);
        }
        self.deadline = deadline;
    }
}

impl Future for Sleep {
    type Output = Instant;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        if this.clock.poll_timer(this.deadline, &mut this.key, cx.waker()) {
            Poll::Ready(this.deadline)
        } else {
            Poll::Pending
        }
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            if self.clock.cancel(key) {
                tracing::trace!(deadline = %self.deadline, "timer cancelled");
            }
        }
    }
}
