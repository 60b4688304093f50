use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;

use futures_core::{ready, Stream};

use super::{Clock, Instant, Sleep};

/// A stream which ticks at a fixed period.
///
/// The n-th tick (counting from zero) is due at `start + (n + 1) * period`,
/// where `start` is the clock time when the interval was created. Ticks are
/// scheduled from the previous deadline rather than from when the stream was
/// polled, so a late consumer receives every missed tick back to back.
///
/// This `struct` is created by [`Clock::interval`].
#[derive(Debug)]
#[must_use = "streams do nothing unless polled or .awaited"]
pub struct Interval {
    start: Instant,
    period: Duration,
    ticks: u64,
    sleep: Sleep,
}

impl Interval {
    pub(crate) fn new(clock: &Clock, period: Duration) -> Self {
        assert!(!period.is_zero(), "`period` must be non-zero");
        let start = clock.now();
        Self {
            start,
            period,
            ticks: 0,
            sleep: clock.sleep_until(start + period),
        }
    }

    /// Returns the instant the interval was created at.
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Returns the period between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Stream for Interval {
    type Item = u64;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        let due = ready!(Pin::new(&mut this.sleep).poll(cx));

        let tick = this.ticks;
        this.ticks += 1;
        this.sleep.reset(due + this.period);
        Poll::Ready(Some(tick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Runtime;
    use futures_lite::StreamExt;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn ticks_every_period() {
        let clock = Clock::new();
        let runtime = Runtime::new(clock.clone());
        let stamps = clock.clone();
        let ticks: Vec<_> = runtime
            .block_on(
                clock
                    .interval(ms(100))
                    .take(3)
                    .map(move |n| (n, stamps.now().since_start()))
                    .collect(),
            )
            .unwrap();
        assert_eq!(ticks, vec![(0, ms(100)), (1, ms(200)), (2, ms(300))]);
    }

    #[test]
    fn late_consumer_gets_missed_ticks() {
        let clock = Clock::new();
        let runtime = Runtime::new(clock.clone());
        let mut interval = clock.interval(ms(10));
        runtime.block_on(clock.sleep(ms(35))).unwrap();

        let ticks: Vec<_> = runtime
            .block_on((&mut interval).take(3).collect())
            .unwrap();
        assert_eq!(ticks, vec![0, 1, 2]);
        assert_eq!(clock.now(), Instant::ZERO + ms(35));

        let next = runtime.block_on(interval.next()).unwrap();
        assert_eq!(next, Some(3));
        assert_eq!(clock.now(), Instant::ZERO + ms(40));
    }

    #[test]
    fn empty_take_registers_nothing() {
        let clock = Clock::new();
        let runtime = Runtime::new(clock.clone());
        let ticks: Vec<u64> = runtime
            .block_on(clock.interval(ms(10)).take(0).collect())
            .unwrap();
        assert!(ticks.is_empty());
        assert_eq!(clock.now(), Instant::ZERO);
        assert_eq!(clock.pending_timers(), 0);
    }

    #[test]
    #[should_panic(expected = "`period` must be non-zero")]
    fn zero_period_panics() {
        let _ = Clock::new().interval(Duration::ZERO);
    }
}
