use core::fmt;
use core::ops::{Add, Sub};
use core::time::Duration;
use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::task::Waker;

use slab::Slab;
use smallvec::SmallVec;

use super::{Interval, Sleep};

/// A point on a [`Clock`]'s virtual timeline.
///
/// Instants are measured from the moment their clock was created, so two
/// clocks never share a timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(Duration);

impl Instant {
    /// The instant every clock starts at.
    pub const ZERO: Instant = Instant(Duration::ZERO);

    /// Returns the amount of virtual time between the clock's start and this instant.
    pub fn since_start(self) -> Duration {
        self.0
    }

    /// Returns the amount of time elapsed from `earlier` to `self`, or zero
    /// if `earlier` is later than `self`.
    pub fn saturating_duration_since(self, earlier: Instant) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant(self.0 + rhs)
    }
}

impl Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

/// Identifies one registration in the timer queue.
///
/// The slot alone is not enough: slab slots are reused, so the sequence
/// number tells a live registration apart from a stale queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimerKey {
    slot: usize,
    seq: u64,
}

struct Entry {
    deadline: Instant,
    seq: u64,
    waker: Waker,
}

#[derive(Default)]
struct Timers {
    now: Instant,
    next_seq: u64,
    entries: Slab<Entry>,
    // Lowest (deadline, seq) gets popped off first.
    queue: BinaryHeap<Reverse<(Instant, u64, usize)>>,
}

impl Timers {
    fn register(&mut self, deadline: Instant, waker: Waker) -> TimerKey {
        let seq = self.next_seq;
        self.next_seq += 1;
        let slot = self.entries.insert(Entry {
            deadline,
            seq,
            waker,
        });
        self.queue.push(Reverse((deadline, seq, slot)));
        TimerKey { slot, seq }
    }

    fn is_live(&self, key: TimerKey) -> bool {
        self.entries
            .get(key.slot)
            .is_some_and(|entry| entry.seq == key.seq)
    }

    fn cancel(&mut self, key: TimerKey) -> bool {
        if !self.is_live(key) {
            return false;
        }
        // The queue entry stays behind and is skipped once it surfaces.
        self.entries.remove(key.slot);
        true
    }

    fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(&Reverse((deadline, seq, slot))) = self.queue.peek() {
            if self.is_live(TimerKey { slot, seq }) {
                return Some(deadline);
            }
            self.queue.pop();
        }
        None
    }

    /// Move to the earliest live deadline and take the wakers of every live
    /// timer registered for it, in registration order.
    fn fire(&mut self) -> Option<(Instant, SmallVec<[Waker; 4]>)> {
        let deadline = self.next_deadline()?;
        self.now = self.now.max(deadline);

        let mut wakers = SmallVec::new();
        while let Some(&Reverse((at, seq, slot))) = self.queue.peek() {
            if at > deadline {
                break;
            }
            self.queue.pop();
            if self.is_live(TimerKey { slot, seq }) {
                let entry = self.entries.remove(slot);
                debug_assert_eq!(entry.deadline, at);
                wakers.push(entry.waker);
            }
        }
        Some((deadline, wakers))
    }
}

/// A single-threaded virtual clock.
///
/// Time only moves when [`Clock::advance`] is called, which jumps straight
/// to the earliest pending deadline. Timers sharing a deadline are woken in
/// the order they were registered. Dropping a [`Sleep`] removes its
/// registration, so a cancelled timer never wakes anything.
///
/// `Clock` is a cheap handle: clones share the same timeline.
///
/// # Example
///
/// ```rust
/// use flatten_concurrency::time::{Clock, Instant};
///
/// let clock = Clock::new();
/// assert_eq!(clock.now(), Instant::ZERO);
/// assert_eq!(clock.advance(), None);
/// ```
#[derive(Clone, Default)]
pub struct Clock {
    timers: Rc<RefCell<Timers>>,
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("now", &self.now())
            .field("pending_timers", &self.pending_timers())
            .finish()
    }
}

impl Clock {
    /// Create a new clock at [`Instant::ZERO`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current virtual time.
    pub fn now(&self) -> Instant {
        self.timers.borrow().now
    }

    /// Returns a future which completes once `duration` of virtual time has passed.
    pub fn sleep(&self, duration: Duration) -> Sleep {
        Sleep::new(self.clone(), self.now() + duration)
    }

    /// Returns a future which completes once the clock reaches `deadline`.
    pub fn sleep_until(&self, deadline: Instant) -> Sleep {
        Sleep::new(self.clone(), deadline)
    }

    /// Returns a stream which ticks every `period`, starting one period from now.
    ///
    /// # Panics
    ///
    /// This function panics if `period` is zero.
    pub fn interval(&self, period: Duration) -> Interval {
        Interval::new(self, period)
    }

    /// Returns the number of live timer registrations.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().entries.len()
    }

    /// Returns the earliest deadline a live timer is waiting on.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.borrow_mut().next_deadline()
    }

    /// Jump to the earliest live deadline and wake every timer waiting on it.
    ///
    /// Returns the new time, or `None` if no timer is waiting.
    pub fn advance(&self) -> Option<Instant> {
        // Release the borrow before waking; a waker may poll straight back
        // into the clock.
        let (at, wakers) = self.timers.borrow_mut().fire()?;
        tracing::trace!(%at, woken = wakers.len(), "clock advanced");
        for waker in wakers {
            waker.wake();
        }
        Some(at)
    }

    /// Returns `true` once `deadline` has been reached. Otherwise makes sure a
    /// timer is registered for `deadline` which will wake `waker`.
    pub(crate) fn poll_timer(
        &self,
        deadline: Instant,
        key: &mut Option<TimerKey>,
        waker: &Waker,
    ) -> bool {
        let mut timers = self.timers.borrow_mut();
        if timers.now >= deadline {
            if let Some(key) = key.take() {
                timers.cancel(key);
            }
            return true;
        }

        match key {
            Some(k) if timers.is_live(*k) => {
                let entry = &mut timers.entries[k.slot];
                if !entry.waker.will_wake(waker) {
                    entry.waker = waker.clone();
                }
            }
            _ => *key = Some(timers.register(deadline, waker.clone())),
        }
        false
    }

    /// Remove a registration. Returns whether it was still live.
    pub(crate) fn cancel(&self, key: TimerKey) -> bool {
        self.timers.borrow_mut().cancel(key)
    }
}
