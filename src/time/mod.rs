//! Virtual time.
//!
//! Every timed stream in this crate runs against a [`Clock`] instead of the
//! wall clock. A [`Runtime`] polls a future until it is pending, then jumps
//! the clock to the next deadline, so a scenario spanning minutes completes
//! instantly and always in the same order.
//!
//! | Name       | Kind     | Completes when |
//! | ---        | ---      | ---            |
//! | [`Sleep`]    | future   | The clock reaches its deadline.
//! | [`Interval`] | stream   | Never; yields one tick per period.

pub use clock::{Clock, Instant};
pub use interval::Interval;
pub use runtime::{Pacing, Runtime};
pub use sleep::Sleep;

mod clock;
mod interval;
mod runtime;
mod sleep;
