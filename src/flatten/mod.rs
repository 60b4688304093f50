//! Higher-order stream flattening.
//!
//! Each combinator maps every item of an outer stream to an inner stream and
//! flattens the result. They differ only in what happens when an outer item
//! arrives while an earlier inner stream is still running:
//!
//! | Name          | Inner streams alive | Output order           | Drops items? |
//! | ---           | ---                 | ---                    | ---          |
//! | [`ConcatMap`] | at most one         | outer, then inner      | no           |
//! | [`MergeMap`]  | all of them         | by arrival time        | no           |
//! | [`SwitchMap`] | at most one         | outer, then inner      | yes, on every switch |
//!
//! # Examples
//!
//! ```
//! use flatten_concurrency::prelude::*;
//! use flatten_concurrency::time::{Clock, Runtime};
//! use futures_lite::StreamExt;
//! use std::time::Duration;
//!
//! let clock = Clock::new();
//! let runtime = Runtime::new(clock.clone());
//! let inner = clock.clone();
//!
//! // The first inner stream would tick at 35ms but is dropped at 20ms.
//! let s = clock
//!     .interval(Duration::from_millis(10))
//!     .take(2)
//!     .switch_map(move |n| {
//!         inner
//!             .interval(Duration::from_millis(25))
//!             .take(2)
//!             .map(move |m| (n, m))
//!     });
//! let out: Vec<_> = runtime.block_on(s.collect()).unwrap();
//! assert_eq!(out, vec![(1, 0), (1, 1)]);
//! ```
use futures_core::Stream;

pub use concat_map::ConcatMap;
pub use merge_map::MergeMap;
pub use switch_map::SwitchMap;

mod concat_map;
mod merge_map;
mod switch_map;

/// An extension trait adding the flattening combinators to every `Stream`.
pub trait FlattenExt: Stream {
    /// Map each item to a stream and drain those streams one after another.
    fn concat_map<U, F>(self, f: F) -> ConcatMap<Self, F, U>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
        U: Stream;

    /// Map each item to a stream and run all of those streams concurrently.
    fn merge_map<U, F>(self, f: F) -> MergeMap<Self, F, U>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
        U: Stream;

    /// Map each item to a stream, dropping the previous stream whenever a new
    /// item arrives.
    fn switch_map<U, F>(self, f: F) -> SwitchMap<Self, F, U>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
        U: Stream;
}

impl<S> FlattenExt for S
where
    S: Stream,
{
    fn concat_map<U, F>(self, f: F) -> ConcatMap<S, F, U>
    where
        F: FnMut(S::Item) -> U,
        U: Stream,
    {
        ConcatMap::new(self, f)
    }

    fn merge_map<U, F>(self, f: F) -> MergeMap<S, F, U>
    where
        F: FnMut(S::Item) -> U,
        U: Stream,
    {
        MergeMap::new(self, f)
    }

    fn switch_map<U, F>(self, f: F) -> SwitchMap<S, F, U>
    where
        F: FnMut(S::Item) -> U,
        U: Stream,
    {
        SwitchMap::new(self, f)
    }
}
