use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::collections::VecDeque;

use futures_core::Stream;
use pin_project::pin_project;

/// A stream which drains one inner stream at a time.
///
/// Outer items which arrive while an inner stream is still running are
/// queued in arrival order. The closure is only called for an item once the
/// previous inner stream has completed, so at most one inner stream exists at
/// any time and output keeps both outer and inner order.
///
/// This `struct` is created by the [`concat_map`] method on [`FlattenExt`]. See its
/// documentation for more.
///
/// [`concat_map`]: super::FlattenExt::concat_map
/// [`FlattenExt`]: super::FlattenExt
#[must_use = "streams do nothing unless polled or .awaited"]
#[pin_project]
pub struct ConcatMap<S, F, U>
where
    S: Stream,
{
    #[pin]
    outer: S,
    outer_done: bool,
    queue: VecDeque<S::Item>,
    #[pin]
    inner: Option<U>,
    f: F,
    done: bool,
}

impl<S, F, U> ConcatMap<S, F, U>
where
    S: Stream,
{
    pub(crate) fn new(outer: S, f: F) -> Self {
        Self {
            outer,
            outer_done: false,
            queue: VecDeque::new(),
            inner: None,
            f,
            done: false,
        }
    }

    /// Returns the number of outer items waiting for their turn.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl<S, F, U> Stream for ConcatMap<S, F, U>
where
    S: Stream,
    F: FnMut(S::Item) -> U,
    U: Stream,
{
    type Item = U::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        assert!(!*this.done, "Stream should not be polled after completion");

        loop {
            // The outer stream keeps its own pace; park whatever it yields.
            while !*this.outer_done {
                match this.outer.as_mut().poll_next(cx) {
                    Poll::Ready(Some(item)) => this.queue.push_back(item),
                    Poll::Ready(None) => {
                        tracing::trace!(queued = this.queue.len(), "concat_map: outer exhausted");
                        *this.outer_done = true;
                    }
                    Poll::Pending => break,
                }
            }

            if let Some(inner) = this.inner.as_mut().as_pin_mut() {
                match inner.poll_next(cx) {
                    Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                    Poll::Ready(None) => {
                        tracing::trace!("concat_map: inner completed");
                        this.inner.set(None);
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            match this.queue.pop_front() {
                Some(item) => {
                    tracing::debug!(queued = this.queue.len(), "concat_map: inner subscribed");
                    this.inner.set(Some((this.f)(item)));
                }
                None if *this.outer_done => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
                None => return Poll::Pending,
            }
        }
    }
}

impl<S, F, U> fmt::Debug for ConcatMap<S, F, U>
where
    S: Stream + fmt::Debug,
    S::Item: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatMap")
            .field("outer", &self.outer)
            .field("queue", &self.queue)
            .field("inner", &self.inner)
            .field("done", &self.done)
            .finish()
    }
}
