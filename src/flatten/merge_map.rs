use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::Stream;
use pin_project::pin_project;

/// A stream which runs every inner stream concurrently.
///
/// Each outer item is handed to the closure as soon as it arrives, and the
/// resulting inner stream is polled alongside all earlier ones. Items are
/// yielded as soon as any inner stream produces them, so the output
/// interleaves inner streams by time rather than by outer order.
///
/// Within one poll, inner streams are polled in the order they were
/// subscribed. Every wake re-polls all active inner streams, which costs
/// `O(active)` per poll but keeps tie order deterministic without
/// per-stream wakers.
///
/// This `struct` is created by the [`merge_map`] method on [`FlattenExt`]. See its
/// documentation for more.
///
/// [`merge_map`]: super::FlattenExt::merge_map
/// [`FlattenExt`]: super::FlattenExt
#[must_use = "streams do nothing unless polled or .awaited"]
#[pin_project]
pub struct MergeMap<S, F, U> {
    #[pin]
    outer: S,
    outer_done: bool,
    inners: Vec<Pin<Box<U>>>,
    f: F,
    done: bool,
}

impl<S, F, U> MergeMap<S, F, U> {
    pub(crate) fn new(outer: S, f: F) -> Self {
        Self {
            outer,
            outer_done: false,
            inners: Vec::new(),
            f,
            done: false,
        }
    }

    /// Returns the number of inner streams which have not completed yet.
    pub fn active(&self) -> usize {
        self.inners.len()
    }
}

impl<S, F, U> Stream for MergeMap<S, F, U>
where
    S: Stream,
    F: FnMut(S::Item) -> U,
    U: Stream,
{
    type Item = U::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        assert!(!*this.done, "Stream should not be polled after completion");

        while !*this.outer_done {
            match this.outer.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    this.inners.push(Box::pin((this.f)(item)));
                    tracing::debug!(active = this.inners.len(), "merge_map: inner subscribed");
                }
                Poll::Ready(None) => {
                    tracing::trace!(active = this.inners.len(), "merge_map: outer exhausted");
                    *this.outer_done = true;
                }
                Poll::Pending => break,
            }
        }

        let mut index = 0;
        while index < this.inners.len() {
            match this.inners[index].as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                Poll::Ready(None) => {
                    // `remove` keeps the remaining streams in subscription order.
                    this.inners.remove(index);
                    tracing::trace!(active = this.inners.len(), "merge_map: inner completed");
                }
                Poll::Pending => index += 1,
            }
        }

        if *this.outer_done && this.inners.is_empty() {
            *this.done = true;
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}

impl<S, F, U> fmt::Debug for MergeMap<S, F, U>
where
    S: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeMap")
            .field("outer", &self.outer)
            .field("inners", &self.inners)
            .field("done", &self.done)
            .finish()
    }
}
