use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::Stream;
use pin_project::pin_project;

/// A stream which only follows the inner stream of the latest outer item.
///
/// Every outer item drops the current inner stream before the closure is
/// called for the new one. Anything the dropped stream would still have
/// produced is lost: with a fast outer stream and a slow inner stream, only
/// the last inner stream yields items at all.
///
/// This `struct` is created by the [`switch_map`] method on [`FlattenExt`]. See its
/// documentation for more.
///
/// [`switch_map`]: super::FlattenExt::switch_map
/// [`FlattenExt`]: super::FlattenExt
#[must_use = "streams do nothing unless polled or .awaited"]
#[pin_project]
pub struct SwitchMap<S, F, U> {
    #[pin]
    outer: S,
    outer_done: bool,
    #[pin]
    inner: Option<U>,
    f: F,
    switches: usize,
    done: bool,
}

impl<S, F, U> SwitchMap<S, F, U> {
    pub(crate) fn new(outer: S, f: F) -> Self {
        Self {
            outer,
            outer_done: false,
            inner: None,
            f,
            switches: 0,
            done: false,
        }
    }

    /// Returns how many inner streams were dropped before they completed.
    pub fn switches(&self) -> usize {
        self.switches
    }
}

impl<S, F, U> Stream for SwitchMap<S, F, U>
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
            while !*this.outer_done {
                match this.outer.as_mut().poll_next(cx) {
                    Poll::Ready(Some(item)) => {
                        // Tear the old subscription down before the new one exists.
                        if this.inner.is_some() {
                            this.inner.set(None);
                            *this.switches += 1;
                            tracing::debug!(switches = *this.switches, "switch_map: inner cancelled");
                        }
                        this.inner.set(Some((this.f)(item)));
                        tracing::debug!("switch_map: inner subscribed");
                    }
                    Poll::Ready(None) => {
                        tracing::trace!("switch_map: outer exhausted");
                        *this.outer_done = true;
                    }
                    Poll::Pending => break,
                }
            }

            let Some(inner) = this.inner.as_mut().as_pin_mut() else {
                break;
            };
            match inner.poll_next(cx) {
                Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                Poll::Ready(None) => {
                    tracing::trace!("switch_map: inner completed");
                    this.inner.set(None);
                    // The outer stream may have a new item ready by now.
                    continue;
                }
                Poll::Pending => break,
            }
        }

        if *this.outer_done && this.inner.is_none() {
            *this.done = true;
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}

impl<S, F, U> fmt::Debug for SwitchMap<S, F, U>
where
    S: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchMap")
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .field("switches", &self.switches)
            .field("done", &self.done)
            .finish()
    }
}
