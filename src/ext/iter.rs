//! General extensions to iterators.

use std::collections::VecDeque;

use crate::transducer::Window;

/// Extensions backing the stateful transducer stages.
pub trait LazyExt: Iterator + Sized {
    /// Yield overlapping windows of the items, per the provided [`Window`].
    ///
    /// At most `window.size()` items are buffered at any time.
    fn windowed(self, window: Window) -> Windowed<Self>
    where
        Self::Item: Clone;

    /// Defer a whole-sequence operation until the first item is pulled.
    ///
    /// Operations like sorting have to consume the entire input;
    /// deferring them keeps building a pipeline free of work.
    fn deferred<F, J>(self, operation: F) -> Deferred<Self, F, J>
    where
        F: FnOnce(Self) -> J,
        J: Iterator;
}

impl<I: Iterator> LazyExt for I {
    fn windowed(self, window: Window) -> Windowed<Self>
    where
        Self::Item: Clone,
    {
        Windowed::new(self, window)
    }

    fn deferred<F, J>(self, operation: F) -> Deferred<Self, F, J>
    where
        F: FnOnce(Self) -> J,
        J: Iterator,
    {
        Deferred {
            pending: Some((self, operation)),
            running: None,
        }
    }
}

/// An iterator adaptor that yields windows over the items of the inner iterator.
pub struct Windowed<I: Iterator> {
    iter: I,
    window: Window,
    buffer: VecDeque<I::Item>,
    exhausted: bool,
    finished: bool,
}

impl<I: Iterator> Windowed<I> {
    fn new(iter: I, window: Window) -> Self {
        Self {
            iter,
            buffer: VecDeque::with_capacity(window.size()),
            window,
            exhausted: false,
            finished: false,
        }
    }

    /// Drop `step` items from the front of the window,
    /// pulling from the inner iterator once the buffer runs dry.
    fn advance(&mut self) {
        for _ in 0..self.window.step() {
            if self.buffer.pop_front().is_some() {
                continue;
            }
            if self.iter.next().is_none() {
                self.exhausted = true;
                break;
            }
        }
    }
}

impl<I> Iterator for Windowed<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while !self.exhausted && self.buffer.len() < self.window.size() {
            match self.iter.next() {
                Some(item) => self.buffer.push_back(item),
                None => self.exhausted = true,
            }
        }

        if self.buffer.len() == self.window.size() {
            let window = self.buffer.iter().cloned().collect();
            self.advance();
            return Some(window);
        }

        // Only a short trailing window is left; it's emitted at most once.
        self.finished = true;
        if self.window.remainder() && !self.buffer.is_empty() {
            Some(self.buffer.drain(..).collect())
        } else {
            None
        }
    }
}

/// An iterator adaptor that runs a whole-sequence operation on first pull.
pub struct Deferred<I, F, J> {
    pending: Option<(I, F)>,
    running: Option<J>,
}

impl<I, F, J> Iterator for Deferred<I, F, J>
where
    F: FnOnce(I) -> J,
    J: Iterator,
{
    type Item = J::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((iter, operation)) = self.pending.take() {
            self.running = Some(operation(iter));
        }
        self.running.as_mut()?.next()
    }
}
