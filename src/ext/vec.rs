//! Value-returning growth for owned collections.
//!
//! Lets a collection be grown inside an expression, e.g. in a `map` closure
//! or a struct literal, instead of through a `let mut` binding.

use nonempty::NonEmpty;

/// Grow an owned collection and hand it back.
pub trait FunctionalVec<T> {
    /// Append one item.
    fn pushed(self, new: T) -> Self;

    /// Append every item of `new`, in order.
    fn extended(self, new: impl IntoIterator<Item = T>) -> Self;
}

impl<T> FunctionalVec<T> for Vec<T> {
    fn pushed(mut self, new: T) -> Self {
        self.push(new);
        self
    }

    fn extended(mut self, new: impl IntoIterator<Item = T>) -> Self {
        self.extend(new);
        self
    }
}

impl<T> FunctionalVec<T> for NonEmpty<T> {
    fn pushed(mut self, new: T) -> Self {
        self.push(new);
        self
    }

    fn extended(mut self, new: impl IntoIterator<Item = T>) -> Self {
        self.extend(new);
        self
    }
}
