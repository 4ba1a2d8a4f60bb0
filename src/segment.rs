//! A minimal immutable lazy list over ordered data.

use std::{
    fmt::{self, Debug, Display},
    sync::Arc,
};

use itertools::Itertools;
use thiserror::Error;

use crate::view::{view, Source, View};

/// Reported when the head of an empty [`Segment`] is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("head of empty segment")]
pub struct EmptySegmentError;

/// An immutable head/tail list over items of a [`Source`].
///
/// Segments built from a source walk it lazily by index arithmetic;
/// segments built with [`Segment::cons`] prepend in constant time.
/// Either way, a segment is a restartable cursor:
/// iterating the same segment twice yields the same items.
///
/// ```
/// # use parsley::segment::Segment;
/// let letters = Segment::from_string("ab");
/// assert_eq!(letters.head(), Ok('a'));
/// assert_eq!(letters.tail().head(), Ok('b'));
/// assert!(letters.tail().tail().is_empty());
/// ```
pub struct Segment<S: Source + ?Sized>(Node<S>);

enum Node<S: Source + ?Sized> {
    Empty,
    Cons(Arc<Cell<S>>),
    Window(View<S>),
}

struct Cell<S: Source + ?Sized> {
    head: S::Item,
    tail: Segment<S>,
}

impl<S: Source + ?Sized> Segment<S> {
    /// The canonical empty segment.
    pub fn empty() -> Self {
        Self(Node::Empty)
    }

    /// Prepend an item to a segment.
    pub fn cons(head: S::Item, tail: Self) -> Self {
        Self(Node::Cons(Arc::new(Cell { head, tail })))
    }

    /// Walk the items of a view.
    pub fn from_view(view: View<S>) -> Self {
        if view.is_empty() {
            Self::empty()
        } else {
            Self(Node::Window(view))
        }
    }

    /// Whether the segment has no items.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Node::Empty => true,
            Node::Cons(_) => false,
            Node::Window(view) => view.is_empty(),
        }
    }

    /// The first item of the segment.
    pub fn head(&self) -> Result<S::Item, EmptySegmentError> {
        match &self.0 {
            Node::Empty => Err(EmptySegmentError),
            Node::Cons(cell) => Ok(cell.head.clone()),
            Node::Window(view) => view.at(0).ok_or(EmptySegmentError),
        }
    }

    /// Everything after the first item. The tail of an empty segment is empty.
    pub fn tail(&self) -> Self {
        match &self.0 {
            Node::Empty => Self::empty(),
            Node::Cons(cell) => cell.tail.clone(),
            Node::Window(view) => match view.peek() {
                Some((_, width)) => Self::from_view(view.advance(width)),
                None => Self::empty(),
            },
        }
    }

    /// The number of items in the segment.
    /// Requires a walk of the segment.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterate the items of the segment from the head.
    pub fn iter(&self) -> Iter<S> {
        Iter {
            current: self.clone(),
        }
    }

    /// Collect the items of the segment into a source.
    ///
    /// If the segment spans its backing source exactly, the original source is returned
    /// without copying.
    pub fn to_source(&self) -> Arc<S> {
        match &self.0 {
            Node::Window(view) if view.offset() == 0 && view.len() == view.source().len() => {
                Arc::clone(view.source())
            }
            _ => S::collect_from(self.iter().collect()),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Segment<[T]> {
    /// Walk the items of a vector.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_view(view(items))
    }
}

impl Segment<str> {
    /// Walk the characters of a string.
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::from_view(view(text.into()))
    }
}

impl<S: Source + ?Sized> Clone for Segment<S> {
    fn clone(&self) -> Self {
        match &self.0 {
            Node::Empty => Self::empty(),
            Node::Cons(cell) => Self(Node::Cons(Arc::clone(cell))),
            Node::Window(view) => Self(Node::Window(view.clone())),
        }
    }
}

/// Unlinks a chain of cons cells one at a time,
/// so dropping a long list doesn't recurse once per cell.
impl<S: Source + ?Sized> Drop for Segment<S> {
    fn drop(&mut self) {
        let mut node = std::mem::replace(&mut self.0, Node::Empty);
        while let Node::Cons(cell) = node {
            match Arc::try_unwrap(cell) {
                Ok(mut cell) => node = std::mem::replace(&mut cell.tail.0, Node::Empty),
                Err(_) => break,
            }
        }
    }
}

impl<S: Source + ?Sized> Default for Segment<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Source + ?Sized> From<View<S>> for Segment<S> {
    fn from(value: View<S>) -> Self {
        Self::from_view(value)
    }
}

impl<S: Source + ?Sized> PartialEq for Segment<S>
where
    S::Item: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<S: Source + ?Sized> Display for Segment<S>
where
    S::Item: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment({:?})", self.iter().collect_vec())
    }
}

impl<S: Source + ?Sized> Debug for Segment<S>
where
    S::Item: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<'a, S: Source + ?Sized> IntoIterator for &'a Segment<S> {
    type Item = S::Item;
    type IntoIter = Iter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates a [`Segment`] by repeatedly taking its tail.
pub struct Iter<S: Source + ?Sized> {
    current: Segment<S>,
}

impl<S: Source + ?Sized> Iterator for Iter<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.current.head().ok()?;
        self.current = self.current.tail();
        Some(head)
    }
}
