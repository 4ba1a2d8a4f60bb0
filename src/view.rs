//! Zero-copy windows over ordered input.
//!
//! A [`View`] is the triple `(source, offset, len)`:
//! the source is shared through an [`Arc`] and never mutated,
//! so slicing a view only ever produces a new triple over the same storage.
//!
//! Two kinds of source are supported out of the box:
//! - `[T]`, indexed by item, yielding `T`.
//! - `str`, indexed by byte, yielding the `char` that contains that byte.

use std::{
    fmt::{self, Debug, Display},
    ops::{Bound, Range, RangeBounds},
    sync::Arc,
};

/// Ordered, indexable storage that a [`View`] can window over.
pub trait Source: Send + Sync + 'static {
    /// The item yielded when reading the source.
    type Item: Clone + 'static;

    /// The number of index positions in the source.
    fn len(&self) -> usize;

    /// Read the item beginning at `index`, along with the number of index positions it spans.
    ///
    /// Returns `None` if `index` is out of bounds or does not begin an item.
    fn item_at(&self, index: usize) -> Option<(Self::Item, usize)>;

    /// Borrow the given range of the source.
    /// The range must be in bounds and on item boundaries.
    fn window(&self, range: Range<usize>) -> &Self;

    /// The largest item boundary less than or equal to `index`.
    fn floor_boundary(&self, index: usize) -> usize {
        index.min(self.len())
    }

    /// Build a new, owned source out of items.
    fn collect_from(items: Vec<Self::Item>) -> Arc<Self>;
}

impl<T: Clone + Send + Sync + 'static> Source for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn item_at(&self, index: usize) -> Option<(T, usize)> {
        self.get(index).cloned().map(|item| (item, 1))
    }

    fn window(&self, range: Range<usize>) -> &Self {
        &self[range]
    }

    fn collect_from(items: Vec<T>) -> Arc<Self> {
        Arc::from(items)
    }
}

impl Source for str {
    type Item = char;

    fn len(&self) -> usize {
        str::len(self)
    }

    fn item_at(&self, index: usize) -> Option<(char, usize)> {
        self.get(index..)?
            .chars()
            .next()
            .map(|c| (c, c.len_utf8()))
    }

    fn window(&self, range: Range<usize>) -> &Self {
        &self[range]
    }

    fn floor_boundary(&self, index: usize) -> usize {
        let index = index.min(str::len(self));
        (0..=index)
            .rev()
            .find(|&i| self.is_char_boundary(i))
            .unwrap_or_default()
    }

    fn collect_from(items: Vec<char>) -> Arc<Self> {
        Arc::from(items.into_iter().collect::<String>())
    }
}

/// An immutable window over a shared [`Source`].
///
/// Invariant: `offset + len <= source.len()`.
///
/// ```
/// # use parsley::view::view;
/// let input = view("hello world");
/// let world = input.slice(6..);
///
/// assert_eq!(world.as_str(), "world");
/// assert_eq!(world.at(0), Some('w'));
/// assert_eq!(world.slice(..2).at(2), None);
/// ```
pub struct View<S: Source + ?Sized> {
    source: Arc<S>,
    offset: usize,
    len: usize,
}

impl<S: Source + ?Sized> View<S> {
    /// Create a view spanning the entire source.
    pub fn new(source: Arc<S>) -> Self {
        let len = source.len();
        Self {
            source,
            offset: 0,
            len,
        }
    }

    /// The number of index positions in the window.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The offset of the window into the backing source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The backing source, shared among every view derived from it.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Borrow the logical window.
    pub fn as_source(&self) -> &S {
        self.source.window(self.offset..self.offset + self.len)
    }

    /// Read the item at `index`, relative to the window.
    ///
    /// Indexes at or past [`View::len`] are `None`
    /// even if the backing source holds more data.
    /// An index inside an item reads the item containing it,
    /// the same item [`View::slice`] would start at.
    pub fn at(&self, index: usize) -> Option<S::Item> {
        if index >= self.len {
            return None;
        }
        let window = self.as_source();
        window
            .item_at(window.floor_boundary(index))
            .map(|(item, _)| item)
    }

    /// Read the first item in the window along with its width.
    pub fn peek(&self) -> Option<(S::Item, usize)> {
        self.as_source().item_at(0)
    }

    /// Narrow the window to the provided range, relative to the window.
    ///
    /// Bounds are clamped to `[0, len]`; a start past the end produces an empty view at the start.
    /// The result shares the backing source; nothing is copied.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };

        let window = self.as_source();
        let start = window.floor_boundary(start.min(self.len));
        let end = window.floor_boundary(end.min(self.len)).max(start);

        Self {
            source: Arc::clone(&self.source),
            offset: self.offset + start,
            len: end - start,
        }
    }

    /// Narrow the window to start at `start`, keeping the rest.
    pub fn slice_from(&self, start: usize) -> Self {
        self.slice(start..)
    }

    /// Consume `count` index positions from the front of the window.
    pub fn advance(&self, count: usize) -> Self {
        self.slice_from(count)
    }

    /// Iterate the items in the window.
    pub fn iter(&self) -> impl Iterator<Item = S::Item> + '_ {
        let window = self.as_source();
        let mut index = 0;
        std::iter::from_fn(move || {
            let (item, width) = window.item_at(index)?;
            index += width;
            Some(item)
        })
    }
}

impl View<str> {
    /// Borrow the window as text.
    pub fn as_str(&self) -> &str {
        self.as_source()
    }
}

impl AsRef<str> for View<str> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<S: Source + ?Sized> Clone for View<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            offset: self.offset,
            len: self.len,
        }
    }
}

/// Views compare by their logical contents, not by offset or source identity.
impl<S: Source + PartialEq + ?Sized> PartialEq for View<S> {
    fn eq(&self, other: &Self) -> bool {
        self.as_source() == other.as_source()
    }
}

impl<S: Source + Eq + ?Sized> Eq for View<S> {}

impl<S: Source + Debug + ?Sized> Display for View<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_source())
    }
}

impl<S: Source + Debug + ?Sized> Debug for View<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("window", &self.as_source())
            .finish()
    }
}

/// Raw input that can be turned into a [`View`].
pub trait IntoView {
    /// The source the view windows over.
    type Source: Source + ?Sized;

    /// Build a view spanning the whole input.
    fn into_view(self) -> View<Self::Source>;
}

impl IntoView for &str {
    type Source = str;

    fn into_view(self) -> View<str> {
        View::new(Arc::from(self))
    }
}

impl IntoView for String {
    type Source = str;

    fn into_view(self) -> View<str> {
        View::new(Arc::from(self))
    }
}

impl IntoView for Arc<str> {
    type Source = str;

    fn into_view(self) -> View<str> {
        View::new(self)
    }
}

impl<T: Clone + Send + Sync + 'static> IntoView for Vec<T> {
    type Source = [T];

    fn into_view(self) -> View<[T]> {
        View::new(Arc::from(self))
    }
}

impl<T: Clone + Send + Sync + 'static> IntoView for &[T] {
    type Source = [T];

    fn into_view(self) -> View<[T]> {
        View::new(Arc::from(self))
    }
}

impl<T: Clone + Send + Sync + 'static, const N: usize> IntoView for [T; N] {
    type Source = [T];

    fn into_view(self) -> View<[T]> {
        Vec::from(self).into_view()
    }
}

impl<T: Clone + Send + Sync + 'static> IntoView for Arc<[T]> {
    type Source = [T];

    fn into_view(self) -> View<[T]> {
        View::new(self)
    }
}

impl<S: Source + ?Sized> IntoView for View<S> {
    type Source = S;

    fn into_view(self) -> View<S> {
        self
    }
}

/// Build a [`View`] over raw input.
/// This is the sole entry point from raw input into the library.
pub fn view<V: IntoView>(input: V) -> View<V::Source> {
    input.into_view()
}
