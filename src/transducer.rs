//! Composable, lazily applied transformations of sequences.
//!
//! A [`Transducer`] is an ordered list of [`Stage`]s plus the fused runner that applies them.
//! Composing transducers concatenates their stage lists,
//! so a pipeline is always one flat, inspectable list no matter how it was assembled:
//!
//! ```
//! use parsley::{compose, transducer as t};
//!
//! let evens = t::filter("even", |n: &i32| n % 2 == 0);
//! let pipeline = compose!(compose!(evens, t::map("square", |n: i32| n * n)), t::take(2));
//!
//! assert_eq!(pipeline.to_string(), "compose(filter(even), map(square), take(2))");
//! assert_eq!(pipeline.apply(1..).collect::<Vec<_>>(), vec![4, 16]);
//! ```
//!
//! Stages run lazily and in order: each item is pulled through every stage
//! before the next one is read from the input.
//! Only stages that intrinsically need it hold state:
//! [`sort`] and [`reduce`] buffer the whole input on first pull,
//! [`windowed`] buffers at most one window, [`dedupe`] remembers the last item,
//! and [`unique`] remembers every item it has seen.
//!
//! Transducers hold no mutable state of their own; they're cheap to clone,
//! safe to share between threads, and can be applied to any number of inputs.
//!
//! A transducer can also be applied to a single value with [`Transducer::apply_value`],
//! which is how [`parser`](crate::parser::parser) threads a parse value through one.

use std::{fmt, hash::Hash, sync::Arc};

use delegate::delegate;
use derivative::Derivative;
use itertools::Itertools;

use crate::{
    ext::{iter::LazyExt, vec::FunctionalVec},
    ConstructionError,
};

mod stage;

pub use stage::{Label, Stage, Window};

/// A boxed, lazily evaluated sequence.
pub type BoxIter<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

type Runner<A, B> = Arc<dyn for<'a> Fn(BoxIter<'a, A>) -> BoxIter<'a, B> + Send + Sync>;

fn runner<A, B, F>(run: F) -> Runner<A, B>
where
    F: for<'a> Fn(BoxIter<'a, A>) -> BoxIter<'a, B> + Send + Sync + 'static,
{
    Arc::new(run)
}

/// Applies the transducer to one value, reporting the stage that rejected it.
type Lift<A, B> = Arc<dyn Fn(A) -> Result<B, Stage> + Send + Sync>;

fn lift<A, B, F>(f: F) -> Lift<A, B>
where
    F: Fn(A) -> Result<B, Stage> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A lazy transformation of a sequence of `A` into a sequence of `B`.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
pub struct Transducer<A, B> {
    stages: Vec<Stage>,

    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    run: Runner<A, B>,

    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    lift: Lift<A, B>,
}

impl<A: 'static> Transducer<A, A> {
    /// The transducer with no stages; passes every item through unchanged.
    pub fn identity() -> Self {
        Self {
            stages: Vec::new(),
            run: runner(|iter| iter),
            lift: lift(|value| Ok(value)),
        }
    }
}

impl<A: 'static, B: 'static> Transducer<A, B> {
    /// A one-stage transducer.
    ///
    /// Applied to a single value, the stage sees a one-item sequence:
    /// the last item it emits is the result, and emitting nothing rejects the value.
    fn single(stage: Stage, run: Runner<A, B>) -> Self {
        let single = {
            let stage = stage.clone();
            let run = Arc::clone(&run);
            lift(move |value| {
                let items: BoxIter<'_, A> = Box::new(std::iter::once(value));
                run(items).last().ok_or_else(|| stage.clone())
            })
        };
        Self {
            stages: vec![stage],
            run,
            lift: single,
        }
    }

    /// Run `next` on the output of this transducer.
    ///
    /// The stage lists are concatenated: the result is flat regardless of how
    /// either side was composed.
    pub fn compose<C: 'static>(self, next: Transducer<B, C>) -> Transducer<A, C> {
        let Self {
            stages,
            run: first,
            lift: lift_first,
        } = self;
        let Transducer {
            stages: next_stages,
            run: second,
            lift: lift_second,
        } = next;

        Transducer {
            stages: stages.extended(next_stages),
            run: runner(move |iter| second(first(iter))),
            lift: lift(move |value| lift_first(value).and_then(|value| lift_second(value))),
        }
    }

    /// Lazily apply the transducer to a sequence.
    pub fn apply<'a, I>(&self, input: I) -> impl Iterator<Item = B> + 'a
    where
        I: IntoIterator<Item = A>,
        I::IntoIter: 'a,
    {
        (self.run)(Box::new(input.into_iter()))
    }

    /// Apply the transducer to a single value rather than a sequence.
    ///
    /// Each stage sees a one-item sequence and passes on the last item it emits.
    /// A stage that emits nothing, such as a `filter` whose predicate fails,
    /// rejects the value; the error is that stage.
    ///
    /// ```
    /// use parsley::{compose, transducer as t};
    ///
    /// let pipeline = compose!(
    ///     t::map("len", |s: String| s.len()),
    ///     t::filter("short", |n: &usize| *n < 4),
    /// );
    /// assert_eq!(pipeline.apply_value(String::from("abc")), Ok(3));
    ///
    /// let rejected = pipeline.apply_value(String::from("abcdef")).unwrap_err();
    /// assert_eq!(rejected.to_string(), "filter(short)");
    /// ```
    pub fn apply_value(&self, value: A) -> Result<B, Stage> {
        (self.lift)(value)
    }

    /// The flat list of stages making up the transducer.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    delegate! {
        to self.stages {
            /// The number of stages in the transducer.
            pub fn len(&self) -> usize;

            /// Whether the transducer has no stages.
            pub fn is_empty(&self) -> bool;
        }
    }
}

impl<A, B> fmt::Display for Transducer<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stages.as_slice() {
            [stage] => write!(f, "{stage}"),
            stages => write!(f, "compose({})", stages.iter().join(", ")),
        }
    }
}

/// Compose any number of transducers into one flat transducer.
///
/// With no arguments, this is [`Transducer::identity`].
#[macro_export]
macro_rules! compose {
    () => {
        $crate::transducer::Transducer::identity()
    };
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $first $(.compose($rest))*
    };
}

/// Transform each item.
pub fn map<A, B, F>(label: impl Into<Label>, f: F) -> Transducer<A, B>
where
    A: 'static,
    B: 'static,
    F: Fn(A) -> B + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let run: Runner<A, B> = runner(move |iter| {
        let f = Arc::clone(&f);
        Box::new(iter.map(move |item| f(item)))
    });
    Transducer::single(Stage::Map(label.into()), run)
}

/// Keep only the items for which the predicate returns `true`.
pub fn filter<A, F>(label: impl Into<Label>, predicate: F) -> Transducer<A, A>
where
    A: 'static,
    F: Fn(&A) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    let run: Runner<A, A> = runner(move |iter| {
        let predicate = Arc::clone(&predicate);
        Box::new(iter.filter(move |item| predicate(item)))
    });
    Transducer::single(Stage::Filter(label.into()), run)
}

/// Transform each item into any number of items, flattening the result.
pub fn flat_map<A, B, I, F>(label: impl Into<Label>, f: F) -> Transducer<A, B>
where
    A: 'static,
    B: 'static,
    I: IntoIterator<Item = B> + 'static,
    I::IntoIter: 'static,
    F: Fn(A) -> I + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let run: Runner<A, B> = runner(move |iter| {
        let f = Arc::clone(&f);
        Box::new(iter.flat_map(move |item| f(item)))
    });
    Transducer::single(Stage::FlatMap(label.into()), run)
}

/// Keep at most `count` items. A count of zero keeps nothing.
pub fn take<A: 'static>(count: usize) -> Transducer<A, A> {
    let run: Runner<A, A> = runner(move |iter| Box::new(iter.take(count)));
    Transducer::single(Stage::Take(count), run)
}

/// Skip the first `count` items. A count of zero skips nothing.
pub fn drop<A: 'static>(count: usize) -> Transducer<A, A> {
    let run: Runner<A, A> = runner(move |iter| Box::new(iter.skip(count)));
    Transducer::single(Stage::Drop(count), run)
}

/// Keep items until the predicate first returns `false`.
pub fn take_while<A, F>(label: impl Into<Label>, predicate: F) -> Transducer<A, A>
where
    A: 'static,
    F: Fn(&A) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    let run: Runner<A, A> = runner(move |iter| {
        let predicate = Arc::clone(&predicate);
        Box::new(iter.take_while(move |item| predicate(item)))
    });
    Transducer::single(Stage::TakeWhile(label.into()), run)
}

/// Skip items until the predicate first returns `false`.
pub fn drop_while<A, F>(label: impl Into<Label>, predicate: F) -> Transducer<A, A>
where
    A: 'static,
    F: Fn(&A) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    let run: Runner<A, A> = runner(move |iter| {
        let predicate = Arc::clone(&predicate);
        Box::new(iter.skip_while(move |item| predicate(item)))
    });
    Transducer::single(Stage::DropWhile(label.into()), run)
}

/// Overlapping windows of `size` items, advancing by one, dropping a short trailing window.
///
/// Equivalent to [`windowed_with`] using the defaults of [`Window`].
pub fn windowed<A: Clone + 'static>(size: usize) -> Result<Transducer<A, Vec<A>>, ConstructionError> {
    windowed_with(Window::builder().size(size).build())
}

/// Overlapping windows of items, configured by [`Window`].
///
/// Windows advance by `step` items. If the input runs out part way through a window,
/// that short window is emitted once if `remainder` is set, and dropped otherwise.
pub fn windowed_with<A: Clone + 'static>(
    window: Window,
) -> Result<Transducer<A, Vec<A>>, ConstructionError> {
    if window.size() == 0 || window.step() == 0 {
        return Err(ConstructionError::Window {
            size: window.size(),
            step: window.step(),
        });
    }

    let run: Runner<A, Vec<A>> = runner(move |iter| Box::new(iter.windowed(window)));
    Ok(Transducer::single(Stage::Windowed(window), run))
}

/// Remove consecutive duplicate items.
pub fn dedupe<A: PartialEq + 'static>() -> Transducer<A, A> {
    let run: Runner<A, A> = runner(|iter| Box::new(iter.dedup()));
    Transducer::single(Stage::Dedupe, run)
}

/// Remove every item that was already seen, keeping first occurrences in order.
pub fn unique<A: Clone + Eq + Hash + 'static>() -> Transducer<A, A> {
    let run: Runner<A, A> = runner(|iter| Box::new(iter.unique()));
    Transducer::single(Stage::Unique, run)
}

/// Sort the items by their natural order. The sort is stable.
pub fn sort<A: Ord + 'static>() -> Transducer<A, A> {
    let run: Runner<A, A> = runner(|iter| Box::new(iter.deferred(|iter| iter.sorted())));
    Transducer::single(Stage::Sort, run)
}

/// Sort the items with a comparator. The sort is stable.
pub fn sort_by<A, F>(label: impl Into<Label>, compare: F) -> Transducer<A, A>
where
    A: 'static,
    F: Fn(&A, &A) -> std::cmp::Ordering + Send + Sync + 'static,
{
    let compare = Arc::new(compare);
    let run: Runner<A, A> = runner(move |iter| {
        let compare = Arc::clone(&compare);
        Box::new(iter.deferred(move |iter| iter.sorted_by(|a, b| compare(a, b))))
    });
    Transducer::single(Stage::SortBy(label.into()), run)
}

/// Emit the seed, followed by each running accumulation.
/// The output is always one item longer than the input.
pub fn scan<A, S, F>(label: impl Into<Label>, reducer: F, seed: S) -> Transducer<A, S>
where
    A: 'static,
    S: Clone + fmt::Debug + Send + Sync + 'static,
    F: Fn(S, A) -> S + Send + Sync + 'static,
{
    let stage = Stage::Scan {
        reducer: label.into(),
        seed: format!("{seed:?}"),
    };
    let reducer = Arc::new(reducer);
    let run: Runner<A, S> = runner(move |iter| {
        let reducer = Arc::clone(&reducer);
        let running = iter.scan(seed.clone(), move |acc, item| {
            *acc = reducer(acc.clone(), item);
            Some(acc.clone())
        });
        Box::new(std::iter::once(seed.clone()).chain(running))
    });
    Transducer::single(stage, run)
}

/// Emit only the final accumulation; the seed if the input is empty.
pub fn reduce<A, S, F>(label: impl Into<Label>, reducer: F, seed: S) -> Transducer<A, S>
where
    A: 'static,
    S: Clone + fmt::Debug + Send + Sync + 'static,
    F: Fn(S, A) -> S + Send + Sync + 'static,
{
    let stage = Stage::Reduce {
        reducer: label.into(),
        seed: format!("{seed:?}"),
    };
    let reducer = Arc::new(reducer);
    let run: Runner<A, S> = runner(move |iter| {
        let reducer = Arc::clone(&reducer);
        let seed = seed.clone();
        Box::new(iter.deferred(move |iter| {
            std::iter::once(iter.fold(seed, |acc, item| reducer(acc, item)))
        }))
    });
    Transducer::single(stage, run)
}

/// Pair each item with the item at the same position in `other`,
/// stopping at the end of the shorter sequence.
///
/// `other` is iterated afresh, from a clone, each time the transducer is applied,
/// and only as far as the input reaches; it may be unbounded.
pub fn zip<A, B, I>(other: I) -> Transducer<A, (A, B)>
where
    A: 'static,
    B: 'static,
    I: IntoIterator<Item = B> + Clone + fmt::Debug + Send + Sync + 'static,
    I::IntoIter: 'static,
{
    let stage = Stage::Zip(format!("{other:?}"));
    let run: Runner<A, (A, B)> = runner(move |iter| Box::new(iter.zip(other.clone())));
    Transducer::single(stage, run)
}

/// Pair each item with its index.
pub fn enumerate<A: 'static>() -> Transducer<A, (usize, A)> {
    let run: Runner<A, (usize, A)> = runner(|iter| Box::new(iter.enumerate()));
    Transducer::single(Stage::Enumerate, run)
}

/// Observe each item as it passes through.
pub fn inspect<A, F>(label: impl Into<Label>, f: F) -> Transducer<A, A>
where
    A: 'static,
    F: Fn(&A) + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let run: Runner<A, A> = runner(move |iter| {
        let f = Arc::clone(&f);
        Box::new(iter.inspect(move |item| f(item)))
    });
    Transducer::single(Stage::Inspect(label.into()), run)
}
