//! Parsers: matchers from a [`View`] to a [`ParseResult`].
//!
//! A [`Parser`] is a base matcher plus an ordered list of [`Stage`]s threaded
//! through the result. Stages use the same vocabulary as [`Transducer`]s,
//! but `map`, `flat_map`, and `filter` are interpreted through [`ParseResult`]
//! rather than as operations on a sequence.
//! [`parser`] takes that vocabulary literally: it threads a parse value through a real
//! [`Transducer`].
//!
//! Every parser describes itself: the [`Description`] records the base pattern
//! and each stage as they were given at construction, and renders deterministically.
//!
//! ```
//! use parsley::{parser::{many, text::regex}, view::view};
//!
//! let digits = many(regex(r"\d")?).map("count", |digits| digits.len());
//! assert_eq!(digits.to_string(), r"parser(many(regex(/\d/)), map(count))");
//!
//! let result = digits.parse(&view("123abc"));
//! assert_eq!(result.value(), Some(&3));
//! assert_eq!(result.remainder().as_str(), "abc");
//! # Ok::<(), parsley::ConstructionError>(())
//! ```
//!
//! There is no ordered choice: a parser either matches at the current position
//! or fails, and no combinator backtracks into a parser that already succeeded.

use std::{fmt, sync::Arc};

use getset::Getters;
use itertools::Itertools;
use strum::{EnumIs, IntoStaticStr};
use tap::Pipe;
use tracing::trace;

use crate::{
    debugging::inspect_outcome,
    ext::vec::FunctionalVec,
    result::ParseResult,
    transducer::{Label, Stage, Transducer},
    view::{Source, View},
};

pub mod combinator;
pub mod text;

pub use combinator::{list, many, many1, pair, repeat, triple, tuple};

type Matcher<S, O> = Arc<dyn Fn(&View<S>) -> ParseResult<S, O> + Send + Sync>;

/// The base pattern a parser matches, before any stages.
///
/// One variant per primitive matcher and combinator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, IntoStaticStr, EnumIs)]
#[strum(serialize_all = "snake_case")]
pub enum Pattern {
    /// A literal string.
    String(String),

    /// A literal sequence of items, held in its debug rendering.
    Sequence(String),

    /// A regular expression anchored at the current position.
    Regex(String),

    /// A single item accepted by a predicate.
    Satisfy(Label),

    /// Any single item.
    Any,

    /// The end of input.
    End,

    /// A matcher supplied by the caller.
    Custom(Label),

    /// One parser followed by another.
    Then(Box<Description>, Box<Description>),

    /// A parser preceded by a discarded parser.
    PrecededBy(Box<Description>, Box<Description>),

    /// A parser followed by a discarded parser.
    FollowedBy(Box<Description>, Box<Description>),

    /// A parser between two discarded parsers.
    Between {
        core: Box<Description>,
        open: Box<Description>,
        close: Box<Description>,
    },

    /// Zero or more repetitions.
    Many(Box<Description>),

    /// One or more repetitions.
    Many1(Box<Description>),

    /// Between `min` and `max` repetitions.
    Repeat {
        inner: Box<Description>,
        min: usize,
        max: usize,
    },

    /// A homogeneous sequence of parsers.
    List(Vec<Description>),

    /// Two parsers in sequence.
    Pair(Box<Description>, Box<Description>),

    /// Three parsers in sequence.
    Triple(Box<Description>, Box<Description>, Box<Description>),

    /// A fixed-size sequence of parsers.
    Tuple(Vec<Description>),
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &'static str = self.into();
        match self {
            Pattern::String(literal) => write!(f, "{name}({literal:?})"),
            Pattern::Sequence(items) => write!(f, "{name}({items})"),
            Pattern::Regex(source) => write!(f, "{name}(/{source}/)"),
            Pattern::Satisfy(label) | Pattern::Custom(label) => write!(f, "{name}({label})"),
            Pattern::Any | Pattern::End => write!(f, "{name}()"),
            Pattern::Then(a, b)
            | Pattern::PrecededBy(a, b)
            | Pattern::FollowedBy(a, b)
            | Pattern::Pair(a, b) => write!(f, "{name}({a}, {b})"),
            Pattern::Between { core, open, close } => write!(f, "{name}({core}, {open}, {close})"),
            Pattern::Many(inner) | Pattern::Many1(inner) => write!(f, "{name}({inner})"),
            Pattern::Repeat { inner, min, max } => write!(f, "{name}({inner}, {min}, {max})"),
            Pattern::Triple(a, b, c) => write!(f, "{name}({a}, {b}, {c})"),
            Pattern::List(items) | Pattern::Tuple(items) => {
                write!(f, "{name}({})", items.iter().join(", "))
            }
        }
    }
}

/// The self-description of a [`Parser`]: its base pattern and the stages applied after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
#[getset(get = "pub")]
pub struct Description {
    /// The base pattern.
    pattern: Pattern,

    /// The stages applied to the base pattern's result, in order.
    stages: Vec<Stage>,
}

impl Description {
    /// Describe a bare pattern.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            stages: Vec::new(),
        }
    }

    fn staged(self, stages: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            stages: self.stages.extended(stages),
            ..self
        }
    }

    fn boxed(&self) -> Box<Self> {
        Box::new(self.clone())
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stages.is_empty() {
            return write!(f, "{}", self.pattern);
        }
        write!(f, "parser({}, {})", self.pattern, self.stages.iter().join(", "))
    }
}

/// Matches a [`View`] of `S`, producing a value of `O`.
///
/// Parsers hold no mutable state: they're cheap to clone,
/// safe to share between threads, and can be run on any number of inputs.
pub struct Parser<S: Source + ?Sized, O> {
    description: Description,
    matcher: Matcher<S, O>,
}

impl<S: Source + ?Sized, O: 'static> Parser<S, O> {
    /// Build a parser from a pattern and the matcher implementing it.
    fn new<F>(pattern: Pattern, matcher: F) -> Self
    where
        F: Fn(&View<S>) -> ParseResult<S, O> + Send + Sync + 'static,
    {
        Self::described(Description::new(pattern), matcher)
    }

    fn described<F>(description: Description, matcher: F) -> Self
    where
        F: Fn(&View<S>) -> ParseResult<S, O> + Send + Sync + 'static,
    {
        Self {
            description,
            matcher: Arc::new(matcher),
        }
    }

    /// Replace the description, keeping the matcher.
    /// Used by combinators built out of other combinators.
    fn redescribe(self, pattern: Pattern) -> Self {
        Self {
            description: Description::new(pattern),
            matcher: self.matcher,
        }
    }

    /// Build a parser with a caller supplied matcher.
    ///
    /// The matcher must report the remainder it stopped at in both variants of its result.
    pub fn custom<F>(label: impl Into<Label>, matcher: F) -> Self
    where
        F: Fn(&View<S>) -> ParseResult<S, O> + Send + Sync + 'static,
    {
        Self::new(Pattern::Custom(label.into()), matcher)
    }

    /// Run the parser on the input.
    pub fn parse(&self, input: &View<S>) -> ParseResult<S, O> {
        let outcome = (self.matcher)(input);
        inspect_outcome(&self.description, input, &outcome);
        outcome
    }

    /// The self-description of the parser.
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Transform the value of a successful parse.
    pub fn map<P, F>(self, label: impl Into<Label>, f: F) -> Parser<S, P>
    where
        P: 'static,
        F: Fn(O) -> P + Send + Sync + 'static,
    {
        let Self {
            description,
            matcher,
        } = self;
        let description = description.staged([Stage::Map(label.into())]);
        Parser::described(description, move |input| matcher(input).map(&f))
    }

    /// Continue a successful parse with a parser chosen by its value.
    ///
    /// The chosen parser runs on the remainder, and its remainder becomes the remainder
    /// of the whole parse.
    pub fn flat_map<P, F>(self, label: impl Into<Label>, f: F) -> Parser<S, P>
    where
        P: 'static,
        F: Fn(O) -> Parser<S, P> + Send + Sync + 'static,
    {
        let Self {
            description,
            matcher,
        } = self;
        let description = description.staged([Stage::FlatMap(label.into())]);
        Parser::described(description, move |input| {
            matcher(input).flat_map(|value, rest| f(value).parse(&rest))
        })
    }

    /// Reject a successful parse whose value fails the predicate.
    ///
    /// The rejection is a failure at the position the parser started from.
    pub fn filter<F>(self, label: impl Into<Label>, predicate: F) -> Self
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        let Self {
            description,
            matcher,
        } = self;
        let stage = Stage::Filter(label.into());
        let reason = stage.to_string();
        let description = description.staged([stage]);
        Parser::described(description, move |input| match matcher(input) {
            ParseResult::Success { value, remainder } if predicate(&value) => {
                ParseResult::success(value, remainder)
            }
            ParseResult::Success { .. } => {
                trace!(offset = input.offset(), %reason, "rejected");
                ParseResult::failure(reason.clone(), input.clone())
            }
            failure => failure,
        })
    }

    /// Run a transducer over the items of a successful parse,
    /// collecting its output.
    ///
    /// The transducer's stages are appended to this parser's description.
    pub fn pipe<A, B>(self, transducer: Transducer<A, B>) -> Parser<S, Vec<B>>
    where
        O: IntoIterator<Item = A>,
        A: 'static,
        B: 'static,
    {
        let Self {
            description,
            matcher,
        } = self;
        let description = description.staged(transducer.stages().iter().cloned());
        Parser::described(description, move |input| {
            matcher(input).map(|value| transducer.apply(value).collect())
        })
    }
}

impl<S: Source + ?Sized, O> Clone for Parser<S, O> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            matcher: Arc::clone(&self.matcher),
        }
    }
}

/// Parsers compare by description.
impl<S: Source + ?Sized, O> PartialEq for Parser<S, O> {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}

impl<S: Source + ?Sized, O> fmt::Display for Parser<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl<S: Source + ?Sized, O> fmt::Debug for Parser<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parser").field(&self.description).finish()
    }
}

/// Thread the value of each successful parse by `base` through `transducer`.
///
/// The value is handed to the transducer as a single value rather than a sequence
/// (see [`Transducer::apply_value`]) by way of [`ParseResult::flat_map`],
/// so the remainder is the one `base` stopped at.
/// A stage that rejects the value, such as a failing `filter`, fails the parse
/// at the position `base` started from, with the stage as the reason.
///
/// Pass several transducers by composing them with [`compose!`](crate::compose).
///
/// ```
/// use parsley::{compose, parser::{parser, text::string}, transducer as t, view::view};
///
/// let short = parser(
///     string("ab"),
///     compose!(t::map("len", |s: String| s.len()), t::filter("even", |n: &usize| n % 2 == 0)),
/// );
/// assert_eq!(short.to_string(), r#"parser(string("ab"), map(len), filter(even))"#);
///
/// let result = short.parse(&view("abc"));
/// assert_eq!(result.value(), Some(&2));
/// assert_eq!(result.remainder().as_str(), "c");
/// ```
pub fn parser<S, O, P>(base: Parser<S, O>, transducer: Transducer<O, P>) -> Parser<S, P>
where
    S: Source + ?Sized,
    O: 'static,
    P: 'static,
{
    let Parser {
        description,
        matcher,
    } = base;
    let description = description.staged(transducer.stages().iter().cloned());
    Parser::described(description, move |input: &View<S>| {
        matcher(input).flat_map(|value, rest| match transducer.apply_value(value) {
            Ok(value) => ParseResult::success(value, rest),
            Err(stage) => {
                trace!(offset = input.offset(), %stage, "rejected");
                ParseResult::failure(stage.to_string(), input.clone())
            }
        })
    })
}

/// Match a single item accepted by the predicate.
pub fn satisfy<S, F>(label: impl Into<Label>, predicate: F) -> Parser<S, S::Item>
where
    S: Source + ?Sized,
    F: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
    let pattern = Pattern::Satisfy(label.into());
    let reason = format!("expected {pattern}");
    Parser::new(pattern, move |input| match input.peek() {
        Some((item, width)) if predicate(&item) => ParseResult::success(item, input.advance(width)),
        _ => ParseResult::failure(reason.clone(), input.clone()),
    })
}

/// Match any single item.
pub fn any<S: Source + ?Sized>() -> Parser<S, S::Item> {
    Parser::new(Pattern::Any, |input| match input.peek() {
        Some((item, width)) => ParseResult::success(item, input.advance(width)),
        None => ParseResult::failure("expected any()", input.clone()),
    })
}

/// Match the end of input, consuming nothing.
pub fn end<S: Source + ?Sized>() -> Parser<S, ()> {
    Parser::new(Pattern::End, |input| {
        if input.is_empty() {
            ParseResult::success((), input.clone())
        } else {
            ParseResult::failure("expected end()", input.clone())
        }
    })
}

/// Match a literal sequence of items.
pub fn sequence<T>(items: impl Into<Vec<T>>) -> Parser<[T], Vec<T>>
where
    T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    let items = items.into();
    let pattern = format!("{items:?}").pipe(Pattern::Sequence);
    let reason = format!("expected {pattern}");
    Parser::new(pattern, move |input: &View<[T]>| {
        if input.as_source().starts_with(&items) {
            ParseResult::success(items.clone(), input.advance(items.len()))
        } else {
            ParseResult::failure(reason.clone(), input.clone())
        }
    })
}
