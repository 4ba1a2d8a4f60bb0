//! The self-describing steps that make up pipelines.

use std::{borrow::Cow, fmt};

use getset::CopyGetters;
use strum::{EnumIs, IntoStaticStr};
use typed_builder::TypedBuilder;

/// The name given to a function when it's placed into a pipeline.
///
/// Functions can't be compared or printed, so each one is named at construction;
/// two stages holding functions are equal when their labels are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct Label(Cow<'static, str>);

impl Label {
    /// View the label as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Label {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Configures a windowing stage.
///
/// ```
/// # use parsley::transducer::Window;
/// let window = Window::builder().size(3).build();
/// assert_eq!(window.step(), 1);
/// assert!(!window.remainder());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, CopyGetters, TypedBuilder)]
#[getset(get_copy = "pub")]
pub struct Window {
    /// The number of items in each window.
    size: usize,

    /// How many items each window advances past the previous.
    #[builder(default = 1)]
    step: usize,

    /// Whether a trailing window shorter than `size` is emitted.
    #[builder(default)]
    remainder: bool,
}

/// A single primitive step of a pipeline, carrying the parameters it was built with.
///
/// Stages with the same tag and parameters are equal,
/// and render as `name(parameters)`:
///
/// ```
/// # use parsley::transducer::{Stage, Window};
/// assert_eq!(Stage::Take(3).to_string(), "take(3)");
/// assert_eq!(Stage::Dedupe.to_string(), "dedupe()");
/// assert_eq!(
///     Stage::Windowed(Window::builder().size(3).build()).to_string(),
///     "windowed(3, 1, false)",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, IntoStaticStr, EnumIs)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// Transform each item.
    Map(Label),

    /// Keep items matching a predicate.
    Filter(Label),

    /// Transform each item into any number of items.
    FlatMap(Label),

    /// Keep at most this many items.
    Take(usize),

    /// Skip this many items.
    Drop(usize),

    /// Keep items until a predicate fails.
    TakeWhile(Label),

    /// Skip items until a predicate fails.
    DropWhile(Label),

    /// Overlapping windows of items.
    Windowed(Window),

    /// Remove consecutive duplicates.
    Dedupe,

    /// Remove every repeated item.
    Unique,

    /// Sort by natural order.
    Sort,

    /// Sort by a comparator.
    SortBy(Label),

    /// Running accumulation, starting with the seed.
    /// The seed is held in its debug rendering.
    Scan { reducer: Label, seed: String },

    /// Final accumulation only.
    /// The seed is held in its debug rendering.
    Reduce { reducer: Label, seed: String },

    /// Pair items with a fixed sequence, held in its debug rendering.
    Zip(String),

    /// Pair items with their index.
    Enumerate,

    /// Observe items without changing them.
    Inspect(Label),
}

impl Stage {
    /// The tag of the stage.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            Stage::Map(label)
            | Stage::Filter(label)
            | Stage::FlatMap(label)
            | Stage::TakeWhile(label)
            | Stage::DropWhile(label)
            | Stage::SortBy(label)
            | Stage::Inspect(label) => write!(f, "{name}({label})"),
            Stage::Take(count) | Stage::Drop(count) => write!(f, "{name}({count})"),
            Stage::Windowed(window) => write!(
                f,
                "{name}({}, {}, {})",
                window.size(),
                window.step(),
                window.remainder()
            ),
            Stage::Dedupe | Stage::Unique | Stage::Sort | Stage::Enumerate => {
                write!(f, "{name}()")
            }
            Stage::Scan { reducer, seed } | Stage::Reduce { reducer, seed } => {
                write!(f, "{name}({reducer}, {seed})")
            }
            Stage::Zip(other) => write!(f, "{name}({other})"),
        }
    }
}
