#![doc = include_str!("../README.md")]
#![deny(clippy::invalid_regex)]

use thiserror::Error;

pub mod debugging;
mod ext;
pub mod grammar;
pub mod parser;
pub mod result;
pub mod segment;
pub mod transducer;
pub mod view;

/// Convenience import for the types most users of the crate need.
///
/// Transducer constructors share names with common iterator methods,
/// so they're reached through the `transducer` module: e.g. `transducer::map`.
pub mod prelude {
    pub use super::{
        compose,
        parser::{
            any, end, list, many, many1, pair, parser, repeat, satisfy, sequence,
            text::{pattern, regex, string},
            triple, tuple, Description, Parser, Pattern,
        },
        result::{ParseFailure, ParseResult},
        segment::{EmptySegmentError, Segment},
        transducer::{self, Label, Stage, Transducer, Window},
        view::{view, IntoView, Source, View},
        ConstructionError,
    };
}

/// Errors reported when building a parser or transducer from invalid configuration.
///
/// These are programmer errors, so they're reported when the parser or transducer
/// is built rather than when it runs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConstructionError {
    #[error("repeat bounds: min {min} is greater than max {max}")]
    Bounds { min: usize, max: usize },

    #[error("arity: expected {expected} parsers, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("window: size {size} and step {step} must both be nonzero")]
    Window { size: usize, step: usize },

    #[error("compile regex")]
    Regex(#[from] regex::Error),

    #[error("build regex automaton")]
    Automaton(#[from] regex_automata::dfa::dense::BuildError),
}
