//! Provides debugging helpers to parsers.

use tracing::trace;

use crate::{
    parser::Description,
    result::ParseResult,
    view::{Source, View},
};

/// Conversion trait for types that can be represented with [`EscapedText`].
pub trait ToDisplayEscaped {
    fn display_escaped(&self) -> EscapedText<'_>;
}

impl<T: AsRef<str>> ToDisplayEscaped for T {
    fn display_escaped(&self) -> EscapedText<'_> {
        EscapedText {
            text: self.as_ref(),
        }
    }
}

/// Wraps text, escaping control characters and quotes when invoked by `Display`.
#[derive(Debug)]
pub struct EscapedText<'a> {
    text: &'a str,
}

impl<'a> std::fmt::Display for EscapedText<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text.escape_debug())
    }
}

/// Traces the outcome of running a parser.
///
/// Only the position and extent are recorded, since arbitrary sources can't be rendered cheaply.
pub(crate) fn inspect_outcome<S, O>(
    description: &Description,
    input: &View<S>,
    outcome: &ParseResult<S, O>,
) where
    S: Source + ?Sized,
{
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }

    match outcome {
        ParseResult::Success { remainder, .. } => trace!(
            parser = %description,
            start = input.offset(),
            end = remainder.offset(),
            kind = %"success",
        ),
        ParseResult::Failure { reason, remainder } => trace!(
            parser = %description,
            start = input.offset(),
            stopped = remainder.offset(),
            reason = %reason.display_escaped(),
            kind = %"failure",
        ),
    }
}
