//! The outcome of a parse attempt.

use std::fmt::{self, Debug, Display};

use getset::{CopyGetters, Getters};
use thiserror::Error;

use crate::view::{Source, View};

/// The outcome of running a parser over a [`View`].
///
/// Ordinary parse failure is data, not an error:
/// callers branch on the variant, and combinators propagate [`ParseResult::Failure`] unchanged
/// unless they explicitly tolerate it.
pub enum ParseResult<S: Source + ?Sized, O> {
    /// The parser matched, producing `value`; `remainder` is the unconsumed input.
    Success { value: O, remainder: View<S> },

    /// The parser did not match; `remainder` is the input at the position matching stopped.
    Failure { reason: String, remainder: View<S> },
}

impl<S: Source + ?Sized, O> ParseResult<S, O> {
    /// Construct a successful result.
    pub fn success(value: O, remainder: View<S>) -> Self {
        Self::Success { value, remainder }
    }

    /// Construct a failed result.
    pub fn failure(reason: impl Into<String>, remainder: View<S>) -> Self {
        Self::Failure {
            reason: reason.into(),
            remainder,
        }
    }

    /// Whether this is a [`ParseResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether this is a [`ParseResult::Failure`].
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The parsed value, if successful.
    pub fn value(&self) -> Option<&O> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Take the parsed value, if successful.
    pub fn into_value(self) -> Option<O> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// The failure reason, if failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    /// The remaining input, regardless of variant.
    pub fn remainder(&self) -> &View<S> {
        match self {
            Self::Success { remainder, .. } => remainder,
            Self::Failure { remainder, .. } => remainder,
        }
    }

    /// Rewrite the value of a success. Failures pass through untouched.
    pub fn map<P>(self, f: impl FnOnce(O) -> P) -> ParseResult<S, P> {
        match self {
            Self::Success { value, remainder } => ParseResult::Success {
                value: f(value),
                remainder,
            },
            Self::Failure { reason, remainder } => ParseResult::Failure { reason, remainder },
        }
    }

    /// Continue a success with a function of its value and remainder.
    ///
    /// The returned result, including its remainder, replaces this one;
    /// this lets value-dependent parses consume more input.
    /// Failures pass through untouched.
    ///
    /// ```
    /// # use parsley::{result::ParseResult, view::view};
    /// let input = view("ab");
    /// let first = ParseResult::success('a', input.advance(1));
    ///
    /// let second = first.flat_map(|a, rest| match rest.at(0) {
    ///     Some(b) => ParseResult::success(format!("{a}{b}"), rest.advance(1)),
    ///     None => ParseResult::failure("expected a second letter", rest),
    /// });
    /// assert_eq!(second.value().map(String::as_str), Some("ab"));
    /// assert!(second.remainder().is_empty());
    /// ```
    pub fn flat_map<P>(self, f: impl FnOnce(O, View<S>) -> ParseResult<S, P>) -> ParseResult<S, P> {
        match self {
            Self::Success { value, remainder } => f(value, remainder),
            Self::Failure { reason, remainder } => ParseResult::Failure { reason, remainder },
        }
    }

    /// Convert into a standard result, so callers can use `?`.
    pub fn into_result(self) -> Result<(O, View<S>), ParseFailure> {
        match self {
            Self::Success { value, remainder } => Ok((value, remainder)),
            Self::Failure { reason, remainder } => Err(ParseFailure {
                reason,
                offset: remainder.offset(),
            }),
        }
    }
}

impl<S: Source + ?Sized, O: Clone> Clone for ParseResult<S, O> {
    fn clone(&self) -> Self {
        match self {
            Self::Success { value, remainder } => Self::success(value.clone(), remainder.clone()),
            Self::Failure { reason, remainder } => Self::failure(reason.clone(), remainder.clone()),
        }
    }
}

impl<S: Source + PartialEq + ?Sized, O: PartialEq> PartialEq for ParseResult<S, O> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Success { value, remainder },
                Self::Success {
                    value: other_value,
                    remainder: other_remainder,
                },
            ) => value == other_value && remainder == other_remainder,
            (
                Self::Failure { reason, remainder },
                Self::Failure {
                    reason: other_reason,
                    remainder: other_remainder,
                },
            ) => reason == other_reason && remainder == other_remainder,
            _ => false,
        }
    }
}

impl<S: Source + Debug + ?Sized, O: Debug> Display for ParseResult<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { value, remainder } => write!(f, "Success({value:?}, {remainder})"),
            Self::Failure { reason, remainder } => write!(f, "Failure({reason}, {remainder})"),
        }
    }
}

impl<S: Source + Debug + ?Sized, O: Debug> Debug for ParseResult<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// A failed parse, converted into an error by [`ParseResult::into_result`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Getters, CopyGetters)]
#[error("parse failed at offset {offset}: {reason}")]
pub struct ParseFailure {
    /// Why the parse failed.
    #[getset(get = "pub")]
    reason: String,

    /// The offset into the backing source at which matching stopped.
    #[getset(get_copy = "pub")]
    offset: usize,
}
