//! Parsers over text.
//!
//! Text views are indexed by byte; every parser here consumes whole characters.

use regex::Regex;
use regex_automata::{
    dfa::{dense, Automaton},
    Anchored, Input, MatchKind,
};
use tracing::warn;

use crate::{result::ParseResult, view::View, ConstructionError};

use super::{Parser, Pattern};

/// Match a literal string.
pub fn string(literal: impl Into<String>) -> Parser<str, String> {
    let literal = literal.into();
    let pattern = Pattern::String(literal.clone());
    let reason = format!("expected {pattern}");
    Parser::new(pattern, move |input| {
        if input.as_str().starts_with(literal.as_str()) {
            ParseResult::success(literal.clone(), input.advance(literal.len()))
        } else {
            ParseResult::failure(reason.clone(), input.clone())
        }
    })
}

/// Match a regular expression at the current position, taking the longest match.
///
/// Every way the expression can match at the current position is considered,
/// and the longest wins: `a|ab` on `"abc"` matches `"ab"`.
/// Lazy repetitions such as `.*?` are therefore no different from greedy ones.
///
/// ```
/// # use parsley::{parser::text::regex, view::view};
/// let number = regex(r"\d+")?;
/// assert_eq!(number.to_string(), r"regex(/\d+/)");
///
/// let result = number.parse(&view("42 apples"));
/// assert_eq!(result.value().map(String::as_str), Some("42"));
/// assert_eq!(result.remainder().as_str(), " apples");
///
/// assert!(number.parse(&view("apples 42")).is_failure());
/// # Ok::<(), parsley::ConstructionError>(())
/// ```
pub fn regex(source: &str) -> Result<Parser<str, String>, ConstructionError> {
    Regex::new(source)?;
    let longest = dense::Builder::new()
        .configure(
            dense::Config::new()
                .match_kind(MatchKind::All)
                .unicode_word_boundary(true),
        )
        .build(source)?;

    let pattern = Pattern::Regex(source.to_owned());
    let reason = format!("expected {pattern}");
    Ok(Parser::new(pattern, move |input: &View<str>| {
        let search = Input::new(input.as_str()).anchored(Anchored::Yes);
        match longest.try_search_fwd(&search) {
            Ok(Some(found)) => {
                let text = input.slice(..found.offset()).as_str().to_owned();
                ParseResult::success(text, input.advance(found.offset()))
            }
            Ok(None) => ParseResult::failure(reason.clone(), input.clone()),
            Err(err) => {
                warn!(offset = input.offset(), %err, "regex search gave up");
                ParseResult::failure(reason.clone(), input.clone())
            }
        }
    }))
}

/// Match a compiled regular expression at the current position.
///
/// The expression keeps the semantics it was compiled with:
/// matching is leftmost-first, so alternations prefer their earliest branch
/// and lazy repetitions stop as early as they can.
///
/// Matches that don't begin at the current position are failures,
/// so expressions compiled without a leading `^` work as expected
/// (if more slowly, since they may scan ahead).
pub fn pattern(expression: &Regex) -> Parser<str, String> {
    let expression = expression.clone();
    let pattern = Pattern::Regex(expression.as_str().to_owned());
    let reason = format!("expected {pattern}");
    Parser::new(pattern, move |input: &View<str>| {
        match expression.find(input.as_str()) {
            Some(found) if found.start() == 0 => {
                ParseResult::success(found.as_str().to_owned(), input.advance(found.end()))
            }
            _ => ParseResult::failure(reason.clone(), input.clone()),
        }
    })
}
