//! Combinators building parsers out of other parsers.
//!
//! Each combinator is composed from the parsers it's given and then re-described,
//! so its rendering names the combinator rather than the composition behind it.
//! Failures short-circuit: the first parser to fail ends the parse,
//! and its failure is returned unchanged.

use nonempty::NonEmpty;
use tracing::trace;

use crate::{
    ext::vec::FunctionalVec,
    result::ParseResult,
    view::{Source, View},
    ConstructionError,
};

use super::{Parser, Pattern};

impl<S: Source + ?Sized, O: 'static> Parser<S, O> {
    /// Run this parser, then `next` on the remainder.
    ///
    /// ```
    /// # use parsley::{parser::text::string, view::view};
    /// let greeting = string("hello").then(string(" world"));
    /// assert_eq!(greeting.to_string(), r#"then(string("hello"), string(" world"))"#);
    ///
    /// let result = greeting.parse(&view("hello world!"));
    /// assert_eq!(result.remainder().as_str(), "!");
    /// ```
    pub fn then<P: 'static>(self, next: Parser<S, P>) -> Parser<S, (O, P)> {
        let pattern = Pattern::Then(self.description.boxed(), next.description.boxed());
        Parser::new(pattern, move |input| {
            self.parse(input)
                .flat_map(|first, rest| next.parse(&rest).map(|second| (first, second)))
        })
    }

    /// Require `open` before this parser, discarding its value.
    pub fn preceded_by<P: 'static>(self, open: Parser<S, P>) -> Self {
        let pattern = Pattern::PrecededBy(self.description.boxed(), open.description.boxed());
        open.then(self)
            .map("second", |(_, value)| value)
            .redescribe(pattern)
    }

    /// Require `close` after this parser, discarding its value.
    pub fn followed_by<P: 'static>(self, close: Parser<S, P>) -> Self {
        let pattern = Pattern::FollowedBy(self.description.boxed(), close.description.boxed());
        self.then(close)
            .map("first", |(value, _)| value)
            .redescribe(pattern)
    }

    /// Require `open` before and `close` after this parser, discarding both of their values.
    pub fn between<P: 'static, Q: 'static>(self, open: Parser<S, P>, close: Parser<S, Q>) -> Self {
        let pattern = Pattern::Between {
            core: self.description.boxed(),
            open: open.description.boxed(),
            close: close.description.boxed(),
        };
        self.preceded_by(open).followed_by(close).redescribe(pattern)
    }
}

/// Run the parser until it fails or stops consuming input, collecting every value.
///
/// Never fails: zero matches is a success with an empty list and the input unchanged.
/// A success that consumes nothing is collected and then ends the repetition.
pub fn many<S, O>(parser: Parser<S, O>) -> Parser<S, Vec<O>>
where
    S: Source + ?Sized,
    O: 'static,
{
    let pattern = Pattern::Many(parser.description.boxed());
    Parser::new(pattern, move |input| {
        let (values, remainder) = repeatedly(&parser, input, usize::MAX);
        ParseResult::success(values, remainder)
    })
}

/// Like [`many`], but fails unless the parser matches at least once.
pub fn many1<S, O>(parser: Parser<S, O>) -> Parser<S, NonEmpty<O>>
where
    S: Source + ?Sized,
    O: 'static,
{
    let pattern = Pattern::Many1(parser.description.boxed());
    let reason = format!("expected at least 1 of {}", parser.description);
    Parser::new(pattern, move |input: &View<S>| match parser.parse(input) {
        ParseResult::Success { value, remainder } if remainder.offset() == input.offset() => {
            ParseResult::success(NonEmpty::new(value), remainder)
        }
        ParseResult::Success { value, remainder } => {
            let (rest, remainder) = repeatedly(&parser, &remainder, usize::MAX);
            ParseResult::success(NonEmpty::new(value).extended(rest), remainder)
        }
        ParseResult::Failure { .. } => ParseResult::failure(reason.clone(), input.clone()),
    })
}

/// Run the parser at least `min` and at most `max` times, collecting every value.
///
/// Matching stops after `max` successes; fewer than `min` is a failure
/// at the position the last attempt stopped.
///
/// ```
/// # use parsley::{parser::{repeat, text::regex}, view::view};
/// let digits = repeat(regex(r"\d")?, 2, 4)?;
/// assert_eq!(digits.to_string(), r"repeat(regex(/\d/), 2, 4)");
///
/// let result = digits.parse(&view("123456"));
/// assert_eq!(result.value(), Some(&vec![String::from("1"), String::from("2"), String::from("3"), String::from("4")]));
/// assert_eq!(result.remainder().as_str(), "56");
/// # Ok::<(), parsley::ConstructionError>(())
/// ```
pub fn repeat<S, O>(
    parser: Parser<S, O>,
    min: usize,
    max: usize,
) -> Result<Parser<S, Vec<O>>, ConstructionError>
where
    S: Source + ?Sized,
    O: 'static,
{
    if min > max {
        return Err(ConstructionError::Bounds { min, max });
    }

    let inner = parser.description.boxed();
    let reason = format!("expected at least {min} of {inner}");
    let pattern = Pattern::Repeat { inner, min, max };
    Ok(Parser::new(pattern, move |input| {
        let (values, remainder) = repeatedly(&parser, input, max);
        if values.len() < min {
            let found = values.len();
            ParseResult::failure(format!("{reason}, found {found}"), remainder)
        } else {
            ParseResult::success(values, remainder)
        }
    }))
}

fn repeatedly<S, O>(parser: &Parser<S, O>, input: &View<S>, max: usize) -> (Vec<O>, View<S>)
where
    S: Source + ?Sized,
    O: 'static,
{
    let mut values = Vec::new();
    let mut rest = input.clone();
    while values.len() < max {
        match parser.parse(&rest) {
            ParseResult::Success { value, remainder } => {
                let consumed = remainder.offset() != rest.offset();
                values.push(value);
                rest = remainder;
                if !consumed {
                    break;
                }
            }
            ParseResult::Failure { .. } => break,
        }
    }

    trace!(count = values.len(), offset = rest.offset(), "repetition ended");
    (values, rest)
}

/// Run each parser in order, collecting their values.
///
/// An empty list always succeeds without consuming input.
pub fn list<S, O>(parsers: Vec<Parser<S, O>>) -> Parser<S, Vec<O>>
where
    S: Source + ?Sized,
    O: 'static,
{
    let pattern = Pattern::List(
        parsers
            .iter()
            .map(|parser| parser.description.clone())
            .collect(),
    );

    let start = Parser::new(Pattern::List(Vec::new()), |input: &View<S>| {
        ParseResult::success(Vec::new(), input.clone())
    });
    parsers
        .into_iter()
        .fold(start, |collected, parser| {
            collected
                .then(parser)
                .map("push", |(values, value)| values.pushed(value))
        })
        .redescribe(pattern)
}

/// Run two parsers in order, pairing their values.
pub fn pair<S, A, B>(first: Parser<S, A>, second: Parser<S, B>) -> Parser<S, (A, B)>
where
    S: Source + ?Sized,
    A: 'static,
    B: 'static,
{
    let pattern = Pattern::Pair(first.description.boxed(), second.description.boxed());
    first.then(second).redescribe(pattern)
}

/// Run three parsers in order, collecting their values.
pub fn triple<S, A, B, C>(
    first: Parser<S, A>,
    second: Parser<S, B>,
    third: Parser<S, C>,
) -> Parser<S, (A, B, C)>
where
    S: Source + ?Sized,
    A: 'static,
    B: 'static,
    C: 'static,
{
    let pattern = Pattern::Triple(
        first.description.boxed(),
        second.description.boxed(),
        third.description.boxed(),
    );
    first
        .then(second)
        .then(third)
        .map("flatten", |((a, b), c)| (a, b, c))
        .redescribe(pattern)
}

/// Run exactly `N` parsers in order, collecting their values into an array.
///
/// Providing any other number of parsers is a construction error.
pub fn tuple<const N: usize, S, O>(
    parsers: Vec<Parser<S, O>>,
) -> Result<Parser<S, [O; N]>, ConstructionError>
where
    S: Source + ?Sized,
    O: 'static,
{
    if parsers.len() != N {
        return Err(ConstructionError::Arity {
            expected: N,
            found: parsers.len(),
        });
    }

    let pattern = Pattern::Tuple(
        parsers
            .iter()
            .map(|parser| parser.description.clone())
            .collect(),
    );
    let sequential = list(parsers);
    Ok(Parser::new(pattern, move |input| {
        sequential
            .parse(input)
            .flat_map(|values, rest| match <[O; N]>::try_from(values) {
                Ok(values) => ParseResult::success(values, rest),
                Err(values) => {
                    ParseResult::failure(format!("expected {N} values, found {}", values.len()), rest)
                }
            })
    }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        parser::{
            any, end,
            text::{regex, string},
        },
        view::view,
    };

    use super::*;

    fn digit() -> Parser<str, String> {
        regex(r"\d").expect("valid regex")
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn then_pairs_values() {
        let parser = string("a").then(digit());
        let result = parser.parse(&view("a1b"));
        assert_eq!(result.value(), Some(&(String::from("a"), String::from("1"))));
        assert_eq!(result.remainder().as_str(), "b");
    }

    #[test]
    fn then_short_circuits() {
        let parser = string("a").then(digit());

        let result = parser.parse(&view("b1"));
        assert_eq!(result.reason(), Some(r#"expected string("a")"#));
        assert_eq!(result.remainder().offset(), 0);

        let result = parser.parse(&view("ab"));
        assert_eq!(result.reason(), Some(r"expected regex(/\d/)"));
        assert_eq!(result.remainder().offset(), 1);
    }

    #[test]
    fn between_discards_delimiters() {
        let parser = many(digit()).between(string("("), string(")"));
        assert_eq!(
            parser.to_string(),
            r#"between(many(regex(/\d/)), string("("), string(")"))"#
        );

        let result = parser.parse(&view("(12)x"));
        assert_eq!(result.value(), Some(&strings(&["1", "2"])));
        assert_eq!(result.remainder().as_str(), "x");

        assert!(parser.parse(&view("(12")).is_failure());
        assert!(parser.parse(&view("12)")).is_failure());
    }

    #[test]
    fn preceded_and_followed() {
        let preceded = digit().preceded_by(string("#"));
        assert_eq!(preceded.to_string(), r##"preceded_by(regex(/\d/), string("#"))"##);
        assert_eq!(preceded.parse(&view("#1")).value().map(String::as_str), Some("1"));

        let followed = digit().followed_by(string(";"));
        assert_eq!(followed.to_string(), r#"followed_by(regex(/\d/), string(";"))"#);
        let result = followed.parse(&view("1;2"));
        assert_eq!(result.value().map(String::as_str), Some("1"));
        assert_eq!(result.remainder().as_str(), "2");
    }

    #[test]
    fn many_zero_matches() {
        let input = view("abc");
        let result = many(digit()).parse(&input);
        assert_eq!(result, ParseResult::success(Vec::new(), input));
    }

    #[test]
    fn many_collects() {
        let result = many(digit()).parse(&view("12a"));
        assert_eq!(result.value(), Some(&strings(&["1", "2"])));
        assert_eq!(result.remainder().as_str(), "a");
    }

    #[test]
    fn many_stops_on_zero_width() {
        let result = many(end::<str>()).parse(&view(""));
        assert_eq!(result.value(), Some(&vec![()]));
    }

    #[test]
    fn many1_requires_one() {
        let parser = many1(digit());
        assert_eq!(parser.to_string(), r"many1(regex(/\d/))");

        let result = parser.parse(&view("12"));
        assert_eq!(result.value().map(|values| values.len()), Some(2));

        let result = parser.parse(&view("a"));
        assert_eq!(result.reason(), Some(r"expected at least 1 of regex(/\d/)"));
        assert_eq!(result.remainder().offset(), 0);
    }

    #[test]
    fn many1_collects_in_order() {
        let result = many1(digit()).parse(&view("123a"));
        assert_eq!(
            result.value().map(|values| values.iter().map(String::as_str).collect::<Vec<_>>()),
            Some(vec!["1", "2", "3"])
        );
        assert_eq!(result.remainder().as_str(), "a");

        let result = many1(end::<str>()).parse(&view(""));
        assert_eq!(result.value().map(|values| values.len()), Some(1));
    }

    #[test]
    fn repeat_stops_at_max() {
        let parser = repeat(digit(), 2, 4).expect("valid bounds");
        let result = parser.parse(&view("123456"));
        assert_eq!(result.value(), Some(&strings(&["1", "2", "3", "4"])));
        assert_eq!(result.remainder().as_str(), "56");
    }

    #[test]
    fn repeat_takes_what_is_available() {
        let parser = repeat(digit(), 2, 4).expect("valid bounds");
        let result = parser.parse(&view("123"));
        assert_eq!(result.value(), Some(&strings(&["1", "2", "3"])));
        assert_eq!(result.remainder().as_str(), "");
    }

    #[test]
    fn repeat_fails_below_min() {
        let parser = repeat(digit(), 2, 4).expect("valid bounds");
        let result = parser.parse(&view("1abc"));
        assert_eq!(
            result.reason(),
            Some(r"expected at least 2 of regex(/\d/), found 1")
        );
        assert_eq!(result.remainder().as_str(), "abc");
    }

    #[test]
    fn repeat_exact() {
        let parser = repeat(digit(), 2, 2).expect("valid bounds");
        let result = parser.parse(&view("123"));
        assert_eq!(result.value(), Some(&strings(&["1", "2"])));
        assert_eq!(result.remainder().as_str(), "3");
    }

    #[test]
    fn repeat_rejects_inverted_bounds() {
        let err = repeat(digit(), 3, 1).expect_err("bounds are inverted");
        assert!(matches!(err, ConstructionError::Bounds { min: 3, max: 1 }));
    }

    #[test]
    fn list_runs_in_order() {
        let parser = list(vec![string("a"), digit(), string("b")]);
        assert_eq!(
            parser.to_string(),
            r#"list(string("a"), regex(/\d/), string("b"))"#
        );

        let result = parser.parse(&view("a1bc"));
        assert_eq!(result.value(), Some(&strings(&["a", "1", "b"])));
        assert_eq!(result.remainder().as_str(), "c");

        let result = parser.parse(&view("a1c"));
        assert_eq!(result.remainder().offset(), 2);
    }

    #[test]
    fn empty_list_succeeds() {
        let input = view(vec![1, 2]);
        let result = list(Vec::<Parser<[i32], i32>>::new()).parse(&input);
        assert_eq!(result, ParseResult::success(Vec::new(), input));
    }

    #[test]
    fn pair_and_triple() {
        let parser = pair(string("a"), any::<str>());
        assert_eq!(parser.to_string(), r#"pair(string("a"), any())"#);
        assert_eq!(parser.parse(&view("ab")).value(), Some(&(String::from("a"), 'b')));

        let parser = triple(any::<str>(), digit(), end());
        assert_eq!(parser.to_string(), r"triple(any(), regex(/\d/), end())");
        assert_eq!(parser.parse(&view("x1")).value(), Some(&('x', String::from("1"), ())));
        assert!(parser.parse(&view("x1y")).is_failure());
    }

    #[test]
    fn tuple_checks_arity() {
        let parser = tuple::<2, _, _>(vec![digit(), digit()]).expect("arity matches");
        assert_eq!(parser.to_string(), r"tuple(regex(/\d/), regex(/\d/))");
        let result = parser.parse(&view("123"));
        assert_eq!(result.value(), Some(&[String::from("1"), String::from("2")]));

        let err = tuple::<2, _, _>(vec![digit(), digit(), digit()]).expect_err("arity differs");
        assert!(matches!(err, ConstructionError::Arity { expected: 2, found: 3 }));
    }
}
