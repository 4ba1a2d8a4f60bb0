//! Recognizes comments in C source code.
//!
//! Both forms of comment are supported:
//! - Line comments, `// ...`, running to the end of the line.
//!   The newline itself is not consumed.
//! - Block comments, `/* ... */`, running to the first `*/`.
//!   Block comments don't nest.
//!
//! ```
//! # use parsley::{grammar::c_comment::{comment, Comment}, view::view};
//! let result = comment().parse(&view("// hello\nint x;"));
//! assert_eq!(result.value(), Some(&Comment::new(String::from("hello"))));
//! assert_eq!(result.remainder().as_str(), "\nint x;");
//! ```

use derive_more::{Constructor, Deref, Display};
use lazy_regex::regex;
use tap::Pipe;
use tracing::trace;

use crate::{
    debugging::ToDisplayEscaped,
    parser::{many, text::pattern, Parser},
};

/// The text of a comment, with its markers stripped and surrounding whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Constructor)]
#[display(fmt = "Comment({:?})", _0)]
pub struct Comment(String);

/// Parse a single comment at the current position.
pub fn comment() -> Parser<str, Comment> {
    pattern(regex!(r"^(?://[^\n]*|/\*(?s:.*?)\*/)"))
        .map("strip_markers", |text| strip_markers(&text).pipe(Comment))
}

/// Parse every comment at the current position, skipping whitespace before each.
///
/// Stops at the first non-whitespace text that isn't a comment;
/// trailing whitespace is left in the remainder.
pub fn comments() -> Parser<str, Vec<Comment>> {
    many(comment().preceded_by(pattern(regex!(r"^\s*"))))
}

#[tracing::instrument(skip_all)]
fn strip_markers(text: &str) -> String {
    let body = text
        .strip_prefix("//")
        .or_else(|| text.strip_prefix("/*")?.strip_suffix("*/"))
        .unwrap_or(text)
        .trim();
    trace!(comment = %body.display_escaped());
    body.to_owned()
}
