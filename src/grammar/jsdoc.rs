//! Recognizes JSDoc comments, `/** ... */`, extracting their description and tags.
//!
//! ```
//! # use parsley::{grammar::jsdoc::doc, view::view};
//! let result = doc().parse(&view("/** @type {Map} */"));
//! let doc = result.into_value().expect("parses");
//! assert_eq!(doc.tag("type"), Some("Map"));
//! ```
//!
//! Tags are read as `@name {type}` or `@name value`, keeping only the first word of the value.
//! A tag appearing more than once keeps its last value.

use std::collections::BTreeMap;

use getset::Getters;
use itertools::Itertools;
use lazy_regex::regex;
use once_cell::sync::Lazy;
use tracing::trace;

use crate::{
    compose,
    parser::{
        text::{pattern, string},
        Parser,
    },
    transducer::{self as t, Transducer},
};

/// A parsed JSDoc comment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
#[getset(get = "pub")]
pub struct JsDoc {
    /// The free text before the first tag, with the comment gutter removed.
    description: String,

    /// Each tag, keyed by name.
    tags: BTreeMap<String, String>,
}

impl JsDoc {
    /// The value of the named tag, if present.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    #[tracing::instrument(skip_all, fields(body_len = body.len()))]
    fn from_body(body: &str) -> Self {
        let description = DESCRIPTION
            .apply(body.lines().map(String::from))
            .join("\n")
            .trim_end()
            .to_owned();

        let tags = regex!(r"(?:^|\s)@(\w+)(?:[ \t]*\{([^}]*)\}|[ \t]+([^\s*@]\S*))?")
            .captures_iter(body)
            .map(|captures| {
                let value = captures
                    .get(2)
                    .or_else(|| captures.get(3))
                    .map(|m| m.as_str().trim().to_owned())
                    .unwrap_or_default();
                (captures[1].to_owned(), value)
            })
            .collect::<BTreeMap<_, _>>();

        trace!(tags = tags.len(), "parsed jsdoc");
        Self { description, tags }
    }
}

/// Turns the lines of a comment body into the lines of its description.
static DESCRIPTION: Lazy<Transducer<String, String>> = Lazy::new(|| {
    compose!(
        t::map("strip_gutter", |line: String| strip_gutter(&line).to_owned()),
        t::take_while("before_tags", |line: &String| !line.starts_with('@')),
        t::drop_while("leading_blank", |line: &String| line.is_empty()),
    )
});

fn strip_gutter(line: &str) -> &str {
    let line = line.trim_start();
    line.strip_prefix('*').unwrap_or(line).trim()
}

/// Parse a single JSDoc comment at the current position.
///
/// Ordinary block comments, `/* ... */`, are not JSDoc and fail to parse.
pub fn doc() -> Parser<str, JsDoc> {
    pattern(regex!(r"^(?:[^*]|\*+[^*/])*"))
        .between(string("/**"), pattern(regex!(r"^\*+/")))
        .map("jsdoc", |body| JsDoc::from_body(&body))
}
