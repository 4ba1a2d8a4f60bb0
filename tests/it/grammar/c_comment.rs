use indoc::indoc;
use parsley::{
    grammar::c_comment::{comment, comments, Comment},
    view::view,
};
use pretty_assertions::assert_eq;

use crate::include_str_lf;

fn texts(comments: &[Comment]) -> Vec<&str> {
    comments.iter().map(|c| c.as_str()).collect()
}

#[test]
fn leading_comments() {
    crate::tracing::setup();

    let content = include_str_lf!("testdata/hello_world.c");
    let result = comments().parse(&view(content.as_str()));

    let found = result.value().map(|c| texts(c));
    assert_eq!(found, Some(vec!["* Prints a greeting.", "entry point"]));
    assert!(result.remainder().as_str().starts_with("\nint main() {"));
}

#[test]
fn leading_comments_crlf_lf() {
    crate::tracing::setup();

    // Normalize to \n regardless of the checkout, then expand back to \r\n.
    let content_lf = include_str_lf!("testdata/hello_world.c");
    let content_crlf = content_lf.replace('\n', "\r\n");

    let lf = comments().parse(&view(content_lf));
    let crlf = comments().parse(&view(content_crlf));

    // The comments are the same, but they end at different byte offsets.
    assert_eq!(lf.value(), crlf.value());
    assert_ne!(lf.remainder().offset(), crlf.remainder().offset());
    assert_eq!(crlf.remainder().as_str().lines().next(), Some(""));
}

#[test]
fn line_then_block() {
    crate::tracing::setup();

    let content = indoc! {"
        // first
        /* second
           spans lines */
        // third"};
    let result = comments().parse(&view(content));
    let found = result.value().map(|c| texts(c));
    assert_eq!(
        found,
        Some(vec!["first", "second\n   spans lines", "third"])
    );
    assert!(result.remainder().is_empty());
}

#[test]
fn comment_in_middle_of_input() {
    crate::tracing::setup();

    let input = view("x = 1; // set x");
    let start = input.as_str().find("//").expect("has comment");

    assert!(comment().parse(&input).is_failure());

    let result = comment().parse(&input.slice(start..));
    assert_eq!(result.value(), Some(&Comment::new(String::from("set x"))));
    assert_eq!(result.remainder().offset(), input.len());
}

#[test]
fn no_comments() {
    crate::tracing::setup();

    let input = view("int x;");
    let result = comments().parse(&input);
    assert_eq!(result.value(), Some(&Vec::new()));
    assert_eq!(result.remainder(), &input);
}
