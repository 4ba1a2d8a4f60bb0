use indoc::indoc;
use parsley::{
    grammar::jsdoc::{doc, JsDoc},
    parser::{many, text::regex},
    view::view,
};
use pretty_assertions::assert_eq;

use crate::include_str_lf;

#[test]
fn function_doc() {
    crate::tracing::setup();

    let content = include_str_lf!("testdata/add.js");
    let result = doc().parse(&view(content));

    let parsed = result.value().expect("must parse jsdoc");
    assert_eq!(parsed.description(), "Adds two numbers together.");
    assert_eq!(parsed.tag("param"), Some("number"));
    assert_eq!(parsed.tag("returns"), Some("number"));
    assert_eq!(parsed.tag("since"), Some("1.2.0"));
    assert_eq!(parsed.tag("throws"), None);
    assert!(result.remainder().as_str().starts_with("\nfunction add(a, b) {"));
}

#[test]
fn tags_are_ordered_by_name() {
    crate::tracing::setup();

    let parsed = doc()
        .parse(&view("/** @type {Map} @const @alias Lookup */"))
        .into_value()
        .expect("must parse jsdoc");

    let names = parsed.tags().keys().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(names, vec!["alias", "const", "type"]);
    assert_eq!(parsed.tag("type"), Some("Map"));
    assert_eq!(parsed.tag("alias"), Some("Lookup"));
}

#[test]
fn consecutive_docs() {
    crate::tracing::setup();

    let content = indoc! {"
        /** First. */
        /**
         * Second.
         * @deprecated
         */
    "};
    let whitespace = regex(r"\s*").expect("valid regex");
    let docs = many(doc().followed_by(whitespace));

    let result = docs.parse(&view(content));
    let parsed = result.into_value().expect("many never fails");
    let descriptions = parsed.iter().map(JsDoc::description).collect::<Vec<_>>();
    assert_eq!(descriptions, vec!["First.", "Second."]);
    assert_eq!(parsed[1].tag("deprecated"), Some(""));
}

#[test]
fn parser_describes_itself() {
    assert_eq!(
        doc().to_string(),
        r#"parser(between(regex(/^(?:[^*]|\*+[^*/])*/), string("/**"), regex(/^\*+//)), map(jsdoc))"#
    );
}
