use std::{sync::Arc, thread};

use parsley::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn view_slice_matches_at() {
    let input = view(vec![10, 20, 30, 40]);
    for i in 0..input.len() {
        assert_eq!(input.slice(i..).at(0), input.at(i));
    }

    let narrowed = input.slice(1..3);
    assert_eq!(narrowed.at(2), None);
    assert_eq!(narrowed.len(), 2);
}

#[test]
fn segment_tails_reach_empty() {
    let segment = Segment::from_vec(vec!['a', 'b', 'c']);
    let tail = (0..segment.len()).fold(segment.clone(), |s, _| s.tail());
    assert!(tail.is_empty());
    assert_eq!(tail, Segment::empty());
    assert!(matches!(tail.head(), Err(EmptySegmentError)));

    // Segments restart: iterating twice yields the same items.
    assert_eq!(segment.iter().collect::<Vec<_>>(), segment.iter().collect::<Vec<_>>());
}

#[test]
fn composition_flattens() {
    let a = || transducer::map("inc", |x: i32| x + 1);
    let b = || transducer::filter("even", |x: &i32| x % 2 == 0);
    let c = || transducer::take::<i32>(2);

    let nested = compose!(compose!(a(), b()), c());
    let flat = compose!(a(), b(), c());
    assert_eq!(nested, flat);
    assert_eq!(nested.len(), 3);
    assert_eq!(flat.to_string(), "compose(map(inc), filter(even), take(2))");
    assert_eq!(flat.apply(1..).collect::<Vec<_>>(), vec![2, 4]);

    let identity: Transducer<i32, i32> = compose!();
    assert_eq!(identity.apply(vec![1, 2]).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(identity.to_string(), "compose()");
}

#[test]
fn windowed_remainder() {
    let exact = transducer::windowed::<i32>(3).expect("valid window");
    assert_eq!(
        exact.apply(vec![1, 2, 3, 4]).collect::<Vec<_>>(),
        vec![vec![1, 2, 3], vec![2, 3, 4]]
    );

    let window = Window::builder().size(3).remainder(true).build();
    let trailing = transducer::windowed_with::<i32>(window).expect("valid window");
    assert_eq!(
        trailing.apply(vec![1, 2, 3, 4]).collect::<Vec<_>>(),
        vec![vec![1, 2, 3], vec![2, 3, 4], vec![3, 4]]
    );
}

#[test]
fn stages_render_stably() {
    let stages: Vec<Transducer<i32, i32>> = vec![
        transducer::take(3),
        transducer::drop(1),
        transducer::dedupe(),
        transducer::unique(),
        transducer::sort(),
    ];
    let rendered = stages.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(rendered, vec!["take(3)", "drop(1)", "dedupe()", "unique()", "sort()"]);
    assert_eq!(rendered, stages.iter().map(ToString::to_string).collect::<Vec<_>>());

    let summed = transducer::scan("sum", |acc: i32, x: i32| acc + x, 0);
    assert_eq!(summed.to_string(), "scan(sum, 0)");
}

#[test]
fn parser_through_transducer() {
    crate::tracing::setup();

    let digit = regex(r"\d").expect("valid regex");
    let numbers = many(digit.followed_by(string(",")))
        .pipe(compose!(
            transducer::map("parse", |s: String| s.parse::<u32>().unwrap_or_default()),
            transducer::unique(),
            transducer::sort(),
        ));
    assert_eq!(
        numbers.to_string(),
        r#"parser(many(followed_by(regex(/\d/), string(","))), map(parse), unique(), sort())"#
    );

    let result = numbers.parse(&view("3,1,3,2,rest"));
    assert_eq!(result.value(), Some(&vec![1, 2, 3]));
    assert_eq!(result.remainder().as_str(), "rest");
}

#[test]
fn parser_threads_value_through_transducers() {
    crate::tracing::setup();

    let port = parser(
        regex(r"\d+").expect("valid regex"),
        compose!(
            transducer::flat_map("parse", |digits: String| digits.parse::<u16>().ok()),
            transducer::filter("unprivileged", |port: &u16| *port >= 1024),
        ),
    );
    assert_eq!(
        port.to_string(),
        r"parser(regex(/\d+/), flat_map(parse), filter(unprivileged))"
    );

    let result = port.parse(&view("8080/tcp"));
    assert_eq!(result.value(), Some(&8080));
    assert_eq!(result.remainder().as_str(), "/tcp");

    let result = port.parse(&view("80/tcp"));
    assert_eq!(result.reason(), Some("filter(unprivileged)"));
    assert_eq!(result.remainder().offset(), 0);

    let result = port.parse(&view("99999/tcp"));
    assert_eq!(result.reason(), Some("flat_map(parse)"));
}

#[test]
fn zip_with_unbounded_sequence() {
    let numbered = transducer::zip::<&str, _, _>(1..);
    assert_eq!(numbered.to_string(), "zip(1..)");
    assert_eq!(
        numbered.apply(vec!["a", "b"]).collect::<Vec<_>>(),
        vec![("a", 1), ("b", 2)]
    );
}

#[test]
fn results_convert_for_question_mark() {
    fn header(input: &str) -> Result<(String, usize), ParseFailure> {
        let keyword = string("#include").then(regex(r"\s*<[^>]+>").expect("valid regex"));
        let ((_, target), rest) = keyword.parse(&view(input)).into_result()?;
        Ok((target.trim().to_owned(), rest.offset()))
    }

    assert_eq!(
        header("#include <stdio.h>\n").expect("must parse"),
        (String::from("<stdio.h>"), 18)
    );

    let err = header("#define X").expect_err("must fail");
    assert_eq!(err.offset(), 0);
    assert_eq!(err.reason(), r##"expected string("#include")"##);
}

#[test]
fn parsers_are_shared_across_threads() {
    crate::tracing::setup();

    let alpha = satisfy::<str, _>("alpha", char::is_ascii_alphabetic);
    let parser = repeat(alpha, 1, 8).map(Arc::new).expect("valid bounds");
    let handles = ["abc1", "wxyz2", "q3"]
        .into_iter()
        .map(|input| {
            let parser = Arc::clone(&parser);
            thread::spawn(move || {
                let result = parser.parse(&view(input));
                result.into_value().map(|chars| chars.len())
            })
        })
        .collect::<Vec<_>>();

    let counts = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread must not panic"))
        .collect::<Vec<_>>();
    assert_eq!(counts, vec![Some(3), Some(4), Some(1)]);
}

#[test]
fn byte_sequences() {
    let magic = sequence(vec![0x7F_u8, b'E', b'L', b'F']);
    let header = magic.then(any());

    let result = header.parse(&view(vec![0x7F, b'E', b'L', b'F', 2, 1]));
    assert_eq!(result.value(), Some(&(vec![0x7F, b'E', b'L', b'F'], 2)));
    assert_eq!(result.remainder().as_source(), &[1]);
    assert!(end().parse(&result.remainder().advance(1)).is_success());
}
