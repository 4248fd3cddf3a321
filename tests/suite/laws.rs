//! Composition and caching laws, checked through the public API

use std::cell::Cell;

use kiln_types::{Lazy, Memoizer, PipelineBuilder, and_then};

#[test]
fn empty_pipeline_identity_law() {
    let pipeline = PipelineBuilder::<String>::new().build();
    for input in ["", "x", "  padded  ", "ÜNICODE"] {
        assert_eq!(pipeline.apply(input.to_string()), input);
    }
}

#[test]
fn pipeline_matches_nested_application() {
    let s1 = |s: String| s.trim().to_string();
    let s2 = |s: String| s.replace(' ', "-");
    let s3 = |s: String| format!("<{s}>");
    let pipeline = PipelineBuilder::new().add(s1).add(s2).add(s3).build();
    let nested = and_then(and_then(s1, s2), s3);

    for input in ["  a b  ", "c", ""] {
        assert_eq!(pipeline.apply(input.to_string()), s3(s2(s1(input.to_string()))));
        assert_eq!(pipeline.apply(input.to_string()), nested(input.to_string()));
    }
}

#[test]
fn memoizer_invocation_counts() {
    let calls = Cell::new(0);
    let mut memo = Memoizer::new(|n: &i32| {
        calls.set(calls.get() + 1);
        n * n
    });

    for key in [4, 4, 5, 4, 5, 6] {
        memo.apply(key);
    }
    assert_eq!(calls.get(), 3);
    assert_eq!(*memo.apply(4), 16);
    assert_eq!(calls.get(), 3);
}

#[test]
fn lazy_invocation_count() {
    let log = Cell::new(Vec::<&str>::new());
    let lazy = Lazy::of(|| {
        let mut entries = log.take();
        entries.push("computed");
        log.set(entries);
        "X"
    });

    assert_eq!(*lazy.get(), "X");
    assert_eq!(*lazy.get(), "X");
    assert_eq!(log.take(), vec!["computed"]);
}
