use crate::Grammar;

#[test]
fn unresolved_reference_fails_verification() {
    let mut g = Grammar::new();
    g.alt("foo")
        .add("bar cuz")
        .ret(|bar: String, cuz: String| format!("{} {}", bar, cuz));
    g.alt("bar").add(r"/\w+/").ret(|s: String| s);

    let err = g.verify().unwrap_err();
    let text = err.to_string();
    assert!(text.contains("cuz"), "got: {}", text);
    assert!(text.contains("foo"), "got: {}", text);
}

#[test]
fn forward_references_resolve_lazily() {
    let mut g = Grammar::new();
    // "word" is referenced before it is added
    g.alt("main").add("word word");
    g.alt("word").add(r"/\w+/").ws(crate::WHITESPACES);
    g.verify().unwrap();
    assert!(g.parse("main", b"a b").is_ok());
}

#[test]
fn verify_covers_negative_and_repetition_references() {
    let mut g = Grammar::new();
    g.alt("main").add("!missing other");
    g.alt("other").add(r"/\w+/");
    assert!(g.verify().is_err());

    let mut g = Grammar::new();
    g.alt("main").add("item(s)");
    assert!(g.verify().is_err());

    let mut g = Grammar::new();
    g.alt("main").add("item(s)");
    g.alt("item").add(r"/\w/");
    g.verify().unwrap();
}

#[test]
fn parse_of_unknown_production_fails() {
    let g = Grammar::new();
    let err = g.parse("nope", b"x").unwrap_err();
    assert!(err.message.contains("no production"), "got: {}", err);
}
