use crate::{Grammar, Value};

/// Left-associative arithmetic with commits after each operator: once a `+`
/// or `*` is consumed, a missing operand must surface instead of
/// backtracking into the empty tail alternatives.
fn chain_grammar() -> Grammar {
    let mut g = Grammar::new();
    g.alt("expr").add("mul");

    g.alt("mul").add("add mul_");
    g.alt("mul_").add(r#""*"+ add mul_"#);
    g.alt("mul_").add("");

    g.alt("add").add("num add_");
    g.alt("add_").add(r#""+"+ num add_"#);
    g.alt("add_").add("");

    g.alt("num").add(r"/\d+/");
    g
}

#[test]
fn dangling_operator_reports_missing_operand() {
    let g = chain_grammar();
    g.verify().unwrap();
    let err = g.parse("expr", b"2+3+").unwrap_err();
    assert!(err.committed);
    assert!(err.message.contains("expected num got"), "got: {}", err);
    assert_eq!(err.at, 4);
}

#[test]
fn committed_chain_still_parses() {
    let g = chain_grammar();
    assert!(g.parse("expr", b"2+3*4").is_ok());
    assert!(g.parse("expr", b"2").is_ok());
}

#[test]
fn committed_failure_skips_later_alternatives() {
    let mut g = Grammar::new();
    g.alt("op").add("parens");
    g.alt("op").add("").ret(|| -> Value { panic!("empty alternative must not run") });
    g.alt("parens").add(r#""(" + word ")""#);
    g.alt("word").add(r"/\w+/");
    g.verify().unwrap();

    let err = g.parse("op", b"(foobar").unwrap_err();
    assert!(err.committed);
    assert!(err.message.contains("\")\""), "got: {}", err);
}

#[test]
fn uncommitted_failure_backtracks() {
    let mut g = Grammar::new();
    g.alt("op").add("parens");
    g.alt("op").add(r"/\w+/");
    g.alt("parens").add(r#""(" + word ")""#);
    g.alt("word").add(r"/\w+/");

    // no "(" seen, so the parens alternative fails before its commit and the
    // second alternative gets its turn
    assert_eq!(g.parse("op", b"foobar").unwrap(), Value::Str("foobar".into()));
}

#[test]
fn negative_lookahead_guards_commit() {
    let mut g = Grammar::new();
    g.alt("add").add(r#"word "+" !"a" + word"#);
    g.alt("word").add(r"/\w+/");
    g.verify().unwrap();

    let err = g.parse("add", b"a+abc").unwrap_err();
    assert!(!err.committed, "lookahead fails before the commit: {}", err);
    assert!(err.message.contains("unexpected"), "got: {}", err);

    let out = g.parse("add", b"a+bcd").unwrap();
    assert_eq!(
        out,
        Value::List(vec![Value::Str("a".into()), Value::Str("bcd".into())])
    );
}

#[test]
fn negative_lookahead_consumes_nothing() {
    let mut g = Grammar::new();
    g.alt("main").add(r#"!"b" /\w+/"#);
    let out = g.parse("main", b"abc").unwrap();
    assert_eq!(out, Value::Str("abc".into()));
}

#[test]
fn negative_production_reference() {
    let mut g = Grammar::new();
    g.alt("stmt").add(r"!keyword /\w+/");
    g.alt("keyword").add(r#""let""#);
    g.verify().unwrap();

    assert_eq!(g.parse("stmt", b"foo").unwrap(), Value::Str("foo".into()));
    let err = g.parse("stmt", b"let").unwrap_err();
    assert!(err.message.contains("unexpected keyword"), "got: {}", err);
}

#[test]
fn commit_is_local_to_the_trial() {
    let mut g = Grammar::new();
    g.alt("main").add("inner /;/");
    g.alt("inner").add(r#""a" + "b""#);
    g.alt("inner").add(r#""a""#);
    g.verify().unwrap();

    // inner commits inside its own trial; once it succeeds, a later failure
    // in the caller is an ordinary backtrackable error
    let err = g.parse("main", b"ab!").unwrap_err();
    assert!(!err.committed, "inner success must not leak its commit: {}", err);

    // a failure after the inner commit does propagate as committed
    let err = g.parse("main", b"a!").unwrap_err();
    assert!(err.committed, "got: {}", err);
}
