use crate::{Grammar, Value, WHITESPACES};
use std::cell::RefCell;
use std::rc::Rc;

fn list_grammar() -> Grammar {
    let mut g = Grammar::new();
    g.alt("list").add(r#""list:" ident(s ",")"#);
    g.alt("ident").add(r"/[a-zA-Z]\w*/").ws(WHITESPACES);
    g
}

#[test]
fn dump_is_sorted_and_terminated() {
    let mut g = Grammar::new();
    g.alt("b").add(r"/b/");
    g.alt("a").add(r"/a/");
    g.alt("a").add("");
    let dump = g.dump();
    assert_eq!(dump, "a: /a/\na: \nb: /b/\n");
}

#[test]
fn dump_round_trips() {
    let g = list_grammar();
    let first = g.dump();
    assert!(first.contains("ident,rep0"), "got: {}", first);

    // rebuilding from the dumped text must not synthesize anything new
    let mut rebuilt = Grammar::new();
    for line in first.lines() {
        let (name, directive) = line.split_once(':').unwrap();
        rebuilt.alt(name).add(directive.trim());
    }
    assert_eq!(rebuilt.dump(), first);
}

#[test]
fn rebuilt_grammar_still_parses() {
    let g = list_grammar();
    let mut rebuilt = Grammar::new();
    for line in g.dump().lines() {
        let (name, directive) = line.split_once(':').unwrap();
        rebuilt
            .alt(name)
            .add(directive.trim())
            .ws(WHITESPACES);
    }
    rebuilt.verify().unwrap();
    let out = rebuilt.parse("list", b"list: a, b").unwrap();
    match out {
        Value::List(items) => assert_eq!(items.len(), 2),
        other => panic!("expected a list, got {:?}", other),
    }
}

#[test]
fn stats_accrue() {
    let mut g = Grammar::new();
    g.alt("main").add(r#""x" "y""#);
    g.alt("main").add(r#""x""#);

    let registered = g.stats();
    assert_eq!(registered.productions, 2);
    assert_eq!(registered.alternations, 1);
    assert_eq!(registered.parse_count, 0);

    g.parse("main", b"x").unwrap();
    let after = g.stats();
    assert_eq!(after.parse_count, 1);
    assert!(after.tries >= 2);
    assert_eq!(after.backtrack_count, 1);
    assert_eq!(after.backtrack_amount, 1);

    g.parse("main", b"x").unwrap();
    assert_eq!(g.stats().parse_count, 2);
}

#[test]
fn repeated_parses_are_deterministic() {
    let g = list_grammar();
    let first = g.parse("list", b"list: a, b, c").unwrap();
    let second = g.parse("list", b"list: a, b, c").unwrap();
    assert_eq!(first, second);

    let e1 = g.parse("list", b"list: a,,").unwrap_err();
    let e2 = g.parse("list", b"list: a,,").unwrap_err();
    assert_eq!(e1, e2);
}

#[test]
fn furthest_error_wins() {
    let mut g = Grammar::new();
    g.alt("main").add(r#""x" "y""#);
    g.alt("main").add(r#""z""#);
    let err = g.parse("main", b"xq").unwrap_err();
    assert_eq!(err.at, 1, "deepest alternative reports: {}", err);
    assert!(err.message.contains("\"y\""), "got: {}", err);
}

#[test]
fn failed_alternative_restores_the_cursor() {
    let mut g = Grammar::new();
    g.alt("main").add(r#""x" "y""#);
    g.alt("main").add(r#""x""#);
    // first alternative consumes "x" then dies; the second must start from
    // the beginning again and consume the whole input
    assert_eq!(g.parse("main", b"x").unwrap(), Value::Null);
}

#[test]
fn residual_input_fails() {
    let mut g = Grammar::new();
    g.alt("main").add(r"/a+/");
    let err = g.parse("main", b"aab").unwrap_err();
    assert_eq!(err.at, 2);
    assert!(err.message.contains("unparsed: \"b\""), "got: {}", err);
}

#[test]
fn end_skipper_runs_after_the_root() {
    let mut g = Grammar::new();
    g.set_end(WHITESPACES);
    g.alt("main").add(r"/a+/");
    assert_eq!(g.parse("main", b"aa \n").unwrap(), Value::Str("aa".into()));
}

#[test]
fn log_sink_sees_trials() {
    let lines: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = lines.clone();

    let mut g = Grammar::new();
    g.set_log(move |line| sink.borrow_mut().push(line.to_string()));
    g.alt("main").add("word");
    g.alt("word").add(r"/\w+/");
    g.parse("main", b"abc").unwrap();

    let lines = lines.borrow();
    assert!(
        lines.iter().any(|l| l.contains("trying")),
        "got: {:#?}",
        lines
    );
    assert!(
        lines.iter().any(|l| l.contains("consumed")),
        "got: {:#?}",
        lines
    );
}

#[test]
fn parse_file_matches_parse() {
    let g = list_grammar();
    let a = g.parse("list", b"list: one").unwrap();
    let b = g.parse_file("list", "in.txt", b"list: one").unwrap();
    assert_eq!(a, b);
}
