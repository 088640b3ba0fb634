use crate::examples::arithmetic::{self, BinOp};
use crate::Value;

fn bin_op(value: &Value) -> BinOp {
    match value {
        Value::Any(any) => match any.downcast::<BinOp>() {
            Some(op) => op,
            None => panic!("expected BinOp, got {}", any.type_name()),
        },
        other => panic!("expected BinOp, got {:?}", other),
    }
}

#[test]
fn division_chain_is_left_associative() {
    let g = arithmetic::grammar();
    g.verify().unwrap();

    let out = g.parse("expr", b"40/10/2").unwrap();
    let top = bin_op(&out);
    assert_eq!(top.op, "/");
    assert_eq!(top.right, Value::Str("2".into()));

    let inner = bin_op(&top.left);
    assert_eq!(inner.op, "/");
    assert_eq!(inner.left, Value::Str("40".into()));
    assert_eq!(inner.right, Value::Str("10".into()));
}

#[test]
fn precedence_and_parens() {
    let g = arithmetic::grammar();

    let out = g.parse("expr", b"1+2*(3+4)").unwrap();
    let top = bin_op(&out);
    assert_eq!(top.op, "+");
    assert_eq!(top.left, Value::Str("1".into()));

    let mul = bin_op(&top.right);
    assert_eq!(mul.op, "*");
    assert_eq!(mul.left, Value::Str("2".into()));

    let parens = bin_op(&mul.right);
    assert_eq!(parens.op, "+");
    assert_eq!(parens.left, Value::Str("3".into()));
    assert_eq!(parens.right, Value::Str("4".into()));
}

#[test]
fn whitespace_between_tokens() {
    let g = arithmetic::grammar();

    let out = g.parse("expr", b" 1 + 2 * 3 ").unwrap();
    let top = bin_op(&out);
    assert_eq!(top.op, "+");

    let mul = bin_op(&top.right);
    assert_eq!(mul.op, "*");
    assert_eq!(mul.left, Value::Str("2".into()));
    assert_eq!(mul.right, Value::Str("3".into()));
}

#[test]
fn plain_number_passes_through() {
    let g = arithmetic::grammar();
    assert_eq!(g.parse("expr", b"42").unwrap(), Value::Str("42".into()));
}

#[test]
fn unclosed_paren_is_committed() {
    let g = arithmetic::grammar();
    let err = g.parse("expr", b"1+(2*3").unwrap_err();
    assert!(err.committed, "commit after '(' should stick: {}", err);
    assert!(err.message.contains("\")\""), "unexpected message: {}", err);
}
