//! A plug-and-play grammar for arithmetic expressions.
//!
//! Binary `+ - * /` chains with the usual precedence, parenthesized
//! sub-expressions, and left associativity. Numbers stay raw
//! [`Value::Str`](crate::Value::Str) fragments; every operator application
//! becomes a [`BinOp`] with the operator text and already-folded operands.
use crate::{reducible, Grammar, Value, WHITESPACES};

/// A binary operation over two already-reduced operands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinOp {
    pub left: Value,
    pub op: String,
    pub right: Value,
}

reducible!(BinOp);

/// Fold `first op1 a op2 b …` into left-nested [`BinOp`]s:
/// `((first op1 a) op2 b)`.
fn left_assoc(first: Value, tail: Vec<BinOp>) -> Value {
    let mut out = first;
    for mut op in tail {
        op.left = out;
        out = Value::wrap(op);
    }
    out
}

/// Collect one `op right` pair and prepend it to the tail of the chain; the
/// operand is left open for [`left_assoc`] to fill in.
fn assoc_tail(op: String, right: Value, tail: Vec<BinOp>) -> Vec<BinOp> {
    let mut out = vec![BinOp {
        left: Value::Null,
        op,
        right,
    }];
    out.extend(tail);
    out
}

/// Build the arithmetic grammar; parse with the `expr` production.
///
/// ```
/// use rec_descent::examples::arithmetic::{self, BinOp};
/// use rec_descent::Value;
///
/// let g = arithmetic::grammar();
/// let out = g.parse("expr", b"1 + 2 * 3").unwrap();
/// let top: BinOp = match out {
///     Value::Any(any) => any.take().unwrap(),
///     other => panic!("expected an operation, got {:?}", other),
/// };
/// assert_eq!(top.op, "+");
/// assert_eq!(top.left, Value::Str("1".into()));
/// ```
pub fn grammar() -> Grammar {
    let mut g = Grammar::new();

    g.alt("expr").add("term expr_").ret(left_assoc);
    g.alt("expr_")
        .add(r"/[+\-]/ term expr_")
        .ret(assoc_tail)
        .ws(WHITESPACES);
    g.alt("expr_").add("");

    g.alt("term").add("factor term_").ret(left_assoc);
    g.alt("term_")
        .add(r"/[*\/]/ factor term_")
        .ret(assoc_tail)
        .ws(WHITESPACES);
    g.alt("term_").add("");

    g.alt("factor")
        .add(r#""(" + expr ")""#)
        .ws(WHITESPACES);
    g.alt("factor").add(r"/\d+/").ws(WHITESPACES);

    g.set_end(WHITESPACES);
    g
}
