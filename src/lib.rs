//! rec_descent is a library to build and run backtracking recursive descent parsers
//! from grammars declared at runtime.
//!
//! # Overview
//! Hand-written recursive descent parsers give full control over error reporting and
//! the produced values, but each new grammar means a new pile of code. Parser
//! generators avoid that but push the grammar out into a separate toolchain.
//! This library sits in between: a grammar is assembled at runtime by registering
//! named productions, each described by a small textual *directive*, and each
//! optionally paired with a reducer closure that folds the matched fragments into a
//! value of any shape. Parsing an input against a named start production yields
//! either the reduced value or an error carrying the byte offset it arose at.
//!
//! # Design
//!
//! A directive is an ordered list of atoms: `"…"` literal strings, `/…/` regular
//! expressions, bare production references, the `+` commit marker, the `~` silent and
//! `!` negative-lookahead modifiers, and the `name(s SEP)` repetition form. Several
//! productions may share one name; together they form an alternation group which is
//! tried in insertion order. A failed alternative restores the cursor and the next
//! one is tried, until a `+` commit marker has been passed, after which failures
//! surface to the caller instead of backtracking. Repetition is rewritten at
//! registration time into a pair of synthesized right-recursive productions, so the
//! interpreter itself stays uniformly recursive.
//!
//! Captured fragments are carried as [`Value`] variants. A reducer is any closure
//! whose parameters implement [`FromValue`] and whose return implements
//! [`IntoValue`] (or is a `Result` of such a value); the [`reducible!`] macro wires
//! both traits up for user AST types. A reducer may also take a leading [`Loc`]
//! parameter to receive the byte range and file its production covered.
//!
//! # Example
//!
//! ```
//! use rec_descent::{Grammar, WHITESPACES};
//!
//! let mut g = Grammar::new();
//! g.alt("list").add(r#""list:" ident(s ",")"#);
//! g.alt("ident").add(r"/[a-zA-Z]\w*/").ws(WHITESPACES);
//! g.verify().unwrap();
//!
//! let names = g.parse("list", b"list: adam, john ,luke").unwrap();
//! assert_eq!(format!("{:?}", names), r#"["adam", "john", "luke"]"#);
//! ```
//!
//! Reducers turn the raw fragments into data:
//!
//! ```
//! use rec_descent::{Grammar, WHITESPACES};
//!
//! let mut g = Grammar::new();
//! g.alt("assign")
//!     .add(r#"ident "=" + /\d+/"#)
//!     .ret(|_name: String, digits: String| -> Result<i64, String> {
//!         digits.parse::<i64>().map_err(|e| e.to_string())
//!     })
//!     .ws(WHITESPACES);
//! g.alt("ident").add(r"/[a-zA-Z]\w*/").ws(WHITESPACES);
//! g.verify().unwrap();
//! assert!(g.parse("assign", b"x = 42").is_ok());
//! assert!(g.parse("assign", b"x = 99999999999999999999").is_err());
//! ```
mod directive;
mod error;
pub mod examples;
mod grammar;
mod pos;
mod production;
mod reducer;
mod source;
mod value;

#[cfg(test)]
mod __tests__;

use once_cell::unsync::OnceCell;
use regex::bytes::Regex;
use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Whitespace skipper matching spaces, tabs and line breaks. Assign with
/// [`Prod::ws`] or [`Grammar::set_end`].
pub const WHITESPACES: &str = r"\s*";

/// Whitespace skipper that also swallows `//` line comments.
pub const COMMENTS_AND_WHITESPACES: &str = r"(?:\s+|//[^\n]*\n?)*";

/// A tagged runtime value produced by matching and reducing productions.
///
/// Regex and literal atoms capture [`Str`](Value::Str) fragments; productions
/// without a reducer yield [`Null`](Value::Null), their single capture, or a
/// [`List`](Value::List) of captures; reducers may return any of the variants,
/// with arbitrary user types carried inside [`Any`](Value::Any).
#[derive(Clone)]
pub enum Value {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value>),
    Any(AnyValue),
}

/// A reference-counted wrapper around a user value stored in [`Value::Any`],
/// remembering the wrapped type's name for diagnostics.
#[derive(Clone)]
pub struct AnyValue {
    pub(crate) value: Rc<dyn Any>,
    pub(crate) type_name: &'static str,
}

/// Conversion from a captured [`Value`] into a reducer parameter type.
///
/// `Null` coerces to the type's zero value, lists coerce element-wise into
/// `Vec<T>`, and user types registered with [`reducible!`] are unwrapped from
/// [`Value::Any`]. Lossy conversions are rejected with a [`CoerceError`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, CoerceError>;
}

/// Conversion of a reducer result into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Marker for reducers returning a plain value. See [`Reduced`].
pub struct ByValue;

/// Marker for reducers returning `Result<T, E>`. See [`Reduced`].
pub struct ByResult;

/// Unifies the two accepted reducer return shapes: a plain [`IntoValue`] or a
/// `Result` of one. The marker parameter keeps the two blanket impls apart.
pub trait Reduced<M> {
    fn into_reduced(self) -> Result<Value, ReduceError>;
}

/// A typed reducer callback.
///
/// Implemented for closures and functions of up to eight [`FromValue`]
/// parameters, optionally preceded by a [`Loc`] parameter, returning either a
/// value or a `Result`. The type parameter is inferred; call sites only need
/// parameter type annotations on the closure itself.
pub trait Reducer<A> {
    /// Number of captured values the reducer consumes (the leading [`Loc`]
    /// parameter, when present, is not counted).
    fn arity(&self) -> usize;
    fn call(&self, loc: Loc, args: Vec<Value>) -> Result<Value, ReduceError>;
}

/// The byte range a production covered, passed to reducers that declare a
/// leading `Loc` parameter.
#[derive(Clone, Debug)]
pub struct Loc {
    /// Byte offset of the production's first consumed byte.
    pub from: usize,
    /// Byte offset one past the production's last consumed byte.
    pub end: usize,
    /// File name supplied to [`Grammar::parse_file`], empty otherwise.
    pub file: Rc<str>,
    /// The complete input buffer.
    pub source: Rc<[u8]>,
}

/// The input to a parse: the raw bytes, an optional file name, and a lazily
/// computed line index for positional diagnostics.
pub struct Source {
    pub(crate) text: Rc<[u8]>,
    pub(crate) file: Rc<str>,
    pub(crate) line_ends: OnceCell<Vec<usize>>,
}

/// A line/column pair resolved from a byte offset, 1-based on both axes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// One compiled directive atom.
pub(crate) struct Action {
    pub(crate) matcher: Matcher,
    pub(crate) silent: bool,
    pub(crate) negative: bool,
    pub(crate) text: String,
}

pub(crate) enum Matcher {
    Literal(Regex),
    Pattern(Regex),
    Reference(String),
    Commit,
}

/// Whitespace binding of a production: none, its own skipper, or borrowed
/// from another production (synthesized repetition helpers borrow from the
/// production they repeat).
#[derive(Clone)]
pub(crate) enum Ws {
    None,
    Own(Regex),
    Inherit { name: String, index: usize },
}

pub(crate) type ReduceFn = Rc<dyn Fn(Loc, Vec<Value>) -> Result<Value, ReduceError>>;

/// A single production: a named directive compiled to an action list, an
/// optional whitespace skipper and an optional reducer.
///
/// Returned by [`Alt::add`]; configure it in place with [`Prod::ret`] and
/// [`Prod::ws`].
pub struct Prod {
    pub(crate) name: String,
    pub(crate) directive: String,
    pub(crate) rewritten: String,
    pub(crate) site: String,
    pub(crate) actions: Vec<Action>,
    pub(crate) ws: Ws,
    pub(crate) reducer: Option<ReduceFn>,
}

/// Handle on the alternation group `name`, obtained from [`Grammar::alt`].
pub struct Alt<'g> {
    pub(crate) grammar: &'g mut Grammar,
    pub(crate) name: String,
}

/// Aggregate counters accrued across every parse run by a [`Grammar`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    /// Productions registered, synthesized repetition productions included.
    pub productions: u64,
    /// Alternation groups registered.
    pub alternations: u64,
    /// Completed [`Grammar::parse`] calls, failed ones included.
    pub parse_count: u64,
    /// Wall-clock time spent inside parse calls.
    pub parse_elapsed: Duration,
    /// Production trials started.
    pub tries: u64,
    /// Alternatives abandoned by backtracking.
    pub backtrack_count: u64,
    /// Bytes of input re-read due to backtracking.
    pub backtrack_amount: u64,
}

/// A runtime-declared grammar: named alternation groups, an optional trailing
/// whitespace skipper, an optional trace sink and aggregate [`Stats`].
///
/// Build it up with [`Grammar::alt`]/[`Alt::add`], check cross-references with
/// [`Grammar::verify`], then run [`Grammar::parse`]. Construction is expected
/// to finish before the first parse; the engine is single-threaded.
pub struct Grammar {
    pub(crate) alts: HashMap<String, Vec<Prod>>,
    pub(crate) end: Option<Regex>,
    pub(crate) log: Option<Rc<dyn Fn(&str)>>,
    pub(crate) seq: Cell<usize>,
    pub(crate) stats: Cell<Stats>,
}

/// An error raised while checking a grammar, e.g. a directive referencing a
/// production that was never added.
#[derive(Debug)]
pub struct GrammarError {
    pub(crate) message: String,
    pub(crate) what: String,
}

/// A failure to parse input: the message, the byte offset it arose at, and
/// whether a commit marker suppressed backtracking past it.
///
/// Combine [`at`](ParseError::at) with [`Source::line`] for line reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub at: usize,
    pub message: String,
    pub committed: bool,
}

/// A captured value that could not be converted to the parameter type a
/// reducer declared.
#[derive(Debug, Clone)]
pub struct CoerceError {
    pub(crate) from: String,
    pub(crate) to: String,
}

/// Why a reducer invocation failed: a parameter coercion, or an error the
/// reducer itself returned.
#[derive(Debug)]
pub enum ReduceError {
    Coerce(CoerceError),
    Action(String),
}
