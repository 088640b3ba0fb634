//! Ready-made grammars built on the directive DSL.
//!
//! These double as worked examples: [`arithmetic`] shows how to refactor
//! left-associative operator chains into repetition tails and fold them back
//! with reducers, [`json`] exercises repetition with separators, commit
//! markers and per-production whitespace.
pub mod arithmetic;
pub mod json;

#[cfg(test)]
mod __tests__;
