use crate::{CoerceError, GrammarError, ParseError, ReduceError};
use std::fmt::{Display, Formatter};

impl GrammarError {
    pub fn new(what: String, message: String) -> Self {
        Self { message, what }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.what, self.message)
    }
}

impl std::error::Error for GrammarError {}

impl ParseError {
    pub(crate) fn new(at: usize, message: String) -> Self {
        Self {
            at,
            message,
            committed: false,
        }
    }

    pub(crate) fn committed(at: usize, message: String) -> Self {
        Self {
            at,
            message,
            committed: true,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.at)
    }
}

impl std::error::Error for ParseError {}

impl CoerceError {
    pub fn mismatch(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Display for CoerceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "can't convert {} to {}", self.from, self.to)
    }
}

impl std::error::Error for CoerceError {}

impl Display for ReduceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReduceError::Coerce(err) => write!(f, "{}", err),
            ReduceError::Action(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ReduceError {}
