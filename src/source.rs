use crate::{Position, Source};
use once_cell::unsync::OnceCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl<'i> From<&'i [u8]> for Source {
    fn from(value: &'i [u8]) -> Self {
        Source::new(value)
    }
}
impl<'i> From<&'i str> for Source {
    fn from(value: &'i str) -> Self {
        Source::new(value.as_bytes())
    }
}

impl Source {
    pub fn new(text: &[u8]) -> Self {
        Self {
            text: Rc::from(text),
            file: Rc::from(""),
            line_ends: OnceCell::new(),
        }
    }

    pub fn with_file(file: &str, text: &[u8]) -> Self {
        Self {
            text: Rc::from(text),
            file: Rc::from(file),
            line_ends: OnceCell::new(),
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Cumulative end offsets of each line, the terminating newline byte
    /// counted with the line it ends.
    fn obtain_line_ends(&self) -> &Vec<usize> {
        self.line_ends.get_or_init(|| {
            let mut total = 0;
            self.text
                .split(|b| *b == b'\n')
                .map(|line| {
                    total += line.len() + 1;
                    total
                })
                .collect()
        })
    }

    /// 1-based line number containing `offset`. Offsets past the end resolve
    /// to one past the last line.
    pub fn line(&self, offset: usize) -> usize {
        let line_ends = self.obtain_line_ends();
        match line_ends.binary_search(&offset) {
            Ok(index) => (index + 2).min(line_ends.len() + 1),
            Err(index) => index + 1,
        }
    }

    /// Line and column of `offset`, both 1-based.
    pub fn position(&self, offset: usize) -> Position {
        let line = self.line(offset);
        let line_start = if line <= 1 {
            0
        } else {
            self.obtain_line_ends()[line - 2]
        };
        Position::new(line, offset.saturating_sub(line_start) + 1)
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}
