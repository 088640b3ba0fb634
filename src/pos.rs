use crate::{Grammar, ParseError, Source, Value};
use regex::bytes::Regex;

/// The mutable state of one parse: a byte offset into the source, the stack
/// of production trials entered so far (for trace output), and the commit
/// flag of the current alternative trial.
pub(crate) struct Pos<'p> {
    pub(crate) grammar: &'p Grammar,
    pub(crate) src: &'p Source,
    pub(crate) at: usize,
    pub(crate) stack: Vec<String>,
    pub(crate) commit: bool,
}

impl<'p> Pos<'p> {
    pub(crate) fn new(grammar: &'p Grammar, src: &'p Source) -> Self {
        Self {
            grammar,
            src,
            at: 0,
            stack: Vec::new(),
            commit: false,
        }
    }

    /// A trial cursor at the same offset with a cleared commit flag. The
    /// original is untouched until the trial's offset is adopted.
    pub(crate) fn snapshot(&self) -> Pos<'p> {
        Pos {
            grammar: self.grammar,
            src: self.src,
            at: self.at,
            stack: self.stack.clone(),
            commit: false,
        }
    }

    /// Up to `max` bytes of remaining input, lossily decoded.
    pub(crate) fn rem(&self, max: usize) -> String {
        let rest = &self.src.text[self.at..];
        let rest = &rest[..rest.len().min(max)];
        String::from_utf8_lossy(rest).into_owned()
    }

    /// Advance past a whitespace match, if any.
    pub(crate) fn skip(&mut self, re: Option<&Regex>) {
        if let Some(re) = re {
            if let Some(m) = re.find(&self.src.text[self.at..]) {
                if m.end() > 0 {
                    self.trace(|| format!("skip {:?}", m.end()));
                    self.at += m.end();
                }
            }
        }
    }

    pub(crate) fn lookahead(&self, re: &Regex) -> bool {
        re.is_match(&self.src.text[self.at..])
    }

    /// Consume the regex match anchored at the cursor, returning the matched
    /// text.
    pub(crate) fn consume(&mut self, re: &Regex, label: &str) -> Result<String, ParseError> {
        match re.find(&self.src.text[self.at..]) {
            Some(m) => {
                let matched =
                    String::from_utf8_lossy(&self.src.text[self.at..self.at + m.end()]).into_owned();
                self.at += m.end();
                self.trace(|| format!("consumed {:?}", matched));
                Ok(matched)
            }
            None => {
                self.trace(|| format!("failed {}", label));
                Err(ParseError::new(
                    self.at,
                    format!("expected {} got {:?}", label, self.rem(80)),
                ))
            }
        }
    }

    /// Try each production of the group `name` in order.
    ///
    /// A single-production group runs in place with no snapshot. Otherwise
    /// each alternative runs on a snapshot with a cleared commit flag; the
    /// first success wins, a committed failure propagates immediately, and
    /// when every alternative fails the error that advanced furthest is
    /// returned (ties going to the later alternative).
    pub(crate) fn consume_alt(&mut self, name: &str) -> Result<Value, ParseError> {
        let grammar = self.grammar;
        let group = match grammar.alts.get(name) {
            Some(group) if !group.is_empty() => group,
            _ => {
                return Err(ParseError::new(
                    self.at,
                    format!("no production {:?}", name),
                ));
            }
        };

        if group.len() == 1 {
            grammar.bump(|s| s.tries += 1);
            let prod = &group[0];
            self.stack.push(prod.name.clone());
            self.trace(|| format!("trying `{}`", prod.directive));
            let out = prod.exec(self);
            self.stack.pop();
            return out;
        }

        let entry = self.at;
        let mut furthest: Option<ParseError> = None;
        for (index, prod) in group.iter().enumerate() {
            grammar.bump(|s| s.tries += 1);
            let mut trial = self.snapshot();
            trial.stack.push(format!("{}/{}", prod.name, index));
            trial.trace(|| format!("trying `{}`", prod.directive));
            match prod.exec(&mut trial) {
                Ok(value) => {
                    self.at = trial.at;
                    return Ok(value);
                }
                Err(err) => {
                    trial.trace(|| format!("failed <{}>: {}", prod.name, err));
                    if err.committed {
                        self.at = trial.at;
                        return Err(err);
                    }
                    grammar.bump(|s| {
                        s.backtrack_count += 1;
                        s.backtrack_amount += (trial.at - entry) as u64;
                    });
                    if furthest.as_ref().map_or(true, |f| err.at >= f.at) {
                        furthest = Some(err);
                    }
                }
            }
        }
        self.trace(|| "no alternative matched".to_string());
        Err(furthest
            .unwrap_or_else(|| ParseError::new(entry, format!("no production {:?}", name))))
    }

    /// Emit a trace line through the grammar's log sink, lazily formatted.
    pub(crate) fn trace<F: FnOnce() -> String>(&self, message: F) {
        if let Some(sink) = &self.grammar.log {
            sink(&format!(
                "{:<12} {}  {}",
                format!("{:?}", self.rem(10)),
                self.stack.join(" "),
                message()
            ));
        }
    }
}
