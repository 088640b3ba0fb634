use crate::pos::Pos;
use crate::{directive, Alt, Grammar, GrammarError, Matcher, ParseError, Prod, Source, Stats, Value, Ws};
use regex::bytes::Regex;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            alts: HashMap::new(),
            end: None,
            log: None,
            seq: Cell::new(0),
            stats: Cell::new(Stats::default()),
        }
    }

    /// Handle on the alternation group `name`; [`Alt::add`] registers
    /// productions under it in trial order.
    pub fn alt(&mut self, name: &str) -> Alt<'_> {
        Alt {
            grammar: self,
            name: name.to_string(),
        }
    }

    /// Shorthand for `self.alt(name).add(directive)`.
    #[track_caller]
    pub fn add(&mut self, name: &str, directive: &str) -> &mut Prod {
        self.alt(name).add(directive)
    }

    /// Set the whitespace pattern skipped after the root production matched.
    /// Panics on an invalid pattern.
    pub fn set_end(&mut self, pattern: &str) -> &mut Self {
        match Regex::new(&format!("^(?:{})", pattern)) {
            Ok(re) => self.end = Some(re),
            Err(err) => panic!("invalid end pattern {:?}: {}", pattern, err),
        }
        self
    }

    /// Install a sink receiving one formatted line per parse event: the
    /// remaining input, the trial stack, and what happened.
    pub fn set_log(&mut self, sink: impl Fn(&str) + 'static) -> &mut Self {
        self.log = Some(Rc::new(sink));
        self
    }

    /// Check that every production reference in every directive targets a
    /// non-empty alternation group. Left recursion, ambiguity and
    /// unreachable productions are not detected.
    pub fn verify(&self) -> Result<(), GrammarError> {
        for (name, group) in &self.alts {
            for prod in group {
                for action in &prod.actions {
                    if let Matcher::Reference(target) = &action.matcher {
                        match self.alts.get(target) {
                            Some(referenced) if !referenced.is_empty() => {}
                            _ => {
                                return Err(GrammarError::new(
                                    format!("{}: {}", name, prod.directive),
                                    format!("unresolved reference {:?}", target),
                                ));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse `input` against the alternation group `name`.
    ///
    /// After the root match the [`end`](Grammar::set_end) skipper runs, and
    /// any remaining bytes fail the parse with an `unparsed` error.
    pub fn parse(&self, name: &str, input: &[u8]) -> Result<Value, ParseError> {
        self.parse_source(name, Source::new(input))
    }

    /// Like [`Grammar::parse`], with a file name carried into reducer
    /// [`Loc`](crate::Loc) records.
    pub fn parse_file(&self, name: &str, file: &str, input: &[u8]) -> Result<Value, ParseError> {
        self.parse_source(name, Source::with_file(file, input))
    }

    fn parse_source(&self, name: &str, src: Source) -> Result<Value, ParseError> {
        let started = Instant::now();
        let mut pos = Pos::new(self, &src);
        let result = pos.consume_alt(name).and_then(|value| {
            pos.skip(self.end.as_ref());
            if pos.at < src.len() {
                Err(ParseError::new(
                    pos.at,
                    format!("unparsed: {:?}", pos.rem(80)),
                ))
            } else {
                Ok(value)
            }
        });
        self.bump(|s| {
            s.parse_count += 1;
            s.parse_elapsed += started.elapsed();
        });
        result
    }

    /// Snapshot of the aggregate counters.
    pub fn stats(&self) -> Stats {
        self.stats.get()
    }

    /// Every production sorted by name, one `name: directive` line each,
    /// newline terminated. Repetition forms appear desugared, so feeding the
    /// dump back into a fresh grammar reproduces it exactly.
    pub fn dump(&self) -> String {
        let mut names: Vec<&String> = self.alts.keys().collect();
        names.sort();
        let mut out = String::new();
        for name in names {
            if let Some(group) = self.alts.get(name) {
                for prod in group {
                    out.push_str(name);
                    out.push_str(": ");
                    out.push_str(&prod.rewritten);
                    out.push('\n');
                }
            }
        }
        out
    }

    pub(crate) fn production(&self, name: &str, index: usize) -> Option<&Prod> {
        self.alts.get(name).and_then(|group| group.get(index))
    }

    pub(crate) fn push_production(&mut self, prod: Prod) -> &mut Prod {
        let group = self.alts.entry(prod.name.clone()).or_default();
        group.push(prod);
        let added = group.len() - 1;
        let mut stats = self.stats.get();
        stats.productions += 1;
        if added == 0 {
            stats.alternations += 1;
        }
        self.stats.set(stats);
        &mut group[added]
    }

    pub(crate) fn bump<F: FnOnce(&mut Stats)>(&self, update: F) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl<'g> Alt<'g> {
    /// Register a production under this group and return it for further
    /// configuration. The directive is compiled immediately; a malformed
    /// directive is a programming error and panics.
    #[track_caller]
    pub fn add(self, directive_text: &str) -> &'g mut Prod {
        let caller = std::panic::Location::caller();
        let file = std::path::Path::new(caller.file())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| caller.file().to_string());
        let site = format!("{}:{}", file, caller.line());

        let Alt { grammar, name } = self;
        let actions = match directive::compile(grammar, &site, directive_text) {
            Ok(actions) => actions,
            Err(err) => panic!("can't add production {:?}: {}", name, err),
        };
        let rewritten = directive::rewrite(&actions);
        grammar.push_production(Prod {
            name,
            directive: directive_text.to_string(),
            rewritten,
            site,
            actions,
            ws: Ws::None,
            reducer: None,
        })
    }
}
