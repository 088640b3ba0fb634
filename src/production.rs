use crate::pos::Pos;
use crate::{Action, Grammar, Loc, Matcher, ParseError, Prod, ReduceError, Reducer, Value, Ws};
use regex::bytes::Regex;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl Prod {
    /// Attach a reducer called with the production's captured values.
    ///
    /// The reducer's parameter count must equal the number of non-silent
    /// atoms in the directive (an optional leading [`Loc`] parameter aside);
    /// a mismatch is a programming error and panics immediately.
    pub fn ret<A>(&mut self, reducer: impl Reducer<A> + 'static) -> &mut Prod {
        let captured = self.captures();
        if reducer.arity() != captured {
            panic!(
                "{} ({}): reducer takes {} arguments but directive {:?} captures {}",
                self.name,
                self.site,
                reducer.arity(),
                self.directive,
                captured,
            );
        }
        self.reducer = Some(Rc::new(move |loc, values| reducer.call(loc, values)));
        self
    }

    /// Set the whitespace pattern skipped before each literal and regex atom
    /// of this production. Panics on an invalid pattern.
    pub fn ws(&mut self, pattern: &str) -> &mut Prod {
        match Regex::new(&format!("^(?:{})", pattern)) {
            Ok(re) => self.ws = Ws::Own(re),
            Err(err) => panic!(
                "{} ({}): invalid whitespace pattern {:?}: {}",
                self.name, self.site, pattern, err
            ),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The directive text the production was registered with.
    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Number of captured values forwarded to the reducer.
    pub(crate) fn captures(&self) -> usize {
        self.actions.iter().filter(|action| !action.silent).count()
    }

    /// Resolve the whitespace skipper, following the borrow chain of
    /// synthesized repetition productions to the production they repeat.
    pub(crate) fn ws_regex<'a>(&'a self, g: &'a Grammar) -> Option<&'a Regex> {
        match &self.ws {
            Ws::None => None,
            Ws::Own(re) => Some(re),
            Ws::Inherit { name, index } => g
                .production(name, *index)
                .and_then(|parent| parent.ws_regex(g)),
        }
    }

    /// Run the action list at `pos`, then reduce the captured values.
    pub(crate) fn exec(&self, pos: &mut Pos<'_>) -> Result<Value, ParseError> {
        let from = pos.at;
        let mut captured: Vec<Value> = Vec::new();
        for action in &self.actions {
            match self.step(action, pos) {
                Ok(Some(value)) => {
                    if !action.silent {
                        captured.push(value);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    if pos.commit && !err.committed {
                        return Err(ParseError::committed(
                            pos.at,
                            format!("expected {} got {:?}", action.label(), pos.rem(80)),
                        ));
                    }
                    return Err(err);
                }
            }
        }
        self.reduce(pos, from, captured)
    }

    fn step(&self, action: &Action, pos: &mut Pos<'_>) -> Result<Option<Value>, ParseError> {
        match &action.matcher {
            Matcher::Commit => {
                pos.commit = true;
                Ok(None)
            }
            Matcher::Literal(re) | Matcher::Pattern(re) => {
                let ws = self.ws_regex(pos.grammar);
                if action.negative {
                    let mut probe = pos.snapshot();
                    probe.skip(ws);
                    if probe.lookahead(re) {
                        Err(ParseError::new(
                            pos.at,
                            format!("unexpected {}", action.label()),
                        ))
                    } else {
                        Ok(None)
                    }
                } else {
                    pos.skip(ws);
                    let matched = pos.consume(re, action.label())?;
                    Ok(Some(Value::Str(matched)))
                }
            }
            Matcher::Reference(name) => {
                if action.negative {
                    let mut probe = pos.snapshot();
                    match probe.consume_alt(name) {
                        Ok(_) => Err(ParseError::new(
                            pos.at,
                            format!("unexpected {}", action.label()),
                        )),
                        Err(_) => Ok(None),
                    }
                } else {
                    pos.consume_alt(name).map(Some)
                }
            }
        }
    }

    fn reduce(
        &self,
        pos: &mut Pos<'_>,
        from: usize,
        captured: Vec<Value>,
    ) -> Result<Value, ParseError> {
        match &self.reducer {
            None => {
                let mut captured = captured;
                Ok(match captured.len() {
                    0 => Value::Null,
                    1 => captured.swap_remove(0),
                    _ => Value::List(captured),
                })
            }
            Some(reduce) => {
                let loc = Loc {
                    from,
                    end: pos.at,
                    file: pos.src.file.clone(),
                    source: pos.src.text.clone(),
                };
                match reduce(loc, captured) {
                    Ok(value) => Ok(value),
                    Err(ReduceError::Coerce(err)) => Err(ParseError::committed(
                        pos.at,
                        format!("{}: {}", self.site, err),
                    )),
                    Err(ReduceError::Action(message)) => Err(ParseError {
                        at: pos.at,
                        message,
                        committed: pos.commit,
                    }),
                }
            }
        }
    }
}

impl Display for Prod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.rewritten)
    }
}
