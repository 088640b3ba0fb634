use crate::{Action, Grammar, Matcher, Prod, ReduceFn, Value, Ws};
use regex::bytes::Regex;
use std::rc::Rc;

/// One scanned directive token: either a finished atom, or a repetition form
/// still to be expanded into synthesized productions.
enum Scanned {
    Atom(Action),
    Repeat {
        name: String,
        separator: Option<Action>,
        silent: bool,
    },
}

impl Action {
    /// The atom's directive text without the `~`/`!` modifier prefixes, as it
    /// appears in diagnostics.
    pub(crate) fn label(&self) -> &str {
        self.text.trim_start_matches(|c| c == '~' || c == '!')
    }

    pub(crate) fn reference(name: &str) -> Action {
        Action {
            matcher: Matcher::Reference(name.to_string()),
            silent: false,
            negative: false,
            text: name.to_string(),
        }
    }
}

/// The directive text a production dumps as: repetition forms have already
/// been replaced by their synthesized head production.
pub(crate) fn rewrite(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|action| action.text.as_str())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Compile `directive` into an action list, synthesizing repetition
/// productions into `g` as they are encountered.
pub(crate) fn compile(
    g: &mut Grammar,
    site: &str,
    directive: &str,
) -> Result<Vec<Action>, String> {
    let mut actions = Vec::new();
    let mut rest = directive;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let (scanned, tail) = scan_atom(rest)?;
        match scanned {
            Scanned::Atom(action) => actions.push(action),
            Scanned::Repeat {
                name,
                separator,
                silent,
            } => {
                let head = expand_repetition(g, site, &name, separator);
                actions.push(Action {
                    matcher: Matcher::Reference(head.clone()),
                    silent,
                    negative: false,
                    text: head,
                });
            }
        }
        rest = tail;
    }
    Ok(actions)
}

fn scan_atom(input: &str) -> Result<(Scanned, &str), String> {
    let mut silent = false;
    let mut negative = false;
    let mut rest = input;
    loop {
        match rest.as_bytes().first() {
            Some(b'~') => {
                silent = true;
                rest = &rest[1..];
            }
            Some(b'!') => {
                negative = true;
                rest = &rest[1..];
            }
            _ => break,
        }
    }

    match rest.as_bytes().first() {
        Some(b'+') => {
            if silent || negative {
                return Err(format!("modifier on commit marker: {:?}", input));
            }
            Ok((
                Scanned::Atom(Action {
                    matcher: Matcher::Commit,
                    silent: true,
                    negative: false,
                    text: "+".to_string(),
                }),
                &rest[1..],
            ))
        }
        Some(b'"') => {
            let (content, consumed) = scan_quoted(rest)?;
            let re = anchored(&regex::escape(&content))
                .map_err(|err| format!("invalid literal {:?}: {}", content, err))?;
            let end = input.len() - rest.len() + consumed;
            Ok((
                Scanned::Atom(Action {
                    matcher: Matcher::Literal(re),
                    silent: true,
                    negative,
                    text: input[..end].to_string(),
                }),
                &rest[consumed..],
            ))
        }
        Some(b'/') => {
            let (body, consumed) = scan_regex(rest)?;
            let re = anchored(&body.replace(r"\/", "/"))
                .map_err(|err| format!("invalid regex /{}/: {}", body, err))?;
            let end = input.len() - rest.len() + consumed;
            Ok((
                Scanned::Atom(Action {
                    matcher: Matcher::Pattern(re),
                    silent: silent || negative,
                    negative,
                    text: input[..end].to_string(),
                }),
                &rest[consumed..],
            ))
        }
        Some(c) if c.is_ascii_alphanumeric() || *c == b'_' => {
            let consumed = scan_name(rest);
            let name = &rest[..consumed];
            let after = &rest[consumed..];
            if let Some(inner) = after.strip_prefix("(s") {
                if negative {
                    return Err(format!("cannot negate repetition: {:?}", input));
                }
                let mut inner = inner.trim_start();
                let separator = if inner.is_empty() {
                    return Err(format!("unclosed repetition: {:?}", input));
                } else if inner.starts_with(')') {
                    None
                } else {
                    match scan_atom(inner)? {
                        (Scanned::Atom(action), tail) => {
                            inner = tail.trim_start();
                            Some(action)
                        }
                        (Scanned::Repeat { .. }, _) => {
                            return Err(format!("nested repetition: {:?}", input));
                        }
                    }
                };
                match inner.strip_prefix(')') {
                    Some(tail) => Ok((
                        Scanned::Repeat {
                            name: name.to_string(),
                            separator,
                            silent,
                        },
                        tail,
                    )),
                    None => Err(format!("unclosed repetition: {:?}", input)),
                }
            } else {
                let end = input.len() - after.len();
                Ok((
                    Scanned::Atom(Action {
                        matcher: Matcher::Reference(name.to_string()),
                        silent: silent || negative,
                        negative,
                        text: input[..end].to_string(),
                    }),
                    after,
                ))
            }
        }
        _ => Err(format!("invalid directive: {:?}", input)),
    }
}

fn anchored(body: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", body))
}

/// Scan a `"…"` literal starting at `input`. Backslash escapes pass the next
/// character through. Returns the unescaped content and the bytes consumed.
fn scan_quoted(input: &str) -> Result<(String, usize), String> {
    let mut out = String::new();
    let mut chars = input.char_indices().skip(1);
    while let Some((index, c)) = chars.next() {
        match c {
            '"' => return Ok((out, index + 1)),
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            other => out.push(other),
        }
    }
    Err(format!("unterminated literal: {:?}", input))
}

/// Scan a `/…/` regex starting at `input`, keeping escapes verbatim so the
/// body reaches the regex engine untouched (except `\/`).
fn scan_regex(input: &str) -> Result<(String, usize), String> {
    let mut body = String::new();
    let mut chars = input.char_indices().skip(1);
    while let Some((index, c)) = chars.next() {
        match c {
            '/' => return Ok((body, index + 1)),
            '\\' => {
                body.push('\\');
                match chars.next() {
                    Some((_, escaped)) => body.push(escaped),
                    None => break,
                }
            }
            other => body.push(other),
        }
    }
    Err(format!("unterminated regex: {:?}", input))
}

/// Length of the production name at the start of `input`. Commas join the
/// word parts of synthesized repetition names.
fn scan_name(input: &str) -> usize {
    let bytes = input.as_bytes();
    let word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let mut index = 0;
    while index < bytes.len() {
        if word(bytes[index]) {
            index += 1;
        } else if bytes[index] == b',' && bytes.get(index + 1).map_or(false, |b| word(*b)) {
            index += 1;
        } else {
            break;
        }
    }
    index
}

/// Desugar `name(s SEP?)` by synthesizing a right-recursive production pair
///
/// ```text
/// name,repN  : name name,repN_
/// name,repN_ : SEP? name name,repN_
/// name,repN_ :
/// ```
///
/// whose reducers assemble the elements (and any non-silent separators) into
/// a list. The synthesized productions borrow the whitespace skipper of the
/// repeated production, so a separator skips exactly what the elements skip.
/// Returns the head name the repetition atom is replaced with.
fn expand_repetition(
    g: &mut Grammar,
    site: &str,
    name: &str,
    separator: Option<Action>,
) -> String {
    let n = g.seq.get();
    g.seq.set(n + 1);
    let head = format!("{},rep{}", name, n);
    let tail = format!("{},rep{}_", name, n);
    let inherited = Ws::Inherit {
        name: name.to_string(),
        index: 0,
    };

    let head_actions = vec![Action::reference(name), Action::reference(&tail)];
    let head_reducer: ReduceFn = Rc::new(|_, mut values| {
        let rest = values.pop().unwrap_or(Value::Null);
        let first = values.pop().unwrap_or(Value::Null);
        let mut items = vec![first];
        if let Value::List(more) = rest {
            items.extend(more);
        }
        Ok(Value::List(items))
    });
    g.push_production(synthesized(
        &head,
        head_actions,
        Some(head_reducer),
        inherited.clone(),
        site,
    ));

    let mut tail_actions = Vec::new();
    let separator_captured = match separator {
        Some(action) => {
            let captured = !action.silent;
            tail_actions.push(action);
            captured
        }
        None => false,
    };
    tail_actions.push(Action::reference(name));
    tail_actions.push(Action::reference(&tail));
    let tail_reducer: ReduceFn = Rc::new(move |_, mut values| {
        let rest = values.pop().unwrap_or(Value::Null);
        let element = values.pop().unwrap_or(Value::Null);
        let mut items = Vec::new();
        if separator_captured {
            items.push(values.pop().unwrap_or(Value::Null));
        }
        items.push(element);
        if let Value::List(more) = rest {
            items.extend(more);
        }
        Ok(Value::List(items))
    });
    g.push_production(synthesized(
        &tail,
        tail_actions,
        Some(tail_reducer),
        inherited.clone(),
        site,
    ));

    let empty_reducer: ReduceFn = Rc::new(|_, _| Ok(Value::List(Vec::new())));
    g.push_production(synthesized(
        &tail,
        Vec::new(),
        Some(empty_reducer),
        inherited,
        site,
    ));

    head
}

fn synthesized(
    name: &str,
    actions: Vec<Action>,
    reducer: Option<ReduceFn>,
    ws: Ws,
    site: &str,
) -> Prod {
    let text = rewrite(&actions);
    Prod {
        name: name.to_string(),
        directive: text.clone(),
        rewritten: text,
        site: site.to_string(),
        actions,
        ws,
        reducer,
    }
}
