//! A JSON grammar built on the directive DSL.
//!
//! Strings, numbers, the three constants, arrays and objects, reduced into a
//! [`Json`] tree. Object and array members use the repetition-with-separator
//! form; the `:` in a member commits, so a malformed value reports where it
//! failed instead of backtracking out of the object.
use crate::{reducible, Grammar, WHITESPACES};

/// A parsed JSON document. Object members keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Arr(Vec<Json>),
    Obj(Vec<(String, Json)>),
}

impl Default for Json {
    fn default() -> Self {
        Json::Null
    }
}

/// One `key: value` object member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Member(pub String, pub Json);

reducible!(Json, Member);

/// Build the JSON grammar; parse with the `json` production.
///
/// ```
/// use rec_descent::examples::json::{self, Json};
///
/// let g = json::grammar();
/// let out = g.parse("json", br#"[1.5, {"a": true}]"#).unwrap();
/// let doc: Json = match out {
///     rec_descent::Value::Any(any) => any.take().unwrap(),
///     other => panic!("expected a document, got {:?}", other),
/// };
/// assert_eq!(
///     doc,
///     Json::Arr(vec![
///         Json::Num(1.5),
///         Json::Obj(vec![("a".into(), Json::Bool(true))]),
///     ])
/// );
/// ```
pub fn grammar() -> Grammar {
    let mut g = Grammar::new();

    g.alt("json").add("value");

    g.alt("value").add("object");
    g.alt("value").add("array");
    g.alt("value").add("string");
    g.alt("value").add("number");
    g.alt("value").add("constant");

    g.alt("object")
        .add(r#""{" member(s ",") "}""#)
        .ret(|members: Vec<Member>| {
            Json::Obj(members.into_iter().map(|Member(k, v)| (k, v)).collect())
        })
        .ws(WHITESPACES);
    g.alt("object")
        .add(r#""{" "}""#)
        .ret(|| Json::Obj(Vec::new()))
        .ws(WHITESPACES);

    g.alt("member")
        .add(r#"string ":" + value"#)
        .ret(|key: Json, value: Json| -> Result<Member, String> {
            match key {
                Json::Str(key) => Ok(Member(key, value)),
                other => Err(format!("object key must be a string, got {:?}", other)),
            }
        })
        .ws(WHITESPACES);

    g.alt("array")
        .add(r#""[" value(s ",") "]""#)
        .ret(Json::Arr)
        .ws(WHITESPACES);
    g.alt("array")
        .add(r#""[" "]""#)
        .ret(|| Json::Arr(Vec::new()))
        .ws(WHITESPACES);

    g.alt("string")
        .add(r#"/"([^"\\]|\\.)*"/"#)
        .ret(|raw: String| -> Result<Json, String> { unquote(&raw).map(Json::Str) })
        .ws(WHITESPACES);

    g.alt("number")
        .add(r"/-?\d+(\.\d+)?([eE][+-]?\d+)?/")
        .ret(|raw: String| -> Result<Json, String> {
            raw.parse::<f64>().map(Json::Num).map_err(|err| err.to_string())
        })
        .ws(WHITESPACES);

    g.alt("constant")
        .add("/true|false|null/")
        .ret(|raw: String| match raw.as_str() {
            "true" => Json::Bool(true),
            "false" => Json::Bool(false),
            _ => Json::Null,
        })
        .ws(WHITESPACES);

    g.set_end(WHITESPACES);
    g
}

/// Strip the surrounding quotes and resolve the JSON escape sequences.
fn unquote(raw: &str) -> Result<String, String> {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                if code.len() < 4 {
                    return Err(format!("truncated unicode escape \\u{}", code));
                }
                let n = u32::from_str_radix(&code, 16)
                    .map_err(|_| format!("bad unicode escape \\u{}", code))?;
                out.push(char::from_u32(n).unwrap_or('\u{FFFD}'));
            }
            other => return Err(format!("unsupported escape {:?}", other)),
        }
    }
    Ok(out)
}
