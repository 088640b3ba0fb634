use crate::examples::json::{self, Json};
use crate::Value;

fn document(value: Value) -> Json {
    match value {
        Value::Any(any) => match any.downcast::<Json>() {
            Some(doc) => doc,
            None => panic!("expected Json, got {}", any.type_name()),
        },
        other => panic!("expected Json, got {:?}", other),
    }
}

fn to_serde(doc: &Json) -> serde_json::Value {
    match doc {
        Json::Null => serde_json::Value::Null,
        Json::Bool(b) => serde_json::Value::Bool(*b),
        Json::Num(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Json::Str(s) => serde_json::Value::String(s.clone()),
        Json::Arr(items) => serde_json::Value::Array(items.iter().map(to_serde).collect()),
        Json::Obj(members) => serde_json::Value::Object(
            members
                .iter()
                .map(|(k, v)| (k.clone(), to_serde(v)))
                .collect(),
        ),
    }
}

/// Structural equality with numbers compared as f64, since serde_json keeps
/// integers and floats in distinct representations.
fn same(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value::*;
    match (a, b) {
        (Number(x), Number(y)) => x.as_f64() == y.as_f64(),
        (Array(x), Array(y)) => x.len() == y.len() && x.iter().zip(y).all(|(a, b)| same(a, b)),
        (Object(x), Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map_or(false, |w| same(v, w)))
        }
        (x, y) => x == y,
    }
}

fn check_against_serde(text: &str) {
    let g = json::grammar();
    let parsed = match g.parse("json", text.as_bytes()) {
        Ok(value) => document(value),
        Err(err) => panic!("failed on {:?}: {}", text, err),
    };
    let reference: serde_json::Value = serde_json::from_str(text).unwrap();
    assert!(
        same(&to_serde(&parsed), &reference),
        "mismatch on {:?}: {:?}",
        text,
        parsed
    );
}

#[test]
fn primitives() {
    check_against_serde("42");
    check_against_serde("-1.25e2");
    check_against_serde("true");
    check_against_serde("null");
    check_against_serde(r#""hello \"world\"""#);
}

#[test]
fn containers() {
    check_against_serde("[]");
    check_against_serde("{}");
    check_against_serde(r#"[1, 2, 3]"#);
    check_against_serde(r#"{"a": "A", "b": [true, false, null]}"#);
}

#[test]
fn nested_document() {
    check_against_serde(
        r#"
        {
            "quiz": {
                "maths": {
                    "q1": {
                        "question": "5 + 7 = ?",
                        "options": ["10", "11", "12", "13"],
                        "answer": "12"
                    }
                }
            },
            "scores": [9.5, 7.25, 10.0]
        }
        "#,
    );
}

#[test]
fn string_escapes() {
    let g = json::grammar();
    let out = document(g.parse("json", br#""a\tbA""#).unwrap());
    assert_eq!(out, Json::Str("a\tbA".to_string()));
}

#[test]
fn missing_value_is_committed() {
    let g = json::grammar();
    let err = g.parse("json", br#"{"a": }"#).unwrap_err();
    assert!(err.committed, "colon should commit the member: {}", err);
    assert!(err.message.contains("expected value"), "got: {}", err);
}

#[test]
fn garbage_after_document() {
    let g = json::grammar();
    let err = g.parse("json", b"[1] [2]").unwrap_err();
    assert!(err.message.contains("unparsed"), "got: {}", err);
}
