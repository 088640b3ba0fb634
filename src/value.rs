use crate::{AnyValue, CoerceError, FromValue, IntoValue, Value};
use ptree::TreeItem;
use std::any::Any;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

impl Value {
    /// Wrap a user value so it can travel through captures and reducers.
    /// Usually reached through [`reducible!`](crate::reducible), not directly.
    pub fn wrap<T: Any>(value: T) -> Value {
        Value::Any(AnyValue {
            value: Rc::new(value),
            type_name: std::any::type_name::<T>(),
        })
    }

    /// A short tag naming the variant, or the wrapped type for
    /// [`Value::Any`]. Used in coercion diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Any(any) => any.type_name,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Pretty-print the value as a tree, lists becoming branches.
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}

impl AnyValue {
    /// Clone the wrapped value out, failing when the stored type differs.
    pub fn take<T: Any + Clone>(&self) -> Result<T, CoerceError> {
        match self.value.downcast_ref::<T>() {
            Some(value) => Ok(value.clone()),
            None => Err(CoerceError::mismatch(
                self.type_name,
                std::any::type_name::<T>(),
            )),
        }
    }

    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        self.value.downcast_ref::<T>().cloned()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Any(any) => write!(f, "<{}>", any.type_name),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Any(a), Value::Any(b)) => Rc::ptr_eq(&a.value, &b.value),
            _ => false,
        }
    }
}

impl TreeItem for Value {
    type Child = Value;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self {
            Value::List(items) => write!(f, "list[{}]", items.len()),
            other => write!(f, "{:?}", other),
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        match self {
            Value::List(items) => Cow::from(&items[..]),
            _ => Cow::from(Vec::new()),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Str(s) => Ok(s),
            other => Err(CoerceError::mismatch(other.kind(), "string")),
        }
    }
}

impl FromValue for Box<[u8]> {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(Box::from(&[][..])),
            Value::Str(s) => Ok(s.into_bytes().into_boxed_slice()),
            other => Err(CoerceError::mismatch(other.kind(), "bytes")),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(0),
            Value::Int(n) => Ok(n),
            other => Err(CoerceError::mismatch(other.kind(), "int")),
        }
    }
}

impl FromValue for usize {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(0),
            Value::Int(n) if n >= 0 => Ok(n as usize),
            other => Err(CoerceError::mismatch(other.kind(), "usize")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(0.0),
            Value::Int(n) => Ok(n as f64),
            Value::Float(n) => Ok(n),
            other => Err(CoerceError::mismatch(other.kind(), "float")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            other => Err(CoerceError::mismatch(other.kind(), "bool")),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(CoerceError::mismatch(other.kind(), "list")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl IntoValue for Box<[u8]> {
    fn into_value(self) -> Value {
        Value::Str(String::from_utf8_lossy(&self).into_owned())
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }
}

/// Implement [`FromValue`] and [`IntoValue`] for user AST types so reducers
/// can take and return them directly. The types must be
/// `Clone + Default + 'static`; `Default` supplies the zero value a `Null`
/// capture coerces to.
///
/// ```
/// use rec_descent::{reducible, Grammar, Value};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// pub struct Pair(pub String, pub String);
/// reducible!(Pair);
///
/// let mut g = Grammar::new();
/// g.alt("pair").add(r#"/\w+/ "," /\w+/"#).ret(|a: String, b: String| Pair(a, b));
/// let out = g.parse("pair", b"x,y").unwrap();
/// match out {
///     Value::Any(any) => assert_eq!(any.take::<Pair>().unwrap(), Pair("x".into(), "y".into())),
///     other => panic!("expected wrapped pair, got {:?}", other),
/// }
/// ```
#[macro_export]
macro_rules! reducible {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::FromValue for $ty {
            fn from_value(value: $crate::Value) -> ::std::result::Result<Self, $crate::CoerceError> {
                match value {
                    $crate::Value::Null => Ok(<$ty as ::std::default::Default>::default()),
                    $crate::Value::Any(any) => any.take::<$ty>(),
                    other => Err($crate::CoerceError::mismatch(
                        other.kind(),
                        ::std::any::type_name::<$ty>(),
                    )),
                }
            }
        }
        impl $crate::IntoValue for $ty {
            fn into_value(self) -> $crate::Value {
                $crate::Value::wrap(self)
            }
        }
    )+};
}
