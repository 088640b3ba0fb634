use crate::{ByResult, ByValue, FromValue, IntoValue, Loc, Reduced, ReduceError, Reducer, Value};
use std::fmt::Display;

impl<T: IntoValue> Reduced<ByValue> for T {
    fn into_reduced(self) -> Result<Value, ReduceError> {
        Ok(self.into_value())
    }
}

impl<T: IntoValue, E: Display> Reduced<ByResult> for Result<T, E> {
    fn into_reduced(self) -> Result<Value, ReduceError> {
        match self {
            Ok(value) => Ok(value.into_value()),
            Err(err) => Err(ReduceError::Action(err.to_string())),
        }
    }
}

impl<F, Out, M> Reducer<(M, ())> for F
where
    F: Fn() -> Out,
    Out: Reduced<M>,
{
    fn arity(&self) -> usize {
        0
    }

    fn call(&self, _loc: Loc, _args: Vec<Value>) -> Result<Value, ReduceError> {
        (self)().into_reduced()
    }
}

impl<F, Out, M> Reducer<(M, Loc, ())> for F
where
    F: Fn(Loc) -> Out,
    Out: Reduced<M>,
{
    fn arity(&self) -> usize {
        0
    }

    fn call(&self, loc: Loc, _args: Vec<Value>) -> Result<Value, ReduceError> {
        (self)(loc).into_reduced()
    }
}

// One pair of impls per arity: a plain reducer over the captured values, and
// the same shape with a leading `Loc` parameter. The tuple in the trait
// argument keeps every pairing distinct, so inference resolves purely from the
// closure's own signature.
macro_rules! reducer_impls {
    ($($var:ident: $ty:ident),+) => {
        impl<F, Out, M, $($ty,)+> Reducer<(M, ($($ty,)+))> for F
        where
            F: Fn($($ty),+) -> Out,
            Out: Reduced<M>,
            $($ty: FromValue,)+
        {
            fn arity(&self) -> usize {
                [$(stringify!($ty)),+].len()
            }

            fn call(&self, _loc: Loc, args: Vec<Value>) -> Result<Value, ReduceError> {
                let mut args = args.into_iter();
                $(
                    let $var = <$ty as FromValue>::from_value(args.next().unwrap_or(Value::Null))
                        .map_err(ReduceError::Coerce)?;
                )+
                (self)($($var),+).into_reduced()
            }
        }

        impl<F, Out, M, $($ty,)+> Reducer<(M, Loc, ($($ty,)+))> for F
        where
            F: Fn(Loc, $($ty),+) -> Out,
            Out: Reduced<M>,
            $($ty: FromValue,)+
        {
            fn arity(&self) -> usize {
                [$(stringify!($ty)),+].len()
            }

            fn call(&self, loc: Loc, args: Vec<Value>) -> Result<Value, ReduceError> {
                let mut args = args.into_iter();
                $(
                    let $var = <$ty as FromValue>::from_value(args.next().unwrap_or(Value::Null))
                        .map_err(ReduceError::Coerce)?;
                )+
                (self)(loc, $($var),+).into_reduced()
            }
        }
    };
}

reducer_impls!(a1: A1);
reducer_impls!(a1: A1, a2: A2);
reducer_impls!(a1: A1, a2: A2, a3: A3);
reducer_impls!(a1: A1, a2: A2, a3: A3, a4: A4);
reducer_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
reducer_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
reducer_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
reducer_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
