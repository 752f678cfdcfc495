//! Controllers: plain async functions taking positional arguments.
//!
//! Any `Fn(A1, .., An) -> impl Future<Output = anyhow::Result<R>>` with up to six arguments is
//! a [`Controller`] when every argument deserializes from JSON and `R` serializes to it.
//! Mapped arguments are converted positionally; missing trailing arguments are passed as
//! `null`, so `Option<T>` parameters see `None`.

use crate::api_error::ApiErrors;
use futures::FutureExt as _;
use futures::future::{self, BoxFuture};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

const CONNECT: ApiErrors = ApiErrors::new("connect");

/// A function the adapter can invoke with mapped arguments.
///
/// `T` is a marker for the argument tuple, which keeps the per-arity impls apart.
pub trait Controller<T>: Clone + Send + Sync + 'static {
    /// Invoke with positional JSON arguments and serialize the result.
    fn invoke(&self, args: Vec<Value>) -> BoxFuture<'static, anyhow::Result<Value>>;
}

/// Convert the next positional argument. A value that does not fit the parameter type is
/// a client error (400), reported before the controller runs.
fn take_arg<T: DeserializeOwned>(
    args: &mut std::vec::IntoIter<Value>,
    position: usize,
) -> anyhow::Result<T> {
    let value = args.next().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| {
        CONNECT
            .bad_request(
                Some(&format!("invalid argument at position {position}")),
                Some(&e.to_string()),
            )
            .into()
    })
}

macro_rules! impl_controller {
    ($($ty:ident),*) => {
        impl<F, Fut, R, $($ty,)*> Controller<($($ty,)*)> for F
        where
            F: Fn($($ty,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
            R: Serialize + Send,
            $($ty: DeserializeOwned,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn invoke(&self, args: Vec<Value>) -> BoxFuture<'static, anyhow::Result<Value>> {
                let mut args = args.into_iter();
                let mut position = 0usize;
                $(
                    let $ty = match take_arg::<$ty>(&mut args, position) {
                        Ok(value) => value,
                        Err(e) => return future::ready(Err(e)).boxed(),
                    };
                    position += 1;
                )*
                let fut = (self)($($ty,)*);
                async move { Ok(serde_json::to_value(fut.await?)?) }.boxed()
            }
        }
    };
}

impl_controller!();
impl_controller!(T1);
impl_controller!(T1, T2);
impl_controller!(T1, T2, T3);
impl_controller!(T1, T2, T3, T4);
impl_controller!(T1, T2, T3, T4, T5);
impl_controller!(T1, T2, T3, T4, T5, T6);
