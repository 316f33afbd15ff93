//! Native callables and their results
//!
//! A [`NativeFn`] is what gets registered: a shared closure from a
//! [`CallFrame`] to a [`CallResult`]. Typed Rust closures such as
//! `|a: f64, b: f64| a + b` are turned into `NativeFn`s by
//! [`IntoNativeFn`], which generates the positional, left-to-right argument
//! decoding.

use std::fmt;
use std::sync::Arc;

use crate::context::CallFrame;
use crate::convert::{FromDynamic, ToDynamic};
use crate::error::{BridgeResult, ErrorInfo};
use crate::value::{DynamicValue, ObjectRef};

// ============================================================================
// Arity
// ============================================================================

/// Number of arguments a native function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly this many
    Fixed(usize),
    /// Any number; the function inspects `argument_count()` itself
    Variadic,
}

impl Arity {
    /// Whether a call with `count` arguments passes the arity check
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == count,
            Arity::Variadic => true,
        }
    }

    /// Fixed argument count, if any
    pub fn fixed(self) -> Option<usize> {
        match self {
            Arity::Fixed(n) => Some(n),
            Arity::Variadic => None,
        }
    }
}

impl From<usize> for Arity {
    fn from(n: usize) -> Self {
        Arity::Fixed(n)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{}", n),
            Arity::Variadic => f.write_str("variadic"),
        }
    }
}

// ============================================================================
// CallResult
// ============================================================================

/// Outcome of one native call
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// Call returned a value
    Value(DynamicValue),
    /// Call failed; the guest will see an exception
    Error(ErrorInfo),
}

impl CallResult {
    /// Successful result with no value
    #[inline]
    pub fn undefined() -> Self {
        Self::Value(DynamicValue::Undefined)
    }

    /// Successful result with a number
    #[inline]
    pub fn number(n: f64) -> Self {
        Self::Value(DynamicValue::Number(n))
    }

    /// Successful result with a boolean
    #[inline]
    pub fn bool(b: bool) -> Self {
        Self::Value(DynamicValue::Boolean(b))
    }

    /// Successful result with a string
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::Value(DynamicValue::String(s.into()))
    }

    /// Whether the call succeeded
    pub fn is_value(&self) -> bool {
        matches!(self, CallResult::Value(_))
    }

    /// Error of a failed call
    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            CallResult::Error(err) => Some(err),
            CallResult::Value(_) => None,
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> BridgeResult<DynamicValue> {
        match self {
            CallResult::Value(value) => Ok(value),
            CallResult::Error(err) => Err(err),
        }
    }
}

impl From<BridgeResult<DynamicValue>> for CallResult {
    fn from(result: BridgeResult<DynamicValue>) -> Self {
        match result {
            Ok(value) => CallResult::Value(value),
            Err(err) => CallResult::Error(err),
        }
    }
}

/// Convert a native function's return value into a [`CallResult`].
///
/// Implemented for every encodable type (success), for `Result<T, E>` whose
/// error converts into [`ErrorInfo`] (explicit failure) and for `CallResult`
/// itself.
pub trait IntoCallResult {
    /// Convert into a call result
    fn into_call_result(self) -> CallResult;
}

impl IntoCallResult for CallResult {
    fn into_call_result(self) -> CallResult {
        self
    }
}

macro_rules! impl_into_call_result {
    ($($ty:ty),*) => {
        $(
            impl IntoCallResult for $ty {
                fn into_call_result(self) -> CallResult {
                    CallResult::Value(self.to_dynamic())
                }
            }
        )*
    };
}

impl_into_call_result!(f64, i32, u32, bool, String, ObjectRef, DynamicValue, ());

impl IntoCallResult for &str {
    fn into_call_result(self) -> CallResult {
        CallResult::Value(self.to_dynamic())
    }
}

impl<T: ToDynamic> IntoCallResult for Option<T> {
    fn into_call_result(self) -> CallResult {
        CallResult::Value(self.to_dynamic())
    }
}

impl<T: ToDynamic, E: Into<ErrorInfo>> IntoCallResult for Result<T, E> {
    fn into_call_result(self) -> CallResult {
        match self {
            Ok(value) => CallResult::Value(value.to_dynamic()),
            Err(err) => CallResult::Error(err.into()),
        }
    }
}

// ============================================================================
// NativeFn
// ============================================================================

type Callable = dyn Fn(&CallFrame<'_>) -> CallResult + Send + Sync;

/// A native function body, shareable across threads.
///
/// Cloning is cheap; clones call the same closure.
#[derive(Clone)]
pub struct NativeFn {
    callable: Arc<Callable>,
    intrinsic_arity: Option<usize>,
}

impl NativeFn {
    /// Wrap a closure that reads its arguments from the frame itself
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&CallFrame<'_>) -> R + Send + Sync + 'static,
        R: IntoCallResult,
    {
        Self::from_closure(None, move |frame| f(frame).into_call_result())
    }

    /// Wrap a typed closure; its argument list fixes the arity
    pub fn typed<M>(f: impl IntoNativeFn<M>) -> Self {
        f.into_native_fn()
    }

    fn from_closure<F>(intrinsic_arity: Option<usize>, f: F) -> Self
    where
        F: Fn(&CallFrame<'_>) -> CallResult + Send + Sync + 'static,
    {
        Self {
            callable: Arc::new(f),
            intrinsic_arity,
        }
    }

    /// Arity implied by the closure's signature, for typed functions
    pub fn intrinsic_arity(&self) -> Option<usize> {
        self.intrinsic_arity
    }

    /// Run the function body
    pub fn call(&self, frame: &CallFrame<'_>) -> CallResult {
        (self.callable)(frame)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("intrinsic_arity", &self.intrinsic_arity)
            .finish_non_exhaustive()
    }
}

/// Conversion from a typed Rust closure into a [`NativeFn`].
///
/// `Marker` only disambiguates the implementations per argument list.
pub trait IntoNativeFn<Marker> {
    /// Build the native function
    fn into_native_fn(self) -> NativeFn;
}

macro_rules! impl_into_native_fn {
    ($arity:expr $(, $arg:ident $var:ident $idx:tt)*) => {
        impl<F, R, $($arg,)*> IntoNativeFn<fn($($arg,)*) -> R> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: IntoCallResult,
            $($arg: FromDynamic,)*
        {
            #[allow(unused_variables)]
            fn into_native_fn(self) -> NativeFn {
                NativeFn::from_closure(Some($arity), move |frame| {
                    $(
                        let $var = match frame.decode::<$arg>($idx) {
                            Ok(value) => value,
                            Err(err) => return CallResult::Error(err.into()),
                        };
                    )*
                    (self)($($var),*).into_call_result()
                })
            }
        }
    };
}

impl_into_native_fn!(0);
impl_into_native_fn!(1, A0 a0 0);
impl_into_native_fn!(2, A0 a0 0, A1 a1 1);
impl_into_native_fn!(3, A0 a0 0, A1 a1 1, A2 a2 2);
impl_into_native_fn!(4, A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3);
impl_into_native_fn!(5, A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4);
impl_into_native_fn!(6, A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4, A5 a5 5);
