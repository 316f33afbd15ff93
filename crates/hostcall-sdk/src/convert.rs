//! Value codec: conversion between `DynamicValue` and Rust types.
//!
//! Decoding is an explicit, fallible projection out of the variant. Under the
//! default [`CoercionPolicy::Strict`] a value only decodes into the Rust type
//! matching its tag. [`CoercionPolicy::Lenient`] applies the guest language's
//! primitive conversions (ToNumber, ToBoolean, ToString) instead.
//!
//! Encoding is total and lossless.

use serde::{Deserialize, Serialize};

use crate::context::CallFrame;
use crate::value::{DynamicValue, ObjectRef, ValueType};

/// Argument decoding failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Value at `index` has the wrong type
    #[error("Argument {index}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Zero-based argument index
        index: usize,
        /// Requested type
        expected: ValueType,
        /// Supplied type (`none` past the end of the argument list)
        actual: ValueType,
    },
}

/// How strictly guest values are projected into Rust types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Tag must match exactly
    #[default]
    Strict,
    /// Primitive values are converted the way the guest would
    Lenient,
}

// ============================================================================
// Conversion Traits
// ============================================================================

/// Convert a guest value into a Rust type.
///
/// Implement this trait to accept your type as a native function argument.
pub trait FromDynamic: Sized {
    /// Type reported in mismatch errors
    const EXPECTED: ValueType;

    /// Project `value` into `Self`, or `None` if it does not convert.
    fn from_dynamic(value: &DynamicValue, policy: CoercionPolicy) -> Option<Self>;

    /// Value used for a slot past the end of the argument list.
    ///
    /// Most types have none; optional arguments decode to `None`.
    fn from_missing() -> Option<Self> {
        None
    }
}

/// Convert a Rust value into a guest value.
pub trait ToDynamic {
    /// Encode as a guest value
    fn to_dynamic(self) -> DynamicValue;
}

/// Decode argument `index` of `frame` as `T`.
pub fn decode<T: FromDynamic>(frame: &CallFrame<'_>, index: usize) -> Result<T, DecodeError> {
    frame.decode(index)
}

/// Encode a Rust value as a guest value.
pub fn encode<T: ToDynamic>(value: T) -> DynamicValue {
    value.to_dynamic()
}

/// Decode a single value that is not attached to a frame.
pub fn decode_value<T: FromDynamic>(
    value: Option<&DynamicValue>,
    index: usize,
    policy: CoercionPolicy,
) -> Result<T, DecodeError> {
    let decoded = match value {
        Some(value) => T::from_dynamic(value, policy),
        None => T::from_missing(),
    };
    decoded.ok_or_else(|| DecodeError::TypeMismatch {
        index,
        expected: T::EXPECTED,
        actual: value.map_or(ValueType::None, DynamicValue::value_type),
    })
}

// ============================================================================
// Guest Primitive Conversions
// ============================================================================

/// ToNumber for primitive values. Objects do not convert.
pub fn to_number(value: &DynamicValue) -> Option<f64> {
    match value {
        DynamicValue::Undefined => Some(f64::NAN),
        DynamicValue::Null => Some(0.0),
        DynamicValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        DynamicValue::Number(n) => Some(*n),
        DynamicValue::String(s) => Some(parse_number(s)),
        DynamicValue::Object(_) => None,
    }
}

/// ToBoolean. Every value converts.
pub fn to_boolean(value: &DynamicValue) -> bool {
    match value {
        DynamicValue::Undefined | DynamicValue::Null => false,
        DynamicValue::Boolean(b) => *b,
        DynamicValue::Number(n) => !(*n == 0.0 || n.is_nan()),
        DynamicValue::String(s) => !s.is_empty(),
        DynamicValue::Object(_) => true,
    }
}

/// ToString for primitive values. Objects do not convert.
pub fn to_string(value: &DynamicValue) -> Option<String> {
    match value {
        DynamicValue::Object(_) => None,
        DynamicValue::String(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}

/// Format a number the way the guest prints it.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        // Rust writes "1e21"; the guest writes "1e+21"
        let s = format!("{:e}", n);
        return match s.find('e') {
            Some(pos) if !s[pos + 1..].starts_with('-') => {
                format!("{}e+{}", &s[..pos], &s[pos + 1..])
            }
            _ => s,
        };
    }
    // Display already prints shortest round-trip digits, padded with zeros
    format!("{}", n)
}

fn parse_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        if hex.is_empty() {
            return f64::NAN;
        }
        return hex
            .chars()
            .try_fold(0.0, |acc: f64, c| c.to_digit(16).map(|d| acc * 16.0 + f64::from(d)))
            .unwrap_or(f64::NAN);
    }
    // Rust's parser also accepts "inf" and "nan", the guest does not
    let numeric = t
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if numeric {
        t.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

// ============================================================================
// Implementations
// ============================================================================

impl FromDynamic for f64 {
    const EXPECTED: ValueType = ValueType::Number;

    fn from_dynamic(value: &DynamicValue, policy: CoercionPolicy) -> Option<Self> {
        match policy {
            CoercionPolicy::Strict => value.as_number(),
            CoercionPolicy::Lenient => to_number(value),
        }
    }
}

impl FromDynamic for bool {
    const EXPECTED: ValueType = ValueType::Boolean;

    fn from_dynamic(value: &DynamicValue, policy: CoercionPolicy) -> Option<Self> {
        match policy {
            CoercionPolicy::Strict => value.as_bool(),
            CoercionPolicy::Lenient => Some(to_boolean(value)),
        }
    }
}

impl FromDynamic for String {
    const EXPECTED: ValueType = ValueType::String;

    fn from_dynamic(value: &DynamicValue, policy: CoercionPolicy) -> Option<Self> {
        match policy {
            CoercionPolicy::Strict => value.as_str().map(str::to_string),
            CoercionPolicy::Lenient => to_string(value),
        }
    }
}

impl FromDynamic for ObjectRef {
    const EXPECTED: ValueType = ValueType::Object;

    fn from_dynamic(value: &DynamicValue, _policy: CoercionPolicy) -> Option<Self> {
        value.as_object()
    }
}

impl FromDynamic for DynamicValue {
    const EXPECTED: ValueType = ValueType::Undefined;

    fn from_dynamic(value: &DynamicValue, _policy: CoercionPolicy) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FromDynamic> FromDynamic for Option<T> {
    const EXPECTED: ValueType = T::EXPECTED;

    fn from_dynamic(value: &DynamicValue, policy: CoercionPolicy) -> Option<Self> {
        if value.is_nullish() {
            Some(None)
        } else {
            T::from_dynamic(value, policy).map(Some)
        }
    }

    fn from_missing() -> Option<Self> {
        Some(None)
    }
}

impl ToDynamic for f64 {
    fn to_dynamic(self) -> DynamicValue {
        DynamicValue::Number(self)
    }
}

impl ToDynamic for i32 {
    fn to_dynamic(self) -> DynamicValue {
        DynamicValue::Number(self as f64)
    }
}

impl ToDynamic for u32 {
    fn to_dynamic(self) -> DynamicValue {
        DynamicValue::Number(self as f64)
    }
}

impl ToDynamic for bool {
    fn to_dynamic(self) -> DynamicValue {
        DynamicValue::Boolean(self)
    }
}

impl ToDynamic for String {
    fn to_dynamic(self) -> DynamicValue {
        DynamicValue::string(self)
    }
}

impl ToDynamic for &str {
    fn to_dynamic(self) -> DynamicValue {
        DynamicValue::string(self)
    }
}

impl ToDynamic for ObjectRef {
    fn to_dynamic(self) -> DynamicValue {
        DynamicValue::Object(self)
    }
}

impl ToDynamic for DynamicValue {
    fn to_dynamic(self) -> DynamicValue {
        self
    }
}

// Functions returning nothing produce `undefined`
impl ToDynamic for () {
    fn to_dynamic(self) -> DynamicValue {
        DynamicValue::Undefined
    }
}

impl<T: ToDynamic> ToDynamic for Option<T> {
    fn to_dynamic(self) -> DynamicValue {
        match self {
            Some(value) => value.to_dynamic(),
            None => DynamicValue::Null,
        }
    }
}
