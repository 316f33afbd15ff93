//! DynamicValue: guest values crossing the native boundary
//!
//! A closed tagged variant over everything the guest VM can hand to native
//! code. Values are immutable once built on the native side; strings are
//! shared (`Arc<str>`) so cloning a value never copies its payload.
//!
//! Object values are opaque references into the guest heap. The bridge never
//! dereferences them; it only carries the handle back and forth.

use std::fmt;
use std::sync::Arc;

/// Opaque handle to an object living on the guest VM heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(u64);

impl ObjectRef {
    /// Wrap a guest heap handle
    pub const fn new(handle: u64) -> Self {
        Self(handle)
    }

    /// Raw guest heap handle
    pub const fn handle(self) -> u64 {
        self.0
    }
}

/// Type tag of a guest value.
///
/// `None` is not a value: it is what the guest reports for a slot past the
/// end of the argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No value at this slot
    None,
    /// Guest `undefined`
    Undefined,
    /// Guest `null`
    Null,
    /// Boolean
    Boolean,
    /// IEEE-754 double
    Number,
    /// Immutable string
    String,
    /// Reference to a guest heap object
    Object,
}

impl ValueType {
    /// Lowercase name as the guest's `typeof` would spell it
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::Undefined => "undefined",
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A guest value as seen by native code.
///
/// `PartialEq` follows IEEE-754 for numbers (`NaN != NaN`). Use
/// [`DynamicValue::same_value`] for bit-exact comparison.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DynamicValue {
    /// Guest `undefined`; also what a native returning nothing produces
    #[default]
    Undefined,
    /// Guest `null`
    Null,
    /// Boolean
    Boolean(bool),
    /// Number (always a double on the guest side)
    Number(f64),
    /// String
    String(Arc<str>),
    /// Object reference
    Object(ObjectRef),
}

impl DynamicValue {
    /// Create a string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        DynamicValue::String(s.into())
    }

    /// Create an object reference value
    pub fn object(handle: u64) -> Self {
        DynamicValue::Object(ObjectRef::new(handle))
    }

    /// Type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            DynamicValue::Undefined => ValueType::Undefined,
            DynamicValue::Null => ValueType::Null,
            DynamicValue::Boolean(_) => ValueType::Boolean,
            DynamicValue::Number(_) => ValueType::Number,
            DynamicValue::String(_) => ValueType::String,
            DynamicValue::Object(_) => ValueType::Object,
        }
    }

    /// `undefined` or `null`
    pub fn is_nullish(&self) -> bool {
        matches!(self, DynamicValue::Undefined | DynamicValue::Null)
    }

    /// Extract a number without coercion
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DynamicValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a boolean without coercion
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow string contents without coercion
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract an object reference
    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            DynamicValue::Object(o) => Some(*o),
            _ => None,
        }
    }

    /// Tag and bit-exact payload equality.
    ///
    /// Unlike `==`, a NaN is the same value as an identical NaN and `0.0` is
    /// not the same value as `-0.0`.
    pub fn same_value(&self, other: &DynamicValue) -> bool {
        match (self, other) {
            (DynamicValue::Number(a), DynamicValue::Number(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicValue::Undefined => f.write_str("undefined"),
            DynamicValue::Null => f.write_str("null"),
            DynamicValue::Boolean(b) => write!(f, "{}", b),
            DynamicValue::Number(n) => f.write_str(&crate::convert::number_to_string(*n)),
            DynamicValue::String(s) => f.write_str(s),
            DynamicValue::Object(o) => write!(f, "[object {:#x}]", o.handle()),
        }
    }
}

impl From<f64> for DynamicValue {
    fn from(n: f64) -> Self {
        DynamicValue::Number(n)
    }
}

impl From<bool> for DynamicValue {
    fn from(b: bool) -> Self {
        DynamicValue::Boolean(b)
    }
}

impl From<&str> for DynamicValue {
    fn from(s: &str) -> Self {
        DynamicValue::String(s.into())
    }
}

impl From<String> for DynamicValue {
    fn from(s: String) -> Self {
        DynamicValue::String(s.into())
    }
}

impl From<ObjectRef> for DynamicValue {
    fn from(o: ObjectRef) -> Self {
        DynamicValue::Object(o)
    }
}
