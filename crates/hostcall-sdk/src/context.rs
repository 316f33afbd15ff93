//! Guest call frames
//!
//! [`GuestFrame`] is the interface the guest VM implements for one pending
//! native call: argument slots plus a single output. [`CallFrame`] is the
//! read-only view native functions receive; it exists only for the duration
//! of one invocation.

use crate::convert::{decode_value, CoercionPolicy, DecodeError, FromDynamic};
use crate::error::GuestException;
use crate::value::{DynamicValue, ValueType};

/// Call machinery of the guest VM for one native call.
///
/// The guest guarantees slot integrity before the call; the bridge does not
/// try to detect a corrupted frame.
pub trait GuestFrame {
    /// Number of arguments the guest passed
    fn argument_count(&self) -> usize;

    /// Argument at `index` (`index < argument_count()`)
    fn argument_at(&self, index: usize) -> DynamicValue;

    /// Complete the call with a return value
    fn set_return(&mut self, value: DynamicValue);

    /// Complete the call by throwing
    fn throw_exception(&mut self, exception: GuestException);
}

// ============================================================================
// CallFrame
// ============================================================================

/// Transient view over the arguments of one native call.
pub struct CallFrame<'a> {
    name: &'a str,
    guest: &'a dyn GuestFrame,
    argument_count: usize,
    policy: CoercionPolicy,
}

impl<'a> CallFrame<'a> {
    /// Wrap a guest frame for a call to `name`
    pub fn new(name: &'a str, guest: &'a dyn GuestFrame, policy: CoercionPolicy) -> Self {
        Self {
            name,
            guest,
            argument_count: guest.argument_count(),
            policy,
        }
    }

    /// Name the function was called by
    pub fn name(&self) -> &str {
        self.name
    }

    /// Number of arguments supplied
    pub fn argument_count(&self) -> usize {
        self.argument_count
    }

    /// Coercion policy in effect for this call
    pub fn policy(&self) -> CoercionPolicy {
        self.policy
    }

    /// Raw argument, or `None` past the end of the argument list
    pub fn argument(&self, index: usize) -> Option<DynamicValue> {
        if index < self.argument_count {
            Some(self.guest.argument_at(index))
        } else {
            None
        }
    }

    /// Type of the argument at `index`
    pub fn value_type(&self, index: usize) -> ValueType {
        self.argument(index)
            .map_or(ValueType::None, |value| value.value_type())
    }

    /// Decode argument `index` as `T` under the frame's coercion policy
    pub fn decode<T: FromDynamic>(&self, index: usize) -> Result<T, DecodeError> {
        let value = self.argument(index);
        decode_value(value.as_ref(), index, self.policy)
    }

    /// All arguments, in order
    pub fn arguments(&self) -> Vec<DynamicValue> {
        (0..self.argument_count)
            .map(|index| self.guest.argument_at(index))
            .collect()
    }
}

impl std::fmt::Debug for CallFrame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallFrame")
            .field("name", &self.name)
            .field("argument_count", &self.argument_count)
            .field("policy", &self.policy)
            .finish()
    }
}

// ============================================================================
// StackFrame
// ============================================================================

/// How a call completed
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Call returned a value
    Returned(DynamicValue),
    /// Call threw
    Threw(GuestException),
}

/// Owned guest frame for hosts that marshal arguments themselves.
#[derive(Debug, Clone, Default)]
pub struct StackFrame {
    args: Vec<DynamicValue>,
    outcome: Option<FrameOutcome>,
}

impl StackFrame {
    /// Frame holding `args`
    pub fn new(args: Vec<DynamicValue>) -> Self {
        Self {
            args,
            outcome: None,
        }
    }

    /// Frame holding anything convertible to guest values
    pub fn with_args<I, V>(args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DynamicValue>,
    {
        args.into_iter().collect()
    }

    /// Arguments of the call
    pub fn args(&self) -> &[DynamicValue] {
        &self.args
    }

    /// Outcome written by the bridge, if the call completed
    pub fn outcome(&self) -> Option<&FrameOutcome> {
        self.outcome.as_ref()
    }

    /// Take the outcome out of the frame
    pub fn take_outcome(&mut self) -> Option<FrameOutcome> {
        self.outcome.take()
    }

    /// Returned value, if the call returned
    pub fn returned(&self) -> Option<&DynamicValue> {
        match &self.outcome {
            Some(FrameOutcome::Returned(value)) => Some(value),
            _ => None,
        }
    }

    /// Thrown exception, if the call threw
    pub fn thrown(&self) -> Option<&GuestException> {
        match &self.outcome {
            Some(FrameOutcome::Threw(exception)) => Some(exception),
            _ => None,
        }
    }
}

impl<V: Into<DynamicValue>> FromIterator<V> for StackFrame {
    fn from_iter<I: IntoIterator<Item = V>>(args: I) -> Self {
        Self::new(args.into_iter().map(Into::into).collect())
    }
}

impl GuestFrame for StackFrame {
    fn argument_count(&self) -> usize {
        self.args.len()
    }

    fn argument_at(&self, index: usize) -> DynamicValue {
        self.args.get(index).cloned().unwrap_or_default()
    }

    fn set_return(&mut self, value: DynamicValue) {
        debug_assert!(self.outcome.is_none(), "call completed twice");
        self.outcome = Some(FrameOutcome::Returned(value));
    }

    fn throw_exception(&mut self, exception: GuestException) {
        debug_assert!(self.outcome.is_none(), "call completed twice");
        self.outcome = Some(FrameOutcome::Threw(exception));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuestErrorType;

    #[test]
    fn test_call_frame_reads_guest_slots() {
        let guest = StackFrame::with_args([DynamicValue::from(1.0), DynamicValue::from("a")]);
        let frame = CallFrame::new("f", &guest, CoercionPolicy::Strict);

        assert_eq!(frame.name(), "f");
        assert_eq!(frame.argument_count(), 2);
        assert_eq!(frame.value_type(0), ValueType::Number);
        assert_eq!(frame.value_type(1), ValueType::String);
        assert_eq!(frame.value_type(2), ValueType::None);
        assert_eq!(frame.argument(2), None);
        assert_eq!(frame.decode::<f64>(0), Ok(1.0));
        assert_eq!(frame.arguments().len(), 2);
    }

    #[test]
    fn test_call_frame_decode_uses_policy() {
        let guest = StackFrame::with_args(["4"]);
        let strict = CallFrame::new("f", &guest, CoercionPolicy::Strict);
        assert!(strict.decode::<f64>(0).is_err());

        let lenient = CallFrame::new("f", &guest, CoercionPolicy::Lenient);
        assert_eq!(lenient.decode::<f64>(0), Ok(4.0));
    }

    #[test]
    fn test_stack_frame_outcomes() {
        let mut frame = StackFrame::new(Vec::new());
        assert!(frame.outcome().is_none());
        frame.set_return(DynamicValue::from(3.0));
        assert_eq!(frame.returned(), Some(&DynamicValue::from(3.0)));
        assert!(frame.thrown().is_none());

        let mut frame = StackFrame::default();
        frame.throw_exception(GuestException::new(GuestErrorType::Error, "x"));
        assert_eq!(frame.thrown().map(|e| e.message.as_str()), Some("x"));
        assert!(frame.take_outcome().is_some());
        assert!(frame.outcome().is_none());
    }

    #[test]
    #[should_panic(expected = "call completed twice")]
    fn test_stack_frame_rejects_second_outcome() {
        let mut frame = StackFrame::default();
        frame.set_return(DynamicValue::from(1.0));
        frame.throw_exception(GuestException::new(GuestErrorType::Error, "late"));
    }
}
