//! Call frame adapter
//!
//! The single point where a guest call becomes a native call. Per call:
//!
//! ```text
//! Idle -> ArityChecked -> Decoding -> Executing -> {Succeeded | Failed} -> Idle
//! ```
//!
//! The arity check runs before any argument slot is read. Typed functions
//! decode left to right and stop at the first failure, so the native body
//! never runs on bad input. Exactly one outcome is written back to the
//! guest frame.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use hostcall_sdk::{
    Arity, CallFrame, CallResult, CoercionPolicy, ErrorInfo, ErrorKind, GuestFrame,
};

use crate::config::BridgeConfig;
use crate::error_bridge::to_guest_exception;
use crate::registry::NativeFunction;

/// Phase of one native call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// No call in progress
    Idle,
    /// Argument count accepted
    ArityChecked,
    /// Arguments being converted
    Decoding,
    /// Native body running
    Executing,
    /// Call produced a value
    Succeeded,
    /// Call produced an error
    Failed,
}

impl CallState {
    /// Whether `next` may follow `self`
    pub fn can_advance_to(self, next: CallState) -> bool {
        use CallState::*;
        matches!(
            (self, next),
            (Idle, ArityChecked)
                | (Idle, Failed)
                | (ArityChecked, Decoding)
                | (Decoding, Executing)
                | (Decoding, Failed)
                | (Executing, Succeeded)
                | (Executing, Failed)
                | (Succeeded, Idle)
                | (Failed, Idle)
        )
    }

    /// Whether the call has finished
    pub fn is_terminal(self) -> bool {
        matches!(self, CallState::Succeeded | CallState::Failed)
    }
}

struct CallTracker<'a> {
    name: &'a str,
    state: CallState,
}

impl<'a> CallTracker<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            state: CallState::Idle,
        }
    }

    fn advance(&mut self, next: CallState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid call transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(target: "hostcall::call", "'{}': {:?} -> {:?}", self.name, self.state, next);
        self.state = next;
    }

    fn reject(&mut self, err: &ErrorInfo) {
        tracing::debug!(
            target: "hostcall::call",
            "'{}' rejected: {:?}: {}",
            self.name,
            err.kind,
            err.message
        );
        self.advance(CallState::Failed);
    }

    fn settle(&mut self, result: &CallResult) {
        match result {
            CallResult::Value(_) => {
                self.advance(CallState::Executing);
                self.advance(CallState::Succeeded);
            }
            CallResult::Error(err) => {
                // Decode failures never reach the body
                if !matches!(err.kind, ErrorKind::TypeMismatch { .. }) {
                    self.advance(CallState::Executing);
                }
                tracing::debug!(
                    target: "hostcall::call",
                    "'{}' failed: {:?}: {}",
                    self.name,
                    err.kind,
                    err.message
                );
                self.advance(CallState::Failed);
            }
        }
    }
}

/// Runs registered functions against guest frames.
#[derive(Debug, Clone, Copy)]
pub struct CallAdapter {
    policy: CoercionPolicy,
    catch_panics: bool,
}

impl CallAdapter {
    /// Create an adapter
    pub fn new(policy: CoercionPolicy, catch_panics: bool) -> Self {
        Self {
            policy,
            catch_panics,
        }
    }

    /// Adapter for a session configuration
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.coercion, config.catch_panics)
    }

    /// Coercion policy applied to arguments
    pub fn policy(&self) -> CoercionPolicy {
        self.policy
    }

    /// Call `function` with the arguments in `guest`, write the outcome back
    /// into `guest` and return it.
    pub fn dispatch(&self, function: &NativeFunction, guest: &mut dyn GuestFrame) -> CallResult {
        let mut tracker = CallTracker::new(function.name());
        let result = self.invoke(function, &*guest, &mut tracker);
        complete(guest, &result);
        tracker.advance(CallState::Idle);
        result
    }

    fn invoke(
        &self,
        function: &NativeFunction,
        guest: &dyn GuestFrame,
        tracker: &mut CallTracker<'_>,
    ) -> CallResult {
        let actual = guest.argument_count();
        if let Arity::Fixed(expected) = function.arity() {
            if expected != actual {
                let err = ErrorInfo::arity_mismatch(function.name(), expected, actual);
                tracker.reject(&err);
                return CallResult::Error(err);
            }
        }
        tracker.advance(CallState::ArityChecked);

        let frame = CallFrame::new(function.name(), guest, self.policy);
        tracker.advance(CallState::Decoding);
        let result = self.run(function, &frame);
        tracker.settle(&result);
        result
    }

    fn run(&self, function: &NativeFunction, frame: &CallFrame<'_>) -> CallResult {
        if !self.catch_panics {
            return function.body().call(frame);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| function.body().call(frame))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(&*payload);
                tracing::warn!(target: "hostcall::call", "'{}' panicked: {}", function.name(), message);
                CallResult::Error(ErrorInfo::native_failure(format!(
                    "'{}' panicked: {}",
                    function.name(),
                    message
                )))
            }
        }
    }
}

impl Default for CallAdapter {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}

/// Write `result` into the guest frame: a return value or a thrown exception.
pub fn complete(guest: &mut dyn GuestFrame, result: &CallResult) {
    match result {
        CallResult::Value(value) => guest.set_return(value.clone()),
        CallResult::Error(err) => guest.throw_exception(to_guest_exception(err.clone())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
