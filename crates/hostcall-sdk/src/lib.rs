//! Hostcall SDK - types for writing native functions
//!
//! This crate provides the types shared between native function
//! implementations and the bridge engine, without depending on the engine:
//! guest values, the value codec, call frames, call results and errors.
//!
//! # Example
//!
//! ```ignore
//! use hostcall_sdk::{CallFrame, NativeFn};
//!
//! // Typed: arguments are decoded left to right, arity is 2
//! let add = NativeFn::typed(|a: f64, b: f64| a + b);
//!
//! // Dynamic: reads the frame itself
//! let count = NativeFn::new(|frame: &CallFrame<'_>| frame.argument_count() as u32);
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod convert;
pub mod error;
pub mod handler;
pub mod value;

pub use context::{CallFrame, FrameOutcome, GuestFrame, StackFrame};
pub use convert::{decode, encode, CoercionPolicy, DecodeError, FromDynamic, ToDynamic};
pub use error::{BridgeResult, ErrorInfo, ErrorKind, GuestErrorType, GuestException};
pub use handler::{Arity, CallResult, IntoCallResult, IntoNativeFn, NativeFn};
pub use value::{DynamicValue, ObjectRef, ValueType};
