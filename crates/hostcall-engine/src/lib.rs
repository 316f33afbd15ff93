//! Hostcall engine
//!
//! The native side of the guest/native boundary:
//!
//! - [`registry`]: name to function table, guarded by a reader/writer lock
//! - [`adapter`]: turns one guest call into one native call
//! - [`error_bridge`]: bridge errors to guest exceptions and back
//! - [`session`]: per-VM lifetime (`create_registry` / `destroy_registry`)
//!
//! # Example
//!
//! ```ignore
//! use hostcall_engine::{create_registry, VmHandle};
//! use hostcall_sdk::StackFrame;
//!
//! let session = create_registry(VmHandle::new(1));
//! session.expose_typed("add", |a: f64, b: f64| a + b)?;
//!
//! let mut frame = StackFrame::with_args([2.0, 3.0]);
//! session.call("add", &mut frame);
//! ```

#![warn(missing_docs)]

pub mod adapter;
pub mod config;
pub mod error_bridge;
pub mod naming;
pub mod registry;
pub mod session;

pub use adapter::{CallAdapter, CallState};
pub use config::{BridgeConfig, ConfigError};
pub use error_bridge::{from_guest_exception, guest_error_type, to_guest_exception};
pub use naming::NamePolicy;
pub use registry::{FunctionRegistry, NativeFunction};
pub use session::{
    create_registry, create_registry_with_config, destroy_registry, Session, VmHandle,
};

pub use hostcall_sdk as sdk;
