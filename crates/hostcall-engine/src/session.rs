//! Host boundary: one bridge session per guest VM instance
//!
//! A [`Session`] owns the function registry of one VM. The host creates it
//! when the VM is created ([`create_registry`]) and tears it down with the VM
//! ([`destroy_registry`]); teardown releases every registered function.

use hostcall_sdk::{
    Arity, BridgeResult, CallResult, DynamicValue, ErrorInfo, GuestFrame, IntoNativeFn, NativeFn,
    StackFrame,
};

use crate::adapter::{complete, CallAdapter};
use crate::config::BridgeConfig;
use crate::registry::{FunctionRegistry, NativeFunction};

/// Opaque identifier of the guest VM a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VmHandle(u64);

impl VmHandle {
    /// Wrap a host-chosen VM identifier
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Create a session with the default configuration
pub fn create_registry(vm: VmHandle) -> Session {
    Session::new(vm, BridgeConfig::default())
}

/// Create a session with an explicit configuration
pub fn create_registry_with_config(vm: VmHandle, config: BridgeConfig) -> Session {
    Session::new(vm, config)
}

/// Tear a session down, returning how many functions were released
pub fn destroy_registry(session: Session) -> usize {
    session.destroy()
}

/// Registry and call adapter bound to one guest VM.
#[derive(Debug)]
pub struct Session {
    vm: VmHandle,
    config: BridgeConfig,
    registry: FunctionRegistry,
    adapter: CallAdapter,
}

impl Session {
    /// Create a session for `vm`
    pub fn new(vm: VmHandle, config: BridgeConfig) -> Self {
        tracing::info!(
            target: "hostcall::session",
            "session created for vm {:#x} (coercion {:?}, names {:?})",
            vm.raw(),
            config.coercion,
            config.names
        );
        Self {
            vm,
            config,
            registry: FunctionRegistry::new(config.names),
            adapter: CallAdapter::from_config(&config),
        }
    }

    /// VM this session belongs to
    pub fn vm(&self) -> VmHandle {
        self.vm
    }

    /// Configuration in effect
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Function registry
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Expose a native function to the guest under `name`
    pub fn expose(&self, name: &str, arity: impl Into<Arity>, function: NativeFn) -> BridgeResult<()> {
        self.registry.register(name, function, arity)
    }

    /// Expose a typed closure; the arity comes from its signature
    pub fn expose_typed<M>(&self, name: &str, function: impl IntoNativeFn<M>) -> BridgeResult<()> {
        self.registry.register_typed(name, function)
    }

    /// Overwrite (or insert) `name`, returning the previous entry
    pub fn replace(
        &self,
        name: &str,
        arity: impl Into<Arity>,
        function: NativeFn,
    ) -> BridgeResult<Option<NativeFunction>> {
        self.registry.replace(name, function, arity)
    }

    /// Remove `name` from the guest's view
    pub fn unregister(&self, name: &str) -> BridgeResult<NativeFunction> {
        self.registry.unregister(name)
    }

    /// Look up `name`
    pub fn resolve(&self, name: &str) -> Option<NativeFunction> {
        self.registry.resolve(name)
    }

    /// Handle a guest call to `name`.
    ///
    /// The outcome is written into `guest` exactly once; an unregistered
    /// name throws `UnknownName` without reading any argument.
    pub fn call(&self, name: &str, guest: &mut dyn GuestFrame) -> CallResult {
        match self.registry.resolve(name) {
            Some(function) => self.adapter.dispatch(&function, guest),
            None => {
                let result = CallResult::Error(ErrorInfo::unknown_name(name));
                tracing::debug!(target: "hostcall::call", "call to unknown native function '{}'", name);
                complete(guest, &result);
                result
            }
        }
    }

    /// Call `name` with owned arguments
    pub fn call_with(&self, name: &str, args: Vec<DynamicValue>) -> BridgeResult<DynamicValue> {
        let mut frame = StackFrame::new(args);
        self.call(name, &mut frame).into_result()
    }

    fn destroy(self) -> usize {
        // Drop does the release; count first so the caller sees the total
        let released = self.registry.len();
        drop(self);
        released
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let released = self.registry.clear();
        tracing::info!(
            target: "hostcall::session",
            "session for vm {:#x} destroyed ({} functions released)",
            self.vm.raw(),
            released
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcall_sdk::{CallFrame, ErrorKind, GuestErrorType};

    #[test]
    fn test_expose_and_call() {
        let session = create_registry(VmHandle::new(1));
        session.expose_typed("add", |a: f64, b: f64| a + b).unwrap();

        assert_eq!(session.call_with("add", vec![2.0.into(), 3.0.into()]), Ok(DynamicValue::Number(5.0)));
        assert_eq!(session.vm(), VmHandle::new(1));
    }

    #[test]
    fn test_unknown_name_throws_reference_error() {
        let session = create_registry(VmHandle::new(1));
        let mut guest = StackFrame::with_args([1.0]);
        let result = session.call("missing", &mut guest);

        assert_eq!(
            result.error().map(|e| e.kind.clone()),
            Some(ErrorKind::UnknownName {
                name: "missing".to_string()
            })
        );
        assert_eq!(
            guest.thrown().map(|e| e.error_type),
            Some(GuestErrorType::ReferenceError)
        );
    }

    #[test]
    fn test_native_can_expose_from_inside_a_call() {
        let session = std::sync::Arc::new(create_registry(VmHandle::new(2)));
        let inner = std::sync::Arc::downgrade(&session);
        session
            .expose(
                "install",
                0,
                NativeFn::new(move |_frame: &CallFrame<'_>| {
                    let session = inner.upgrade().ok_or_else(|| ErrorInfo::native_failure("gone"))?;
                    session.expose_typed("late", || true)
                }),
            )
            .unwrap();

        assert_eq!(session.call_with("install", Vec::new()), Ok(DynamicValue::Undefined));
        assert_eq!(session.call_with("late", Vec::new()), Ok(DynamicValue::Boolean(true)));
    }

    #[test]
    fn test_replace_and_unregister() {
        let session = create_registry(VmHandle::new(3));
        session.expose_typed("f", || 1.0).unwrap();
        let previous = session.replace("f", 0, NativeFn::typed(|| 2.0)).unwrap();
        assert!(previous.is_some());
        assert_eq!(session.call_with("f", Vec::new()), Ok(DynamicValue::Number(2.0)));

        session.unregister("f").unwrap();
        assert!(session.resolve("f").is_none());
    }

    #[test]
    fn test_destroy_releases_everything() {
        let session = create_registry_with_config(VmHandle::new(4), BridgeConfig::default());
        session.expose_typed("a", || 1.0).unwrap();
        session.expose_typed("b", || 2.0).unwrap();
        assert_eq!(destroy_registry(session), 2);
    }

    #[test]
    fn test_session_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Session>();
        assert_send_sync::<NativeFunction>();
    }
}
