//! C FFI bindings for hostcall
//!
//! Lets a host written in C (or anything that speaks the C ABI) expose native
//! callbacks to a guest VM and dispatch guest calls to them.
//! The API follows these principles:
//! - Only C-compatible types cross the boundary
//! - Opaque pointers for registries, values and errors
//! - Errors reported through optional out-parameters
//! - Every object handed out is freed by its matching `*_free`/`*_destroy`

use std::ffi::{c_void, CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

use hostcall_engine::{
    create_registry_with_config, destroy_registry, guest_error_type, BridgeConfig, ConfigError,
    Session, VmHandle,
};
use hostcall_sdk::{
    Arity, CallFrame, CallResult, DynamicValue, ErrorInfo, ErrorKind, GuestErrorType, NativeFn,
    ObjectRef, StackFrame, ValueType,
};
use thiserror::Error;

/// Arity value accepting any number of arguments
pub const HOSTCALL_VARARGS: c_int = -1;

// ============================================================================
// Opaque Types
// ============================================================================

/// Opaque handle to a registry (one per guest VM)
#[repr(C)]
pub struct HostcallRegistry {
    _private: [u8; 0],
}

/// Opaque handle to a guest value
#[repr(C)]
pub struct HostcallValue {
    _private: [u8; 0],
}

/// Opaque handle to an error
#[repr(C)]
pub struct HostcallError {
    _private: [u8; 0],
}

/// What a callback produced
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostcallStatus {
    /// `*out` holds the return value
    Value = 0,
    /// No return value; the guest sees `undefined`
    Undefined = 1,
    /// The call failed; `*out` may hold a string message
    Error = 2,
}

/// Type tag of a value
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostcallValueType {
    /// Not a value
    None = 0,
    /// `undefined`
    Undefined = 1,
    /// `null`
    Null = 2,
    /// Boolean
    Boolean = 3,
    /// Double
    Number = 4,
    /// UTF-8 string
    String = 5,
    /// Guest object reference
    Object = 6,
}

/// Category of an error
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostcallErrorKind {
    /// Null pointer, bad UTF-8 or bad arity passed to the API
    InvalidArgument = 1,
    /// Wrong number of arguments for the function
    ArityMismatch = 2,
    /// Argument of the wrong type
    TypeMismatch = 3,
    /// Name already registered
    DuplicateName = 4,
    /// Name not registered
    UnknownName = 5,
    /// Name rejected by the naming policy
    InvalidName = 6,
    /// Typed function registered under another arity
    ArityConflict = 7,
    /// Native callback failed
    NativeFailure = 8,
    /// Exception raised by guest code
    GuestThrow = 9,
    /// Configuration could not be read
    Config = 10,
}

/// Native callback.
///
/// `args` points to `argc` borrowed values, valid only during the call. To
/// return a value, store a new value in `*out` and return
/// `HostcallStatus::Value`; the bridge takes ownership of it. To fail, return
/// `HostcallStatus::Error`, optionally storing a string value with the
/// message in `*out`.
pub type HostcallCallback = unsafe extern "C" fn(
    user_data: *mut c_void,
    args: *const *const HostcallValue,
    argc: usize,
    out: *mut *mut HostcallValue,
) -> HostcallStatus;

// Internal representation of a registry (not exposed to C)
struct RegistryHandle {
    session: Session,
}

// Internal representation of a value (not exposed to C)
struct ValueHandle {
    value: DynamicValue,
    text: Option<CString>,
}

impl ValueHandle {
    fn new(value: DynamicValue) -> Self {
        let text = value.as_str().and_then(|s| CString::new(s).ok());
        Self { value, text }
    }

    fn into_raw(self) -> *mut HostcallValue {
        Box::into_raw(Box::new(self)) as *mut HostcallValue
    }
}

// Internal representation of an error (not exposed to C)
struct ErrorHandle {
    kind: HostcallErrorKind,
    error_type: GuestErrorType,
    message: CString,
}

#[derive(Debug, Error)]
enum FfiError {
    #[error("Invalid arguments (null {0})")]
    NullPointer(&'static str),

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid arity: {0}")]
    InvalidArity(c_int),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] ErrorInfo),
}

impl FfiError {
    fn kind(&self) -> HostcallErrorKind {
        match self {
            FfiError::NullPointer(_) | FfiError::InvalidUtf8(_) | FfiError::InvalidArity(_) => {
                HostcallErrorKind::InvalidArgument
            }
            FfiError::Config(_) => HostcallErrorKind::Config,
            FfiError::Bridge(err) => match err.kind {
                ErrorKind::ArityMismatch { .. } => HostcallErrorKind::ArityMismatch,
                ErrorKind::TypeMismatch { .. } => HostcallErrorKind::TypeMismatch,
                ErrorKind::DuplicateName { .. } => HostcallErrorKind::DuplicateName,
                ErrorKind::UnknownName { .. } => HostcallErrorKind::UnknownName,
                ErrorKind::InvalidName { .. } => HostcallErrorKind::InvalidName,
                ErrorKind::ArityConflict { .. } => HostcallErrorKind::ArityConflict,
                ErrorKind::NativeFailure { .. } => HostcallErrorKind::NativeFailure,
                ErrorKind::GuestThrow { .. } => HostcallErrorKind::GuestThrow,
            },
        }
    }

    fn error_type(&self) -> GuestErrorType {
        match self {
            FfiError::Bridge(err) => guest_error_type(&err.kind),
            FfiError::InvalidArity(_) => GuestErrorType::RangeError,
            FfiError::NullPointer(_) | FfiError::InvalidUtf8(_) => GuestErrorType::TypeError,
            FfiError::Config(_) => GuestErrorType::Error,
        }
    }
}

/// A registered C callback and its user data
#[derive(Clone, Copy)]
struct ForeignCallback {
    callback: HostcallCallback,
    user_data: *mut c_void,
}

// SAFETY: `hostcall_register` requires user_data to be usable from every
// thread that calls into the registry.
unsafe impl Send for ForeignCallback {}
unsafe impl Sync for ForeignCallback {}

impl ForeignCallback {
    fn invoke(&self, frame: &CallFrame<'_>) -> CallResult {
        let args: Vec<ValueHandle> = frame.arguments().into_iter().map(ValueHandle::new).collect();
        let pointers: Vec<*const HostcallValue> = args
            .iter()
            .map(|arg| arg as *const ValueHandle as *const HostcallValue)
            .collect();

        let mut out: *mut HostcallValue = ptr::null_mut();
        // SAFETY: the pointers stay valid until `args` drops after the call
        let status = unsafe { (self.callback)(self.user_data, pointers.as_ptr(), pointers.len(), &mut out) };
        let returned = if out.is_null() {
            None
        } else {
            // SAFETY: the callback hands over a value created by hostcall_value_*
            Some(unsafe { Box::from_raw(out as *mut ValueHandle) }.value)
        };

        match status {
            HostcallStatus::Value => match returned {
                Some(value) => CallResult::Value(value),
                None => CallResult::Error(ErrorInfo::native_failure(format!(
                    "'{}' reported a value but returned none",
                    frame.name()
                ))),
            },
            HostcallStatus::Undefined => CallResult::undefined(),
            HostcallStatus::Error => {
                let message = returned
                    .as_ref()
                    .and_then(|value| value.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("'{}' failed", frame.name()));
                CallResult::Error(ErrorInfo::native_failure(message))
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Build a C string, dropping interior NULs
fn c_string_lossy(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}

/// Set error out-parameter
unsafe fn set_error(error_out: *mut *mut HostcallError, error: FfiError) {
    if error_out.is_null() {
        return;
    }
    let handle = ErrorHandle {
        kind: error.kind(),
        error_type: error.error_type(),
        message: c_string_lossy(&error.to_string()),
    };
    *error_out = Box::into_raw(Box::new(handle)) as *mut HostcallError;
}

unsafe fn read_str<'a>(s: *const c_char, what: &'static str) -> Result<&'a str, FfiError> {
    if s.is_null() {
        return Err(FfiError::NullPointer(what));
    }
    CStr::from_ptr(s).to_str().map_err(|_| FfiError::InvalidUtf8(what))
}

unsafe fn session<'a>(registry: *mut HostcallRegistry) -> Result<&'a Session, FfiError> {
    if registry.is_null() {
        return Err(FfiError::NullPointer("registry"));
    }
    Ok(&(*(registry as *const RegistryHandle)).session)
}

unsafe fn read_args(args: *const *const HostcallValue, argc: usize) -> Result<Vec<DynamicValue>, FfiError> {
    if argc == 0 {
        return Ok(Vec::new());
    }
    if args.is_null() {
        return Err(FfiError::NullPointer("args"));
    }
    std::slice::from_raw_parts(args, argc)
        .iter()
        .map(|&arg| {
            if arg.is_null() {
                Err(FfiError::NullPointer("argument"))
            } else {
                Ok((*(arg as *const ValueHandle)).value.clone())
            }
        })
        .collect()
}

fn arity_from_c(arity: c_int) -> Result<Arity, FfiError> {
    if arity == HOSTCALL_VARARGS {
        Ok(Arity::Variadic)
    } else if arity >= 0 {
        Ok(Arity::Fixed(arity as usize))
    } else {
        Err(FfiError::InvalidArity(arity))
    }
}

fn status_code(result: Result<(), FfiError>, error: *mut *mut HostcallError) -> c_int {
    match result {
        Ok(()) => 0,
        Err(e) => {
            // SAFETY: `error` is either null or a valid out-parameter per the API contract
            unsafe { set_error(error, e) };
            -1
        }
    }
}

// ============================================================================
// Registry Lifecycle Functions
// ============================================================================

/// Create a registry for a guest VM
///
/// # Arguments
/// * `vm_handle` - Host-chosen identifier of the VM instance
///
/// # Returns
/// * Non-null pointer to HostcallRegistry
///
/// # Safety
/// The returned registry must be freed with `hostcall_registry_destroy()`
///
/// # Example (C)
/// ```c
/// HostcallRegistry* reg = hostcall_registry_create(1);
/// // Register functions, dispatch calls...
/// hostcall_registry_destroy(reg);
/// ```
#[no_mangle]
pub unsafe extern "C" fn hostcall_registry_create(vm_handle: u64) -> *mut HostcallRegistry {
    let session = create_registry_with_config(VmHandle::new(vm_handle), BridgeConfig::default());
    Box::into_raw(Box::new(RegistryHandle { session })) as *mut HostcallRegistry
}

/// Create a registry configured from TOML text (a `[bridge]` table)
///
/// # Returns
/// * Non-null pointer to HostcallRegistry on success
/// * NULL on failure (check error parameter)
///
/// # Safety
/// - `config_toml` must be a valid null-terminated string
/// - The returned registry must be freed with `hostcall_registry_destroy()`
#[no_mangle]
pub unsafe extern "C" fn hostcall_registry_create_with_config(
    vm_handle: u64,
    config_toml: *const c_char,
    error: *mut *mut HostcallError,
) -> *mut HostcallRegistry {
    let config = read_str(config_toml, "config")
        .and_then(|text| BridgeConfig::from_toml_str(text).map_err(FfiError::from));
    match config {
        Ok(config) => {
            let session = create_registry_with_config(VmHandle::new(vm_handle), config);
            Box::into_raw(Box::new(RegistryHandle { session })) as *mut HostcallRegistry
        }
        Err(e) => {
            set_error(error, e);
            ptr::null_mut()
        }
    }
}

/// Destroy a registry and release every registered function
///
/// # Returns
/// * Number of functions that were still registered
///
/// # Safety
/// - Registry pointer must be valid (created by `hostcall_registry_create*()`) or NULL
/// - Registry must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn hostcall_registry_destroy(registry: *mut HostcallRegistry) -> usize {
    if registry.is_null() {
        return 0;
    }

    let handle = Box::from_raw(registry as *mut RegistryHandle);
    destroy_registry(handle.session)
}

// ============================================================================
// Registration Functions
// ============================================================================

/// Register a C callback under `name`
///
/// # Arguments
/// * `registry` - Pointer to HostcallRegistry (must not be NULL)
/// * `name` - Null-terminated function name
/// * `arity` - Number of arguments, or `HOSTCALL_VARARGS`
/// * `callback` - Function to run on each call
/// * `user_data` - Passed back to `callback` unchanged
/// * `error` - Optional pointer to receive error information
///
/// # Returns
/// * 0 on success
/// * -1 on failure (check error parameter)
///
/// # Safety
/// - Registry pointer must be valid
/// - `user_data` must stay valid, and usable from any calling thread, until
///   the function is unregistered or the registry destroyed
///
/// # Example (C)
/// ```c
/// HostcallError* error = NULL;
/// if (hostcall_register(reg, "add", 2, add_callback, NULL, &error) != 0) {
///     fprintf(stderr, "%s\n", hostcall_error_message(error));
///     hostcall_error_free(error);
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn hostcall_register(
    registry: *mut HostcallRegistry,
    name: *const c_char,
    arity: c_int,
    callback: Option<HostcallCallback>,
    user_data: *mut c_void,
    error: *mut *mut HostcallError,
) -> c_int {
    let result = register_inner(registry, name, arity, callback, user_data);
    status_code(result, error)
}

unsafe fn register_inner(
    registry: *mut HostcallRegistry,
    name: *const c_char,
    arity: c_int,
    callback: Option<HostcallCallback>,
    user_data: *mut c_void,
) -> Result<(), FfiError> {
    let session = session(registry)?;
    let name = read_str(name, "name")?;
    let arity = arity_from_c(arity)?;
    let callback = callback.ok_or(FfiError::NullPointer("callback"))?;

    let foreign = ForeignCallback { callback, user_data };
    let function = NativeFn::new(move |frame: &CallFrame<'_>| foreign.invoke(frame));
    session.expose(name, arity, function)?;
    Ok(())
}

/// Remove `name` from the registry
///
/// # Returns
/// * 0 on success
/// * -1 on failure (check error parameter)
///
/// # Safety
/// - Registry pointer must be valid
/// - Name must be a valid null-terminated string
#[no_mangle]
pub unsafe extern "C" fn hostcall_unregister(
    registry: *mut HostcallRegistry,
    name: *const c_char,
    error: *mut *mut HostcallError,
) -> c_int {
    let result = session(registry).and_then(|session| {
        let name = read_str(name, "name")?;
        session.unregister(name)?;
        Ok(())
    });
    status_code(result, error)
}

/// Check whether `name` is registered
///
/// # Returns
/// * 1 if registered, 0 otherwise (including invalid arguments)
///
/// # Safety
/// - Registry pointer must be valid or NULL
/// - Name must be a valid null-terminated string or NULL
#[no_mangle]
pub unsafe extern "C" fn hostcall_contains(registry: *mut HostcallRegistry, name: *const c_char) -> c_int {
    match (session(registry), read_str(name, "name")) {
        (Ok(session), Ok(name)) => session.registry().contains(name) as c_int,
        _ => 0,
    }
}

// ============================================================================
// Call Functions
// ============================================================================

/// Call `name` with `argc` arguments
///
/// # Arguments
/// * `registry` - Pointer to HostcallRegistry (must not be NULL)
/// * `name` - Null-terminated function name
/// * `args` - Array of `argc` values (may be NULL when `argc` is 0)
/// * `argc` - Number of arguments
/// * `out` - Receives the return value on success
/// * `error` - Optional pointer to receive the thrown error
///
/// # Returns
/// * 0 on success (`*out` must be freed with `hostcall_value_free()`)
/// * -1 on failure (check error parameter)
///
/// # Safety
/// - Registry pointer must be valid
/// - `args` must point to `argc` valid values
/// - `out` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn hostcall_call(
    registry: *mut HostcallRegistry,
    name: *const c_char,
    args: *const *const HostcallValue,
    argc: usize,
    out: *mut *mut HostcallValue,
    error: *mut *mut HostcallError,
) -> c_int {
    match call_inner(registry, name, args, argc, out) {
        Ok(value) => {
            *out = ValueHandle::new(value).into_raw();
            0
        }
        Err(e) => {
            set_error(error, e);
            -1
        }
    }
}

unsafe fn call_inner(
    registry: *mut HostcallRegistry,
    name: *const c_char,
    args: *const *const HostcallValue,
    argc: usize,
    out: *mut *mut HostcallValue,
) -> Result<DynamicValue, FfiError> {
    let session = session(registry)?;
    let name = read_str(name, "name")?;
    if out.is_null() {
        return Err(FfiError::NullPointer("out"));
    }
    let mut frame = StackFrame::new(read_args(args, argc)?);
    Ok(session.call(name, &mut frame).into_result()?)
}

// ============================================================================
// Value Functions
// ============================================================================

/// Create an `undefined` value
///
/// # Safety
/// The returned value must be freed with `hostcall_value_free()`
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_undefined() -> *mut HostcallValue {
    ValueHandle::new(DynamicValue::Undefined).into_raw()
}

/// Create a `null` value
///
/// # Safety
/// The returned value must be freed with `hostcall_value_free()`
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_null() -> *mut HostcallValue {
    ValueHandle::new(DynamicValue::Null).into_raw()
}

/// Create a boolean value (0 = false, non-zero = true)
///
/// # Safety
/// The returned value must be freed with `hostcall_value_free()`
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_bool(value: c_int) -> *mut HostcallValue {
    ValueHandle::new(DynamicValue::Boolean(value != 0)).into_raw()
}

/// Create a number value
///
/// # Safety
/// The returned value must be freed with `hostcall_value_free()`
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_number(value: f64) -> *mut HostcallValue {
    ValueHandle::new(DynamicValue::Number(value)).into_raw()
}

/// Create a string value from null-terminated UTF-8
///
/// # Returns
/// * NULL if `s` is NULL or not UTF-8
///
/// # Safety
/// - `s` must be a valid null-terminated string or NULL
/// - The returned value must be freed with `hostcall_value_free()`
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_string(s: *const c_char) -> *mut HostcallValue {
    match read_str(s, "string") {
        Ok(s) => ValueHandle::new(DynamicValue::string(s)).into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Create a reference to a guest heap object
///
/// # Safety
/// The returned value must be freed with `hostcall_value_free()`
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_object(handle: u64) -> *mut HostcallValue {
    ValueHandle::new(DynamicValue::Object(ObjectRef::new(handle))).into_raw()
}

/// Type tag of a value (`None` for NULL)
///
/// # Safety
/// Value pointer must be valid or NULL
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_type(value: *const HostcallValue) -> HostcallValueType {
    if value.is_null() {
        return HostcallValueType::None;
    }
    match (*(value as *const ValueHandle)).value.value_type() {
        ValueType::None => HostcallValueType::None,
        ValueType::Undefined => HostcallValueType::Undefined,
        ValueType::Null => HostcallValueType::Null,
        ValueType::Boolean => HostcallValueType::Boolean,
        ValueType::Number => HostcallValueType::Number,
        ValueType::String => HostcallValueType::String,
        ValueType::Object => HostcallValueType::Object,
    }
}

/// Read a number
///
/// # Returns
/// * 0 and `*out` set if the value is a number
/// * -1 otherwise
///
/// # Safety
/// Value and out pointers must be valid or NULL
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_as_number(value: *const HostcallValue, out: *mut f64) -> c_int {
    if value.is_null() || out.is_null() {
        return -1;
    }
    match (*(value as *const ValueHandle)).value.as_number() {
        Some(n) => {
            *out = n;
            0
        }
        None => -1,
    }
}

/// Read a boolean
///
/// # Returns
/// * 0 and `*out` set to 0 or 1 if the value is a boolean
/// * -1 otherwise
///
/// # Safety
/// Value and out pointers must be valid or NULL
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_as_bool(value: *const HostcallValue, out: *mut c_int) -> c_int {
    if value.is_null() || out.is_null() {
        return -1;
    }
    match (*(value as *const ValueHandle)).value.as_bool() {
        Some(b) => {
            *out = b as c_int;
            0
        }
        None => -1,
    }
}

/// Read a string
///
/// # Returns
/// * Null-terminated UTF-8, valid until the value is freed
/// * NULL if the value is not a string (or contains NUL)
///
/// # Safety
/// - Value pointer must be valid or NULL
/// - Do not free the returned string directly
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_as_string(value: *const HostcallValue) -> *const c_char {
    if value.is_null() {
        return ptr::null();
    }
    match &(*(value as *const ValueHandle)).text {
        Some(text) => text.as_ptr(),
        None => ptr::null(),
    }
}

/// Read an object handle
///
/// # Returns
/// * 0 and `*out` set if the value is an object reference
/// * -1 otherwise
///
/// # Safety
/// Value and out pointers must be valid or NULL
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_as_object(value: *const HostcallValue, out: *mut u64) -> c_int {
    if value.is_null() || out.is_null() {
        return -1;
    }
    match (*(value as *const ValueHandle)).value.as_object() {
        Some(object) => {
            *out = object.handle();
            0
        }
        None => -1,
    }
}

/// Free a value
///
/// # Safety
/// - Value pointer must be valid (created by hostcall_value_* or returned by
///   `hostcall_call()`) or NULL
/// - Value must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn hostcall_value_free(value: *mut HostcallValue) {
    if value.is_null() {
        return;
    }

    let handle = Box::from_raw(value as *mut ValueHandle);
    drop(handle);
}

// ============================================================================
// Error Handling Functions
// ============================================================================

/// Get the error message
///
/// # Returns
/// * Null-terminated error message string
/// * NULL if error is NULL
///
/// # Safety
/// - Error pointer must be valid
/// - Returned string is valid until `hostcall_error_free()` is called
#[no_mangle]
pub unsafe extern "C" fn hostcall_error_message(error: *const HostcallError) -> *const c_char {
    if error.is_null() {
        return ptr::null();
    }

    (*(error as *const ErrorHandle)).message.as_ptr()
}

/// Get the guest exception type of the error (`"RangeError"`, `"TypeError"`, ...)
///
/// # Returns
/// * Static null-terminated string; do not free
/// * NULL if error is NULL
///
/// # Safety
/// Error pointer must be valid or NULL
#[no_mangle]
pub unsafe extern "C" fn hostcall_error_type(error: *const HostcallError) -> *const c_char {
    if error.is_null() {
        return ptr::null();
    }

    let name: &'static [u8] = match (*(error as *const ErrorHandle)).error_type {
        GuestErrorType::Error => b"Error\0",
        GuestErrorType::EvalError => b"EvalError\0",
        GuestErrorType::RangeError => b"RangeError\0",
        GuestErrorType::ReferenceError => b"ReferenceError\0",
        GuestErrorType::SyntaxError => b"SyntaxError\0",
        GuestErrorType::TypeError => b"TypeError\0",
        GuestErrorType::UriError => b"URIError\0",
    };
    name.as_ptr() as *const c_char
}

/// Get the category of the error
///
/// # Returns
/// * `InvalidArgument` if the error pointer is NULL
///
/// # Safety
/// Error pointer must be valid or NULL
#[no_mangle]
pub unsafe extern "C" fn hostcall_error_kind(error: *const HostcallError) -> HostcallErrorKind {
    if error.is_null() {
        return HostcallErrorKind::InvalidArgument;
    }
    (*(error as *const ErrorHandle)).kind
}

/// Free an error
///
/// # Safety
/// - Error pointer must be valid (created by the hostcall API) or NULL
/// - Error must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn hostcall_error_free(error: *mut HostcallError) {
    if error.is_null() {
        return;
    }

    let _ = Box::from_raw(error as *mut ErrorHandle);
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the hostcall version string
///
/// # Returns
/// * Null-terminated version string (e.g., "0.2.0")
///
/// # Safety
/// - The returned string is a static string and must not be freed
#[no_mangle]
pub unsafe extern "C" fn hostcall_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

// ============================================================================
// Tests
// ============================================================================
