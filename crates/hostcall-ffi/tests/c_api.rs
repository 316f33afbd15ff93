//! C API tests, driving the exported functions the way a C host would

use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use hostcall_ffi::*;

unsafe extern "C" fn add_callback(
    _user_data: *mut c_void,
    args: *const *const HostcallValue,
    argc: usize,
    out: *mut *mut HostcallValue,
) -> HostcallStatus {
    let args = std::slice::from_raw_parts(args, argc);
    let mut sum = 0.0;
    for &arg in args {
        let mut n = 0.0;
        if hostcall_value_as_number(arg, &mut n) != 0 {
            *out = hostcall_value_string(b"add: expected numbers\0".as_ptr() as *const c_char);
            return HostcallStatus::Error;
        }
        sum += n;
    }
    *out = hostcall_value_number(sum);
    HostcallStatus::Value
}

unsafe extern "C" fn counting_callback(
    user_data: *mut c_void,
    _args: *const *const HostcallValue,
    _argc: usize,
    _out: *mut *mut HostcallValue,
) -> HostcallStatus {
    let counter = &*(user_data as *const AtomicUsize);
    counter.fetch_add(1, Ordering::SeqCst);
    HostcallStatus::Undefined
}

unsafe extern "C" fn silent_failure(
    _user_data: *mut c_void,
    _args: *const *const HostcallValue,
    _argc: usize,
    _out: *mut *mut HostcallValue,
) -> HostcallStatus {
    HostcallStatus::Error
}

fn c(s: &'static [u8]) -> *const c_char {
    s.as_ptr() as *const c_char
}

unsafe fn message(error: *const HostcallError) -> String {
    CStr::from_ptr(hostcall_error_message(error))
        .to_string_lossy()
        .into_owned()
}

unsafe fn error_type(error: *const HostcallError) -> String {
    CStr::from_ptr(hostcall_error_type(error))
        .to_string_lossy()
        .into_owned()
}

#[test]
fn test_register_and_call() {
    unsafe {
        let reg = hostcall_registry_create(1);
        let mut error: *mut HostcallError = ptr::null_mut();

        let rc = hostcall_register(reg, c(b"add\0"), 2, Some(add_callback), ptr::null_mut(), &mut error);
        assert_eq!(rc, 0);
        assert!(error.is_null());
        assert_eq!(hostcall_contains(reg, c(b"add\0")), 1);

        let a = hostcall_value_number(2.0);
        let b = hostcall_value_number(3.0);
        let args = [a as *const HostcallValue, b as *const HostcallValue];
        let mut out: *mut HostcallValue = ptr::null_mut();

        let rc = hostcall_call(reg, c(b"add\0"), args.as_ptr(), 2, &mut out, &mut error);
        assert_eq!(rc, 0);
        assert_eq!(hostcall_value_type(out), HostcallValueType::Number);
        let mut result = 0.0;
        assert_eq!(hostcall_value_as_number(out, &mut result), 0);
        assert_eq!(result, 5.0);

        hostcall_value_free(out);
        hostcall_value_free(a);
        hostcall_value_free(b);
        assert_eq!(hostcall_registry_destroy(reg), 1);
    }
}

#[test]
fn test_arity_mismatch_does_not_reach_callback() {
    unsafe {
        let counter = AtomicUsize::new(0);
        let reg = hostcall_registry_create(2);
        let user_data = &counter as *const AtomicUsize as *mut c_void;
        let rc = hostcall_register(reg, c(b"tick\0"), 1, Some(counting_callback), user_data, ptr::null_mut());
        assert_eq!(rc, 0);

        let mut out: *mut HostcallValue = ptr::null_mut();
        let mut error: *mut HostcallError = ptr::null_mut();
        let rc = hostcall_call(reg, c(b"tick\0"), ptr::null(), 0, &mut out, &mut error);

        assert_eq!(rc, -1);
        assert!(out.is_null());
        assert_eq!(hostcall_error_kind(error), HostcallErrorKind::ArityMismatch);
        assert_eq!(error_type(error), "RangeError");
        assert_eq!(message(error), "Function 'tick' expects 1 arguments, got 0");
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        hostcall_error_free(error);

        let arg = hostcall_value_null();
        let args = [arg as *const HostcallValue];
        let rc = hostcall_call(reg, c(b"tick\0"), args.as_ptr(), 1, &mut out, ptr::null_mut());
        assert_eq!(rc, 0);
        assert_eq!(hostcall_value_type(out), HostcallValueType::Undefined);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        hostcall_value_free(out);
        hostcall_value_free(arg);
        hostcall_registry_destroy(reg);
    }
}

#[test]
fn test_variadic_and_callback_errors() {
    unsafe {
        let reg = hostcall_registry_create(3);
        let rc = hostcall_register(
            reg,
            c(b"sum\0"),
            HOSTCALL_VARARGS,
            Some(add_callback),
            ptr::null_mut(),
            ptr::null_mut(),
        );
        assert_eq!(rc, 0);

        let values = [
            hostcall_value_number(1.0),
            hostcall_value_number(2.0),
            hostcall_value_string(c(b"three\0")),
        ];
        let args: Vec<*const HostcallValue> = values.iter().map(|v| *v as *const HostcallValue).collect();
        let mut out: *mut HostcallValue = ptr::null_mut();

        let rc = hostcall_call(reg, c(b"sum\0"), args.as_ptr(), 2, &mut out, ptr::null_mut());
        assert_eq!(rc, 0);
        let mut result = 0.0;
        hostcall_value_as_number(out, &mut result);
        assert_eq!(result, 3.0);
        hostcall_value_free(out);

        let mut error: *mut HostcallError = ptr::null_mut();
        let rc = hostcall_call(reg, c(b"sum\0"), args.as_ptr(), 3, &mut out, &mut error);
        assert_eq!(rc, -1);
        assert_eq!(hostcall_error_kind(error), HostcallErrorKind::NativeFailure);
        assert_eq!(error_type(error), "Error");
        assert_eq!(message(error), "add: expected numbers");
        hostcall_error_free(error);

        for value in values {
            hostcall_value_free(value);
        }
        hostcall_registry_destroy(reg);
    }
}

#[test]
fn test_error_without_message() {
    unsafe {
        let reg = hostcall_registry_create(4);
        hostcall_register(reg, c(b"fail\0"), 0, Some(silent_failure), ptr::null_mut(), ptr::null_mut());

        let mut out: *mut HostcallValue = ptr::null_mut();
        let mut error: *mut HostcallError = ptr::null_mut();
        let rc = hostcall_call(reg, c(b"fail\0"), ptr::null(), 0, &mut out, &mut error);
        assert_eq!(rc, -1);
        assert_eq!(message(error), "'fail' failed");
        hostcall_error_free(error);
        hostcall_registry_destroy(reg);
    }
}

#[test]
fn test_registration_errors() {
    unsafe {
        let reg = hostcall_registry_create(5);
        let mut error: *mut HostcallError = ptr::null_mut();

        hostcall_register(reg, c(b"add\0"), 2, Some(add_callback), ptr::null_mut(), ptr::null_mut());
        let rc = hostcall_register(reg, c(b"add\0"), 2, Some(add_callback), ptr::null_mut(), &mut error);
        assert_eq!(rc, -1);
        assert_eq!(hostcall_error_kind(error), HostcallErrorKind::DuplicateName);
        hostcall_error_free(error);

        error = ptr::null_mut();
        let rc = hostcall_register(reg, c(b"Bad Name\0"), 0, Some(add_callback), ptr::null_mut(), &mut error);
        assert_eq!(rc, -1);
        assert_eq!(hostcall_error_kind(error), HostcallErrorKind::InvalidName);
        assert_eq!(error_type(error), "SyntaxError");
        hostcall_error_free(error);

        error = ptr::null_mut();
        let rc = hostcall_register(reg, c(b"neg\0"), -7, Some(add_callback), ptr::null_mut(), &mut error);
        assert_eq!(rc, -1);
        assert_eq!(hostcall_error_kind(error), HostcallErrorKind::InvalidArgument);
        hostcall_error_free(error);

        error = ptr::null_mut();
        let rc = hostcall_register(reg, c(b"nocb\0"), 0, None, ptr::null_mut(), &mut error);
        assert_eq!(rc, -1);
        assert_eq!(message(error), "Invalid arguments (null callback)");
        hostcall_error_free(error);

        hostcall_registry_destroy(reg);
    }
}

#[test]
fn test_unregister_then_call_is_unknown() {
    unsafe {
        let reg = hostcall_registry_create(6);
        hostcall_register(reg, c(b"add\0"), 2, Some(add_callback), ptr::null_mut(), ptr::null_mut());
        assert_eq!(hostcall_unregister(reg, c(b"add\0"), ptr::null_mut()), 0);
        assert_eq!(hostcall_contains(reg, c(b"add\0")), 0);

        let mut error: *mut HostcallError = ptr::null_mut();
        assert_eq!(hostcall_unregister(reg, c(b"add\0"), &mut error), -1);
        assert_eq!(hostcall_error_kind(error), HostcallErrorKind::UnknownName);
        hostcall_error_free(error);

        error = ptr::null_mut();
        let mut out: *mut HostcallValue = ptr::null_mut();
        let rc = hostcall_call(reg, c(b"add\0"), ptr::null(), 0, &mut out, &mut error);
        assert_eq!(rc, -1);
        assert_eq!(error_type(error), "ReferenceError");
        hostcall_error_free(error);

        assert_eq!(hostcall_registry_destroy(reg), 0);
    }
}

#[test]
fn test_null_arguments() {
    unsafe {
        let mut error: *mut HostcallError = ptr::null_mut();
        let mut out: *mut HostcallValue = ptr::null_mut();
        let rc = hostcall_call(ptr::null_mut(), c(b"add\0"), ptr::null(), 0, &mut out, &mut error);
        assert_eq!(rc, -1);
        assert_eq!(hostcall_error_kind(error), HostcallErrorKind::InvalidArgument);
        assert_eq!(message(error), "Invalid arguments (null registry)");
        hostcall_error_free(error);

        assert_eq!(hostcall_registry_destroy(ptr::null_mut()), 0);
        hostcall_value_free(ptr::null_mut());
        hostcall_error_free(ptr::null_mut());
        assert!(hostcall_error_message(ptr::null()).is_null());
        assert!(hostcall_error_type(ptr::null()).is_null());
        assert_eq!(hostcall_error_kind(ptr::null()), HostcallErrorKind::InvalidArgument);
        assert_eq!(hostcall_value_type(ptr::null()), HostcallValueType::None);
    }
}

#[test]
fn test_value_accessors() {
    unsafe {
        let s = hostcall_value_string(c(b"hello\0"));
        assert_eq!(hostcall_value_type(s), HostcallValueType::String);
        assert_eq!(CStr::from_ptr(hostcall_value_as_string(s)).to_str().unwrap(), "hello");
        let mut n = 0.0;
        assert_eq!(hostcall_value_as_number(s, &mut n), -1);
        hostcall_value_free(s);

        let b = hostcall_value_bool(7);
        let mut flag: c_int = 0;
        assert_eq!(hostcall_value_as_bool(b, &mut flag), 0);
        assert_eq!(flag, 1);
        assert!(hostcall_value_as_string(b).is_null());
        hostcall_value_free(b);

        let o = hostcall_value_object(0xbeef);
        let mut handle = 0u64;
        assert_eq!(hostcall_value_as_object(o, &mut handle), 0);
        assert_eq!(handle, 0xbeef);
        hostcall_value_free(o);

        let u = hostcall_value_undefined();
        assert_eq!(hostcall_value_type(u), HostcallValueType::Undefined);
        hostcall_value_free(u);
    }
}

#[test]
fn test_create_with_config() {
    unsafe {
        let mut error: *mut HostcallError = ptr::null_mut();
        let reg = hostcall_registry_create_with_config(
            7,
            c(b"[bridge]\nnames = \"any\"\n\0"),
            &mut error,
        );
        assert!(!reg.is_null());
        let rc = hostcall_register(reg, c(b"Math::Add\0"), 2, Some(add_callback), ptr::null_mut(), &mut error);
        assert_eq!(rc, 0);
        hostcall_registry_destroy(reg);

        let reg = hostcall_registry_create_with_config(7, c(b"[bridge]\nnames = 3\n\0"), &mut error);
        assert!(reg.is_null());
        assert_eq!(hostcall_error_kind(error), HostcallErrorKind::Config);
        hostcall_error_free(error);
    }
}
