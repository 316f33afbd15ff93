//! Translation between bridge errors and guest exceptions

use hostcall_sdk::{ErrorInfo, ErrorKind, GuestErrorType, GuestException};

/// Guest exception type an error kind is thrown as
pub fn guest_error_type(kind: &ErrorKind) -> GuestErrorType {
    match kind {
        ErrorKind::ArityMismatch { .. } => GuestErrorType::RangeError,
        ErrorKind::TypeMismatch { .. } => GuestErrorType::TypeError,
        ErrorKind::UnknownName { .. } => GuestErrorType::ReferenceError,
        ErrorKind::InvalidName { .. } => GuestErrorType::SyntaxError,
        ErrorKind::DuplicateName { .. } | ErrorKind::ArityConflict { .. } => GuestErrorType::Error,
        ErrorKind::NativeFailure { error_type } => *error_type,
        ErrorKind::GuestThrow { error_type, .. } => *error_type,
    }
}

/// Build the exception the guest will see for `err`.
///
/// The message is carried over unchanged. Errors raised on the native side
/// remember their kind in `origin`; a guest exception passing back through
/// keeps its line number instead.
pub fn to_guest_exception(err: ErrorInfo) -> GuestException {
    let error_type = guest_error_type(&err.kind);
    match err.kind {
        ErrorKind::GuestThrow { line_number, .. } => GuestException {
            error_type,
            message: err.message,
            line_number,
            origin: None,
        },
        kind => GuestException {
            error_type,
            message: err.message,
            line_number: None,
            origin: Some(kind),
        },
    }
}

/// Recover a bridge error from a guest exception
pub fn from_guest_exception(exception: GuestException) -> ErrorInfo {
    let kind = match exception.origin {
        Some(kind) => kind,
        None => ErrorKind::GuestThrow {
            error_type: exception.error_type,
            line_number: exception.line_number,
        },
    };
    ErrorInfo::new(kind, exception.message)
}
