//! Error types for the native call boundary

use std::fmt;

use crate::convert::DecodeError;
use crate::handler::Arity;
use crate::value::ValueType;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, ErrorInfo>;

/// Exception constructor the guest VM throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuestErrorType {
    /// Plain `Error`
    Error,
    /// `EvalError`
    EvalError,
    /// `RangeError`
    RangeError,
    /// `ReferenceError`
    ReferenceError,
    /// `SyntaxError`
    SyntaxError,
    /// `TypeError`
    TypeError,
    /// `URIError`
    UriError,
}

impl GuestErrorType {
    /// Constructor name as the guest spells it
    pub const fn name(self) -> &'static str {
        match self {
            GuestErrorType::Error => "Error",
            GuestErrorType::EvalError => "EvalError",
            GuestErrorType::RangeError => "RangeError",
            GuestErrorType::ReferenceError => "ReferenceError",
            GuestErrorType::SyntaxError => "SyntaxError",
            GuestErrorType::TypeError => "TypeError",
            GuestErrorType::UriError => "URIError",
        }
    }

    /// Parse a guest constructor name. Unknown names map to `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Error" => GuestErrorType::Error,
            "EvalError" => GuestErrorType::EvalError,
            "RangeError" => GuestErrorType::RangeError,
            "ReferenceError" => GuestErrorType::ReferenceError,
            "SyntaxError" => GuestErrorType::SyntaxError,
            "TypeError" => GuestErrorType::TypeError,
            "URIError" => GuestErrorType::UriError,
            _ => return None,
        })
    }
}

impl fmt::Display for GuestErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What went wrong at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Argument count differs from the registered arity
    ArityMismatch {
        /// Registered arity
        expected: usize,
        /// Arguments supplied by the guest
        actual: usize,
    },
    /// An argument had the wrong type
    TypeMismatch {
        /// Zero-based argument index
        index: usize,
        /// Type the native function asked for
        expected: ValueType,
        /// Type the guest supplied
        actual: ValueType,
    },
    /// Name is already registered
    DuplicateName {
        /// Offending name
        name: String,
    },
    /// Name is not registered
    UnknownName {
        /// Offending name
        name: String,
    },
    /// Name rejected by the registry's naming policy
    InvalidName {
        /// Offending name
        name: String,
    },
    /// A typed function was registered under a different arity than its signature
    ArityConflict {
        /// Name being registered
        name: String,
        /// Arity passed to `register`
        declared: Arity,
        /// Arity of the function's signature
        intrinsic: usize,
    },
    /// The native function signalled failure
    NativeFailure {
        /// Exception type to throw in the guest
        error_type: GuestErrorType,
    },
    /// An exception thrown by guest code, seen from the native side
    GuestThrow {
        /// Exception type
        error_type: GuestErrorType,
        /// Line reported by the guest, if any
        line_number: Option<u32>,
    },
}

/// Error kind plus a human readable message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ErrorInfo {
    /// What went wrong
    pub kind: ErrorKind,
    /// Message shown to the guest
    pub message: String,
}

impl ErrorInfo {
    /// Create from kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Arity mismatch for a call to `name`
    pub fn arity_mismatch(name: &str, expected: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch { expected, actual },
            format!("Function '{}' expects {} arguments, got {}", name, expected, actual),
        )
    }

    /// Name already registered
    pub fn duplicate_name(name: &str) -> Self {
        Self::new(
            ErrorKind::DuplicateName {
                name: name.to_string(),
            },
            format!("Native function '{}' is already registered", name),
        )
    }

    /// Name not registered
    pub fn unknown_name(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownName {
                name: name.to_string(),
            },
            format!("Unknown native function: {}", name),
        )
    }

    /// Name rejected by naming policy
    pub fn invalid_name(name: &str) -> Self {
        Self::new(
            ErrorKind::InvalidName {
                name: name.to_string(),
            },
            format!("Malformed function name '{}'", name),
        )
    }

    /// Typed function registered under the wrong arity
    pub fn arity_conflict(name: &str, declared: Arity, intrinsic: usize) -> Self {
        Self::new(
            ErrorKind::ArityConflict {
                name: name.to_string(),
                declared,
                intrinsic,
            },
            format!(
                "Function '{}' takes {} arguments but was registered with arity {}",
                name, intrinsic, declared
            ),
        )
    }

    /// Native failure thrown as a plain `Error`
    pub fn native_failure(message: impl Into<String>) -> Self {
        Self::throw(GuestErrorType::Error, message)
    }

    /// Native failure thrown as a specific guest exception type
    pub fn throw(error_type: GuestErrorType, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NativeFailure { error_type }, message)
    }
}

impl From<DecodeError> for ErrorInfo {
    fn from(err: DecodeError) -> Self {
        let message = err.to_string();
        match err {
            DecodeError::TypeMismatch {
                index,
                expected,
                actual,
            } => Self::new(
                ErrorKind::TypeMismatch {
                    index,
                    expected,
                    actual,
                },
                message,
            ),
        }
    }
}

impl From<String> for ErrorInfo {
    fn from(s: String) -> Self {
        ErrorInfo::native_failure(s)
    }
}

impl From<&str> for ErrorInfo {
    fn from(s: &str) -> Self {
        ErrorInfo::native_failure(s)
    }
}

// ============================================================================
// Guest Exception
// ============================================================================

/// An exception as the guest VM sees it.
///
/// `origin` carries the bridge-side kind when the exception was produced by
/// the bridge, so that it can be recovered on the way back.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestException {
    /// Constructor of the thrown object
    pub error_type: GuestErrorType,
    /// `message` property
    pub message: String,
    /// Source line, when the guest knows it
    pub line_number: Option<u32>,
    /// Bridge error this exception was built from
    pub origin: Option<ErrorKind>,
}

impl GuestException {
    /// Exception raised by guest code
    pub fn new(error_type: GuestErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            line_number: None,
            origin: None,
        }
    }

    /// Attach a source line
    pub fn with_line(mut self, line: u32) -> Self {
        self.line_number = Some(line);
        self
    }
}

impl fmt::Display for GuestException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for GuestException {}
