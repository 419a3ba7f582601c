use crate::glcore;
use crate::glcore::GLenum;

pub type NglResult<T> = Result<T, NglError>;

/// Generic error that contains all the different kinds of errors that may occur
/// when using the API.
///
/// Usage errors never abort the process; they are surfaced as typed values and
/// `gl_error()` recovers the conformance error code a GL client would observe.
#[derive(Debug, Clone)]
pub enum NglError {
    StringError(String),
    /// An enum argument was outside the set the operation accepts
    InvalidEnum(String),
    /// A scalar, bitfield, or buffer argument was out of range
    InvalidValue(String),
    /// The arguments were well-formed but the operation is not legal in the
    /// current state (for example, a handle whose object was already deleted)
    InvalidOperation(String),
    /// Entry point exists for API completeness but has no implementation
    Unsupported(&'static str),
}

impl NglError {
    /// The GL error code a conformant client would read back for this error.
    pub fn gl_error(&self) -> GLenum {
        match self {
            NglError::StringError(_) => glcore::INVALID_OPERATION,
            NglError::InvalidEnum(_) => glcore::INVALID_ENUM,
            NglError::InvalidValue(_) => glcore::INVALID_VALUE,
            NglError::InvalidOperation(_) => glcore::INVALID_OPERATION,
            NglError::Unsupported(_) => glcore::INVALID_OPERATION,
        }
    }
}

impl std::error::Error for NglError {}

impl core::fmt::Display for NglError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            NglError::StringError(ref e) => e.fmt(fmt),
            NglError::InvalidEnum(ref e) => write!(fmt, "invalid enum: {}", e),
            NglError::InvalidValue(ref e) => write!(fmt, "invalid value: {}", e),
            NglError::InvalidOperation(ref e) => write!(fmt, "invalid operation: {}", e),
            NglError::Unsupported(e) => write!(fmt, "unsupported operation: {}", e),
        }
    }
}

impl From<&str> for NglError {
    fn from(str: &str) -> Self {
        NglError::StringError(str.to_string())
    }
}

impl From<String> for NglError {
    fn from(string: String) -> Self {
        NglError::StringError(string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_error_codes() {
        assert_eq!(
            NglError::InvalidEnum("x".to_string()).gl_error(),
            glcore::INVALID_ENUM
        );
        assert_eq!(
            NglError::InvalidValue("x".to_string()).gl_error(),
            glcore::INVALID_VALUE
        );
        assert_eq!(
            NglError::InvalidOperation("x".to_string()).gl_error(),
            glcore::INVALID_OPERATION
        );
        assert_eq!(
            NglError::Unsupported("x").gl_error(),
            glcore::INVALID_OPERATION
        );
    }

    #[test]
    fn string_conversions() {
        let err: NglError = "backend misconfigured".into();
        match err {
            NglError::StringError(s) => assert_eq!(s, "backend misconfigured"),
            _ => panic!("expected StringError"),
        }
    }
}
