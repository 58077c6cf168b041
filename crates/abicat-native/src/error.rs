//! Contract violations
//!
//! The boundary has no error channel: misuse is undefined, as in C. Where a
//! violation is cheap to detect (an out-of-set enum tag, a null pointer handed
//! to the safe layer) it is reported as a [`ContractViolation`]. Inside an
//! `extern "C"` function the violation is logged and raised as a panic, which
//! aborts at the boundary instead of returning an inferred value.

use std::os::raw::c_int;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("tag {tag} is not a declared {enum_name} variant")]
    InvalidEnumTag { enum_name: &'static str, tag: c_int },

    #[error("{function}: argument '{param}' must not be null")]
    NullPointer {
        function: &'static str,
        param: &'static str,
    },

    #[error("{function}: returned a null allocation")]
    NullResult { function: &'static str },

    #[error("{function}: buffer length {len} is out of range")]
    BufferLength { function: &'static str, len: usize },
}

/// Result type for precondition checks
pub type ContractResult<T> = Result<T, ContractViolation>;

impl ContractViolation {
    /// Report a violation detected inside a boundary function and stop.
    ///
    /// Unwinding cannot cross `extern "C"`, so the panic aborts the process.
    #[cold]
    #[track_caller]
    pub fn raise(self, function: &'static str) -> ! {
        tracing::error!(function, violation = %self, "boundary contract violated");
        panic!("{}: {}", function, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enum_tag_message() {
        let err = ContractViolation::InvalidEnumTag {
            enum_name: "MyEnum",
            tag: 7,
        };
        assert_eq!(err.to_string(), "tag 7 is not a declared MyEnum variant");
    }

    #[test]
    fn test_null_pointer_message() {
        let err = ContractViolation::NullPointer {
            function: "copy_string",
            param: "instr",
        };
        assert_eq!(
            err.to_string(),
            "copy_string: argument 'instr' must not be null"
        );
    }

    #[test]
    fn test_buffer_length_message() {
        let err = ContractViolation::BufferLength {
            function: "check_buffer",
            len: 3,
        };
        assert_eq!(err.to_string(), "check_buffer: buffer length 3 is out of range");
    }

    #[test]
    #[should_panic(expected = "accept_enum: tag 5 is not a declared MyEnum variant")]
    fn test_raise_panics_with_context() {
        ContractViolation::InvalidEnumTag {
            enum_name: "MyEnum",
            tag: 5,
        }
        .raise("accept_enum");
    }
}
