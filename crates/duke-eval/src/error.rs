//! Evaluation error types
//!
//! Inside the engine, coercion and resolution failures travel as
//! [`EvalError`] so call sites can use `?`. They are converted back into
//! [`Value::Error`] before a result leaves a broadcast cell or a function.

use crate::value::Value;
use duke_eval_core::ErrorCode;
use thiserror::Error;

/// Result type for evaluation steps
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Internal evaluation signal
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A spreadsheet error value
    #[error("{0}")]
    Code(ErrorCode),

    /// A name or reference text could not be resolved
    #[error("Unresolved name: {0}")]
    Name(String),

    /// A construct the engine recognizes but does not evaluate
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl EvalError {
    /// The error code this signal surfaces as
    pub fn error_code(&self) -> ErrorCode {
        match self {
            EvalError::Code(code) => *code,
            EvalError::Name(_) => ErrorCode::Name,
            EvalError::Unsupported(_) => ErrorCode::Value,
        }
    }

    /// Convert into an error value
    pub fn into_value(self) -> Value {
        Value::Error(self.error_code())
    }
}

impl From<ErrorCode> for EvalError {
    fn from(code: ErrorCode) -> Self {
        EvalError::Code(code)
    }
}

/// Collapse an evaluation result into a value, errors included
pub fn flatten(result: EvalResult<Value>) -> Value {
    result.unwrap_or_else(EvalError::into_value)
}

/// Errors raised when invoking a function through the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EvalError::Code(ErrorCode::Na).error_code(), ErrorCode::Na);
        assert_eq!(EvalError::Name("Foo".into()).error_code(), ErrorCode::Name);
        assert_eq!(
            EvalError::Unsupported("formula condition".into()).error_code(),
            ErrorCode::Value
        );
    }

    #[test]
    fn test_flatten() {
        assert_eq!(flatten(Ok(Value::Number(1.0))), Value::Number(1.0));
        assert_eq!(
            flatten(Err(EvalError::Name("x".into()))),
            Value::Error(ErrorCode::Name)
        );
    }
}
