//! Lookup comparisons
//!
//! Comparing values of different kinds is not an error in a lookup, it is an
//! outcome: [`CompareResult::TypeMismatch`]. Callers decide what to do with it.

use crate::error::{EvalError, EvalResult};
use crate::operand::format_number;
use crate::value::Value;
use crate::wildcard::WildcardPattern;
use duke_eval_core::ErrorCode;
use std::cmp::Ordering;

/// Outcome of comparing a lookup target with one vector element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareResult {
    /// The target sorts before the element
    LessThan,
    Equal,
    /// The target sorts after the element
    GreaterThan,
    /// The two values have no defined order
    TypeMismatch,
}

impl CompareResult {
    pub fn is_less_than(self) -> bool {
        self == CompareResult::LessThan
    }

    pub fn is_equal(self) -> bool {
        self == CompareResult::Equal
    }

    pub fn is_greater_than(self) -> bool {
        self == CompareResult::GreaterThan
    }

    pub fn is_type_mismatch(self) -> bool {
        self == CompareResult::TypeMismatch
    }
}

impl From<Ordering> for CompareResult {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Less => CompareResult::LessThan,
            Ordering::Equal => CompareResult::Equal,
            Ordering::Greater => CompareResult::GreaterThan,
        }
    }
}

/// A lookup target, specialised by type
#[derive(Debug, Clone, PartialEq)]
pub enum LookupComparer {
    Number(f64),
    Text {
        value: String,
        /// Present when the target holds wildcards and the caller allows them
        pattern: Option<WildcardPattern>,
    },
    Boolean(bool),
}

impl LookupComparer {
    /// Build a comparer for an already-resolved target
    ///
    /// A blank target looks up the number 0. With `wildcards` set, text
    /// targets containing `*`, `?` or `~` match as patterns.
    pub fn new(target: &Value, wildcards: bool) -> EvalResult<Self> {
        match target {
            Value::Number(n) => Ok(LookupComparer::Number(*n)),
            Value::Boolean(b) => Ok(LookupComparer::Boolean(*b)),
            Value::Text(s) => Ok(LookupComparer::Text {
                value: s.to_lowercase(),
                pattern: if wildcards {
                    WildcardPattern::parse(s)
                } else {
                    None
                },
            }),
            Value::Blank | Value::MissingArg => Ok(LookupComparer::Number(0.0)),
            Value::Error(e) => Err(EvalError::Code(*e)),
            Value::Ref(_) | Value::Area(_) | Value::AreaList(_) => {
                Err(EvalError::Code(ErrorCode::Value))
            }
        }
    }

    /// Comparer for the extended search modes
    ///
    /// A blank target looks up empty text instead of 0. In wildcard mode a
    /// number target is looked up by its text form, and text targets match
    /// as patterns; otherwise wildcard characters are literal.
    pub fn tolerant(target: &Value, wildcards: bool) -> EvalResult<Self> {
        match target {
            Value::Blank | Value::MissingArg => Self::new(&Value::Text(String::new()), false),
            Value::Number(n) if wildcards => Self::new(&Value::Text(format_number(*n)), true),
            other => Self::new(other, wildcards),
        }
    }

    /// Compare the target against one element
    pub fn compare(&self, item: &Value) -> CompareResult {
        match (self, item) {
            (LookupComparer::Number(target), Value::Number(n)) => target
                .partial_cmp(n)
                .map_or(CompareResult::TypeMismatch, CompareResult::from),
            (LookupComparer::Text { value, pattern }, Value::Text(s)) => match pattern {
                Some(p) if p.matches(s) => CompareResult::Equal,
                Some(_) => CompareResult::LessThan,
                None => value.as_str().cmp(s.to_lowercase().as_str()).into(),
            },
            (LookupComparer::Boolean(target), Value::Boolean(b)) => target.cmp(b).into(),
            _ => CompareResult::TypeMismatch,
        }
    }
}
