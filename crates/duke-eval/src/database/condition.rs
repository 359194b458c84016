//! Criteria cell tests
//!
//! A criteria cell is either text (`<5`, `>=2`, `=abc`, `<>x`, or a plain
//! prefix), a number or boolean (equality), or an error (same code).

use crate::error::{EvalError, EvalResult};
use crate::operand::{format_number, parse_number};
use crate::value::Value;
use duke_eval_core::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
}

/// Whether a database value satisfies one criteria cell
///
/// Fails with `#VALUE!` when a relational operator is followed by something
/// that is not a number.
pub(crate) fn test_condition(value: &Value, condition: &Value) -> EvalResult<bool> {
    match condition {
        Value::Text(text) => test_text_condition(value, text),
        Value::Number(n) => Ok(number_from_value(value) == Some(*n)),
        Value::Boolean(b) => Ok(number_from_value(value) == Some(if *b { 1.0 } else { 0.0 })),
        Value::Error(code) => Ok(value.error() == Some(*code)),
        Value::Blank
        | Value::MissingArg
        | Value::Ref(_)
        | Value::Area(_)
        | Value::AreaList(_) => Ok(false),
    }
}

fn test_text_condition(value: &Value, condition: &str) -> EvalResult<bool> {
    if let Some(rest) = condition.strip_prefix("<>") {
        return Ok(!test_equality(value, rest));
    }
    if let Some(rest) = condition.strip_prefix("<=") {
        return test_numeric(value, Comparison::LessOrEqual, rest);
    }
    if let Some(rest) = condition.strip_prefix('<') {
        return test_numeric(value, Comparison::Less, rest);
    }
    if let Some(rest) = condition.strip_prefix(">=") {
        return test_numeric(value, Comparison::GreaterOrEqual, rest);
    }
    if let Some(rest) = condition.strip_prefix('>') {
        return test_numeric(value, Comparison::Greater, rest);
    }
    if let Some(rest) = condition.strip_prefix('=') {
        return Ok(test_equality(value, rest));
    }

    // A bare condition is a case-sensitive prefix test
    if condition.is_empty() {
        return Ok(matches!(value, Value::Text(_)));
    }
    Ok(text_of(value).map_or(false, |s| s.starts_with(condition)))
}

/// `=operand`: blank test, numeric equality or exact text equality
fn test_equality(value: &Value, operand: &str) -> bool {
    if operand.is_empty() {
        return matches!(value, Value::Blank);
    }
    if parse_number(operand).is_some() {
        return test_numeric(value, Comparison::Equal, operand).unwrap_or(false);
    }
    text_of(value).map_or(false, |s| s == operand)
}

fn test_numeric(value: &Value, op: Comparison, operand: &str) -> EvalResult<bool> {
    let target = parse_number(operand).ok_or(EvalError::Code(ErrorCode::Value))?;
    let n = match value {
        Value::Number(n) => *n,
        Value::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return Ok(false),
    };
    Ok(match op {
        Comparison::Less => n < target,
        Comparison::LessOrEqual => n <= target,
        Comparison::Greater => n > target,
        Comparison::GreaterOrEqual => n >= target,
        Comparison::Equal => n == target,
    })
}

/// Numeric view of a database value for equality conditions
fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => parse_number(s),
        _ => None,
    }
}

/// Text view of a database value; blanks read as ""
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Blank | Value::MissingArg => Some(String::new()),
        other => header_text(other),
    }
}

/// Text of a header cell: text, numbers and booleans qualify
pub(crate) fn header_text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(*n)),
        Value::Boolean(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Value::Blank
        | Value::MissingArg
        | Value::Error(_)
        | Value::Ref(_)
        | Value::Area(_)
        | Value::AreaList(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::text(s)
    }

    #[test]
    fn test_relational() {
        assert_eq!(test_condition(&Value::Number(6.0), &text(">5")), Ok(true));
        assert_eq!(test_condition(&Value::Number(5.0), &text(">5")), Ok(false));
        assert_eq!(test_condition(&Value::Number(5.0), &text(">=5")), Ok(true));
        assert_eq!(test_condition(&Value::Number(4.0), &text("<5")), Ok(true));
        assert_eq!(test_condition(&Value::Number(5.0), &text("<=5")), Ok(true));
        assert_eq!(test_condition(&Value::Boolean(true), &text(">0")), Ok(true));
    }

    #[test]
    fn test_relational_ignores_non_numbers() {
        assert_eq!(test_condition(&text("6"), &text(">5")), Ok(false));
        assert_eq!(test_condition(&Value::Blank, &text("<5")), Ok(false));
    }

    #[test]
    fn test_unparsable_operand_fails() {
        assert_eq!(
            test_condition(&Value::Number(1.0), &text(">abc")),
            Err(EvalError::Code(ErrorCode::Value))
        );
    }

    #[test]
    fn test_equals() {
        assert_eq!(test_condition(&Value::Blank, &text("=")), Ok(true));
        assert_eq!(test_condition(&text(""), &text("=")), Ok(false));
        assert_eq!(test_condition(&Value::Number(3.0), &text("=3")), Ok(true));
        assert_eq!(test_condition(&text("Apple"), &text("=Apple")), Ok(true));
        assert_eq!(test_condition(&text("apple"), &text("=Apple")), Ok(false));
        assert_eq!(test_condition(&text("Apples"), &text("=Apple")), Ok(false));
    }

    #[test]
    fn test_not_equal() {
        assert_eq!(test_condition(&Value::Number(3.0), &text("<>3")), Ok(false));
        assert_eq!(test_condition(&Value::Number(4.0), &text("<>3")), Ok(true));
        assert_eq!(test_condition(&text("x"), &text("<>3")), Ok(true));
        assert_eq!(test_condition(&text("Pear"), &text("<>Apple")), Ok(true));
        assert_eq!(test_condition(&Value::Blank, &text("<>")), Ok(false));
        assert_eq!(test_condition(&text("a"), &text("<>")), Ok(true));
    }

    #[test]
    fn test_prefix() {
        assert_eq!(test_condition(&text("Apple pie"), &text("Apple")), Ok(true));
        assert_eq!(test_condition(&text("apple pie"), &text("Apple")), Ok(false));
        assert_eq!(test_condition(&Value::Number(123.0), &text("12")), Ok(true));
        assert_eq!(test_condition(&text("anything"), &text("")), Ok(true));
        assert_eq!(test_condition(&Value::Number(1.0), &text("")), Ok(false));
    }

    #[test]
    fn test_number_and_error_conditions() {
        assert_eq!(test_condition(&Value::Number(2.0), &Value::Number(2.0)), Ok(true));
        assert_eq!(test_condition(&text("2"), &Value::Number(2.0)), Ok(true));
        assert_eq!(test_condition(&Value::Boolean(true), &Value::Number(1.0)), Ok(true));
        assert_eq!(
            test_condition(&Value::Error(ErrorCode::Na), &Value::Error(ErrorCode::Na)),
            Ok(true)
        );
        assert_eq!(
            test_condition(&Value::Error(ErrorCode::Ref), &Value::Error(ErrorCode::Na)),
            Ok(false)
        );
    }
}
