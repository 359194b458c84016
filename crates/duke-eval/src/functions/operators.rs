//! Formula operators
//!
//! Binary and unary operators broadcast over their operands like any other
//! scalar function.

use crate::broadcast::{broadcast1, broadcast2};
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operand::{to_number, to_text};
use crate::value::Value;
use duke_eval_core::ErrorCode;
use std::cmp::Ordering;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Concat,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl BinaryOperator {
    /// The operator's formula symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Concat => "&",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
        }
    }

    /// Parse a formula symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            "^" => BinaryOperator::Power,
            "&" => BinaryOperator::Concat,
            "=" => BinaryOperator::Equal,
            "<>" => BinaryOperator::NotEqual,
            "<" => BinaryOperator::LessThan,
            "<=" => BinaryOperator::LessEqual,
            ">" => BinaryOperator::GreaterThan,
            ">=" => BinaryOperator::GreaterEqual,
            _ => return None,
        })
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Plus,
    Percent,
}

/// Apply a binary operator element-wise
pub fn evaluate_binary(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    ctx: &EvaluationContext,
) -> Value {
    broadcast2(left, right, ctx, |l, r| apply_binary(op, l, r, ctx))
}

/// Apply a unary operator element-wise
pub fn evaluate_unary(op: UnaryOperator, operand: &Value, ctx: &EvaluationContext) -> Value {
    broadcast1(operand, ctx, |v| {
        let n = to_number(v, ctx)?;
        Ok(Value::Number(match op {
            UnaryOperator::Negate => -n,
            UnaryOperator::Plus => n,
            UnaryOperator::Percent => n / 100.0,
        }))
    })
}

fn apply_binary(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    ctx: &EvaluationContext,
) -> EvalResult<Value> {
    let arithmetic = |f: fn(f64, f64) -> f64| -> EvalResult<Value> {
        let result = f(to_number(left, ctx)?, to_number(right, ctx)?);
        if result.is_finite() {
            Ok(Value::Number(result))
        } else {
            Err(EvalError::Code(ErrorCode::Num))
        }
    };

    match op {
        BinaryOperator::Add => arithmetic(|l, r| l + r),
        BinaryOperator::Subtract => arithmetic(|l, r| l - r),
        BinaryOperator::Multiply => arithmetic(|l, r| l * r),
        BinaryOperator::Divide => {
            let l = to_number(left, ctx)?;
            let r = to_number(right, ctx)?;
            if r == 0.0 {
                return Err(EvalError::Code(ErrorCode::Div0));
            }
            Ok(Value::Number(l / r))
        }
        BinaryOperator::Power => arithmetic(f64::powf),
        BinaryOperator::Concat => {
            let mut text = to_text(left, ctx)?;
            text.push_str(&to_text(right, ctx)?);
            Ok(Value::Text(text))
        }
        BinaryOperator::Equal => Ok(Value::Boolean(compare_values(left, right).is_eq())),
        BinaryOperator::NotEqual => Ok(Value::Boolean(compare_values(left, right).is_ne())),
        BinaryOperator::LessThan => Ok(Value::Boolean(compare_values(left, right).is_lt())),
        BinaryOperator::LessEqual => Ok(Value::Boolean(compare_values(left, right).is_le())),
        BinaryOperator::GreaterThan => Ok(Value::Boolean(compare_values(left, right).is_gt())),
        BinaryOperator::GreaterEqual => Ok(Value::Boolean(compare_values(left, right).is_ge())),
    }
}

/// Order two scalars the way comparison operators do
///
/// Numbers sort before text, text before booleans. Text compares
/// case-insensitively. A blank takes the other side's type: 0, "" or FALSE.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    let left = blank_as(left, right);
    let right = blank_as(right, &left);

    match (&left, &right) {
        (Value::Number(l), Value::Number(r)) => l.partial_cmp(r).unwrap_or(Ordering::Equal),
        (Value::Text(l), Value::Text(r)) => l.to_lowercase().cmp(&r.to_lowercase()),
        (Value::Boolean(l), Value::Boolean(r)) => l.cmp(r),
        _ => type_rank(&left).cmp(&type_rank(&right)),
    }
}

fn blank_as(value: &Value, other: &Value) -> Value {
    if !value.is_blank() {
        return value.clone();
    }
    match other {
        Value::Text(_) => Value::Text(String::new()),
        Value::Boolean(_) => Value::Boolean(false),
        _ => Value::Number(0.0),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) | Value::Blank | Value::MissingArg => 0,
        Value::Text(_) => 1,
        Value::Boolean(_) => 2,
        Value::Error(_) | Value::Ref(_) | Value::Area(_) | Value::AreaList(_) => 3,
    }
}
