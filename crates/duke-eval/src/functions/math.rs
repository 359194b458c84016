//! Math functions
//!
//! Scalar functions broadcast over array arguments; aggregates gather their
//! numbers with [`NumericCollector`].

use crate::broadcast::{broadcast1, broadcast2};
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operand::{to_number, NumericCollector};
use crate::value::Value;
use ahash::AHashMap;
use duke_eval_core::ErrorCode;
use once_cell::sync::Lazy;
use std::sync::RwLock;

/// Largest n whose factorial is a finite f64
const MAX_FACTORIAL: u32 = 170;

static FACTORIALS: Lazy<RwLock<AHashMap<u32, f64>>> = Lazy::new(|| RwLock::new(AHashMap::new()));

/// n!, memoized
fn factorial(n: u32) -> Option<f64> {
    if n > MAX_FACTORIAL {
        return None;
    }
    if let Some(cached) = FACTORIALS.read().ok().and_then(|c| c.get(&n).copied()) {
        return Some(cached);
    }
    let value = (2..=n).fold(1.0, |acc, k| acc * k as f64);
    if let Ok(mut cache) = FACTORIALS.write() {
        cache.insert(n, value);
    }
    Some(value)
}

fn num_error() -> EvalError {
    EvalError::Code(ErrorCode::Num)
}

fn finite(n: f64) -> EvalResult<Value> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(num_error())
    }
}

/// SUM(number1, ...)
pub fn fn_sum(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let values = NumericCollector::new(ctx).collect(args)?;
    Ok(Value::Number(values.iter().sum()))
}

/// AVERAGE(number1, ...) - `#DIV/0!` without numbers
pub fn fn_average(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let values = NumericCollector::new(ctx).collect(args)?;
    if values.is_empty() {
        return Err(EvalError::Code(ErrorCode::Div0));
    }
    Ok(Value::Number(values.iter().sum::<f64>() / values.len() as f64))
}

/// MIN(number1, ...) - 0 without numbers
pub fn fn_min(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let values = NumericCollector::new(ctx).collect(args)?;
    let min = values.into_iter().reduce(f64::min).unwrap_or(0.0);
    Ok(Value::Number(min))
}

/// MAX(number1, ...) - 0 without numbers
pub fn fn_max(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let values = NumericCollector::new(ctx).collect(args)?;
    let max = values.into_iter().reduce(f64::max).unwrap_or(0.0);
    Ok(Value::Number(max))
}

/// ABS(number)
pub fn fn_abs(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    Ok(broadcast1(&args[0], ctx, |v| Ok(Value::Number(to_number(v, ctx)?.abs()))))
}

/// SQRT(number) - `#NUM!` for negative numbers
pub fn fn_sqrt(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    Ok(broadcast1(&args[0], ctx, |v| {
        let n = to_number(v, ctx)?;
        if n < 0.0 {
            return Err(num_error());
        }
        Ok(Value::Number(n.sqrt()))
    }))
}

/// INT(number) - Rounds toward negative infinity
pub fn fn_int(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    Ok(broadcast1(&args[0], ctx, |v| Ok(Value::Number(to_number(v, ctx)?.floor()))))
}

/// FACT(number) - Factorial of the integer part
pub fn fn_fact(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    Ok(broadcast1(&args[0], ctx, |v| {
        let n = to_number(v, ctx)?.floor();
        if n < 0.0 || n > MAX_FACTORIAL as f64 {
            return Err(num_error());
        }
        factorial(n as u32).map(Value::Number).ok_or_else(num_error)
    }))
}

/// MOD(number, divisor) - Remainder with the sign of the divisor
pub fn fn_mod(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    Ok(broadcast2(&args[0], &args[1], ctx, |a, b| {
        let number = to_number(a, ctx)?;
        let divisor = to_number(b, ctx)?;
        if divisor == 0.0 {
            return Err(EvalError::Code(ErrorCode::Div0));
        }

        let result = number - divisor * (number / divisor).floor();

        // Precision loss can push the result outside [0, divisor)
        let valid = if divisor > 0.0 {
            result >= 0.0 && result < divisor
        } else {
            result <= 0.0 && result > divisor
        };
        if !valid {
            return Err(EvalError::Code(ErrorCode::Value));
        }
        Ok(Value::Number(result))
    }))
}

/// POWER(number, power) - `#NUM!` when the result is not a finite number
pub fn fn_power(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    Ok(broadcast2(&args[0], &args[1], ctx, |a, b| {
        finite(to_number(a, ctx)?.powf(to_number(b, ctx)?))
    }))
}

/// ROUND(number, [num_digits]) - Rounds half away from zero
pub fn fn_round(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let digits = args.get(1).cloned().unwrap_or(Value::Number(0.0));
    Ok(broadcast2(&args[0], &digits, ctx, |a, b| {
        let number = to_number(a, ctx)?;
        let num_digits = to_number(b, ctx)?.trunc().clamp(-308.0, 308.0) as i32;
        Ok(Value::Number(round_half_away(number, num_digits)))
    }))
}

fn round_half_away(number: f64, num_digits: i32) -> f64 {
    // Negative digits divide by a power of ten so the scale stays exact
    let factor = 10_f64.powi(num_digits.abs());
    let scaled = if num_digits >= 0 {
        number * factor
    } else {
        number / factor
    };
    if !scaled.is_finite() {
        return number;
    }
    let rounded = if number >= 0.0 {
        (scaled + 0.5).floor()
    } else {
        (scaled - 0.5).ceil()
    };
    if num_digits >= 0 {
        rounded / factor
    } else {
        rounded * factor
    }
}

/// COMBIN(number, number_chosen) - Number of k-subsets of n items
pub fn fn_combin(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    Ok(broadcast2(&args[0], &args[1], ctx, |a, b| {
        let n = to_number(a, ctx)?.floor();
        let k = to_number(b, ctx)?.floor();
        if n < 0.0 || k < 0.0 || k > n {
            return Err(num_error());
        }
        combinations(n, k).map(Value::Number).ok_or_else(num_error)
    }))
}

/// n choose k, `None` once the result leaves the f64 range
fn combinations(n: f64, k: f64) -> Option<f64> {
    if n <= MAX_FACTORIAL as f64 {
        if let (Some(all), Some(chosen), Some(rest)) = (
            factorial(n as u32),
            factorial(k as u32),
            factorial((n - k) as u32),
        ) {
            return Some((all / (chosen * rest)).round());
        }
    }
    // Multiplicative form for n beyond the factorial table. Every factor is
    // at least 1 and C(n, k) >= 2^k, so overflow ends the loop within ~1024 steps.
    let k = k.min(n - k);
    let mut result: f64 = 1.0;
    let mut i = 1.0;
    while i <= k {
        result = result * (n - k + i) / i;
        if !result.is_finite() {
            return None;
        }
        i += 1.0;
    }
    Some(result.round())
}
