//! Operand resolution and coercion
//!
//! Every function receives raw [`Value`]s. The helpers here turn them into
//! scalars (following reference chains and implicit intersection) and coerce
//! those scalars to numbers, text or booleans under spreadsheet rules.

use crate::context::{EvaluationContext, MissingArgPolicy};
use crate::error::{EvalError, EvalResult};
use crate::resolver::ReferenceResolver;
use crate::value::{Area, Value};
use duke_eval_core::ErrorCode;
use lazy_regex::regex_is_match;

/// How many reference hops are followed before giving up with `#REF!`
pub const MAX_REFERENCE_DEPTH: usize = 64;

/// Resolve a value to a scalar as seen from the cell at (`row`, `col`)
///
/// References are followed through the resolver, including references
/// stored in referenced cells. An area is reduced by implicit
/// intersection: a single column picks `row`, a single row picks `col`, a
/// block needs both. Anything that fails to intersect is `#VALUE!`, as is
/// a multi-sheet reference. Error values come back as `Err`.
///
/// The result is always one of `Number`, `Text`, `Boolean`, `Blank` or
/// `MissingArg`.
pub fn resolve_single(
    value: &Value,
    row: u32,
    col: u16,
    resolver: &dyn ReferenceResolver,
) -> EvalResult<Value> {
    let mut current = value.clone();
    for _ in 0..=MAX_REFERENCE_DEPTH {
        current = match current {
            Value::Error(e) => return Err(EvalError::Code(e)),
            Value::Number(_)
            | Value::Text(_)
            | Value::Boolean(_)
            | Value::Blank
            | Value::MissingArg => return Ok(current),
            Value::Ref(r) => r.value(resolver)?,
            Value::Area(area) => intersect(&area, row, col, resolver)?,
            Value::AreaList(areas) => match areas.as_slice() {
                [area] => intersect(area, row, col, resolver)?,
                _ => return Err(EvalError::Code(ErrorCode::Value)),
            },
        };
    }
    Err(EvalError::Code(ErrorCode::Ref))
}

/// Implicit intersection of an area with the row/column of a cell
fn intersect(
    area: &Area,
    row: u32,
    col: u16,
    resolver: &dyn ReferenceResolver,
) -> EvalResult<Value> {
    if area.is_multi_sheet() {
        return Err(EvalError::Code(ErrorCode::Value));
    }
    if area.is_single_cell() {
        return area.relative_value(0, 0, resolver);
    }
    if area.is_column() {
        if area.contains_row(row) {
            return area.absolute_value(row, area.first_col(), resolver);
        }
    } else if area.is_row() {
        if area.contains_column(col) {
            return area.absolute_value(area.first_row(), col, resolver);
        }
    } else if area.contains_row(row) && area.contains_column(col) {
        return area.absolute_value(row, col, resolver);
    }
    Err(EvalError::Code(ErrorCode::Value))
}

/// Resolve a value to a scalar from the formula cell of `ctx`
pub fn scalar(value: &Value, ctx: &EvaluationContext) -> EvalResult<Value> {
    resolve_single(value, ctx.current_row, ctx.current_col, ctx.resolver)
}

/// Parse a locale-invariant numeric literal
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent; surrounding whitespace is ignored.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if regex_is_match!(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$", s) {
        s.parse::<f64>().ok().filter(|n| n.is_finite())
    } else {
        None
    }
}

/// Render a number the way text coercion sees it
///
/// Up to 15 significant digits, no trailing zeros, and scientific notation
/// (`1.5E+20`) outside `[1e-9, 1e15)`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if !n.is_finite() {
        return ErrorCode::Num.as_str().to_string();
    }
    let abs = n.abs();
    if n.fract() == 0.0 && abs < 1e15 {
        return format!("{}", n as i64);
    }
    if !(1e-9..1e15).contains(&abs) {
        let formatted = format!("{:.14E}", n);
        let (mantissa, exponent) = formatted.split_once('E').unwrap_or((&formatted, "0"));
        let mantissa = trim_fraction(mantissa);
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}E{}{:02}", mantissa, sign, exponent.abs());
    }
    let magnitude = abs.log10().floor() as i32;
    let decimals = (14 - magnitude).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, n)).to_string()
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Coerce a resolved scalar to a number
fn number_of(value: &Value) -> EvalResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => parse_number(s).ok_or(EvalError::Code(ErrorCode::Value)),
        Value::Blank | Value::MissingArg => Ok(0.0),
        Value::Error(e) => Err(EvalError::Code(*e)),
        Value::Ref(_) | Value::Area(_) | Value::AreaList(_) => {
            Err(EvalError::Code(ErrorCode::Value))
        }
    }
}

/// Coerce any value to a number
///
/// Blank and omitted arguments are 0, booleans are 1/0, text must parse.
pub fn to_number(value: &Value, ctx: &EvaluationContext) -> EvalResult<f64> {
    number_of(&scalar(value, ctx)?)
}

/// Coerce any value to an integer by flooring its numeric value
pub fn to_integer(value: &Value, ctx: &EvaluationContext) -> EvalResult<i64> {
    let n = to_number(value, ctx)?.floor();
    if !n.is_finite() || n.abs() >= i64::MAX as f64 {
        return Err(EvalError::Code(ErrorCode::Num));
    }
    Ok(n as i64)
}

/// Coerce any value to text
pub fn to_text(value: &Value, ctx: &EvaluationContext) -> EvalResult<String> {
    match scalar(value, ctx)? {
        Value::Number(n) => Ok(format_number(n)),
        Value::Text(s) => Ok(s),
        Value::Boolean(b) => Ok(if b { "TRUE" } else { "FALSE" }.to_string()),
        Value::Blank | Value::MissingArg => Ok(String::new()),
        Value::Error(e) => Err(EvalError::Code(e)),
        Value::Ref(_) | Value::Area(_) | Value::AreaList(_) => {
            Err(EvalError::Code(ErrorCode::Value))
        }
    }
}

/// Coerce any value to a boolean
///
/// Only the exact words `TRUE` and `FALSE` convert from text.
pub fn to_boolean(value: &Value, ctx: &EvaluationContext) -> EvalResult<bool> {
    Ok(to_optional_boolean(value, ctx, false)?.unwrap_or(false))
}

/// Coerce to a boolean, reporting blanks (and, if asked, text) as `None`
pub fn to_optional_boolean(
    value: &Value,
    ctx: &EvaluationContext,
    text_as_blank: bool,
) -> EvalResult<Option<bool>> {
    match scalar(value, ctx)? {
        Value::Boolean(b) => Ok(Some(b)),
        Value::Number(n) => Ok(Some(n != 0.0)),
        Value::Text(_) if text_as_blank => Ok(None),
        Value::Text(s) => match s.as_str() {
            "TRUE" => Ok(Some(true)),
            "FALSE" => Ok(Some(false)),
            _ => Err(EvalError::Code(ErrorCode::Value)),
        },
        Value::Blank | Value::MissingArg => Ok(None),
        Value::Error(e) => Err(EvalError::Code(e)),
        Value::Ref(_) | Value::Area(_) | Value::AreaList(_) => {
            Err(EvalError::Code(ErrorCode::Value))
        }
    }
}

/// Gathers the numbers of an aggregation's arguments
///
/// Direct arguments are coerced (text must parse, booleans count), values
/// reached through references count only when they are numbers. Errors
/// propagate either way, blanks are skipped, and omitted arguments follow
/// the context's [`MissingArgPolicy`].
pub struct NumericCollector<'c, 'a> {
    ctx: &'c EvaluationContext<'a>,
    values: Vec<f64>,
}

impl<'c, 'a> NumericCollector<'c, 'a> {
    pub fn new(ctx: &'c EvaluationContext<'a>) -> Self {
        Self {
            ctx,
            values: Vec::new(),
        }
    }

    /// Collect every argument
    pub fn collect(mut self, args: &[Value]) -> EvalResult<Vec<f64>> {
        for arg in args {
            self.add_argument(arg)?;
        }
        Ok(self.values)
    }

    fn add_argument(&mut self, arg: &Value) -> EvalResult<()> {
        match arg {
            Value::Number(n) => self.values.push(*n),
            Value::Boolean(b) => self.values.push(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => {
                let n = parse_number(s).ok_or(EvalError::Code(ErrorCode::Value))?;
                self.values.push(n);
            }
            Value::Error(e) => return Err(EvalError::Code(*e)),
            Value::Blank => {}
            Value::MissingArg => match self.ctx.settings.missing_arg {
                MissingArgPolicy::Coerce => self.values.push(0.0),
                MissingArgPolicy::Skip => {}
                MissingArgPolicy::Error => return Err(EvalError::Code(ErrorCode::Value)),
            },
            Value::Ref(r) => {
                for sheet in 0..r.sheets.len() {
                    let v = r.value_on_sheet(sheet, self.ctx.resolver)?;
                    self.add_referenced(&v)?;
                }
            }
            Value::Area(area) => self.add_area(area)?,
            Value::AreaList(areas) => {
                for area in areas {
                    self.add_area(area)?;
                }
            }
        }
        Ok(())
    }

    fn add_area(&mut self, area: &Area) -> EvalResult<()> {
        for slice in area.per_sheet() {
            for r in 0..slice.height() {
                for c in 0..slice.width() {
                    let v = slice.relative_value(r, c, self.ctx.resolver)?;
                    self.add_referenced(&v)?;
                }
            }
        }
        Ok(())
    }

    fn add_referenced(&mut self, value: &Value) -> EvalResult<()> {
        let v = if value.is_reference() {
            scalar(value, self.ctx)?
        } else {
            value.clone()
        };
        match v {
            Value::Number(n) => self.values.push(n),
            Value::Error(e) => return Err(EvalError::Code(e)),
            _ => {}
        }
        Ok(())
    }
}
