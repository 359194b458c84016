//! Argument resolution shared by the lookup functions

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operand::{parse_number, scalar, to_optional_boolean};
use crate::value::{Area, Value};
use duke_eval_core::{CellAddress, CellRange, ErrorCode};

/// The table argument of a lookup: an area, or a single cell as a 1×1 area
pub fn resolve_table_array(value: &Value) -> EvalResult<Area> {
    match value {
        Value::Area(area) => Ok(area.clone()),
        Value::Ref(r) => Ok(Area::spanning(
            r.sheets,
            CellRange::single(CellAddress::new(r.row, r.col)),
        )),
        Value::AreaList(areas) if areas.len() == 1 => Ok(areas[0].clone()),
        Value::Error(e) => Err(EvalError::Code(*e)),
        Value::AreaList(_)
        | Value::Number(_)
        | Value::Text(_)
        | Value::Boolean(_)
        | Value::Blank
        | Value::MissingArg => Err(EvalError::Code(ErrorCode::Value)),
    }
}

/// A 1-based row/column index argument, returned zero-based
///
/// Unresolvable arguments and non-numeric text are `#REF!`; indexes below 1
/// are `#VALUE!`. Fractions are floored.
pub fn resolve_row_or_col_index(value: &Value, ctx: &EvaluationContext) -> EvalResult<usize> {
    let resolved = scalar(value, ctx).map_err(|_| EvalError::Code(ErrorCode::Ref))?;
    let n = match resolved {
        Value::Number(n) => n,
        Value::Text(s) => parse_number(&s).ok_or(EvalError::Code(ErrorCode::Ref))?,
        Value::Boolean(b) => {
            if b {
                1.0
            } else {
                0.0
            }
        }
        Value::Blank | Value::MissingArg => 0.0,
        Value::Error(_) | Value::Ref(_) | Value::Area(_) | Value::AreaList(_) => {
            return Err(EvalError::Code(ErrorCode::Ref))
        }
    };
    let index = n.floor();
    if index < 1.0 {
        return Err(EvalError::Code(ErrorCode::Value));
    }
    Ok(index as usize - 1)
}

/// The range-lookup flag; an absent argument means approximate
///
/// Blank and omitted-but-present arguments are `false`. Text must be
/// exactly `TRUE` or `FALSE`.
pub fn resolve_range_lookup(arg: Option<&Value>, ctx: &EvaluationContext) -> EvalResult<bool> {
    match arg {
        None => Ok(true),
        Some(value) => Ok(to_optional_boolean(value, ctx, false)?.unwrap_or(false)),
    }
}
