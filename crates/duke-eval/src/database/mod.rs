//! Conditional row matching for the database functions (DSUM, DGET, ...)
//!
//! The database area's first row holds column headers and every later row is
//! a record. The criteria area's first row names database columns and every
//! later row is a set of conditions: conditions in one criteria row must all
//! hold (AND), and a record matches if any criteria row holds (OR). A blank
//! criteria cell always holds.
//!
//! Each matching record's field value is handed to a [`MatchAlgorithm`],
//! which may stop the scan early.

mod algorithms;
mod condition;

pub use algorithms::{
    Average, CountNonBlank, CountNumbers, Deviation, FirstValue, Maximum, Minimum, Product, Sum,
};

use crate::context::EvaluationContext;
use crate::error::{flatten, EvalError, EvalResult};
use crate::operand::{resolve_single, scalar, to_text};
use crate::resolver::ReferenceResolver;
use crate::value::{Area, Value};
use condition::{header_text, test_condition};
use duke_eval_core::ErrorCode;
use log::debug;

/// Aggregation over the field values of matching records
///
/// One instance serves one evaluation; `reset` returns it to its initial
/// state before a scan.
pub trait MatchAlgorithm {
    /// Feed one matched value; returning `false` stops the scan
    fn process_match(&mut self, value: &Value) -> bool;

    /// The aggregated result
    fn result(&self) -> Value;

    fn reset(&mut self);

    /// Whether a blank or omitted field is allowed; every matching record
    /// then feeds a non-blank placeholder
    fn allows_empty_field(&self) -> bool {
        false
    }
}

/// Run a database query and return the algorithm's result
///
/// Malformed arguments, multi-sheet areas, non-numeric relational
/// conditions and formula conditions fail the whole query.
pub fn run_query(
    database: &Value,
    field: &Value,
    criteria: &Value,
    ctx: &EvaluationContext,
    algorithm: &mut dyn MatchAlgorithm,
) -> EvalResult<Value> {
    let db = single_sheet_area(database)?;
    let criteria = single_sheet_area(criteria)?;
    let column = match field_column(field, db, ctx)? {
        None if !algorithm.allows_empty_field() => {
            return Err(EvalError::Code(ErrorCode::Value))
        }
        column => column,
    };
    let resolver = ctx.resolver;

    algorithm.reset();
    for row in 1..db.height() {
        if !record_matches(db, row, criteria, resolver)? {
            continue;
        }
        let value = match column {
            Some(col) => cell(db, row, col, resolver),
            None => Value::Number(1.0),
        };
        if !algorithm.process_match(&value) {
            break;
        }
    }
    Ok(algorithm.result())
}

fn single_sheet_area(value: &Value) -> EvalResult<&Area> {
    let area = match value {
        Value::Area(area) => area,
        Value::AreaList(areas) if areas.len() == 1 => &areas[0],
        Value::Error(e) => return Err(EvalError::Code(*e)),
        Value::AreaList(_)
        | Value::Ref(_)
        | Value::Number(_)
        | Value::Text(_)
        | Value::Boolean(_)
        | Value::Blank
        | Value::MissingArg => return Err(EvalError::Code(ErrorCode::Value)),
    };
    if area.is_multi_sheet() {
        return Err(EvalError::Code(ErrorCode::Value));
    }
    Ok(area)
}

/// A database cell as a scalar; resolution failures become error values
fn cell(area: &Area, row: usize, col: usize, resolver: &dyn ReferenceResolver) -> Value {
    match area.relative_value(row, col, resolver) {
        Ok(v) if v.is_reference() => flatten(resolve_single(
            &v,
            area.first_row() + row as u32,
            area.first_col() + col as u16,
            resolver,
        )),
        other => flatten(other),
    }
}

/// Zero-based database column for the field argument, `None` when blank or omitted
///
/// Numbers (and booleans) are 1-based column positions; anything else is
/// matched as text against the headers.
fn field_column(field: &Value, db: &Area, ctx: &EvaluationContext) -> EvalResult<Option<usize>> {
    let invalid = EvalError::Code(ErrorCode::Value);
    let index = match scalar(field, ctx).map_err(|_| EvalError::Code(ErrorCode::Value))? {
        Value::Number(n) => n.round() - 1.0,
        Value::Boolean(b) => {
            if b {
                0.0
            } else {
                -1.0
            }
        }
        Value::Blank | Value::MissingArg => return Ok(None),
        other => {
            let name = to_text(&other, ctx)?;
            return header_column(db, &name, ctx.resolver).map(Some).ok_or(invalid);
        }
    };
    if index < 0.0 || index >= db.width() as f64 {
        return Err(invalid);
    }
    Ok(Some(index as usize))
}

/// Exact, case-sensitive header lookup; blank and error headers are skipped
fn header_column(db: &Area, name: &str, resolver: &dyn ReferenceResolver) -> Option<usize> {
    (0..db.width()).find(|&col| header_text(&cell(db, 0, col, resolver)).as_deref() == Some(name))
}

/// OR across criteria rows of AND across their cells
fn record_matches(
    db: &Area,
    row: usize,
    criteria: &Area,
    resolver: &dyn ReferenceResolver,
) -> EvalResult<bool> {
    'criteria_rows: for criteria_row in 1..criteria.height() {
        for col in 0..criteria.width() {
            let condition = cell(criteria, criteria_row, col, resolver);
            if matches!(condition, Value::Blank) {
                continue;
            }
            let header = header_text(&cell(criteria, 0, col, resolver))
                .ok_or(EvalError::Code(ErrorCode::Value))?;
            let Some(db_col) = header_column(db, &header, resolver) else {
                return Err(formula_condition(&header, &condition));
            };
            if !test_condition(&cell(db, row, db_col, resolver), &condition)? {
                continue 'criteria_rows;
            }
        }
        return Ok(true);
    }
    Ok(false)
}

/// A criteria column that names no database column holds a formula condition
fn formula_condition(header: &str, condition: &Value) -> EvalError {
    if matches!(condition, Value::Text(s) if s.is_empty()) {
        return EvalError::Code(ErrorCode::Value);
    }
    debug!("formula condition under criteria header {:?} is not supported", header);
    EvalError::Unsupported(format!("formula condition under criteria header '{}'", header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use duke_eval_core::CellAddress;
    use pretty_assertions::assert_eq;

    fn area(rows: Vec<Vec<Value>>) -> Value {
        Value::Area(Area::from_rows(CellAddress::new(0, 0), rows).unwrap())
    }

    fn t(s: &str) -> Value {
        Value::text(s)
    }

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn orchard() -> Value {
        area(vec![
            vec![t("Tree"), t("Height"), t("Yield")],
            vec![t("Apple"), n(18.0), n(14.0)],
            vec![t("Pear"), n(12.0), n(10.0)],
            vec![t("Cherry"), n(13.0), n(9.0)],
            vec![t("Apple"), n(14.0), n(10.0)],
        ])
    }

    fn sum(criteria: Value, field: Value) -> EvalResult<Value> {
        let ctx = EvaluationContext::simple();
        run_query(&orchard(), &field, &criteria, &ctx, &mut Sum::default())
    }

    #[test]
    fn test_and_within_row() {
        let criteria = area(vec![vec![t("Tree"), t("Height")], vec![t("Apple"), t(">15")]]);
        assert_eq!(sum(criteria, t("Yield")), Ok(n(14.0)));
    }

    #[test]
    fn test_or_across_rows() {
        let criteria = area(vec![
            vec![t("Tree"), t("Height")],
            vec![t("Apple"), t(">15")],
            vec![t("Pear"), Value::Blank],
        ]);
        assert_eq!(sum(criteria, t("Yield")), Ok(n(24.0)));
    }

    #[test]
    fn test_field_by_position() {
        let criteria = area(vec![vec![t("Tree")], vec![t("Apple")]]);
        assert_eq!(sum(criteria.clone(), n(2.0)), Ok(n(32.0)));
        assert_eq!(sum(criteria.clone(), n(4.0)), Err(EvalError::Code(ErrorCode::Value)));
        assert_eq!(sum(criteria, t("yield")), Err(EvalError::Code(ErrorCode::Value)));
    }

    #[test]
    fn test_blank_condition_matches_everything() {
        let criteria = area(vec![vec![t("Tree")], vec![Value::Blank]]);
        assert_eq!(sum(criteria, t("Yield")), Ok(n(43.0)));
    }

    #[test]
    fn test_unknown_header_is_formula_condition() {
        let criteria = area(vec![vec![t("Profit")], vec![t(">5")]]);
        assert_eq!(
            sum(criteria, t("Yield")),
            Err(EvalError::Unsupported(
                "formula condition under criteria header 'Profit'".into()
            ))
        );

        let blank = area(vec![vec![t("Profit"), t("Tree")], vec![Value::Blank, t("Pear")]]);
        assert_eq!(sum(blank, t("Yield")), Ok(n(10.0)));

        let empty = area(vec![vec![t("Profit")], vec![t("")]]);
        assert_eq!(sum(empty, t("Yield")), Err(EvalError::Code(ErrorCode::Value)));
    }

    #[test]
    fn test_blank_header_is_invalid() {
        let criteria = area(vec![vec![Value::Blank], vec![t("x")]]);
        assert_eq!(sum(criteria, t("Yield")), Err(EvalError::Code(ErrorCode::Value)));
    }

    #[test]
    fn test_bad_numeric_condition_aborts() {
        let criteria = area(vec![vec![t("Height")], vec![t(">tall")]]);
        assert_eq!(sum(criteria, t("Yield")), Err(EvalError::Code(ErrorCode::Value)));
    }

    #[test]
    fn test_arguments_must_be_areas() {
        let ctx = EvaluationContext::simple();
        let criteria = area(vec![vec![t("Tree")], vec![t("Apple")]]);
        assert_eq!(
            run_query(&n(1.0), &t("Yield"), &criteria, &ctx, &mut Sum::default()),
            Err(EvalError::Code(ErrorCode::Value))
        );
        assert_eq!(
            run_query(&orchard(), &t("Yield"), &t("Apple"), &ctx, &mut Sum::default()),
            Err(EvalError::Code(ErrorCode::Value))
        );
    }

    #[test]
    fn test_short_circuit_stops_scan() {
        let ctx = EvaluationContext::simple();
        let criteria = area(vec![vec![t("Tree")], vec![t("Apple")]]);
        let mut first = FirstValue::default();
        let result = run_query(&orchard(), &t("Yield"), &criteria, &ctx, &mut first);
        assert_eq!(result, Ok(Value::Error(ErrorCode::Num)));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let ctx = EvaluationContext::simple();
        let criteria = area(vec![vec![t("Height")], vec![t(">=13")]]);
        let mut algorithm = Sum::default();
        let first = run_query(&orchard(), &t("Yield"), &criteria, &ctx, &mut algorithm);
        let second = run_query(&orchard(), &t("Yield"), &criteria, &ctx, &mut algorithm);
        assert_eq!(first, Ok(n(33.0)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_omitted_field_counts_matching_records() {
        let ctx = EvaluationContext::simple();
        let criteria = area(vec![vec![t("Tree")], vec![t("Apple")]]);
        for field in [Value::MissingArg, Value::Blank] {
            let mut dcounta = CountNonBlank::default();
            let mut dcount = CountNumbers::default();
            assert_eq!(run_query(&orchard(), &field, &criteria, &ctx, &mut dcounta), Ok(n(2.0)));
            assert_eq!(run_query(&orchard(), &field, &criteria, &ctx, &mut dcount), Ok(n(2.0)));
        }
        assert_eq!(
            sum(criteria, Value::MissingArg),
            Err(EvalError::Code(ErrorCode::Value))
        );
    }
}
