//! Lookup functions

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::lookup::{
    lookup_range_index, match_index, resolve_range_lookup, resolve_row_or_col_index,
    resolve_table_array, search_index, MatchMode, MatchType, SearchMode, ValueVector,
};
use crate::operand::{parse_number, scalar, to_number};
use crate::resolver::ReferenceResolver;
use crate::value::{Area, Value};
use duke_eval_core::ErrorCode;

/// VLOOKUP(lookup_value, table_array, col_index_num, [range_lookup])
///
/// Searches the first column of the table and returns the value in the same
/// row of column `col_index_num`. Range lookup (the default) assumes the
/// first column is sorted ascending and falls back to the largest value
/// below the target; exact lookup accepts wildcards.
pub fn fn_vlookup(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let target = scalar(&args[0], ctx)?;
    let table = resolve_table_array(&args[1])?;
    let approximate = resolve_range_lookup(args.get(3), ctx)?;

    let keys = ValueVector::column(&table, 0, ctx.resolver)?;
    let row = lookup_range_index(&target, &keys, approximate)?;

    let col = resolve_row_or_col_index(&args[2], ctx)?;
    let results = ValueVector::column(&table, col, ctx.resolver)?;
    Ok(results.item(row))
}

/// HLOOKUP(lookup_value, table_array, row_index_num, [range_lookup])
pub fn fn_hlookup(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let target = scalar(&args[0], ctx)?;
    let table = resolve_table_array(&args[1])?;
    let approximate = resolve_range_lookup(args.get(3), ctx)?;

    let keys = ValueVector::row(&table, 0, ctx.resolver)?;
    let col = lookup_range_index(&target, &keys, approximate)?;

    let row = resolve_row_or_col_index(&args[2], ctx)?;
    let results = ValueVector::row(&table, row, ctx.resolver)?;
    Ok(results.item(col))
}

/// LOOKUP(lookup_value, lookup_vector, [result_vector])
///
/// Always a range lookup. Without a result vector, a two-dimensional table
/// is searched along its longer side and the answer read from the opposite
/// edge: first row to last row when wider than tall, first column to last
/// column otherwise.
pub fn fn_lookup(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let target = scalar(&args[0], ctx)?;
    let table = resolve_table_array(&args[1])?;

    let (keys, results) = match args.get(2) {
        Some(result_arg) => {
            let result_area = resolve_table_array(result_arg)?;
            let keys = vector_of(&table, ctx.resolver)?;
            let index = lookup_range_index(&target, &keys, true)?;
            let results = vector_of(&result_area, ctx.resolver)?;
            if index >= results.len() {
                return Err(EvalError::Code(ErrorCode::Na));
            }
            return Ok(results.item(index));
        }
        None if table.is_row() || table.is_column() => {
            let v = vector_of(&table, ctx.resolver)?;
            (v, v)
        }
        None if table.width() > table.height() => (
            ValueVector::row(&table, 0, ctx.resolver)?,
            ValueVector::row(&table, table.height() - 1, ctx.resolver)?,
        ),
        None => (
            ValueVector::column(&table, 0, ctx.resolver)?,
            ValueVector::column(&table, table.width() - 1, ctx.resolver)?,
        ),
    };
    let index = lookup_range_index(&target, &keys, true)?;
    Ok(results.item(index))
}

/// A single row or column; two-dimensional areas are `#VALUE!`
fn vector_of<'a>(
    area: &'a Area,
    resolver: &'a dyn ReferenceResolver,
) -> EvalResult<ValueVector<'a>> {
    ValueVector::from_area(area, resolver).ok_or(EvalError::Code(ErrorCode::Value))
}

/// MATCH(lookup_value, lookup_array, [match_type])
///
/// Returns the 1-based position. `match_type` 1 (the default) finds the
/// largest value not exceeding the target, 0 an exact match (wildcards
/// allowed), -1 the smallest value not below it.
pub fn fn_match(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let target = scalar(&args[0], ctx)?;
    let match_type = match args.get(2) {
        None => MatchType::LargestNotExceeding,
        Some(arg) => MatchType::from_number(to_number(arg, ctx)?.trunc()),
    };

    let index = with_lookup_array(&args[1], ctx, |vector| {
        match_index(&target, vector, match_type)
    })?;
    Ok(Value::Number((index + 1) as f64))
}

/// XMATCH(lookup_value, lookup_array, [match_mode], [search_mode])
///
/// `match_mode` 0 (the default) is exact, -1 and 1 fall back to the next
/// smaller or larger element, 2 treats text as a wildcard pattern.
/// `search_mode` 1 (the default) and -1 scan forwards or backwards, 2 and -2
/// binary search ascending or descending data.
pub fn fn_xmatch(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    let target = scalar(&args[0], ctx)?;
    let match_mode = mode_argument(args.get(2), ctx, MatchMode::Exact, MatchMode::from_code)?;
    let search_mode =
        mode_argument(args.get(3), ctx, SearchMode::FirstToLast, SearchMode::from_code)?;

    let index = with_lookup_array(&args[1], ctx, |vector| {
        search_index(&target, vector, match_mode, search_mode)
    })?;
    Ok(Value::Number((index + 1) as f64))
}

/// A mode code argument; absent or omitted means `default`, unknown codes are `#VALUE!`
fn mode_argument<M>(
    arg: Option<&Value>,
    ctx: &EvaluationContext,
    default: M,
    from_code: fn(i64) -> Option<M>,
) -> EvalResult<M> {
    match arg {
        None | Some(Value::MissingArg) => Ok(default),
        Some(value) => {
            let code = to_number(value, ctx)?.trunc();
            from_code(code as i64).ok_or(EvalError::Code(ErrorCode::Value))
        }
    }
}

/// Run `search` over MATCH's lookup array
///
/// A 3-D single-cell reference searches the same cell on every sheet.
/// Numbers, booleans and numeric text are `#N/A`, other text `#VALUE!`, and a
/// two-dimensional area `#N/A`.
fn with_lookup_array<T>(
    arg: &Value,
    ctx: &EvaluationContext,
    search: impl FnOnce(&ValueVector) -> EvalResult<T>,
) -> EvalResult<T> {
    match arg {
        Value::Ref(r) if r.is_multi_sheet() => search(&ValueVector::sheets(r, ctx.resolver)),
        Value::Number(_) | Value::Boolean(_) => Err(EvalError::Code(ErrorCode::Na)),
        Value::Text(s) if parse_number(s).is_some() => Err(EvalError::Code(ErrorCode::Na)),
        other => {
            let table = resolve_table_array(other)?;
            let vector = ValueVector::from_area(&table, ctx.resolver)
                .ok_or(EvalError::Code(ErrorCode::Na))?;
            search(&vector)
        }
    }
}
