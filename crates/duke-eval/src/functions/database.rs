//! Database functions
//!
//! Every function takes `(database, field, criteria)`; see
//! [`crate::database`] for how records are matched.

use crate::context::EvaluationContext;
use crate::database::{
    run_query, Average, CountNonBlank, CountNumbers, Deviation, FirstValue, MatchAlgorithm,
    Maximum, Minimum, Product, Sum,
};
use crate::error::EvalResult;
use crate::value::Value;

fn query(
    args: &[Value],
    ctx: &EvaluationContext,
    mut algorithm: impl MatchAlgorithm,
) -> EvalResult<Value> {
    run_query(&args[0], &args[1], &args[2], ctx, &mut algorithm)
}

/// DGET(database, field, criteria) - The single matching value
pub fn fn_dget(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, FirstValue::default())
}

/// DMIN(database, field, criteria)
pub fn fn_dmin(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Minimum::default())
}

/// DMAX(database, field, criteria)
pub fn fn_dmax(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Maximum::default())
}

/// DSUM(database, field, criteria)
pub fn fn_dsum(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Sum::default())
}

/// DCOUNT(database, field, criteria) - Matching records holding numbers
///
/// A blank or omitted field counts every matching record.
pub fn fn_dcount(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, CountNumbers::default())
}

/// DCOUNTA(database, field, criteria) - Matching records that are not blank
///
/// A blank or omitted field counts every matching record.
pub fn fn_dcounta(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, CountNonBlank::default())
}

/// DAVERAGE(database, field, criteria)
pub fn fn_daverage(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Average::default())
}

/// DPRODUCT(database, field, criteria)
pub fn fn_dproduct(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Product::default())
}

/// DSTDEV(database, field, criteria) - Sample standard deviation
pub fn fn_dstdev(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Deviation::sample_std_dev())
}

/// DSTDEVP(database, field, criteria) - Population standard deviation
pub fn fn_dstdevp(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Deviation::population_std_dev())
}

/// DVAR(database, field, criteria) - Sample variance
pub fn fn_dvar(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Deviation::sample_variance())
}

/// DVARP(database, field, criteria) - Population variance
pub fn fn_dvarp(args: &[Value], ctx: &EvaluationContext) -> EvalResult<Value> {
    query(args, ctx, Deviation::population_variance())
}
