//! Array broadcasting
//!
//! Applies a scalar operator element-wise over arguments that may be
//! scalars, single-cell references or areas. The result covers the largest
//! width and the largest height among the arguments. Smaller arguments are
//! not tiled: each cell is read from every argument by implicit
//! intersection at that argument's origin plus the cell offset, so a cell
//! an argument does not cover reads as `#VALUE!` (single rows and columns
//! still extend along their long axis).
//!
//! Errors stay in the cell that produced them.

use crate::context::EvaluationContext;
use crate::error::{flatten, EvalError, EvalResult};
use crate::operand::resolve_single;
use crate::value::{Area, Value};
use duke_eval_core::{CellAddress, ErrorCode};
use log::{debug, trace};

/// Extent of one argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
    pub origin_row: u32,
    pub origin_col: u16,
}

impl Shape {
    /// The extent an argument contributes to a broadcast
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Area(area) => Self::of_area(area),
            Value::AreaList(areas) if areas.len() == 1 => Self::of_area(&areas[0]),
            Value::Ref(r) => Self {
                width: 1,
                height: 1,
                origin_row: r.row,
                origin_col: r.col,
            },
            Value::AreaList(_)
            | Value::Number(_)
            | Value::Text(_)
            | Value::Boolean(_)
            | Value::Error(_)
            | Value::Blank
            | Value::MissingArg => Self {
                width: 1,
                height: 1,
                origin_row: 0,
                origin_col: 0,
            },
        }
    }

    fn of_area(area: &Area) -> Self {
        Self {
            width: area.width(),
            height: area.height(),
            origin_row: area.first_row(),
            origin_col: area.first_col(),
        }
    }
}

/// Broadcast a one-argument operator
pub fn broadcast1<F>(a: &Value, ctx: &EvaluationContext, op: F) -> Value
where
    F: Fn(&Value) -> EvalResult<Value>,
{
    broadcast(&[a], ctx, |v| op(&v[0]))
}

/// Broadcast a two-argument operator
pub fn broadcast2<F>(a: &Value, b: &Value, ctx: &EvaluationContext, op: F) -> Value
where
    F: Fn(&Value, &Value) -> EvalResult<Value>,
{
    broadcast(&[a, b], ctx, |v| op(&v[0], &v[1]))
}

/// Broadcast a three-argument operator
pub fn broadcast3<F>(a: &Value, b: &Value, c: &Value, ctx: &EvaluationContext, op: F) -> Value
where
    F: Fn(&Value, &Value, &Value) -> EvalResult<Value>,
{
    broadcast(&[a, b, c], ctx, |v| op(&v[0], &v[1], &v[2]))
}

/// Broadcast an operator over any number of arguments
///
/// A 1×1 result is returned as a scalar; anything larger comes back as an
/// area anchored at the formula cell.
pub fn broadcast<F>(args: &[&Value], ctx: &EvaluationContext, op: F) -> Value
where
    F: Fn(&[Value]) -> EvalResult<Value>,
{
    let shapes: Vec<Shape> = args.iter().map(|a| Shape::of(a)).collect();
    let width = shapes.iter().map(|s| s.width).max().unwrap_or(1);
    let height = shapes.iter().map(|s| s.height).max().unwrap_or(1);
    trace!("broadcast over {} args: {}x{}", args.len(), width, height);

    if width.saturating_mul(height) > ctx.settings.max_array_cells {
        debug!(
            "broadcast of {}x{} exceeds the {} cell limit",
            width, height, ctx.settings.max_array_cells
        );
        return Value::Error(ErrorCode::Value);
    }

    let mut values = Vec::with_capacity(width * height);
    let mut operands = Vec::with_capacity(args.len());
    for i in 0..height {
        for j in 0..width {
            operands.clear();
            let cell = match resolve_operands(args, &shapes, i, j, ctx, &mut operands) {
                Ok(()) => flatten(op(&operands)),
                Err(e) => e.into_value(),
            };
            values.push(cell);
        }
    }

    if width == 1 && height == 1 {
        return values.pop().unwrap_or(Value::Error(ErrorCode::Value));
    }
    let origin = CellAddress::new(ctx.current_row, ctx.current_col);
    flatten(Area::cached(origin, width, height, values).map(Value::Area))
}

/// Resolve every argument at offset (`i`, `j`); the first error in argument order wins
fn resolve_operands(
    args: &[&Value],
    shapes: &[Shape],
    i: usize,
    j: usize,
    ctx: &EvaluationContext,
    operands: &mut Vec<Value>,
) -> EvalResult<()> {
    for (arg, shape) in args.iter().zip(shapes) {
        let row = u32::try_from(shape.origin_row as usize + i)
            .map_err(|_| EvalError::Code(ErrorCode::Value))?;
        let col = u16::try_from(shape.origin_col as usize + j)
            .map_err(|_| EvalError::Code(ErrorCode::Value))?;
        operands.push(resolve_single(arg, row, col, ctx.resolver)?);
    }
    Ok(())
}
