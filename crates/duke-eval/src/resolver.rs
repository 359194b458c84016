//! Reference resolution capability
//!
//! The engine never reads storage directly. Whatever owns the cells (a
//! workbook model, a test fixture) implements [`ReferenceResolver`] and is
//! handed to the engine through the [`EvaluationContext`](crate::EvaluationContext).

use crate::error::EvalResult;
use crate::value::Value;

/// Reads stored cell values for the engine
pub trait ReferenceResolver {
    /// The value stored at an absolute location
    ///
    /// A stored value may itself be a reference (`Value::Ref`/`Value::Area`);
    /// the engine follows such chains. Unknown sheets should fail with
    /// `#REF!`, unresolvable names with [`EvalError::Name`](crate::EvalError::Name).
    fn cell_value(&self, sheet: usize, row: u32, col: u16) -> EvalResult<Value>;
}

/// Resolver for evaluation without any storage: every cell is blank
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReferences;

impl ReferenceResolver for NoReferences {
    fn cell_value(&self, _sheet: usize, _row: u32, _col: u16) -> EvalResult<Value> {
        Ok(Value::Blank)
    }
}
