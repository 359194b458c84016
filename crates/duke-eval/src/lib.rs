//! # duke-eval
//!
//! Value evaluation core for spreadsheet functions.
//!
//! This crate provides:
//! - The value model ([`Value`], [`CellRef`], [`Area`]) and coercions
//! - Array broadcasting of scalar operators
//! - The lookup engine behind VLOOKUP, HLOOKUP, LOOKUP, MATCH and XMATCH
//! - The criteria engine behind the database functions (DSUM, DGET, ...)
//! - A small registry of built-in functions on top of these engines
//!
//! Cells are read through a [`ReferenceResolver`]; [`Workbook`] is an
//! in-memory implementation.
//!
//! ## Example
//!
//! ```rust
//! use duke_eval::{builtin_functions, Value, Workbook};
//!
//! let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
//! wb.set_rows(0, "A1", vec![
//!     vec!["Apple".into(), 1.0.into()],
//!     vec!["Pear".into(), 2.0.into()],
//! ]).unwrap();
//!
//! let ctx = wb.context(0, 3);
//! let table = wb.area(0, "A1:B2").unwrap();
//! let args = [Value::text("pear"), table, Value::Number(2.0), Value::Boolean(false)];
//! let result = builtin_functions().invoke("VLOOKUP", &args, &ctx).unwrap();
//! assert_eq!(result, Value::Number(2.0));
//! ```

pub mod broadcast;
pub mod compare;
pub mod context;
pub mod database;
pub mod error;
pub mod functions;
pub mod lookup;
pub mod operand;
pub mod resolver;
pub mod value;
pub mod wildcard;
pub mod workbook;

pub use context::{EvalSettings, EvaluationContext, MissingArgPolicy};
pub use duke_eval_core::ErrorCode;
pub use error::{EvalError, EvalResult, FunctionError};
pub use functions::{builtin_functions, FunctionDef, FunctionRegistry};
pub use resolver::{NoReferences, ReferenceResolver};
pub use value::{Area, CellRef, Value};
pub use workbook::Workbook;
