//! # duke-eval-core
//!
//! Plain data types shared by the duke-eval evaluation engine.
//!
//! This crate provides:
//! - [`ErrorCode`] - The nominal spreadsheet error codes (`#VALUE!`, `#N/A`, ...)
//! - [`CellAddress`] and [`CellRange`] - Zero-based cell coordinates with A1 parsing
//! - [`SheetSpan`] - The first/last sheet of a possibly 3-D reference
//!
//! ## Example
//!
//! ```rust
//! use duke_eval_core::{CellRange, ErrorCode};
//!
//! let range = CellRange::parse("B2:D5").unwrap();
//! assert_eq!(range.width(), 3);
//! assert_eq!(range.height(), 4);
//!
//! assert_eq!(ErrorCode::Na.code(), 0x2A);
//! assert_eq!(ErrorCode::from_str("#value!"), Some(ErrorCode::Value));
//! ```

pub mod address;
pub mod error;
pub mod error_code;
pub mod sheet;

pub use address::{CellAddress, CellRange};
pub use error::{Error, Result};
pub use error_code::ErrorCode;
pub use sheet::SheetSpan;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
