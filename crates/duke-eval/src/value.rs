//! The cell value model
//!
//! [`Value`] is what every evaluated sub-expression produces. Reference-like
//! variants ([`CellRef`], [`Area`], area lists) do not own cell contents;
//! they are read through a [`ReferenceResolver`] on demand.

use crate::error::{EvalError, EvalResult};
use crate::resolver::ReferenceResolver;
use duke_eval_core::{CellAddress, CellRange, ErrorCode, SheetSpan, MAX_COLS, MAX_ROWS};
use std::fmt;
use std::sync::Arc;

/// A computed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(ErrorCode),
    /// An empty cell
    Blank,
    /// An omitted optional argument, distinct from [`Value::Blank`]
    MissingArg,
    /// A single cell, possibly on several sheets
    Ref(CellRef),
    /// A rectangular range
    Area(Area),
    /// A union of areas
    AreaList(Vec<Area>),
}

impl Value {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Get the error if this is one
    pub fn error(&self) -> Option<ErrorCode> {
        match self {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Blank cell or omitted argument
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Blank | Value::MissingArg)
    }

    /// Whether the value points at storage instead of holding a scalar
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Ref(_) | Value::Area(_) | Value::AreaList(_))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Blank
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&crate::operand::format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Value::Error(e) => write!(f, "{}", e),
            Value::Blank | Value::MissingArg => Ok(()),
            Value::Ref(r) => write!(f, "{}", r),
            Value::Area(a) => write!(f, "{}", a),
            Value::AreaList(areas) => {
                for (i, area) in areas.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", area)?;
                }
                Ok(())
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<ErrorCode> for Value {
    fn from(e: ErrorCode) -> Self {
        Value::Error(e)
    }
}

impl From<CellRef> for Value {
    fn from(r: CellRef) -> Self {
        Value::Ref(r)
    }
}

impl From<Area> for Value {
    fn from(a: Area) -> Self {
        Value::Area(a)
    }
}

/// A reference to one cell, on one or more sheets
#[derive(Debug, Clone, PartialEq)]
pub struct CellRef {
    pub sheets: SheetSpan,
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    /// A single-sheet cell reference
    pub fn new(sheet: usize, row: u32, col: u16) -> Self {
        Self {
            sheets: SheetSpan::single(sheet),
            row,
            col,
        }
    }

    /// A 3-D reference over a run of sheets
    pub fn spanning(sheets: SheetSpan, row: u32, col: u16) -> Self {
        Self { sheets, row, col }
    }

    pub fn is_multi_sheet(&self) -> bool {
        self.sheets.is_multi_sheet()
    }

    /// Read the referenced cell; fails with `#VALUE!` on a multi-sheet reference
    pub fn value(&self, resolver: &dyn ReferenceResolver) -> EvalResult<Value> {
        let sheet = self
            .sheets
            .single_sheet()
            .ok_or(EvalError::Code(ErrorCode::Value))?;
        resolver.cell_value(sheet, self.row, self.col)
    }

    /// Read the referenced cell on one sheet of the span
    pub fn value_on_sheet(
        &self,
        sheet_offset: usize,
        resolver: &dyn ReferenceResolver,
    ) -> EvalResult<Value> {
        if sheet_offset >= self.sheets.len() {
            return Err(EvalError::Code(ErrorCode::Ref));
        }
        resolver.cell_value(self.sheets.first + sheet_offset, self.row, self.col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", CellAddress::new(self.row, self.col))
    }
}

/// Where an area's cells come from
#[derive(Debug, Clone, PartialEq)]
enum AreaData {
    /// Read through the resolver
    Stored,
    /// Held inline, row-major (array results and literals)
    Cached(Arc<[Value]>),
}

/// A rectangular range of cells addressed relative to its own origin
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub sheets: SheetSpan,
    range: CellRange,
    data: AreaData,
}

impl Area {
    /// An area over stored cells on one sheet
    pub fn new(sheet: usize, range: CellRange) -> Self {
        Self {
            sheets: SheetSpan::single(sheet),
            range,
            data: AreaData::Stored,
        }
    }

    /// An area over stored cells on a run of sheets
    pub fn spanning(sheets: SheetSpan, range: CellRange) -> Self {
        Self {
            sheets,
            range,
            data: AreaData::Stored,
        }
    }

    /// An area holding computed values, anchored at `origin`
    ///
    /// Rows must be non-empty and of equal length.
    pub fn from_rows(origin: CellAddress, rows: Vec<Vec<Value>>) -> EvalResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(EvalError::Code(ErrorCode::Value));
        }
        let values: Vec<Value> = rows.into_iter().flatten().collect();
        Self::cached(origin, width, height, values)
    }

    pub(crate) fn cached(
        origin: CellAddress,
        width: usize,
        height: usize,
        values: Vec<Value>,
    ) -> EvalResult<Self> {
        if width == 0
            || height == 0
            || width > MAX_COLS as usize
            || height > MAX_ROWS as usize
            || values.len() != width * height
        {
            return Err(EvalError::Code(ErrorCode::Ref));
        }
        let end = origin
            .offset((height - 1) as u32, (width - 1) as u16)
            .map_err(|_| EvalError::Code(ErrorCode::Ref))?;
        Ok(Self {
            sheets: SheetSpan::default(),
            range: CellRange::new(origin, end),
            data: AreaData::Cached(values.into()),
        })
    }

    /// The absolute range covered
    pub fn range(&self) -> CellRange {
        self.range
    }

    pub fn first_row(&self) -> u32 {
        self.range.start.row
    }

    pub fn first_col(&self) -> u16 {
        self.range.start.col
    }

    pub fn last_row(&self) -> u32 {
        self.range.end.row
    }

    pub fn last_col(&self) -> u16 {
        self.range.end.col
    }

    pub fn width(&self) -> usize {
        self.range.width() as usize
    }

    pub fn height(&self) -> usize {
        self.range.height() as usize
    }

    /// A single row of cells
    pub fn is_row(&self) -> bool {
        self.range.start.row == self.range.end.row
    }

    /// A single column of cells
    pub fn is_column(&self) -> bool {
        self.range.start.col == self.range.end.col
    }

    pub fn is_single_cell(&self) -> bool {
        self.is_row() && self.is_column()
    }

    pub fn is_multi_sheet(&self) -> bool {
        self.sheets.is_multi_sheet()
    }

    /// Whether the absolute row lies inside the area
    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.first_row() && row <= self.last_row()
    }

    /// Whether the absolute column lies inside the area
    pub fn contains_column(&self, col: u16) -> bool {
        col >= self.first_col() && col <= self.last_col()
    }

    /// Value at a zero-based offset from the area's origin
    ///
    /// Offsets outside the area fail with `#REF!`; a multi-sheet area fails
    /// with `#VALUE!` since no sheet has been selected.
    pub fn relative_value(
        &self,
        row: usize,
        col: usize,
        resolver: &dyn ReferenceResolver,
    ) -> EvalResult<Value> {
        if row >= self.height() || col >= self.width() {
            return Err(EvalError::Code(ErrorCode::Ref));
        }
        match &self.data {
            AreaData::Cached(values) => Ok(values[row * self.width() + col].clone()),
            AreaData::Stored => {
                let sheet = self
                    .sheets
                    .single_sheet()
                    .ok_or(EvalError::Code(ErrorCode::Value))?;
                resolver.cell_value(
                    sheet,
                    self.first_row() + row as u32,
                    self.first_col() + col as u16,
                )
            }
        }
    }

    /// Value at an absolute sheet coordinate inside the area
    pub fn absolute_value(
        &self,
        row: u32,
        col: u16,
        resolver: &dyn ReferenceResolver,
    ) -> EvalResult<Value> {
        if !self.range.contains(row, col) {
            return Err(EvalError::Code(ErrorCode::Ref));
        }
        self.relative_value(
            (row - self.first_row()) as usize,
            (col - self.first_col()) as usize,
            resolver,
        )
    }

    /// One single-sheet area per sheet of the span
    pub fn per_sheet(&self) -> Vec<Area> {
        match self.data {
            AreaData::Stored if self.is_multi_sheet() => (self.sheets.first..=self.sheets.last)
                .map(|sheet| Area::new(sheet, self.range))
                .collect(),
            _ => vec![self.clone()],
        }
    }

    /// Read every cell, row by row
    pub fn to_rows(&self, resolver: &dyn ReferenceResolver) -> EvalResult<Vec<Vec<Value>>> {
        (0..self.height())
            .map(|r| {
                (0..self.width())
                    .map(|c| self.relative_value(r, c, resolver))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.range)
    }
}
