//! In-memory cell storage
//!
//! [`Workbook`] is the simplest owner of cells that can back an evaluation:
//! named sheets of sparse values plus a table of defined names. It
//! implements [`ReferenceResolver`], so stored references (and names that
//! stand for them) are followed by the engine.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::resolver::ReferenceResolver;
use crate::value::{Area, CellRef, Value};
use ahash::AHashMap;
use duke_eval_core::{
    CellAddress, CellRange, Error, ErrorCode, Result, SheetSpan, MAX_COLS, MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};
use lazy_regex::regex_is_match;
use log::{debug, trace};

/// What a cell holds
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Value(Value),
    /// A defined name, resolved on every read
    Name(String),
}

#[derive(Debug, Clone)]
struct Sheet {
    name: String,
    cells: AHashMap<(u32, u16), Entry>,
}

/// Sheets of stored values and a defined-name table
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    names: AHashMap<String, Value>,
}

impl Workbook {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a workbook with the given sheets
    pub fn with_sheets(names: &[&str]) -> Result<Self> {
        let mut workbook = Self::new();
        for name in names {
            workbook.add_sheet(name)?;
        }
        Ok(workbook)
    }

    /// Add a sheet and return its index
    pub fn add_sheet(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name)?;
        self.sheets.push(Sheet {
            name: name.to_string(),
            cells: AHashMap::new(),
        });
        Ok(self.sheets.len() - 1)
    }

    /// Index of a sheet, matched case-insensitively
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        let name_lower = name.to_lowercase();
        self.sheets
            .iter()
            .position(|s| s.name.to_lowercase() == name_lower)
    }

    /// Like [`Workbook::sheet_index`], failing with [`Error::SheetNotFound`]
    pub fn sheet_by_name(&self, name: &str) -> Result<usize> {
        self.sheet_index(name).ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    pub fn sheet_name(&self, index: usize) -> Option<&str> {
        self.sheets.get(index).map(|s| s.name.as_str())
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Store a value at an A1 address
    pub fn set_value(
        &mut self,
        sheet: usize,
        address: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value_at(sheet, addr.row, addr.col, value)
    }

    /// Store a value at zero-based coordinates
    pub fn set_value_at(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.insert(sheet, row, col, Entry::Value(value.into()))
    }

    /// Store a block of values with its top-left corner at `origin`
    pub fn set_rows(&mut self, sheet: usize, origin: &str, rows: Vec<Vec<Value>>) -> Result<()> {
        let origin = CellAddress::parse(origin)?;
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                let addr = origin.offset(r as u32, c as u16)?;
                self.set_value_at(sheet, addr.row, addr.col, value)?;
            }
        }
        Ok(())
    }

    /// Make a cell stand for a defined name
    ///
    /// The name is looked up when the cell is read, so it may be defined
    /// later (or never, in which case reading the cell fails with `#NAME?`).
    pub fn set_name_ref(&mut self, sheet: usize, address: &str, name: &str) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.insert(sheet, addr.row, addr.col, Entry::Name(name.to_string()))
    }

    /// Define (or redefine) a name
    pub fn define_name(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if !regex_is_match!(r"^[A-Za-z_\\][A-Za-z0-9_.]*$", name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        self.names.insert(name.to_uppercase(), value.into());
        Ok(())
    }

    /// Empty a cell or a range such as `A1:C3`
    pub fn clear(&mut self, sheet: usize, range: &str) -> Result<()> {
        let range = CellRange::parse(range)?;
        let cells = &mut self.sheet_mut(sheet)?.cells;
        for addr in range.cells() {
            cells.remove(&(addr.row, addr.col));
        }
        Ok(())
    }

    /// A reference to one cell
    pub fn cell_ref(&self, sheet: usize, address: &str) -> Result<Value> {
        self.check_sheet(sheet)?;
        let addr = CellAddress::parse(address)?;
        Ok(Value::Ref(CellRef::new(sheet, addr.row, addr.col)))
    }

    /// A reference to one cell on each of the sheets `first..=last`
    pub fn cell_ref_3d(&self, first: usize, last: usize, address: &str) -> Result<Value> {
        let span = self.span(first, last)?;
        let addr = CellAddress::parse(address)?;
        Ok(Value::Ref(CellRef::spanning(span, addr.row, addr.col)))
    }

    /// A reference to a rectangular area such as `A1:C3`
    pub fn area(&self, sheet: usize, range: &str) -> Result<Value> {
        self.check_sheet(sheet)?;
        Ok(Value::Area(Area::new(sheet, CellRange::parse(range)?)))
    }

    /// A reference to the same area on each of the sheets `first..=last`
    pub fn area_3d(&self, first: usize, last: usize, range: &str) -> Result<Value> {
        let span = self.span(first, last)?;
        Ok(Value::Area(Area::spanning(span, CellRange::parse(range)?)))
    }

    /// An evaluation context for a formula at (`row`, `col`)
    pub fn context(&self, row: u32, col: u16) -> EvaluationContext<'_> {
        EvaluationContext::new(self, row, col)
    }

    fn insert(&mut self, sheet: usize, row: u32, col: u16, entry: Entry) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        trace!("sheet {} ({}, {}) <- {:?}", sheet, row, col, entry);
        self.sheet_mut(sheet)?.cells.insert((row, col), entry);
        Ok(())
    }

    fn span(&self, first: usize, last: usize) -> Result<SheetSpan> {
        self.check_sheet(first)?;
        self.check_sheet(last)?;
        SheetSpan::new(first, last)
    }

    fn check_sheet(&self, sheet: usize) -> Result<()> {
        if sheet >= self.sheets.len() {
            return Err(Error::SheetOutOfBounds(sheet, self.sheets.len()));
        }
        Ok(())
    }

    fn sheet_mut(&mut self, sheet: usize) -> Result<&mut Sheet> {
        let count = self.sheets.len();
        self.sheets
            .get_mut(sheet)
            .ok_or(Error::SheetOutOfBounds(sheet, count))
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        if self.sheet_index(name).is_some() {
            return Err(Error::DuplicateSheetName(name.into()));
        }
        Ok(())
    }
}

impl ReferenceResolver for Workbook {
    fn cell_value(&self, sheet: usize, row: u32, col: u16) -> EvalResult<Value> {
        let sheet = self
            .sheets
            .get(sheet)
            .ok_or(EvalError::Code(ErrorCode::Ref))?;
        match sheet.cells.get(&(row, col)) {
            None => Ok(Value::Blank),
            Some(Entry::Value(v)) => Ok(v.clone()),
            Some(Entry::Name(name)) => match self.names.get(&name.to_uppercase()) {
                Some(v) => Ok(v.clone()),
                None => {
                    debug!("undefined name {:?} in sheet {:?}", name, sheet.name);
                    Err(EvalError::Name(name.clone()))
                }
            },
        }
    }
}
