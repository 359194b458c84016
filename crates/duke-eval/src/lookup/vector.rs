//! One-dimensional views for lookups

use crate::error::{flatten, EvalError, EvalResult};
use crate::operand::resolve_single;
use crate::resolver::ReferenceResolver;
use crate::value::{Area, CellRef, Value};
use duke_eval_core::ErrorCode;

#[derive(Debug, Clone, Copy)]
enum VectorKind<'a> {
    Row { area: &'a Area, row: usize },
    Column { area: &'a Area, col: usize },
    Sheets(&'a CellRef),
}

/// A read-only row, column or sheet-run projection of stored values
///
/// Items that fail to resolve show up as error values rather than aborting
/// the search.
#[derive(Clone, Copy)]
pub struct ValueVector<'a> {
    resolver: &'a dyn ReferenceResolver,
    kind: VectorKind<'a>,
}

impl<'a> ValueVector<'a> {
    /// Row `row` (zero-based) of `area`
    pub fn row(
        area: &'a Area,
        row: usize,
        resolver: &'a dyn ReferenceResolver,
    ) -> EvalResult<Self> {
        if row >= area.height() {
            return Err(EvalError::Code(ErrorCode::Ref));
        }
        Ok(Self {
            resolver,
            kind: VectorKind::Row { area, row },
        })
    }

    /// Column `col` (zero-based) of `area`
    pub fn column(
        area: &'a Area,
        col: usize,
        resolver: &'a dyn ReferenceResolver,
    ) -> EvalResult<Self> {
        if col >= area.width() {
            return Err(EvalError::Code(ErrorCode::Ref));
        }
        Ok(Self {
            resolver,
            kind: VectorKind::Column { area, col },
        })
    }

    /// The area itself, if it is a single row or a single column
    pub fn from_area(area: &'a Area, resolver: &'a dyn ReferenceResolver) -> Option<Self> {
        let kind = if area.is_column() {
            VectorKind::Column { area, col: 0 }
        } else if area.is_row() {
            VectorKind::Row { area, row: 0 }
        } else {
            return None;
        };
        Some(Self { resolver, kind })
    }

    /// The same cell across every sheet of a 3-D reference
    pub fn sheets(cell_ref: &'a CellRef, resolver: &'a dyn ReferenceResolver) -> Self {
        Self {
            resolver,
            kind: VectorKind::Sheets(cell_ref),
        }
    }

    pub fn len(&self) -> usize {
        match self.kind {
            VectorKind::Row { area, .. } => area.width(),
            VectorKind::Column { area, .. } => area.height(),
            VectorKind::Sheets(r) => r.sheets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item `index`, resolved to a scalar (errors included)
    pub fn item(&self, index: usize) -> Value {
        let (value, row, col) = match self.kind {
            VectorKind::Row { area, row } => (
                area.relative_value(row, index, self.resolver),
                area.first_row() + row as u32,
                area.first_col() + index as u16,
            ),
            VectorKind::Column { area, col } => (
                area.relative_value(index, col, self.resolver),
                area.first_row() + index as u32,
                area.first_col() + col as u16,
            ),
            VectorKind::Sheets(r) => (r.value_on_sheet(index, self.resolver), r.row, r.col),
        };
        match value {
            Ok(v) if v.is_reference() => flatten(resolve_single(&v, row, col, self.resolver)),
            other => flatten(other),
        }
    }

    /// All items in order
    pub fn items(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |i| self.item(i))
    }
}

impl std::fmt::Debug for ValueVector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueVector")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
