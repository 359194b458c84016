//! Sheet spans for 3-D references

use crate::error::{Error, Result};

/// The inclusive run of sheets a reference covers (e.g. `Sheet1:Sheet3!A1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetSpan {
    /// Index of the first sheet
    pub first: usize,
    /// Index of the last sheet (inclusive)
    pub last: usize,
}

impl SheetSpan {
    /// A span covering exactly one sheet
    pub fn single(sheet: usize) -> Self {
        Self {
            first: sheet,
            last: sheet,
        }
    }

    /// Create a span from `first` to `last` inclusive
    pub fn new(first: usize, last: usize) -> Result<Self> {
        if first > last {
            return Err(Error::InvalidSheetSpan { first, last });
        }
        Ok(Self { first, last })
    }

    /// Number of sheets covered
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// A span always covers at least one sheet
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the span covers more than one sheet
    pub fn is_multi_sheet(&self) -> bool {
        self.first != self.last
    }

    /// The sheet index, if the span covers a single sheet
    pub fn single_sheet(&self) -> Option<usize> {
        (!self.is_multi_sheet()).then_some(self.first)
    }
}

impl Default for SheetSpan {
    fn default() -> Self {
        Self::single(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span() {
        let span = SheetSpan::new(1, 3).unwrap();
        assert_eq!(span.len(), 3);
        assert!(span.is_multi_sheet());
        assert_eq!(span.single_sheet(), None);

        let single = SheetSpan::single(2);
        assert_eq!(single.len(), 1);
        assert_eq!(single.single_sheet(), Some(2));
    }

    #[test]
    fn test_reversed_span_rejected() {
        assert_eq!(
            SheetSpan::new(3, 1),
            Err(Error::InvalidSheetSpan { first: 3, last: 1 })
        );
    }
}
