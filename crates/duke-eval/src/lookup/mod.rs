//! Lookup engine
//!
//! - [`ValueVector`] - read-only row, column or sheet-run views
//! - [`lookup_index`], [`lookup_range_index`], [`match_index`] - index search
//! - [`search_index`] - XMATCH match and search modes
//! - argument helpers shared by VLOOKUP, HLOOKUP, LOOKUP, MATCH and XMATCH

mod args;
mod search;
mod vector;

pub use args::{resolve_range_lookup, resolve_row_or_col_index, resolve_table_array};
pub use search::{
    lookup_index, lookup_range_index, match_index, search_index, MatchMode, MatchType, SearchMode,
};
pub use vector::ValueVector;
