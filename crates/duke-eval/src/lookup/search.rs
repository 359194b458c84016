//! Index search over a [`ValueVector`]

use super::ValueVector;
use crate::compare::{CompareResult, LookupComparer};
use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use duke_eval_core::ErrorCode;
use log::{debug, trace};

/// MATCH's third argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// `0`: first element equal to the target
    Exact,
    /// `1`: largest element not exceeding the target (ascending data)
    LargestNotExceeding,
    /// `-1`: smallest element not below the target (descending data)
    SmallestNotBelow,
}

impl MatchType {
    /// Classify by sign
    pub fn from_number(n: f64) -> Self {
        if n > 0.0 {
            MatchType::LargestNotExceeding
        } else if n < 0.0 {
            MatchType::SmallestNotBelow
        } else {
            MatchType::Exact
        }
    }
}

/// XMATCH's match mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `0`: equal elements only
    Exact,
    /// `-1`: equal, else the largest element below the target
    ExactOrNextSmaller,
    /// `1`: equal, else the smallest element above the target
    ExactOrNextLarger,
    /// `2`: text targets match as wildcard patterns
    Wildcard,
}

impl MatchMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(MatchMode::Exact),
            -1 => Some(MatchMode::ExactOrNextSmaller),
            1 => Some(MatchMode::ExactOrNextLarger),
            2 => Some(MatchMode::Wildcard),
            _ => None,
        }
    }

    /// The comparison an element must have to be a fallback candidate
    fn fallback(self) -> Option<CompareResult> {
        match self {
            MatchMode::ExactOrNextSmaller => Some(CompareResult::GreaterThan),
            MatchMode::ExactOrNextLarger => Some(CompareResult::LessThan),
            MatchMode::Exact | MatchMode::Wildcard => None,
        }
    }
}

/// XMATCH's search mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// `1`: linear, first to last
    FirstToLast,
    /// `-1`: linear, last to first
    LastToFirst,
    /// `2`: binary search over ascending data
    BinaryAscending,
    /// `-2`: binary search over descending data
    BinaryDescending,
}

impl SearchMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SearchMode::FirstToLast),
            -1 => Some(SearchMode::LastToFirst),
            2 => Some(SearchMode::BinaryAscending),
            -2 => Some(SearchMode::BinaryDescending),
            _ => None,
        }
    }
}

/// Find `target` in `vector`
///
/// Exact mode returns the first equal element, honouring wildcards in a
/// text target. Approximate mode binary searches data assumed sorted
/// ascending and returns the last element of the run equal to the target.
/// Either way, no match is `#N/A`.
pub fn lookup_index(target: &Value, vector: &ValueVector, approximate: bool) -> EvalResult<usize> {
    let comparer = LookupComparer::new(target, !approximate)?;
    let found = if approximate {
        match binary_search(&comparer, vector) {
            SearchOutcome::Equal(index) => Some(index),
            SearchOutcome::Floor(_) => None,
        }
    } else {
        linear_search(&comparer, vector)
    };
    found.ok_or(EvalError::Code(ErrorCode::Na))
}

/// Range lookup as used by VLOOKUP, HLOOKUP and LOOKUP
///
/// Like approximate [`lookup_index`], but when no element equals the target
/// the index of the largest element below it is returned instead. `#N/A`
/// only when the target sorts before every comparable element.
pub fn lookup_range_index(
    target: &Value,
    vector: &ValueVector,
    approximate: bool,
) -> EvalResult<usize> {
    if !approximate {
        return lookup_index(target, vector, false);
    }
    let comparer = LookupComparer::new(target, false)?;
    match binary_search(&comparer, vector) {
        SearchOutcome::Equal(index) | SearchOutcome::Floor(Some(index)) => Ok(index),
        SearchOutcome::Floor(None) => Err(EvalError::Code(ErrorCode::Na)),
    }
}

/// MATCH semantics over a vector
pub fn match_index(target: &Value, vector: &ValueVector, match_type: MatchType) -> EvalResult<usize> {
    let comparer = LookupComparer::new(target, true)?;
    let size = vector.len();
    let not_found = EvalError::Code(ErrorCode::Na);

    match match_type {
        MatchType::Exact => linear_search(&comparer, vector).ok_or(not_found),
        MatchType::LargestNotExceeding => {
            // Scan from the end so the last qualifying element wins
            for i in (0..size).rev() {
                match comparer.compare(&vector.item(i)) {
                    CompareResult::TypeMismatch | CompareResult::LessThan => continue,
                    CompareResult::Equal | CompareResult::GreaterThan => return Ok(i),
                }
            }
            Err(not_found)
        }
        MatchType::SmallestNotBelow => {
            for i in 0..size {
                match comparer.compare(&vector.item(i)) {
                    CompareResult::Equal => return Ok(i),
                    CompareResult::GreaterThan if i < 1 => return Err(not_found),
                    CompareResult::GreaterThan => return Ok(i - 1),
                    CompareResult::LessThan | CompareResult::TypeMismatch => {}
                }
            }
            size.checked_sub(1).ok_or(not_found)
        }
    }
}

/// Search with an explicit match mode and search mode, as XMATCH does
///
/// Fallback modes remember the best candidate seen while searching and
/// return it when nothing is equal; a text target loses everything from its
/// first wildcard character on. Binary modes only consider the elements
/// they visit. No match is `#N/A`.
pub fn search_index(
    target: &Value,
    vector: &ValueVector,
    match_mode: MatchMode,
    search_mode: SearchMode,
) -> EvalResult<usize> {
    let target = match (target, match_mode.fallback()) {
        (Value::Text(s), Some(_)) => Value::Text(strip_wildcards(s).to_string()),
        _ => target.clone(),
    };
    let comparer = LookupComparer::tolerant(&target, match_mode == MatchMode::Wildcard)?;
    let size = vector.len();
    let found = match search_mode {
        SearchMode::FirstToLast => scan(&comparer, vector, match_mode, 0..size),
        SearchMode::LastToFirst => scan(&comparer, vector, match_mode, (0..size).rev()),
        SearchMode::BinaryAscending => binary_search_modes(&comparer, vector, match_mode, false),
        SearchMode::BinaryDescending => binary_search_modes(&comparer, vector, match_mode, true),
    };
    found.ok_or(EvalError::Code(ErrorCode::Na))
}

/// Text up to the first `*`, `?` or `~`
fn strip_wildcards(text: &str) -> &str {
    text.find(['*', '?', '~']).map_or(text, |end| &text[..end])
}

/// Best fallback candidate seen so far
struct BestMatch {
    wanted: Option<CompareResult>,
    found: Option<(usize, Value)>,
}

impl BestMatch {
    fn new(mode: MatchMode) -> Self {
        Self {
            wanted: mode.fallback(),
            found: None,
        }
    }

    /// Consider an element that is not equal to the target
    fn offer(&mut self, index: usize, item: Value, result: CompareResult) {
        let Some(wanted) = self.wanted else {
            return;
        };
        if result != wanted {
            return;
        }
        // Closer candidates sort on the same side of the best one as the target
        let closer = match &self.found {
            None => true,
            Some((_, best)) => LookupComparer::tolerant(&item, false)
                .map_or(false, |c| c.compare(best) == wanted),
        };
        if closer {
            self.found = Some((index, item));
        }
    }

    fn index(&self) -> Option<usize> {
        self.found.as_ref().map(|(index, _)| *index)
    }
}

fn scan(
    comparer: &LookupComparer,
    vector: &ValueVector,
    mode: MatchMode,
    indexes: impl Iterator<Item = usize>,
) -> Option<usize> {
    let mut best = BestMatch::new(mode);
    for i in indexes {
        let item = vector.item(i);
        let result = comparer.compare(&item);
        if result.is_equal() {
            return Some(i);
        }
        best.offer(i, item, result);
    }
    best.index()
}

/// Whether the target sorts before an element in the search order
fn target_first(result: CompareResult, descending: bool) -> bool {
    if descending {
        result.is_greater_than()
    } else {
        result.is_less_than()
    }
}

/// Binary search for the extended modes; no equal-run extension
fn binary_search_modes(
    comparer: &LookupComparer,
    vector: &ValueVector,
    mode: MatchMode,
    descending: bool,
) -> Option<usize> {
    let mut bounds = SearchBounds::new(vector.len());
    let mut best = BestMatch::new(mode);
    loop {
        let Some(mid) = bounds.mid() else {
            return best.index();
        };
        let item = vector.item(mid);
        let result = comparer.compare(&item);
        if result.is_equal() {
            return Some(mid);
        }
        best.offer(mid, item, result);
        if result.is_type_mismatch() {
            let stepped = step_past_mismatch(comparer, vector, &mut bounds, mid, descending);
            if stepped.is_some() {
                return stepped;
            }
        } else {
            bounds.narrow(mid, target_first(result, descending));
        }
    }
}

fn linear_search(comparer: &LookupComparer, vector: &ValueVector) -> Option<usize> {
    vector
        .items()
        .position(|item| comparer.compare(&item).is_equal())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    /// Last index of a run equal to the target
    Equal(usize),
    /// Final lower boundary: the largest element below the target, if any
    Floor(Option<usize>),
}

/// Exclusive search window; `low` starts before the first element
#[derive(Debug)]
struct SearchBounds {
    low: isize,
    high: isize,
}

impl SearchBounds {
    fn new(size: usize) -> Self {
        Self {
            low: -1,
            high: size as isize,
        }
    }

    fn mid(&self) -> Option<usize> {
        let gap = self.high - self.low;
        (gap >= 2).then(|| (self.low + gap / 2) as usize)
    }

    fn narrow(&mut self, mid: usize, target_is_less: bool) {
        if target_is_less {
            self.high = mid as isize;
        } else {
            self.low = mid as isize;
        }
        trace!("binary search narrowed to ({}, {})", self.low, self.high);
    }

    fn floor(&self) -> Option<usize> {
        usize::try_from(self.low).ok()
    }
}

/// Binary search tolerant of elements that cannot be ordered against the target
fn binary_search(comparer: &LookupComparer, vector: &ValueVector) -> SearchOutcome {
    let mut bounds = SearchBounds::new(vector.len());
    loop {
        let Some(mut mid) = bounds.mid() else {
            return SearchOutcome::Floor(bounds.floor());
        };
        let mut result = comparer.compare(&vector.item(mid));
        if result.is_type_mismatch() {
            match step_past_mismatch(comparer, vector, &mut bounds, mid, false) {
                Some(next) => {
                    mid = next;
                    result = comparer.compare(&vector.item(mid));
                }
                None => continue,
            }
        }
        if result.is_equal() {
            return SearchOutcome::Equal(last_of_equal_run(comparer, vector, mid, bounds.high));
        }
        bounds.narrow(mid, result.is_less_than());
    }
}

/// Walk forward from a mismatched midpoint to the next comparable element
///
/// Returns the element's index when it equals the target. Otherwise the
/// window has been narrowed and `None` is returned. When the comparable
/// element sits just before the upper bound and comes after the target in
/// the search order, the upper bound is pulled down to the original midpoint
/// rather than to that element.
fn step_past_mismatch(
    comparer: &LookupComparer,
    vector: &ValueVector,
    bounds: &mut SearchBounds,
    mid: usize,
    descending: bool,
) -> Option<usize> {
    let high = bounds.high as usize;
    let mut next = mid;
    loop {
        next += 1;
        if next == high {
            debug!("type mismatch run from {} reaches the upper bound", mid);
            bounds.narrow(mid, true);
            return None;
        }
        let result = comparer.compare(&vector.item(next));
        if target_first(result, descending) && next == high - 1 {
            bounds.narrow(mid, true);
            return None;
        }
        match result {
            CompareResult::TypeMismatch => continue,
            CompareResult::Equal => return Some(next),
            CompareResult::LessThan | CompareResult::GreaterThan => {
                bounds.narrow(next, target_first(result, descending));
                return None;
            }
        }
    }
}

fn last_of_equal_run(
    comparer: &LookupComparer,
    vector: &ValueVector,
    first: usize,
    high: isize,
) -> usize {
    let end = high as usize;
    (first + 1..end)
        .find(|&i| !comparer.compare(&vector.item(i)).is_equal())
        .map_or(end - 1, |i| i - 1)
}
