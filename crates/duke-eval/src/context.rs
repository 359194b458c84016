//! Evaluation context and settings

use crate::resolver::{NoReferences, ReferenceResolver};

static NO_REFERENCES: NoReferences = NoReferences;

/// How numeric aggregations treat an omitted argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingArgPolicy {
    /// Count it as zero
    #[default]
    Coerce,
    /// Ignore it
    Skip,
    /// Fail with `#VALUE!`
    Error,
}

/// Tunables supplied by the embedding driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvalSettings {
    /// Upper bound on width × height of a broadcast result
    pub max_array_cells: usize,
    /// Treatment of omitted arguments in numeric aggregations
    pub missing_arg: MissingArgPolicy,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            max_array_cells: 1_000_000,
            missing_arg: MissingArgPolicy::Coerce,
        }
    }
}

/// Context for one function evaluation
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Storage access for reference-like values
    pub resolver: &'a dyn ReferenceResolver,
    /// Row of the formula cell (for implicit intersection)
    pub current_row: u32,
    /// Column of the formula cell (for implicit intersection)
    pub current_col: u16,
    pub settings: EvalSettings,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context with default settings
    pub fn new(resolver: &'a dyn ReferenceResolver, row: u32, col: u16) -> Self {
        Self {
            resolver,
            current_row: row,
            current_col: col,
            settings: EvalSettings::default(),
        }
    }

    /// Create a context without storage, at A1 (for testing)
    pub fn simple() -> EvaluationContext<'static> {
        EvaluationContext::new(&NO_REFERENCES, 0, 0)
    }

    /// Replace the settings
    pub fn with_settings(mut self, settings: EvalSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl std::fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("current_row", &self.current_row)
            .field("current_col", &self.current_col)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
