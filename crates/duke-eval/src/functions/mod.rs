//! Built-in functions

pub mod database;
pub mod lookup;
pub mod math;
pub mod operators;

use crate::context::EvaluationContext;
use crate::error::{flatten, EvalResult, FunctionError};
use crate::value::Value;
use ahash::AHashMap;
use log::trace;
use once_cell::sync::Lazy;

/// Function implementation signature
///
/// A failed evaluation is returned as `Err` and turned into an error value
/// by [`FunctionRegistry::invoke`].
pub type FunctionImpl = fn(&[Value], &EvaluationContext) -> EvalResult<Value>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }

    fn expected(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        }
    }
}

impl std::fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// Function registry
#[derive(Debug)]
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: AHashMap::new(),
        };

        registry.register_math_functions();
        registry.register_lookup_functions();
        registry.register_database_functions();

        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Call a function by name
    ///
    /// Unknown names and wrong argument counts are reported as
    /// [`FunctionError`]s; everything that goes wrong during evaluation
    /// comes back as an error value.
    pub fn invoke(
        &self,
        name: &str,
        args: &[Value],
        ctx: &EvaluationContext,
    ) -> Result<Value, FunctionError> {
        let def = self
            .get(name)
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))?;
        if !def.accepts(args.len()) {
            return Err(FunctionError::ArgumentCount {
                function: def.name.to_string(),
                expected: def.expected(),
                actual: args.len(),
            });
        }
        trace!("invoking {} with {} args", def.name, args.len());
        Ok(flatten((def.implementation)(args, ctx)))
    }

    fn register_fixed(&mut self, name: &'static str, min: usize, max: usize, f: FunctionImpl) {
        self.register(FunctionDef {
            name,
            min_args: min,
            max_args: Some(max),
            implementation: f,
        });
    }

    fn register_math_functions(&mut self) {
        for (name, f) in [
            ("SUM", math::fn_sum as FunctionImpl),
            ("AVERAGE", math::fn_average),
            ("MIN", math::fn_min),
            ("MAX", math::fn_max),
        ] {
            self.register(FunctionDef {
                name,
                min_args: 1,
                max_args: None,
                implementation: f,
            });
        }

        self.register_fixed("ABS", 1, 1, math::fn_abs);
        self.register_fixed("SQRT", 1, 1, math::fn_sqrt);
        self.register_fixed("INT", 1, 1, math::fn_int);
        self.register_fixed("FACT", 1, 1, math::fn_fact);
        self.register_fixed("MOD", 2, 2, math::fn_mod);
        self.register_fixed("POWER", 2, 2, math::fn_power);
        self.register_fixed("ROUND", 1, 2, math::fn_round);
        self.register_fixed("COMBIN", 2, 2, math::fn_combin);
    }

    fn register_lookup_functions(&mut self) {
        self.register_fixed("VLOOKUP", 3, 4, lookup::fn_vlookup);
        self.register_fixed("HLOOKUP", 3, 4, lookup::fn_hlookup);
        self.register_fixed("LOOKUP", 2, 3, lookup::fn_lookup);
        self.register_fixed("MATCH", 2, 3, lookup::fn_match);
        self.register_fixed("XMATCH", 2, 4, lookup::fn_xmatch);
    }

    fn register_database_functions(&mut self) {
        for (name, f) in [
            ("DGET", database::fn_dget as FunctionImpl),
            ("DMIN", database::fn_dmin),
            ("DMAX", database::fn_dmax),
            ("DSUM", database::fn_dsum),
            ("DCOUNT", database::fn_dcount),
            ("DCOUNTA", database::fn_dcounta),
            ("DAVERAGE", database::fn_daverage),
            ("DPRODUCT", database::fn_dproduct),
            ("DSTDEV", database::fn_dstdev),
            ("DSTDEVP", database::fn_dstdevp),
            ("DVAR", database::fn_dvar),
            ("DVARP", database::fn_dvarp),
        ] {
            self.register_fixed(name, 3, 3, f);
        }
    }
}

static BUILTINS: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::new);

/// The shared registry of built-in functions, built on first use
pub fn builtin_functions() -> &'static FunctionRegistry {
    &BUILTINS
}
