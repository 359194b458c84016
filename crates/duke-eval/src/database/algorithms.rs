//! Match algorithms behind the database functions
//!
//! Numeric algorithms consider number values only; text, booleans, blanks
//! and errors in the field column are ignored.

use super::MatchAlgorithm;
use crate::value::Value;
use duke_eval_core::ErrorCode;

/// DGET - the single matching value
///
/// A second non-blank match is `#NUM!` and stops the scan. No match, or a
/// blank/empty result, is `#VALUE!`.
#[derive(Debug, Default, Clone)]
pub struct FirstValue {
    value: Option<Value>,
}

impl MatchAlgorithm for FirstValue {
    fn process_match(&mut self, value: &Value) -> bool {
        let replace = self.value.as_ref().map_or(true, Value::is_blank);
        if replace {
            self.value = Some(value.clone());
        } else if !value.is_blank() {
            self.value = Some(Value::Error(ErrorCode::Num));
            return false;
        }
        true
    }

    fn result(&self) -> Value {
        match &self.value {
            None | Some(Value::Blank) | Some(Value::MissingArg) => Value::Error(ErrorCode::Value),
            Some(Value::Text(s)) if s.is_empty() => Value::Error(ErrorCode::Value),
            Some(v) => v.clone(),
        }
    }

    fn reset(&mut self) {
        self.value = None;
    }
}

/// DMIN - smallest number, 0 if none
#[derive(Debug, Default, Clone)]
pub struct Minimum {
    min: Option<f64>,
}

impl MatchAlgorithm for Minimum {
    fn process_match(&mut self, value: &Value) -> bool {
        if let Value::Number(n) = value {
            self.min = Some(self.min.map_or(*n, |m| m.min(*n)));
        }
        true
    }

    fn result(&self) -> Value {
        Value::Number(self.min.unwrap_or(0.0))
    }

    fn reset(&mut self) {
        self.min = None;
    }
}

/// DMAX - largest number, 0 if none
#[derive(Debug, Default, Clone)]
pub struct Maximum {
    max: Option<f64>,
}

impl MatchAlgorithm for Maximum {
    fn process_match(&mut self, value: &Value) -> bool {
        if let Value::Number(n) = value {
            self.max = Some(self.max.map_or(*n, |m| m.max(*n)));
        }
        true
    }

    fn result(&self) -> Value {
        Value::Number(self.max.unwrap_or(0.0))
    }

    fn reset(&mut self) {
        self.max = None;
    }
}

/// DSUM
#[derive(Debug, Default, Clone)]
pub struct Sum {
    total: f64,
}

impl MatchAlgorithm for Sum {
    fn process_match(&mut self, value: &Value) -> bool {
        if let Value::Number(n) = value {
            self.total += n;
        }
        true
    }

    fn result(&self) -> Value {
        Value::Number(self.total)
    }

    fn reset(&mut self) {
        self.total = 0.0;
    }
}

/// DCOUNT - how many matches hold numbers
#[derive(Debug, Default, Clone)]
pub struct CountNumbers {
    count: usize,
}

impl MatchAlgorithm for CountNumbers {
    fn process_match(&mut self, value: &Value) -> bool {
        if matches!(value, Value::Number(_)) {
            self.count += 1;
        }
        true
    }

    fn result(&self) -> Value {
        Value::Number(self.count as f64)
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    fn allows_empty_field(&self) -> bool {
        true
    }
}

/// DCOUNTA - how many matches are not blank
#[derive(Debug, Default, Clone)]
pub struct CountNonBlank {
    count: usize,
}

impl MatchAlgorithm for CountNonBlank {
    fn process_match(&mut self, value: &Value) -> bool {
        if !value.is_blank() {
            self.count += 1;
        }
        true
    }

    fn result(&self) -> Value {
        Value::Number(self.count as f64)
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    fn allows_empty_field(&self) -> bool {
        true
    }
}

/// DAVERAGE - `#DIV/0!` without numbers
#[derive(Debug, Default, Clone)]
pub struct Average {
    total: f64,
    count: usize,
}

impl MatchAlgorithm for Average {
    fn process_match(&mut self, value: &Value) -> bool {
        if let Value::Number(n) = value {
            self.total += n;
            self.count += 1;
        }
        true
    }

    fn result(&self) -> Value {
        if self.count == 0 {
            return Value::Error(ErrorCode::Div0);
        }
        Value::Number(self.total / self.count as f64)
    }

    fn reset(&mut self) {
        self.total = 0.0;
        self.count = 0;
    }
}

/// DPRODUCT - 0 without numbers
#[derive(Debug, Default, Clone)]
pub struct Product {
    product: Option<f64>,
}

impl MatchAlgorithm for Product {
    fn process_match(&mut self, value: &Value) -> bool {
        if let Value::Number(n) = value {
            self.product = Some(self.product.map_or(*n, |p| p * n));
        }
        true
    }

    fn result(&self) -> Value {
        Value::Number(self.product.unwrap_or(0.0))
    }

    fn reset(&mut self) {
        self.product = None;
    }
}

/// DVAR, DVARP, DSTDEV and DSTDEVP
#[derive(Debug, Clone)]
pub struct Deviation {
    values: Vec<f64>,
    population: bool,
    square_root: bool,
}

impl Deviation {
    /// DVAR
    pub fn sample_variance() -> Self {
        Self::new(false, false)
    }

    /// DVARP
    pub fn population_variance() -> Self {
        Self::new(true, false)
    }

    /// DSTDEV
    pub fn sample_std_dev() -> Self {
        Self::new(false, true)
    }

    /// DSTDEVP
    pub fn population_std_dev() -> Self {
        Self::new(true, true)
    }

    fn new(population: bool, square_root: bool) -> Self {
        Self {
            values: Vec::new(),
            population,
            square_root,
        }
    }
}

impl MatchAlgorithm for Deviation {
    fn process_match(&mut self, value: &Value) -> bool {
        if let Value::Number(n) = value {
            self.values.push(*n);
        }
        true
    }

    fn result(&self) -> Value {
        let n = self.values.len();
        let divisor = if self.population { n } else { n.saturating_sub(1) };
        if divisor == 0 {
            return Value::Error(ErrorCode::Div0);
        }
        let mean = self.values.iter().sum::<f64>() / n as f64;
        let squares: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
        let variance = squares / divisor as f64;
        Value::Number(if self.square_root {
            variance.sqrt()
        } else {
            variance
        })
    }

    fn reset(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(algorithm: &mut dyn MatchAlgorithm, values: &[Value]) -> Value {
        algorithm.reset();
        for v in values {
            if !algorithm.process_match(v) {
                break;
            }
        }
        algorithm.result()
    }

    #[test]
    fn test_first_value() {
        let mut dget = FirstValue::default();
        assert_eq!(feed(&mut dget, &[]), Value::Error(ErrorCode::Value));
        assert_eq!(feed(&mut dget, &[Value::Number(3.0)]), Value::Number(3.0));
        assert_eq!(
            feed(&mut dget, &[Value::Blank, Value::text("x"), Value::Blank]),
            Value::text("x")
        );
        assert_eq!(
            feed(&mut dget, &[Value::Number(1.0), Value::Number(2.0)]),
            Value::Error(ErrorCode::Num)
        );
        assert_eq!(feed(&mut dget, &[Value::text("")]), Value::Error(ErrorCode::Value));
        assert_eq!(
            feed(&mut dget, &[Value::Error(ErrorCode::Na)]),
            Value::Error(ErrorCode::Na)
        );
    }

    #[test]
    fn test_first_value_stops_scan() {
        let mut dget = FirstValue::default();
        assert!(dget.process_match(&Value::Number(1.0)));
        assert!(!dget.process_match(&Value::Number(2.0)));
    }

    #[test]
    fn test_min_max() {
        let values = [Value::Number(4.0), Value::text("9"), Value::Number(-2.0)];
        assert_eq!(feed(&mut Minimum::default(), &values), Value::Number(-2.0));
        assert_eq!(feed(&mut Maximum::default(), &values), Value::Number(4.0));
        assert_eq!(feed(&mut Minimum::default(), &[]), Value::Number(0.0));
        assert_eq!(feed(&mut Maximum::default(), &[Value::Boolean(true)]), Value::Number(0.0));
    }

    #[test]
    fn test_counts() {
        let values = [
            Value::Number(1.0),
            Value::text("a"),
            Value::Blank,
            Value::Error(ErrorCode::Na),
            Value::Number(2.0),
        ];
        assert_eq!(feed(&mut CountNumbers::default(), &values), Value::Number(2.0));
        assert_eq!(feed(&mut CountNonBlank::default(), &values), Value::Number(4.0));
    }

    #[test]
    fn test_average_and_product() {
        let values = [Value::Number(2.0), Value::Number(4.0)];
        assert_eq!(feed(&mut Average::default(), &values), Value::Number(3.0));
        assert_eq!(feed(&mut Average::default(), &[]), Value::Error(ErrorCode::Div0));
        assert_eq!(feed(&mut Product::default(), &values), Value::Number(8.0));
        assert_eq!(feed(&mut Product::default(), &[]), Value::Number(0.0));
    }

    #[test]
    fn test_deviation() {
        let values = [
            Value::Number(2.0),
            Value::Number(4.0),
            Value::Number(4.0),
            Value::Number(4.0),
            Value::Number(5.0),
            Value::Number(5.0),
            Value::Number(7.0),
            Value::Number(9.0),
        ];
        assert_eq!(
            feed(&mut Deviation::population_variance(), &values),
            Value::Number(4.0)
        );
        assert_eq!(
            feed(&mut Deviation::population_std_dev(), &values),
            Value::Number(2.0)
        );
        match feed(&mut Deviation::sample_variance(), &values) {
            Value::Number(v) => assert!((v - 32.0 / 7.0).abs() < 1e-12),
            other => panic!("expected a number, got {:?}", other),
        }
        assert_eq!(
            feed(&mut Deviation::sample_std_dev(), &[Value::Number(1.0)]),
            Value::Error(ErrorCode::Div0)
        );
        assert_eq!(
            feed(&mut Deviation::population_variance(), &[]),
            Value::Error(ErrorCode::Div0)
        );
    }
}
