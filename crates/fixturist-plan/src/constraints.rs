use std::fmt;

use fixturist_core::Value;
use regex::Regex;

/// Predicate a generated field value must satisfy.
///
/// The `Debug` form names the constraint in error messages.
pub trait FieldConstraint: fmt::Debug {
    fn is_valid(&self, value: &Value) -> bool;
}

/// Inclusive bounds on the character length of a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLength {
    pub min: usize,
    pub max: usize,
}

impl FieldConstraint for StringLength {
    fn is_valid(&self, value: &Value) -> bool {
        let Some(text) = value.as_str() else {
            return false;
        };
        let len = text.chars().count();
        len >= self.min && len <= self.max
    }
}

pub fn constrain_string_length(min: usize, max: usize) -> StringLength {
    StringLength { min, max }
}

/// Inclusive bounds on a numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl FieldConstraint for NumericRange {
    fn is_valid(&self, value: &Value) -> bool {
        value
            .as_f64()
            .is_some_and(|number| number >= self.min && number <= self.max)
    }
}

pub fn constrain_range(min: f64, max: f64) -> NumericRange {
    NumericRange { min, max }
}

/// The whole string value must match a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl FieldConstraint for Pattern {
    fn is_valid(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|text| self.regex.is_match(text))
    }
}

pub fn constrain_pattern(pattern: &str) -> Result<Pattern, regex::Error> {
    let regex = Regex::new(&format!("^(?:{pattern})$"))?;
    Ok(Pattern { regex })
}

/// Named caller-supplied predicate.
pub struct Predicate {
    name: String,
    check: Box<dyn Fn(&Value) -> bool>,
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

impl FieldConstraint for Predicate {
    fn is_valid(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

pub fn constrain_with(
    name: impl Into<String>,
    check: impl Fn(&Value) -> bool + 'static,
) -> Predicate {
    Predicate {
        name: name.into(),
        check: Box::new(check),
    }
}
