use std::fmt;

use tracing::debug;

use super::expected::Expected;
use super::operator::{compile_pattern, Operator};
use super::Value;
use crate::parse::{self, Lookup, SEPARATOR};

/// A single `field / operator / expected` comparison.
///
/// The operator is kept as a tag and resolved against a registry only when
/// the condition is evaluated, so an unknown tag fails at evaluation time.
#[derive(Debug, Clone)]
pub struct Condition {
    path: Vec<String>,
    operator: String,
    expected: Expected,
}

impl Condition {
    /// Build a condition with an explicit operator tag. `path` may contain
    /// `__`-separated segments; none of them is treated as an operator.
    pub fn new(path: &str, operator: &str, expected: impl Into<Expected>) -> Self {
        Self {
            path: parse::split_path(path),
            operator: operator.to_owned(),
            expected: prepare(operator, expected.into()),
        }
    }

    /// Build a condition from a lookup key such as `"age__gte"`.
    pub fn from_key(key: &str, expected: impl Into<Expected>) -> Self {
        let Lookup { path, operator } = Lookup::parse(key);
        let expected = prepare(&operator, expected.into());
        Self {
            path,
            operator,
            expected,
        }
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The field path joined back into its key form.
    #[must_use]
    pub fn field(&self) -> String {
        self.path.join(SEPARATOR)
    }

    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    #[must_use]
    pub fn expected(&self) -> &Expected {
        &self.expected
    }
}

/// Compile a string `regex` operand once, up front. A pattern that does not
/// compile stays a string and reports its error when evaluated.
fn prepare(operator: &str, expected: Expected) -> Expected {
    match expected {
        Expected::Value(Value::String(pattern)) if operator == Operator::Regex.tag() => {
            match compile_pattern(&pattern) {
                Ok(re) => Expected::Pattern(re),
                Err(err) => {
                    debug!(%err, "keeping uncompiled regex operand");
                    Expected::Value(Value::String(pattern))
                }
            }
        }
        other => other,
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field(), self.operator, self.expected)
    }
}
