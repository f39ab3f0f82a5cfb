use std::cmp::Ordering;
use std::fmt;

use regex::Regex;

use super::error::RuleError;
use super::expected::Expected;
use super::Value;

/// Built-in comparison operators, keyed by their lookup tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Exact,
    IExact,
    Regex,
    Func,
    Is,
}

impl Operator {
    pub const ALL: [Operator; 19] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Nin,
        Operator::Contains,
        Operator::IContains,
        Operator::StartsWith,
        Operator::IStartsWith,
        Operator::EndsWith,
        Operator::IEndsWith,
        Operator::Exact,
        Operator::IExact,
        Operator::Regex,
        Operator::Func,
        Operator::Is,
    ];

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::Contains => "contains",
            Operator::IContains => "icontains",
            Operator::StartsWith => "startswith",
            Operator::IStartsWith => "istartswith",
            Operator::EndsWith => "endswith",
            Operator::IEndsWith => "iendswith",
            Operator::Exact => "exact",
            Operator::IExact => "iexact",
            Operator::Regex => "regex",
            Operator::Func => "func",
            Operator::Is => "is",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.tag() == tag)
    }

    /// Apply this operator to a resolved field value and the condition's
    /// expected operand.
    ///
    /// A `Null` field value (absent or unresolved) never satisfies an
    /// operator that needs a shape from it: ordering, containment, the
    /// string operators and `regex` return `false` instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Type`] when the operands have the wrong shape for
    /// the operator, [`RuleError::InvalidPattern`] for a bad `regex` pattern and
    /// [`RuleError::Predicate`] when a `func` predicate fails.
    pub fn apply(self, actual: &Value, expected: &Expected) -> Result<bool, RuleError> {
        match (self, expected) {
            (Operator::Func, Expected::Func(p)) => p.call(actual),
            (Operator::Regex, Expected::Pattern(re)) => self.is_match(actual, re),
            (_, Expected::Value(v)) => self.apply_value(actual, v),
            (_, other) => Err(self.type_error(format!(
                "expected operand must be {}, got {}",
                self.operand(),
                other.kind()
            ))),
        }
    }

    fn operand(self) -> &'static str {
        match self {
            Operator::Func => "a callable",
            Operator::Regex => "a pattern",
            _ => "a value",
        }
    }

    /// Operators that read a shape (order, length, characters) from the
    /// field value. These are false for a `Null` field.
    fn needs_shape(self) -> bool {
        matches!(
            self,
            Operator::Gt
                | Operator::Gte
                | Operator::Lt
                | Operator::Lte
                | Operator::Contains
                | Operator::IContains
                | Operator::StartsWith
                | Operator::IStartsWith
                | Operator::EndsWith
                | Operator::IEndsWith
                | Operator::IExact
                | Operator::Regex
        )
    }

    fn apply_value(self, actual: &Value, expected: &Value) -> Result<bool, RuleError> {
        if actual.is_null() && self.needs_shape() {
            return Ok(false);
        }
        match self {
            Operator::Eq | Operator::Exact => Ok(actual.loose_eq(expected)),
            Operator::Ne => Ok(!actual.loose_eq(expected)),
            Operator::Is => Ok(actual.is_identical(expected)),
            Operator::Gt => self.order(actual, expected, Ordering::is_gt),
            Operator::Gte => self.order(actual, expected, Ordering::is_ge),
            Operator::Lt => self.order(actual, expected, Ordering::is_lt),
            Operator::Lte => self.order(actual, expected, Ordering::is_le),
            Operator::In => self.member(actual, expected),
            Operator::Nin => self.member(actual, expected).map(|r| !r),
            Operator::Contains => self.member(expected, actual),
            Operator::IContains => self.icontains(actual, expected),
            Operator::StartsWith => {
                let (a, e) = self.strings(actual, expected)?;
                Ok(a.starts_with(e))
            }
            Operator::EndsWith => {
                let (a, e) = self.strings(actual, expected)?;
                Ok(a.ends_with(e))
            }
            Operator::IStartsWith => {
                let (a, e) = self.strings(actual, expected)?;
                Ok(a.to_lowercase().starts_with(&e.to_lowercase()))
            }
            Operator::IEndsWith => {
                let (a, e) = self.strings(actual, expected)?;
                Ok(a.to_lowercase().ends_with(&e.to_lowercase()))
            }
            Operator::IExact => {
                let (a, e) = self.strings(actual, expected)?;
                Ok(a.to_lowercase() == e.to_lowercase())
            }
            Operator::Regex => {
                let re = self.compile(expected)?;
                self.is_match(actual, &re)
            }
            Operator::Func => Err(self.type_error(format!(
                "expected operand must be a callable, got {}",
                expected.type_name()
            ))),
        }
    }

    fn type_error(self, message: String) -> RuleError {
        RuleError::type_error(self.tag(), message)
    }

    /// Numbers with no order between them (NaN) compare false; other
    /// unorderable pairs are a type error.
    fn order(
        self,
        actual: &Value,
        expected: &Value,
        accept: fn(Ordering) -> bool,
    ) -> Result<bool, RuleError> {
        match actual.partial_cmp_value(expected) {
            Some(ordering) => Ok(accept(ordering)),
            None if actual.is_number() && expected.is_number() => Ok(false),
            None => Err(self.type_error(format!(
                "cannot order {} against {}",
                actual.type_name(),
                expected.type_name()
            ))),
        }
    }

    fn strings<'a>(self, actual: &'a Value, expected: &'a Value) -> Result<(&'a str, &'a str), RuleError> {
        match (actual, expected) {
            (Value::String(a), Value::String(e)) => Ok((a, e)),
            _ => Err(self.type_error(format!(
                "needs two strings, got {} and {}",
                actual.type_name(),
                expected.type_name()
            ))),
        }
    }

    /// Whether `needle` is a member of `haystack`: loose list membership,
    /// substring for strings, key membership for maps. A `Null` needle is
    /// never a substring or a key.
    fn member(self, needle: &Value, haystack: &Value) -> Result<bool, RuleError> {
        match haystack {
            Value::List(items) => Ok(items.iter().any(|item| item.loose_eq(needle))),
            Value::String(s) => match needle {
                Value::String(sub) => Ok(s.contains(sub.as_str())),
                Value::Null => Ok(false),
                other => Err(self.type_error(format!(
                    "string membership needs a string, got {}",
                    other.type_name()
                ))),
            },
            Value::Map(map) => match needle {
                Value::String(key) => Ok(map.contains_key(key)),
                Value::Null => Ok(false),
                other => Err(self.type_error(format!(
                    "map keys are strings, got {}",
                    other.type_name()
                ))),
            },
            other => Err(self.type_error(format!("{} is not a collection", other.type_name()))),
        }
    }

    fn icontains(self, actual: &Value, expected: &Value) -> Result<bool, RuleError> {
        let Value::String(needle) = expected else {
            return Err(self.type_error(format!(
                "needs a string operand, got {}",
                expected.type_name()
            )));
        };
        let needle = needle.to_lowercase();
        match actual {
            Value::String(s) => Ok(s.to_lowercase().contains(&needle)),
            Value::List(items) => Ok(items
                .iter()
                .any(|item| item.as_str().is_some_and(|s| s.to_lowercase() == needle))),
            other => Err(self.type_error(format!(
                "needs a string or list of strings, got {}",
                other.type_name()
            ))),
        }
    }

    fn compile(self, pattern: &Value) -> Result<Regex, RuleError> {
        let Value::String(pattern) = pattern else {
            return Err(self.type_error(format!(
                "expected operand must be a pattern, got {}",
                pattern.type_name()
            )));
        };
        compile_pattern(pattern)
    }

    fn is_match(self, actual: &Value, re: &Regex) -> Result<bool, RuleError> {
        match actual {
            Value::String(haystack) => Ok(re.is_match(haystack)),
            Value::Null => Ok(false),
            other => Err(self.type_error(format!(
                "can only match strings, got {}",
                other.type_name()
            ))),
        }
    }
}

/// Compile a `regex` operand.
///
/// # Errors
///
/// Returns [`RuleError::InvalidPattern`] if `pattern` is not a valid regex.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|e| RuleError::InvalidPattern {
        pattern: pattern.to_owned(),
        message: e.to_string(),
    })
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
