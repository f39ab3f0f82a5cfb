use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::error::{BoxError, RuleError};
use super::Value;

type PredicateFn = dyn Fn(&Value) -> Result<bool, BoxError> + Send + Sync;

/// A one-argument test applied by the `func` operator.
///
/// The callable may have side effects; evaluation does not control or
/// repeat them.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn new(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(move |v: &Value| -> Result<bool, BoxError> { Ok(f(v)) }))
    }

    /// A predicate whose errors abort evaluation as [`RuleError::Predicate`].
    pub fn fallible(f: impl Fn(&Value) -> Result<bool, BoxError> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, actual: &Value) -> Result<bool, RuleError> {
        (self.0)(actual).map_err(RuleError::Predicate)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// The right-hand side of a condition.
///
/// Most operators take a plain [`Value`]. `regex` also accepts a compiled
/// [`Regex`] and `func` requires a [`Predicate`].
#[derive(Debug, Clone)]
pub enum Expected {
    Value(Value),
    Pattern(Regex),
    Func(Predicate),
}

impl Expected {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Expected::Value(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Expected::Value(v) => v.type_name(),
            Expected::Pattern(_) => "pattern",
            Expected::Func(_) => "func",
        }
    }
}

impl<T: Into<Value>> From<T> for Expected {
    fn from(v: T) -> Self {
        Expected::Value(v.into())
    }
}

impl From<Regex> for Expected {
    fn from(re: Regex) -> Self {
        Expected::Pattern(re)
    }
}

impl From<Predicate> for Expected {
    fn from(p: Predicate) -> Self {
        Expected::Func(p)
    }
}

/// Wrap a closure as the expected operand of a `func` condition.
///
/// ```
/// use predicate_rules::{predicate, rule, Context};
///
/// let palindrome = rule!(word__func = predicate(|v| {
///     v.as_str().is_some_and(|s| s.chars().eq(s.chars().rev()))
/// }));
/// assert!(palindrome.evaluate(&Context::new().set("word", "radar")).unwrap());
/// ```
pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Predicate {
    Predicate::new(f)
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Value(v) => write!(f, "{v}"),
            Expected::Pattern(re) => write!(f, "/{}/", re.as_str()),
            Expected::Func(_) => write!(f, "<func>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_convert() {
        assert!(matches!(Expected::from(3_i64), Expected::Value(Value::Int(3))));
        assert!(matches!(Expected::from("x"), Expected::Value(Value::String(_))));
    }

    #[test]
    fn regex_converts_to_pattern() {
        let re = Regex::new(r"\d+").unwrap();
        let expected = Expected::from(re);
        assert_eq!(expected.kind(), "pattern");
        assert_eq!(expected.to_string(), r"/\d+/");
    }

    #[test]
    fn predicate_calls_closure() {
        let p = predicate(|v| v.as_str() == Some("yes"));
        assert!(p.call(&Value::from("yes")).unwrap());
        assert!(!p.call(&Value::from("no")).unwrap());
    }

    #[test]
    fn fallible_predicate_error_surfaces() {
        let p = Predicate::fallible(|_| Err("backend down".into()));
        let err = p.call(&Value::Null).unwrap_err();
        assert!(matches!(err, RuleError::Predicate(_)));
        assert_eq!(err.to_string(), "backend down");
    }

    #[test]
    fn display_func() {
        assert_eq!(Expected::from(predicate(|_| true)).to_string(), "<func>");
    }
}
