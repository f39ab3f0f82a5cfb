use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::debug;

use super::error::RuleError;
use super::expected::Expected;
use super::operator::Operator;
use super::Value;

/// A comparison function: `(resolved field value, expected operand) -> bool`.
pub type OperatorFn = Arc<dyn Fn(&Value, &Expected) -> Result<bool, RuleError> + Send + Sync>;

/// Source of operator functions used during evaluation.
pub trait Operators {
    /// Resolve an operator tag.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownOperator`] if the tag is not registered.
    fn lookup(&self, tag: &str) -> Result<OperatorFn, RuleError>;
}

/// Maps operator tags to comparison functions.
///
/// [`Registry::new()`] starts with every built-in [`Operator`]. The `func` tag
/// always resolves to the built-in predicate call and cannot be replaced.
#[derive(Clone)]
pub struct Registry {
    operators: HashMap<String, OperatorFn>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        let operators = Operator::ALL
            .into_iter()
            .map(|op| (op.tag().to_owned(), builtin(op)))
            .collect();
        Self { operators }
    }

    /// Resolve an operator tag.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownOperator`] if the tag is neither registered
    /// nor `func`.
    pub fn lookup(&self, tag: &str) -> Result<OperatorFn, RuleError> {
        if tag == Operator::Func.tag() {
            return Ok(builtin(Operator::Func));
        }
        self.operators
            .get(tag)
            .cloned()
            .ok_or_else(|| RuleError::UnknownOperator {
                tag: tag.to_owned(),
            })
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        tag == Operator::Func.tag() || self.operators.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    /// Register (or replace) an operator comparing the field value against a
    /// plain expected value. Conditions whose expected operand is a pattern or
    /// predicate fail with a type error.
    pub fn register(
        &mut self,
        tag: &str,
        f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) {
        let name = tag.to_owned();
        self.register_fallible(tag, move |actual, expected| match expected {
            Expected::Value(v) => Ok(f(actual, v)),
            other => Err(RuleError::type_error(
                &name,
                format!("expected operand must be a value, got {}", other.kind()),
            )),
        });
    }

    /// Register (or replace) an operator with full access to the expected
    /// operand and the ability to fail.
    pub fn register_fallible(
        &mut self,
        tag: &str,
        f: impl Fn(&Value, &Expected) -> Result<bool, RuleError> + Send + Sync + 'static,
    ) {
        if tag == Operator::Func.tag() {
            debug!(tag, "ignoring registration for reserved operator");
            return;
        }
        debug!(tag, "registered operator");
        self.operators.insert(tag.to_owned(), Arc::new(f));
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Operators for Registry {
    fn lookup(&self, tag: &str) -> Result<OperatorFn, RuleError> {
        Registry::lookup(self, tag)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("Registry").field("operators", &tags).finish()
    }
}

fn builtin(op: Operator) -> OperatorFn {
    Arc::new(move |actual: &Value, expected: &Expected| op.apply(actual, expected))
}

static GLOBAL: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::new()));

/// The process-wide registry used by [`Rule::evaluate`](crate::Rule::evaluate)
/// and by lookup keys when deciding whether a trailing segment is an operator.
///
/// Lookups hold the read lock only long enough to clone the function handle,
/// so a custom operator may itself register operators.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalRegistry;

impl GlobalRegistry {
    #[must_use]
    pub fn contains(tag: &str) -> bool {
        GLOBAL.read().contains(tag)
    }

    /// A copy of the current process-wide registry.
    #[must_use]
    pub fn snapshot() -> Registry {
        GLOBAL.read().clone()
    }
}

impl Operators for GlobalRegistry {
    fn lookup(&self, tag: &str) -> Result<OperatorFn, RuleError> {
        GLOBAL.read().lookup(tag)
    }
}

/// Register an operator on the process-wide registry. See [`Registry::register`].
pub fn register(tag: &str, f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) {
    GLOBAL.write().register(tag, f);
}

/// Register a fallible operator on the process-wide registry. See
/// [`Registry::register_fallible`].
pub fn register_fallible(
    tag: &str,
    f: impl Fn(&Value, &Expected) -> Result<bool, RuleError> + Send + Sync + 'static,
) {
    GLOBAL.write().register_fallible(tag, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate;

    #[test]
    fn builtins_are_registered() {
        let reg = Registry::new();
        for op in Operator::ALL {
            assert!(reg.contains(op.tag()), "missing {op}");
        }
        assert_eq!(reg.tags().count(), Operator::ALL.len());
    }

    #[test]
    fn lookup_unknown_fails() {
        let reg = Registry::new();
        let err = reg.lookup("between").err().unwrap();
        assert!(matches!(err, RuleError::UnknownOperator { tag } if tag == "between"));
    }

    #[test]
    fn lookup_dispatches_to_builtin() {
        let reg = Registry::new();
        let gte = reg.lookup("gte").unwrap();
        assert!(gte(&Value::Int(5), &Expected::from(3_i64)).unwrap());
        assert!(!gte(&Value::Int(2), &Expected::from(3_i64)).unwrap());
    }

    #[test]
    fn register_custom_operator() {
        let mut reg = Registry::new();
        reg.register("divisible_by", |actual, expected| {
            matches!((actual, expected), (Value::Int(a), Value::Int(b)) if *b != 0 && a % b == 0)
        });
        let op = reg.lookup("divisible_by").unwrap();
        assert!(op(&Value::Int(9), &Expected::from(3_i64)).unwrap());
        assert!(!op(&Value::Int(10), &Expected::from(3_i64)).unwrap());
    }

    #[test]
    fn register_overwrites_builtin() {
        let mut reg = Registry::new();
        reg.register("eq", |_, _| true);
        let eq = reg.lookup("eq").unwrap();
        assert!(eq(&Value::Int(1), &Expected::from(2_i64)).unwrap());
    }

    #[test]
    fn custom_operator_rejects_predicate_operand() {
        let mut reg = Registry::new();
        reg.register("always", |_, _| true);
        let op = reg.lookup("always").unwrap();
        let err = op(&Value::Null, &Expected::from(predicate(|_| true))).unwrap_err();
        assert!(matches!(err, RuleError::Type { op, .. } if op == "always"));
    }

    #[test]
    fn func_cannot_be_replaced() {
        let mut reg = Registry::new();
        reg.register("func", |_, _| false);
        let func = reg.lookup("func").unwrap();
        assert!(func(&Value::Null, &Expected::from(predicate(|_| true))).unwrap());
    }

    #[test]
    fn registries_are_independent() {
        let mut a = Registry::new();
        let b = a.clone();
        a.register("local_only", |_, _| true);
        assert!(a.contains("local_only"));
        assert!(!b.contains("local_only"));
    }

    #[test]
    fn global_registration_is_visible() {
        register("registry_test_global", |_, _| true);
        assert!(GlobalRegistry::contains("registry_test_global"));
        assert!(GlobalRegistry.lookup("registry_test_global").is_ok());
        assert!(GlobalRegistry::snapshot().contains("registry_test_global"));
    }
}
