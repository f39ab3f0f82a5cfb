//! Composable boolean predicate trees.
//!
//! A [`Rule`] combines field/operator/value [`Condition`]s with AND, OR and
//! NOT, and evaluates them against a [`Context`] of field values. Conditions
//! are written as lookup keys: `age__gte = 21` compares field `age` with the
//! `gte` operator, `user__name = "ann"` walks into the nested `user` value.

mod evaluate;
mod parse;
mod types;

pub use evaluate::evaluate;
pub use types::{
    BoxError, Condition, Context, Expected, GlobalRegistry, Node, Operator, OperatorFn, Operators,
    Predicate, Record, Registry, Rule, RuleBuilder, RuleError, Value, predicate, register,
    register_fallible,
};

/// Build a [`Rule`] from lookup-key conditions and child rules.
///
/// - `rule!()` is the empty rule (always true).
/// - `rule!(name = "John", age__gte = 21)` is one leaf of ANDed conditions.
/// - `rule!(a | b)` returns the single child unchanged.
/// - `rule!(a, b; status = "active")` ANDs the children with the leaf.
#[macro_export]
macro_rules! rule {
    () => {
        $crate::Rule::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {
        $crate::Rule::builder()
            $(.with(stringify!($key), $value))+
            .build()
    };
    ($($child:expr),+ $(,)?) => {
        $crate::Rule::builder()
            $(.rule($child))+
            .build()
    };
    ($($child:expr),+ ; $($key:ident = $value:expr),+ $(,)?) => {
        $crate::Rule::builder()
            $(.rule($child))+
            $(.with(stringify!($key), $value))+
            .build()
    };
}
