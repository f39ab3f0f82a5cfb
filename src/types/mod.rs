mod condition;
mod context;
mod error;
mod expected;
mod operator;
mod registry;
mod rule;
mod value;

pub use condition::Condition;
pub use context::Context;
pub use error::{BoxError, RuleError};
pub use expected::{Expected, Predicate, predicate};
pub use operator::Operator;
pub use registry::{GlobalRegistry, OperatorFn, Operators, Registry, register, register_fallible};
pub use rule::{Node, Rule, RuleBuilder};
pub use value::{Record, Value};
