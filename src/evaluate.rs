use tracing::{debug, trace};

use crate::types::{Condition, Context, GlobalRegistry, Node, Operators, Rule, RuleError};

/// Evaluate `rule` against `ctx` using the process-wide operator registry.
///
/// # Errors
///
/// Returns the first [`RuleError`] raised while evaluating a condition.
pub fn evaluate(rule: &Rule, ctx: &Context) -> Result<bool, RuleError> {
    evaluate_node(rule, &GlobalRegistry, ctx)
}

/// Reduce a rule tree to a single boolean. AND and OR stop at the first
/// child that decides the result; later children are never evaluated.
pub(crate) fn evaluate_node<O: Operators + ?Sized>(
    rule: &Rule,
    operators: &O,
    ctx: &Context,
) -> Result<bool, RuleError> {
    match rule.node() {
        Node::Leaf(conditions) => {
            for condition in conditions {
                if !eval_condition(condition, operators, ctx)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Node::And(children) => {
            for child in children {
                if !evaluate_node(child, operators, ctx)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Node::Or(children) => {
            for child in children {
                if evaluate_node(child, operators, ctx)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Node::Not(inner) => evaluate_node(inner, operators, ctx).map(|r| !r),
    }
}

fn eval_condition<O: Operators + ?Sized>(
    condition: &Condition,
    operators: &O,
    ctx: &Context,
) -> Result<bool, RuleError> {
    let op = operators.lookup(condition.operator()).inspect_err(|_| {
        debug!(field = %condition.field(), operator = condition.operator(), "unknown operator");
    })?;
    let actual = ctx.resolve(condition.path());
    let result = op(&actual, condition.expected())?;
    trace!(
        field = %condition.field(),
        operator = condition.operator(),
        result,
        "evaluated condition"
    );
    Ok(result)
}
