use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use super::condition::Condition;
use super::context::Context;
use super::error::RuleError;
use super::expected::Expected;
use super::registry::{GlobalRegistry, Operators};

const MAX_ID_LEN: usize = 64;

/// An immutable boolean expression over [`Condition`]s.
///
/// Rules are built once and evaluated any number of times. Combining rules
/// with `&`, `|` and `!` (or [`and`](Rule::and), [`or`](Rule::or),
/// [`negate`](Rule::negate)) always produces a new rule; operands are never
/// modified, so a sub-rule can be cloned into several parents.
///
/// # Example
///
/// ```
/// use predicate_rules::{rule, Context};
///
/// let adult_john = rule!(name = "John", age__gte = 21);
/// let either = rule!(foo = "bar") | rule!(foo = "baz");
///
/// let ctx = Context::new().set("name", "John").set("age", 22_i64).set("foo", "baz");
/// assert!(adult_john.evaluate(&ctx).unwrap());
/// assert!((adult_john & either).evaluate(&ctx).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rule {
    id: Option<String>,
    node: Node,
}

/// The shape of a [`Rule`].
#[derive(Debug, Clone)]
pub enum Node {
    /// Conditions joined by AND. An empty leaf is always true.
    Leaf(Vec<Condition>),
    /// True when every child is true; empty is true.
    And(Vec<Rule>),
    /// True when any child is true; empty is false.
    Or(Vec<Rule>),
    Not(Box<Rule>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Leaf(Vec::new())
    }
}

impl Rule {
    /// An empty rule. Evaluates to `true` for any input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// A rule with a single condition built from a lookup key.
    pub fn when(key: &str, expected: impl Into<Expected>) -> Self {
        Self::leaf(vec![Condition::from_key(key, expected)])
    }

    #[must_use]
    pub fn leaf(conditions: Vec<Condition>) -> Self {
        Self::from_node(Node::Leaf(conditions))
    }

    /// AND of all rules, in order.
    pub fn all(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self::from_node(Node::And(rules.into_iter().collect()))
    }

    /// OR of all rules, in order.
    pub fn any(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self::from_node(Node::Or(rules.into_iter().collect()))
    }

    fn from_node(node: Node) -> Self {
        Self { id: None, node }
    }

    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Attach an identifier. Ids are 1 to 64 characters of ASCII letters,
    /// digits, `_` or `-`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidId`] if the id is malformed.
    pub fn with_id(mut self, id: &str) -> Result<Self, RuleError> {
        validate_id(id)?;
        self.id = Some(id.to_owned());
        Ok(self)
    }

    /// `self AND other`. Anonymous AND operands are spliced into one node
    /// instead of nesting.
    #[must_use]
    pub fn and(self, other: Rule) -> Rule {
        let mut children = self.into_children(|n| matches!(n, Node::And(_)));
        children.extend(other.into_children(|n| matches!(n, Node::And(_))));
        Self::from_node(Node::And(children))
    }

    /// `self OR other`. Anonymous OR operands are spliced into one node
    /// instead of nesting.
    #[must_use]
    pub fn or(self, other: Rule) -> Rule {
        let mut children = self.into_children(|n| matches!(n, Node::Or(_)));
        children.extend(other.into_children(|n| matches!(n, Node::Or(_))));
        Self::from_node(Node::Or(children))
    }

    #[must_use]
    pub fn negate(self) -> Rule {
        Self::from_node(Node::Not(Box::new(self)))
    }

    fn into_children(self, same_kind: impl Fn(&Node) -> bool) -> Vec<Rule> {
        if self.id.is_none() && same_kind(&self.node) {
            match self.node {
                Node::And(children) | Node::Or(children) => return children,
                Node::Leaf(_) | Node::Not(_) => {}
            }
        }
        vec![self]
    }

    /// Evaluate against `ctx` using the process-wide operator registry.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleError`] raised by a condition.
    pub fn evaluate(&self, ctx: &Context) -> Result<bool, RuleError> {
        crate::evaluate::evaluate_node(self, &GlobalRegistry, ctx)
    }

    /// Evaluate against `ctx` resolving operators from `operators`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleError`] raised by a condition.
    pub fn evaluate_with<O: Operators + ?Sized>(
        &self,
        operators: &O,
        ctx: &Context,
    ) -> Result<bool, RuleError> {
        crate::evaluate::evaluate_node(self, operators, ctx)
    }
}

fn validate_id(id: &str) -> Result<(), RuleError> {
    let reason = if id.is_empty() {
        "must not be empty"
    } else if id.chars().count() > MAX_ID_LEN {
        "must be at most 64 characters"
    } else if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        "may only contain ASCII letters, digits, '_' and '-'"
    } else {
        return Ok(());
    };
    Err(RuleError::InvalidId {
        id: id.to_owned(),
        reason: reason.to_owned(),
    })
}

impl BitAnd for Rule {
    type Output = Rule;

    fn bitand(self, rhs: Rule) -> Rule {
        self.and(rhs)
    }
}

impl BitAnd for &Rule {
    type Output = Rule;

    fn bitand(self, rhs: &Rule) -> Rule {
        self.clone().and(rhs.clone())
    }
}

impl BitOr for Rule {
    type Output = Rule;

    fn bitor(self, rhs: Rule) -> Rule {
        self.or(rhs)
    }
}

impl BitOr for &Rule {
    type Output = Rule;

    fn bitor(self, rhs: &Rule) -> Rule {
        self.clone().or(rhs.clone())
    }
}

impl Not for Rule {
    type Output = Rule;

    fn not(self) -> Rule {
        self.negate()
    }
}

impl Not for &Rule {
    type Output = Rule;

    fn not(self) -> Rule {
        self.clone().negate()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.id {
            write!(f, "{id}: ")?;
        }
        match &self.node {
            Node::Leaf(conditions) if conditions.is_empty() => write!(f, "TRUE"),
            Node::Leaf(conditions) => write_joined(f, conditions, " AND "),
            Node::And(children) if children.is_empty() => write!(f, "TRUE"),
            Node::And(children) => write_joined(f, children, " AND "),
            Node::Or(children) if children.is_empty() => write!(f, "FALSE"),
            Node::Or(children) => write_joined(f, children, " OR "),
            Node::Not(inner) => write!(f, "(NOT {inner})"),
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

/// Collects child rules and lookup-key conditions, then combines them with AND.
///
/// ```
/// use predicate_rules::{rule, Rule};
///
/// let either = rule!(credit_rating__gte = 50, flood_risk__lt = 10) | rule!(revenue__gt = 1_000_000);
/// let approved = Rule::builder().rule(either).with("region", "eu").build();
/// assert_eq!(
///     approved.to_string(),
///     r#"(((credit_rating gte 50 AND flood_risk lt 10) OR (revenue gt 1000000)) AND (region eq "eu"))"#
/// );
/// ```
#[derive(Debug, Default)]
pub struct RuleBuilder {
    children: Vec<Rule>,
    conditions: Vec<Condition>,
}

impl RuleBuilder {
    #[must_use]
    pub fn rule(mut self, child: Rule) -> Self {
        self.children.push(child);
        self
    }

    /// Add a condition from a lookup key like `"age__gte"` or `"name"`.
    #[must_use]
    pub fn with(mut self, key: &str, expected: impl Into<Expected>) -> Self {
        self.conditions.push(Condition::from_key(key, expected));
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Combine everything collected so far.
    ///
    /// A single child with no conditions is returned unchanged. Conditions
    /// form one leaf, placed after the children. Nothing at all gives an
    /// empty rule that is always true.
    #[must_use]
    pub fn build(mut self) -> Rule {
        if self.conditions.is_empty() && self.children.len() == 1 {
            if let Some(only) = self.children.pop() {
                return only;
            }
        }
        if self.children.is_empty() {
            return Rule::leaf(self.conditions);
        }
        if !self.conditions.is_empty() {
            self.children.push(Rule::leaf(self.conditions));
        }
        Rule::all(self.children)
    }
}
