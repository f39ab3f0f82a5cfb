use thiserror::Error;

/// Boxed error returned by fallible user predicates and custom operators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while building or evaluating rules.
///
/// Evaluation stops at the first failing condition; there is no partial result.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unknown operator '{tag}'")]
    UnknownOperator { tag: String },

    #[error("type error in '{op}': {message}")]
    Type { op: String, message: String },

    #[error("invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("{0}")]
    Predicate(#[source] BoxError),

    #[error("invalid rule id '{id}': {reason}")]
    InvalidId { id: String, reason: String },
}

impl RuleError {
    pub(crate) fn type_error(op: &str, message: impl Into<String>) -> Self {
        RuleError::Type {
            op: op.to_owned(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_operator_message() {
        let err = RuleError::UnknownOperator {
            tag: "between".into(),
        };
        assert_eq!(err.to_string(), "unknown operator 'between'");
    }

    #[test]
    fn type_error_message() {
        let err = RuleError::type_error("gt", "cannot order null against int");
        assert_eq!(
            err.to_string(),
            "type error in 'gt': cannot order null against int"
        );
    }

    #[test]
    fn invalid_pattern_message() {
        let err = RuleError::InvalidPattern {
            pattern: "(".into(),
            message: "unclosed group".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid regex pattern '(': unclosed group"
        );
    }

    #[test]
    fn predicate_error_keeps_message() {
        let inner: BoxError = "lookup service unavailable".into();
        let err = RuleError::Predicate(inner);
        assert_eq!(err.to_string(), "lookup service unavailable");
    }

    #[test]
    fn invalid_id_message() {
        let err = RuleError::InvalidId {
            id: String::new(),
            reason: "must not be empty".into(),
        };
        assert_eq!(err.to_string(), "invalid rule id '': must not be empty");
    }
}
