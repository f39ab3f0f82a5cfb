mod grammar;

use winnow::Parser;

use crate::types::{GlobalRegistry, Operator};

pub(crate) use grammar::SEPARATOR;

/// A lookup key such as `"user__age__gte"` split into its field path and
/// operator tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lookup {
    pub(crate) path: Vec<String>,
    pub(crate) operator: String,
}

impl Lookup {
    /// Split a lookup key.
    ///
    /// The final segment is the operator when it names a built-in tag or a tag
    /// registered on the process-wide registry; otherwise the operator is `eq`
    /// and every segment is part of the path. A key made of a single segment is
    /// always a field name.
    pub(crate) fn parse(key: &str) -> Self {
        let segments = grammar::lookup_key
            .parse(key)
            .unwrap_or_else(|_| vec![key]);
        match segments.split_last() {
            Some((last, path)) if !path.is_empty() && is_operator(last) => Self {
                path: path.iter().map(|s| (*s).to_owned()).collect(),
                operator: (*last).to_owned(),
            },
            _ => Self {
                path: segments.iter().map(|s| (*s).to_owned()).collect(),
                operator: Operator::Eq.tag().to_owned(),
            },
        }
    }
}

/// Split a field path without looking for an operator.
pub(crate) fn split_path(path: &str) -> Vec<String> {
    grammar::lookup_key
        .parse(path)
        .map(|segments| segments.into_iter().map(str::to_owned).collect())
        .unwrap_or_else(|_| vec![path.to_owned()])
}

fn is_operator(tag: &str) -> bool {
    Operator::from_tag(tag).is_some() || GlobalRegistry::contains(tag)
}
