use std::collections::{BTreeMap, HashMap};

use super::Value;

/// Input data for rule evaluation: a mapping from field names to [`Value`]s.
///
/// Nested data is expressed with [`Value::Map`], [`Value::List`] or
/// [`Value::Object`] and reached through lookup paths such as `"user__age"`.
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, Value>,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a top-level field.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Insert a top-level field (mutable reference version).
    pub fn insert(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_owned(), value);
    }

    /// Look up a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Walk a field path through the context.
    ///
    /// The first segment is a top-level key; later segments descend through
    /// maps, objects and list indices. Any segment that cannot be followed
    /// (missing key, `Null` in the middle of the path, a scalar) resolves the
    /// whole path to [`Value::Null`].
    #[must_use]
    pub fn resolve(&self, path: &[String]) -> Value {
        let Some((first, rest)) = path.split_first() else {
            return Value::Null;
        };
        let Some(root) = self.data.get(first) else {
            return Value::Null;
        };
        Self::resolve_recursive(root, rest).unwrap_or_default()
    }

    fn resolve_recursive(value: &Value, segments: &[String]) -> Option<Value> {
        match segments {
            [] => Some(value.clone()),
            [first, rest @ ..] => {
                let next = value.child(first)?;
                Self::resolve_recursive(&next, rest)
            }
        }
    }

    /// Build a context from a JSON object. Non-object documents yield an
    /// empty context.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from_json(json) {
            Value::Map(map) => map.into_iter().collect(),
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, Value>> for Context {
    fn from(data: HashMap<String, Value>) -> Self {
        Self { data }
    }
}

impl From<BTreeMap<String, Value>> for Context {
    fn from(data: BTreeMap<String, Value>) -> Self {
        data.into_iter().collect()
    }
}
