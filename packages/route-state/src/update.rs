//! Partial changes to a [`Query`].

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::QueryError,
    query::{Query, QueryValue},
};

/// A change to a single query key.
///
/// [`QueryUpdate::Remove`] is an explicit instruction to drop the key. A key that should keep its
/// current value is simply left out of the [`QueryUpdates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryUpdate {
    /// Set the key, overwriting any existing value.
    Set(QueryValue),
    /// Remove the key from the query.
    Remove,
}

impl From<QueryValue> for QueryUpdate {
    fn from(value: QueryValue) -> Self {
        QueryUpdate::Set(value)
    }
}

macro_rules! impl_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryUpdate {
                fn from(value: $ty) -> Self {
                    QueryUpdate::Set(value.into())
                }
            }

            impl From<Option<$ty>> for QueryUpdate {
                fn from(value: Option<$ty>) -> Self {
                    value.map_or(QueryUpdate::Remove, |value| QueryUpdate::Set(value.into()))
                }
            }
        )*
    };
}

impl_from_value!(&str, String, &String, Vec<String>, Vec<&str>);

impl From<Option<QueryValue>> for QueryUpdate {
    fn from(value: Option<QueryValue>) -> Self {
        value.map_or(QueryUpdate::Remove, QueryUpdate::Set)
    }
}

/// An ordered set of [`QueryUpdate`]s. When a key appears twice the later update wins.
///
/// ```rust
/// # use dioxus_route_state::prelude::*;
/// let updates = QueryUpdates::new().set("page", "2").remove("cursor");
/// assert_eq!(updates.len(), 2);
///
/// let updates = QueryUpdates::from([("id", None), ("arg", Some("ARG"))]);
/// assert_eq!(updates.get("id"), Some(&QueryUpdate::Remove));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryUpdates {
    entries: Vec<(String, QueryUpdate)>,
}

impl QueryUpdates {
    /// An empty set of updates. Applying it leaves the query unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    pub fn set(self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.with(key, QueryUpdate::Set(value.into()))
    }

    /// Remove `key`.
    pub fn remove(self, key: impl Into<String>) -> Self {
        self.with(key, QueryUpdate::Remove)
    }

    /// Apply an arbitrary update to `key`.
    pub fn with(mut self, key: impl Into<String>, update: impl Into<QueryUpdate>) -> Self {
        self.insert(key, update);
        self
    }

    /// Apply an arbitrary update to `key` in place.
    pub fn insert(&mut self, key: impl Into<String>, update: impl Into<QueryUpdate>) {
        let key = key.into();
        let update = update.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = update,
            None => self.entries.push((key, update)),
        }
    }

    /// The update queued for `key`.
    pub fn get(&self, key: &str) -> Option<&QueryUpdate> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, update)| update)
    }

    /// The number of keys touched by these updates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key is touched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the updates in the order they were first queued.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryUpdate)> {
        self.entries
            .iter()
            .map(|(key, update)| (key.as_str(), update))
    }

    /// Build updates from a serializable partial query.
    ///
    /// Fields that are not serialized are left untouched, fields that serialize to `null` are
    /// removed, scalars are set as single values and sequences as lists.
    ///
    /// ```rust
    /// # use dioxus_route_state::prelude::*;
    /// #[derive(serde::Serialize)]
    /// struct Filters {
    ///     page: u32,
    ///     cursor: Option<String>,
    ///     #[serde(skip_serializing_if = "Option::is_none")]
    ///     sort: Option<String>,
    /// }
    ///
    /// let updates = QueryUpdates::from_serialize(&Filters { page: 2, cursor: None, sort: None }).unwrap();
    /// assert_eq!(updates.get("page"), Some(&QueryUpdate::Set("2".into())));
    /// assert_eq!(updates.get("cursor"), Some(&QueryUpdate::Remove));
    /// assert_eq!(updates.get("sort"), None);
    /// ```
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, QueryError> {
        let map = match serde_json::to_value(value).map_err(QueryError::Serialize)? {
            Value::Object(map) => map,
            other => {
                return Err(QueryError::NotAMap {
                    found: json_kind(&other),
                })
            }
        };

        let mut updates = Self::new();
        for (key, value) in map {
            let update = match value {
                Value::Null => QueryUpdate::Remove,
                Value::Array(items) => {
                    let items: Option<Vec<String>> = items.into_iter().map(scalar).collect();
                    match items {
                        Some(items) => QueryUpdate::Set(QueryValue::Multiple(items)),
                        None => return Err(QueryError::UnsupportedValue { key }),
                    }
                }
                Value::Object(_) => return Err(QueryError::UnsupportedValue { key }),
                scalar_value => match scalar(scalar_value) {
                    Some(value) => QueryUpdate::Set(QueryValue::Single(value)),
                    None => return Err(QueryError::UnsupportedValue { key }),
                },
            };
            updates.insert(key, update);
        }

        Ok(updates)
    }
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a map",
    }
}

impl<K: Into<String>, U: Into<QueryUpdate>> FromIterator<(K, U)> for QueryUpdates {
    fn from_iter<I: IntoIterator<Item = (K, U)>>(iter: I) -> Self {
        let mut updates = Self::new();
        for (key, update) in iter {
            updates.insert(key, update);
        }
        updates
    }
}

impl<K: Into<String>, U: Into<QueryUpdate>, const N: usize> From<[(K, U); N]> for QueryUpdates {
    fn from(pairs: [(K, U); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Query> for QueryUpdates {
    fn from(query: Query) -> Self {
        query.into_iter().collect()
    }
}

impl IntoIterator for QueryUpdates {
    type Item = (String, QueryUpdate);
    type IntoIter = std::vec::IntoIter<(String, QueryUpdate)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
