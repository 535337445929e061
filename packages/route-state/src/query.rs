//! The query half of a route: a set of unique keys, each holding one or more strings.

use std::collections::{btree_map, BTreeMap};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::QueryError,
    update::{QueryUpdate, QueryUpdates},
};

/// The value stored under a single query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryValue {
    /// `?key=value`
    Single(String),
    /// `?key=a&key=b`
    Multiple(Vec<String>),
}

impl QueryValue {
    /// The first string of this value, if there is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Single(value) => Some(value),
            QueryValue::Multiple(values) => values.first().map(String::as_str),
        }
    }

    /// Every string held by this value, in order.
    pub fn values(&self) -> &[String] {
        match self {
            QueryValue::Single(value) => std::slice::from_ref(value),
            QueryValue::Multiple(values) => values,
        }
    }

    /// Consume the value, returning every string it held.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            QueryValue::Single(value) => vec![value],
            QueryValue::Multiple(values) => values,
        }
    }

    /// Append another string, turning a single value into a list.
    pub fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(first) => {
                let first = std::mem::take(first);
                *self = QueryValue::Multiple(vec![first, value]);
            }
            QueryValue::Multiple(values) => values.push(value),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            QueryValue::Single(value) => Value::String(value.clone()),
            QueryValue::Multiple(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Single(value.clone())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multiple(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

impl PartialEq<str> for QueryValue {
    fn eq(&self, other: &str) -> bool {
        matches!(self, QueryValue::Single(value) if value == other)
    }
}

impl PartialEq<&str> for QueryValue {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// The query parameters of a route.
///
/// Keys are unique and their order is irrelevant: two queries holding the same keys and values
/// are equal no matter how they were built.
///
/// ```rust
/// # use dioxus_route_state::prelude::*;
/// let query = Query::parse("?id=ID&tag=a&tag=b");
///
/// assert_eq!(query.get_str("id"), Some("ID"));
/// assert_eq!(
///     query.get("tag"),
///     Some(&QueryValue::Multiple(vec!["a".to_string(), "b".to_string()]))
/// );
/// assert_eq!(query.to_query_string(), "id=ID&tag=a&tag=b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, QueryValue>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` query string. A leading `?` is ignored.
    ///
    /// A key that appears more than once is collected into a [`QueryValue::Multiple`] in the
    /// order the values appear.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let mut query = Self::new();

        for (key, value) in form_urlencoded::parse(input.as_bytes()) {
            match query.params.entry(key.into_owned()) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(QueryValue::Single(value.into_owned()));
                }
                btree_map::Entry::Occupied(mut entry) => entry.get_mut().push(value.into_owned()),
            }
        }

        query
    }

    /// Encode the query as a form-urlencoded string without the leading `?`.
    ///
    /// Keys are emitted in sorted order and lists are emitted as repeated keys.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            for item in value.values() {
                serializer.append_pair(key, item);
            }
        }
        serializer.finish()
    }

    /// Read the query into a typed value.
    ///
    /// Single values are presented as strings and repeated keys as lists of strings, so the
    /// target type should be made of `String`, `Option<String>` and `Vec<String>` fields.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, QueryError> {
        let map: Map<String, Value> = self
            .params
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();

        serde_json::from_value(Value::Object(map)).map_err(QueryError::Deserialize)
    }

    /// Build a query from a serializable value.
    ///
    /// Fields that serialize to `null` are left out of the query.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, QueryError> {
        let updates = QueryUpdates::from_serialize(value)?;

        Ok(updates
            .into_iter()
            .filter_map(|(key, update)| match update {
                QueryUpdate::Set(value) => Some((key, value)),
                QueryUpdate::Remove => None,
            })
            .collect())
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// The first string stored under `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::as_str)
    }

    /// Returns `true` if the query holds `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Set the value for `key`, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Option<QueryValue> {
        self.params.insert(key.into(), value.into())
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.params.remove(key)
    }

    /// The number of keys in the query.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if the query holds no keys.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over the keys and values in sorted key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
        self.params.iter()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<QueryValue>> Extend<(K, V)> for Query {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.params.extend(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for Query {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Query {
    type Item = (String, QueryValue);
    type IntoIter = btree_map::IntoIter<String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = btree_map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
