//! Errors produced when moving between a [`Query`](crate::query::Query) and a typed value.

/// An error converting between query parameters and a user type.
///
/// Navigation itself never produces a [`QueryError`]: a navigation that does not complete is
/// reported through the `false` outcome of its [`Navigation`](crate::router::Navigation).
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The query could not be read into the requested type.
    #[error("failed to read the query into the requested type: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// The value could not be serialized.
    #[error("failed to serialize the value into query parameters: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The value did not serialize to a map of parameters.
    #[error("query parameters must serialize to a map, found {found}")]
    NotAMap {
        /// The kind of value that was found instead.
        found: &'static str,
    },

    /// The value for a key was a nested map, or a list containing one.
    #[error("the value for `{key}` cannot be stored in a query string")]
    UnsupportedValue {
        /// The offending key.
        key: String,
    },
}
