//! Route descriptors and the query merge that produces them.

use std::fmt::{self, Display};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::{
    query::{Query, QueryValue},
    update::{QueryUpdate, QueryUpdates},
};

/// Characters escaped when a query value is written into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A pathname together with its query parameters.
///
/// The pathname may be a route pattern such as `/posts/[id]`, in which case the dynamic segments
/// are filled from the query when the concrete path is rendered with [`RouteUrl::as_path`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteUrl {
    /// The route pattern or literal path.
    pub pathname: String,
    /// The query parameters, including the values of any dynamic segments.
    pub query: Query,
}

impl RouteUrl {
    /// Create a new descriptor.
    pub fn new(pathname: impl Into<String>, query: impl Into<Query>) -> Self {
        Self {
            pathname: pathname.into(),
            query: query.into(),
        }
    }

    /// Split a concrete path of the form `/path?query#fragment` into a literal pathname and a
    /// decoded query. The fragment is dropped.
    pub fn parse(path: &str) -> Self {
        let path = path.split_once('#').map_or(path, |(path, _)| path);
        let (pathname, query) = path.split_once('?').unwrap_or((path, ""));

        Self {
            pathname: match pathname {
                "" => "/".to_string(),
                pathname => pathname.to_string(),
            },
            query: Query::parse(query),
        }
    }

    /// Render the concrete path for this descriptor.
    ///
    /// Dynamic segments (`[id]`, `[...slug]` and `[[...slug]]`) take their value from the query
    /// and the key is consumed. Every remaining key is appended as the query string. A dynamic
    /// segment with no value in the query is left as written, except for an optional catch-all
    /// which is dropped.
    ///
    /// ```rust
    /// # use dioxus_route_state::prelude::*;
    /// let url = RouteUrl::new("/foo/[id]/bar", [("id", "123"), ("search", "TEST")]);
    /// assert_eq!(url.as_path(), "/foo/123/bar?search=TEST");
    /// ```
    pub fn as_path(&self) -> String {
        let mut remaining = self.query.clone();

        let segments: Vec<String> = self
            .pathname
            .split('/')
            .filter_map(|segment| match DynamicSegment::parse(segment) {
                None => Some(segment.to_string()),
                Some(dynamic) => dynamic.render(segment, &mut remaining),
            })
            .collect();

        let mut path = segments.join("/");
        if path.is_empty() {
            path.push('/');
        }

        with_query_string(path, &remaining)
    }

    /// Render the pathname verbatim followed by the whole query.
    ///
    /// Unlike [`RouteUrl::as_path`], brackets in the pathname are not treated as dynamic segments.
    ///
    /// ```rust
    /// # use dioxus_route_state::prelude::*;
    /// let url = RouteUrl::new("/tags/[x]", [("x", "1")]);
    /// assert_eq!(url.as_literal_path(), "/tags/[x]?x=1");
    /// ```
    pub fn as_literal_path(&self) -> String {
        let path = match self.pathname.as_str() {
            "" => "/".to_string(),
            pathname => pathname.to_string(),
        };
        with_query_string(path, &self.query)
    }
}

fn with_query_string(mut path: String, query: &Query) -> String {
    if !query.is_empty() {
        path.push('?');
        path.push_str(&query.to_query_string());
    }
    path
}

impl Display for RouteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_path())
    }
}

enum DynamicSegment<'a> {
    Param(&'a str),
    CatchAll(&'a str),
    OptionalCatchAll(&'a str),
}

impl<'a> DynamicSegment<'a> {
    fn parse(segment: &'a str) -> Option<Self> {
        if let Some(name) = segment
            .strip_prefix("[[...")
            .and_then(|rest| rest.strip_suffix("]]"))
        {
            return Some(Self::OptionalCatchAll(name));
        }

        let inner = segment.strip_prefix('[')?.strip_suffix(']')?;
        match inner.strip_prefix("...") {
            Some(name) => Some(Self::CatchAll(name)),
            None => Some(Self::Param(inner)),
        }
    }

    fn render(&self, written: &str, query: &mut Query) -> Option<String> {
        match *self {
            // extra values stay in the query string
            Self::Param(name) => {
                let mut values = query.remove(name).map(QueryValue::into_vec).unwrap_or_default();
                if values.is_empty() {
                    return Some(written.to_string());
                }

                let first = values.remove(0);
                match values.len() {
                    0 => {}
                    1 => {
                        query.insert(name, values.remove(0));
                    }
                    _ => {
                        query.insert(name, values);
                    }
                }
                Some(encode_segment(&first))
            }
            Self::CatchAll(name) => match query.remove(name) {
                Some(value) if !value.values().is_empty() => Some(join_segments(value.values())),
                _ => Some(written.to_string()),
            },
            Self::OptionalCatchAll(name) => query
                .remove(name)
                .map(|value| join_segments(value.values()))
                .filter(|joined| !joined.is_empty()),
        }
    }
}

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

fn join_segments(values: &[String]) -> String {
    values
        .iter()
        .map(|value| encode_segment(value))
        .collect::<Vec<_>>()
        .join("/")
}

/// Merge `updates` into `query`, producing a new descriptor for `pathname`.
///
/// Keys set to [`QueryUpdate::Remove`] are dropped, every other update overwrites or adds its key,
/// and keys that are not mentioned keep their current value. The pathname is copied verbatim and
/// values are passed through without validation. `query` itself is never modified.
///
/// ```rust
/// # use dioxus_route_state::prelude::*;
/// let current = Query::from([("id", "ID")]);
///
/// let url = build_url("/foo/[id]/bar", &current, &QueryUpdates::new().remove("id").set("arg", "ARG"));
/// assert_eq!(url, RouteUrl::new("/foo/[id]/bar", [("arg", "ARG")]));
/// assert_eq!(current.get_str("id"), Some("ID"));
/// ```
pub fn build_url(pathname: &str, query: &Query, updates: &QueryUpdates) -> RouteUrl {
    let mut query = query.clone();

    for (key, update) in updates.iter() {
        match update {
            QueryUpdate::Set(value) => {
                query.insert(key, value.clone());
            }
            QueryUpdate::Remove => {
                query.remove(key);
            }
        }
    }

    RouteUrl {
        pathname: pathname.to_string(),
        query,
    }
}
