use std::rc::Rc;

use crate::{
    query::QueryValue,
    route_state::{route_state, RouteStateSetter},
};

use super::use_current_route;

/// A single query key treated as state that lives in the URL.
///
/// Returns the key's current value and a setter. The setter stays equal across renders until the
/// route changes.
///
/// ```rust
/// # use dioxus_core::{Element, VNode};
/// # use dioxus_route_state::prelude::*;
/// fn Search() -> Element {
///     let (search, set_search) = use_route_state("search");
///     let search = search.as_ref().and_then(QueryValue::as_str).unwrap_or_default();
///
///     // when the input changes:
///     let _on_input = move |value: String| {
///         if value.is_empty() {
///             set_search.remove()
///         } else {
///             set_search.replace(value)
///         }
///     };
///
///     VNode::empty()
/// }
/// ```
///
/// # Panics
///
/// Panics if no ancestor provided a router with
/// [`use_query_router_provider`](super::use_query_router_provider).
pub fn use_route_state(key: impl Into<Rc<str>>) -> (Option<QueryValue>, RouteStateSetter) {
    let (_, route) = use_current_route();
    route_state(&route, key)
}
