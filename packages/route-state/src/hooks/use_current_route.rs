use std::rc::Rc;

use dioxus_core::{schedule_update, use_hook};

use crate::{
    current_route::{CurrentRoute, RouteCache},
    query::Query,
};

use super::use_query_router;

/// The current query together with an accessor that can derive new URLs from it or navigate.
///
/// The component re-renders whenever the route changes. The accessor is rebuilt only when the
/// router reports a new route, so it can be used as a dependency of other hooks.
///
/// ```rust
/// # use dioxus_core::{Element, VNode};
/// # use dioxus_route_state::prelude::*;
/// fn Pager() -> Element {
///     let (query, route) = use_current_route();
///     let page: u32 = query.get_str("page").and_then(|page| page.parse().ok()).unwrap_or(1);
///
///     // when the user clicks next:
///     let _next = move || route.push([("page", (page + 1).to_string())]);
///
///     VNode::empty()
/// }
/// ```
///
/// # Panics
///
/// Panics if no ancestor provided a router with
/// [`use_query_router_provider`](super::use_query_router_provider).
pub fn use_current_route() -> (Query, CurrentRoute) {
    let router = use_query_router();

    let _subscription = use_hook(|| Rc::new(router.subscribe_guard(schedule_update())));
    let cache = use_hook(|| Rc::new(RouteCache::new()));

    let route = cache.get(&router);
    (route.query(), route)
}
