//! The accessor for the route a router is currently showing.

use std::{cell::RefCell, fmt, rc::Rc};

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::{
    error::QueryError,
    query::Query,
    router::{Navigation, NavigationMethod, RouteVersion, RouterHandle},
    update::QueryUpdates,
    url::{build_url, RouteUrl},
};

struct CurrentRouteInner {
    router: RouterHandle,
    version: RouteVersion,
}

/// An accessor for the current route that merges partial query updates into the current query.
///
/// The accessor is tied to the router version it was built for, but every method reads the
/// router's pathname and query at call time, so a handle held across a navigation never works
/// from a stale query.
///
/// ```rust
/// # use dioxus_route_state::prelude::*;
/// let router = RouterHandle::new(MemoryRouter::new(RouteUrl::new("/foo/[id]/bar", [("id", "ID")])));
/// let route = CurrentRoute::new(router);
///
/// assert_eq!(
///     route.url(QueryUpdates::new().set("arg", "ARG")),
///     RouteUrl::new("/foo/[id]/bar", [("id", "ID"), ("arg", "ARG")])
/// );
/// ```
#[derive(Clone)]
pub struct CurrentRoute {
    inner: Rc<CurrentRouteInner>,
}

impl CurrentRoute {
    /// Build an accessor for the route `router` is currently showing.
    pub fn new(router: RouterHandle) -> Self {
        let version = router.version();
        Self::with_version(router, version)
    }

    fn with_version(router: RouterHandle, version: RouteVersion) -> Self {
        Self {
            inner: Rc::new(CurrentRouteInner { router, version }),
        }
    }

    /// The router this accessor navigates.
    pub fn router(&self) -> &RouterHandle {
        &self.inner.router
    }

    /// The router version this accessor was built for.
    pub fn version(&self) -> RouteVersion {
        self.inner.version
    }

    /// The router's current pathname.
    pub fn pathname(&self) -> String {
        self.inner.router.current().pathname
    }

    /// The router's current query.
    pub fn query(&self) -> Query {
        self.inner.router.current().query
    }

    /// The router's current query read into a typed value.
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, QueryError> {
        self.query().deserialize()
    }

    /// The descriptor produced by merging `updates` into the current query. Never navigates.
    pub fn url(&self, updates: impl Into<QueryUpdates>) -> RouteUrl {
        let current = self.inner.router.current();
        build_url(&current.pathname, &current.query, &updates.into())
    }

    /// Navigate to the merged descriptor, adding a history entry.
    pub fn push(&self, updates: impl Into<QueryUpdates>) -> Navigation {
        self.navigate(updates, NavigationMethod::Push)
    }

    /// Navigate to the merged descriptor, replacing the current history entry.
    pub fn replace(&self, updates: impl Into<QueryUpdates>) -> Navigation {
        self.navigate(updates, NavigationMethod::Replace)
    }

    /// Navigate to the merged descriptor with the given method.
    pub fn navigate(&self, updates: impl Into<QueryUpdates>, method: NavigationMethod) -> Navigation {
        let url = self.url(updates);
        self.inner.router.navigate(url, method)
    }
}

impl PartialEq for CurrentRoute {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CurrentRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentRoute")
            .field("version", &self.inner.version)
            .finish_non_exhaustive()
    }
}

/// Hands out the same [`CurrentRoute`] until the router or its version changes.
#[derive(Default)]
pub struct RouteCache {
    cached: RefCell<Option<CurrentRoute>>,
}

impl RouteCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The accessor for `router`'s current route, reusing the cached one when it is still valid.
    pub fn get(&self, router: &RouterHandle) -> CurrentRoute {
        let version = router.version();
        let mut cached = self.cached.borrow_mut();

        if let Some(route) = cached.as_ref() {
            if route.router().ptr_eq(router) && route.version() == version {
                return route.clone();
            }
        }

        trace!(version = version.get(), "building current route accessor");
        let route = CurrentRoute::with_version(router.clone(), version);
        *cached = Some(route.clone());
        route
    }
}

#[cfg(test)]
mod tests {
    use futures_util::FutureExt;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;
    use crate::{
        router::{MemoryRouter, QueryRouter},
        update::QueryUpdate,
    };

    fn setup() -> (MemoryRouter, CurrentRoute) {
        let router = MemoryRouter::new(RouteUrl::new("/foo/[id]/bar", [("id", "ID")]));
        let route = CurrentRoute::new(RouterHandle::new(router.clone()));
        (router, route)
    }

    #[test]
    fn url_merges_without_navigating() {
        let (router, route) = setup();
        let version = router.version();

        assert_eq!(
            route.url(QueryUpdates::new()),
            RouteUrl::new("/foo/[id]/bar", [("id", "ID")])
        );
        assert_eq!(
            route.url([("id", "NEW_ID")]).query,
            Query::from([("id", "NEW_ID")])
        );
        assert_eq!(
            route.url([("arg", "ARG")]).query,
            Query::from([("id", "ID"), ("arg", "ARG")])
        );
        assert_eq!(
            route
                .url([("id", QueryUpdate::Remove), ("arg", "ARG".into())])
                .query,
            Query::from([("arg", "ARG")])
        );

        assert_eq!(router.version(), version);
        assert_eq!(router.as_path(), "/foo/ID/bar");
        assert!(!router.can_go_back());
    }

    #[test]
    fn push_updates_the_router() {
        let (router, route) = setup();

        assert_eq!(route.push([("id", "NEW_ID")]).now_or_never(), Some(true));
        assert_eq!(route.query(), Query::from([("id", "NEW_ID")]));
        assert_eq!(router.as_path(), "/foo/NEW_ID/bar");

        assert_eq!(route.push([("id", "ANOTHER_ID")]).now_or_never(), Some(true));
        assert_eq!(route.query(), Query::from([("id", "ANOTHER_ID")]));
        assert!(router.can_go_back());
    }

    #[test]
    fn push_then_remove_a_param() {
        let (router, route) = setup();

        let _ = route.push([("arg", "ARG")]);
        assert_eq!(route.query(), Query::from([("id", "ID"), ("arg", "ARG")]));
        assert_eq!(router.as_path(), "/foo/ID/bar?arg=ARG");

        let _ = route.push([("arg", None::<&str>)]);
        assert_eq!(route.query(), Query::from([("id", "ID")]));
        assert_eq!(router.as_path(), "/foo/ID/bar");
    }

    #[test]
    fn replace_does_not_grow_history() {
        let (router, route) = setup();

        assert_eq!(route.replace([("page", "2")]).now_or_never(), Some(true));
        assert_eq!(route.pathname(), "/foo/[id]/bar");
        assert_eq!(router.as_path(), "/foo/ID/bar?page=2");
        assert!(!router.can_go_back());
    }

    #[test]
    fn cancelled_navigation_resolves_false() {
        let (router, route) = setup();
        router.set_guard(|_, _| false);

        assert_eq!(route.push([("id", "NEW_ID")]).now_or_never(), Some(false));
        assert_eq!(route.query(), Query::from([("id", "ID")]));
    }

    #[test]
    fn methods_read_the_router_at_call_time() {
        let (router, route) = setup();
        router.set_route(RouteUrl::new("/other/[slug]", [("slug", "x")]));

        assert_eq!(
            route.url([("page", "1")]),
            RouteUrl::new("/other/[slug]", [("slug", "x"), ("page", "1")])
        );
    }

    #[test]
    fn query_as_reads_typed_values() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Params {
            id: String,
            arg: Option<String>,
        }

        let (_router, route) = setup();
        assert_eq!(
            route.query_as::<Params>().unwrap(),
            Params {
                id: "ID".to_string(),
                arg: None
            }
        );
    }

    #[test]
    fn cache_reuses_accessor_until_navigation() {
        let (router, _) = setup();
        let handle = RouterHandle::new(router.clone());
        let cache = RouteCache::new();

        let first = cache.get(&handle);
        assert_eq!(first, cache.get(&handle));

        let _ = first.push([("id", "NEW_ID")]);
        let second = cache.get(&handle);
        assert_ne!(first, second);
        assert_eq!(second.version(), router.version());

        let other = RouterHandle::new(router.clone());
        assert_ne!(second, cache.get(&other));
    }
}
