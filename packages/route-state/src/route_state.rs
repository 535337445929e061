//! A single query key used as state.

use std::{fmt, rc::Rc};

use crate::{
    current_route::CurrentRoute,
    query::QueryValue,
    router::{Navigation, NavigationMethod},
    update::{QueryUpdate, QueryUpdates},
    url::RouteUrl,
};

/// What a [`RouteStateSetter`] does with a new value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    /// Replace the current history entry.
    #[default]
    Replace,
    /// Add a new history entry.
    Push,
    /// Only compute the resulting [`RouteUrl`].
    Url,
}

/// The result of [`RouteStateSetter::set`].
pub enum RouteStateOutcome {
    /// A navigation was requested.
    Navigation(Navigation),
    /// The descriptor that the value would produce. No navigation happened.
    Url(RouteUrl),
}

impl RouteStateOutcome {
    /// The pending navigation, if one was requested.
    pub fn into_navigation(self) -> Option<Navigation> {
        match self {
            RouteStateOutcome::Navigation(navigation) => Some(navigation),
            RouteStateOutcome::Url(_) => None,
        }
    }

    /// The computed descriptor, if no navigation was requested.
    pub fn into_url(self) -> Option<RouteUrl> {
        match self {
            RouteStateOutcome::Navigation(_) => None,
            RouteStateOutcome::Url(url) => Some(url),
        }
    }
}

impl fmt::Debug for RouteStateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStateOutcome::Navigation(_) => f.write_str("Navigation(..)"),
            RouteStateOutcome::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

/// Writes a single query key.
///
/// Setting the key to `None` or [`QueryUpdate::Remove`] drops it from the query. Two setters
/// compare equal while they write the same key through the same [`CurrentRoute`].
#[derive(Clone, PartialEq)]
pub struct RouteStateSetter {
    key: Rc<str>,
    route: CurrentRoute,
}

impl RouteStateSetter {
    /// A setter for `key` on `route`.
    pub fn new(route: CurrentRoute, key: impl Into<Rc<str>>) -> Self {
        Self {
            key: key.into(),
            route,
        }
    }

    /// The key this setter writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The accessor this setter goes through.
    pub fn route(&self) -> &CurrentRoute {
        &self.route
    }

    /// Apply `value` with `method`.
    pub fn set(&self, value: impl Into<QueryUpdate>, method: RouteMethod) -> RouteStateOutcome {
        let updates = self.updates(value);
        match method {
            RouteMethod::Replace => RouteStateOutcome::Navigation(
                self.route.navigate(updates, NavigationMethod::Replace),
            ),
            RouteMethod::Push => {
                RouteStateOutcome::Navigation(self.route.navigate(updates, NavigationMethod::Push))
            }
            RouteMethod::Url => RouteStateOutcome::Url(self.route.url(updates)),
        }
    }

    /// Replace the current history entry with `value` applied.
    pub fn replace(&self, value: impl Into<QueryUpdate>) -> Navigation {
        self.route.replace(self.updates(value))
    }

    /// Push a new history entry with `value` applied.
    pub fn push(&self, value: impl Into<QueryUpdate>) -> Navigation {
        self.route.push(self.updates(value))
    }

    /// The descriptor `value` would produce, without navigating.
    pub fn url(&self, value: impl Into<QueryUpdate>) -> RouteUrl {
        self.route.url(self.updates(value))
    }

    /// Remove the key, replacing the current history entry.
    pub fn remove(&self) -> Navigation {
        self.replace(QueryUpdate::Remove)
    }

    fn updates(&self, value: impl Into<QueryUpdate>) -> QueryUpdates {
        QueryUpdates::new().with(&*self.key, value)
    }
}

impl fmt::Debug for RouteStateSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteStateSetter")
            .field("key", &self.key)
            .field("route", &self.route)
            .finish()
    }
}

/// The current value of `key` together with a setter for it.
pub fn route_state(
    route: &CurrentRoute,
    key: impl Into<Rc<str>>,
) -> (Option<QueryValue>, RouteStateSetter) {
    let setter = RouteStateSetter::new(route.clone(), key);
    let value = route.query().remove(setter.key());
    (value, setter)
}
