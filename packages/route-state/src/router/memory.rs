use std::{cell::RefCell, rc::Rc};

use futures_util::{future, FutureExt};
use tracing::{debug, warn};

use super::{
    notify, Listeners, Navigation, NavigationMethod, QueryRouter, RouteListener, RouteVersion,
    SubscriptionId,
};
use crate::url::RouteUrl;

type NavigationGuard = Rc<dyn Fn(&RouteUrl, NavigationMethod) -> bool>;

/// Options for a [`MemoryRouter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryRouterConfig {
    asynchronous: bool,
}

impl MemoryRouterConfig {
    /// The default configuration: navigations commit as soon as they are requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer every navigation until its [`Navigation`] is first polled.
    pub fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = asynchronous;
        self
    }

    /// Returns `true` if navigations are deferred until polled.
    pub fn is_asynchronous(&self) -> bool {
        self.asynchronous
    }
}

struct MemoryRouterState {
    current: RouteUrl,
    history: Vec<RouteUrl>,
    version: RouteVersion,
    listeners: Listeners,
    guard: Option<NavigationGuard>,
}

/// A [`QueryRouter`] that keeps the current route and its history in memory.
///
/// Clones share the same state, so a test can keep one clone to drive and inspect the router
/// while components hold another.
///
/// ```rust
/// # use dioxus_route_state::prelude::*;
/// # use futures_util::FutureExt;
/// let router = MemoryRouter::new(RouteUrl::new("/foo/[id]/bar", [("id", "ID")]));
///
/// let committed = router.push(RouteUrl::new("/foo/[id]/bar", [("id", "123")]));
/// assert_eq!(committed.now_or_never(), Some(true));
/// assert_eq!(router.as_path(), "/foo/123/bar");
/// ```
#[derive(Clone)]
pub struct MemoryRouter {
    state: Rc<RefCell<MemoryRouterState>>,
    config: MemoryRouterConfig,
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new(RouteUrl::new("/", crate::query::Query::new()))
    }
}

impl MemoryRouter {
    /// Create a router showing `initial`.
    pub fn new(initial: RouteUrl) -> Self {
        Self::with_config(initial, MemoryRouterConfig::default())
    }

    /// Create a router showing `initial` with the given configuration.
    pub fn with_config(initial: RouteUrl, config: MemoryRouterConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryRouterState {
                current: initial,
                history: Vec::new(),
                version: RouteVersion::default(),
                listeners: Listeners::default(),
                guard: None,
            })),
            config,
        }
    }

    /// The configuration this router was created with.
    pub fn config(&self) -> MemoryRouterConfig {
        self.config
    }

    /// Show `url` without running the navigation guard or touching the history stack.
    pub fn set_route(&self, url: RouteUrl) {
        let listeners = {
            let mut state = self.state.borrow_mut();
            state.current = url;
            state.version = state.version.next();
            state.listeners.snapshot()
        };
        notify(listeners);
    }

    /// The concrete path of the current route, with dynamic segments filled in.
    pub fn as_path(&self) -> String {
        self.state.borrow().current.as_path()
    }

    /// Returns `true` if there is an entry to go back to.
    pub fn can_go_back(&self) -> bool {
        !self.state.borrow().history.is_empty()
    }

    /// Go back to the previous history entry. Returns `false` if there was none.
    pub fn back(&self) -> bool {
        let listeners = {
            let mut state = self.state.borrow_mut();
            let Some(previous) = state.history.pop() else {
                return false;
            };
            state.current = previous;
            state.version = state.version.next();
            state.listeners.snapshot()
        };
        notify(listeners);
        true
    }

    /// Run `guard` before every navigation. Returning `false` cancels the navigation.
    pub fn set_guard(&self, guard: impl Fn(&RouteUrl, NavigationMethod) -> bool + 'static) {
        self.state.borrow_mut().guard = Some(Rc::new(guard));
    }

    /// Remove the navigation guard.
    pub fn clear_guard(&self) {
        self.state.borrow_mut().guard = None;
    }

    /// The number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn navigate_with(&self, url: RouteUrl, method: NavigationMethod) -> Navigation {
        if self.config.asynchronous {
            let state = self.state.clone();
            future::lazy(move |_| commit(&state, url, method)).boxed_local()
        } else {
            future::ready(commit(&self.state, url, method)).boxed_local()
        }
    }
}

fn commit(state: &Rc<RefCell<MemoryRouterState>>, url: RouteUrl, method: NavigationMethod) -> bool {
    let guard = state.borrow().guard.clone();
    if let Some(guard) = guard {
        if !guard(&url, method) {
            warn!(path = %url, ?method, "navigation cancelled by guard");
            return false;
        }
    }

    let listeners = {
        let mut state = state.borrow_mut();
        debug!(path = %url, ?method, "navigating");
        match method {
            NavigationMethod::Push => {
                let previous = std::mem::replace(&mut state.current, url);
                state.history.push(previous);
            }
            NavigationMethod::Replace => state.current = url,
        }
        state.version = state.version.next();
        state.listeners.snapshot()
    };
    notify(listeners);

    true
}

impl QueryRouter for MemoryRouter {
    fn current(&self) -> RouteUrl {
        self.state.borrow().current.clone()
    }

    fn version(&self) -> RouteVersion {
        self.state.borrow().version
    }

    fn push(&self, url: RouteUrl) -> Navigation {
        self.navigate_with(url, NavigationMethod::Push)
    }

    fn replace(&self, url: RouteUrl) -> Navigation {
        self.navigate_with(url, NavigationMethod::Replace)
    }

    fn subscribe(&self, listener: RouteListener) -> SubscriptionId {
        self.state.borrow_mut().listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.state.borrow_mut().listeners.remove(id);
    }
}
