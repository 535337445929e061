//! The router capability the query hooks are built on.

use std::{fmt, ops::Deref, rc::Rc, sync::Arc};

use futures_util::future::LocalBoxFuture;
use tracing::trace;

use crate::url::RouteUrl;

mod history;
mod memory;

pub use history::HistoryRouter;
pub use memory::{MemoryRouter, MemoryRouterConfig};

/// The pending outcome of a navigation request.
///
/// Resolves to `true` once the navigation committed, or `false` if it was intercepted or
/// cancelled.
pub type Navigation = LocalBoxFuture<'static, bool>;

/// A callback run after the current route changes.
pub type RouteListener = Arc<dyn Fn() + Send + Sync>;

/// The kind of history change a navigation makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationMethod {
    /// Add a new history entry.
    Push,
    /// Replace the current history entry in place.
    Replace,
}

/// Identifies the route a router is currently showing. It changes exactly when the route
/// changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteVersion(u64);

impl RouteVersion {
    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A handle returned by [`QueryRouter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A router that exposes its current pathname and query and can navigate to a new
/// [`RouteUrl`].
///
/// Routers are single threaded and shared through [`RouterHandle`].
pub trait QueryRouter {
    /// A snapshot of the current pathname and query.
    fn current(&self) -> RouteUrl;

    /// The identity of the current route.
    fn version(&self) -> RouteVersion;

    /// Navigate to `url`, adding a history entry.
    fn push(&self, url: RouteUrl) -> Navigation;

    /// Navigate to `url`, replacing the current history entry.
    fn replace(&self, url: RouteUrl) -> Navigation;

    /// Run `listener` whenever the current route changes.
    fn subscribe(&self, listener: RouteListener) -> SubscriptionId;

    /// Stop notifying a listener registered with [`QueryRouter::subscribe`].
    fn unsubscribe(&self, id: SubscriptionId);

    /// Navigate to `url` with the given method.
    fn navigate(&self, url: RouteUrl, method: NavigationMethod) -> Navigation {
        match method {
            NavigationMethod::Push => self.push(url),
            NavigationMethod::Replace => self.replace(url),
        }
    }
}

/// A shared reference to a [`QueryRouter`]. This is the type provided through the component
/// context.
#[derive(Clone)]
pub struct RouterHandle(Rc<dyn QueryRouter>);

impl RouterHandle {
    /// Wrap a router.
    pub fn new(router: impl QueryRouter + 'static) -> Self {
        Self(Rc::new(router))
    }

    /// Wrap an already shared router.
    pub fn from_rc(router: Rc<dyn QueryRouter>) -> Self {
        Self(router)
    }

    /// Returns `true` if both handles point at the same router.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Subscribe to route changes for as long as the returned guard is alive.
    pub fn subscribe_guard(&self, listener: RouteListener) -> RouteSubscription {
        let id = self.0.subscribe(listener);
        RouteSubscription {
            router: self.clone(),
            id,
        }
    }
}

impl Deref for RouterHandle {
    type Target = dyn QueryRouter;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for RouterHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for RouterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterHandle")
            .field("current", &self.0.current())
            .field("version", &self.0.version())
            .finish()
    }
}

/// Unsubscribes its listener when dropped.
pub struct RouteSubscription {
    router: RouterHandle,
    id: SubscriptionId,
}

impl RouteSubscription {
    /// The id of the underlying subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for RouteSubscription {
    fn drop(&mut self) {
        self.router.unsubscribe(self.id);
    }
}

/// Listener bookkeeping shared by the routers in this crate.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    listeners: Vec<(SubscriptionId, RouteListener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: RouteListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Clone the listeners out so they can run without the router state borrowed.
    pub(crate) fn snapshot(&self) -> Vec<RouteListener> {
        self.listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }
}

pub(crate) fn notify(listeners: Vec<RouteListener>) {
    trace!(count = listeners.len(), "notifying route listeners");
    for listener in listeners {
        listener();
    }
}
