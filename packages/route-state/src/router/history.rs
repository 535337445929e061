use std::{
    rc::Rc,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use dioxus_history::History;
use futures_util::{future, FutureExt};
use tracing::{debug, trace};

use super::{
    notify, Listeners, Navigation, NavigationMethod, QueryRouter, RouteListener, RouteVersion,
    SubscriptionId,
};
use crate::url::RouteUrl;

struct HistoryRouterState {
    /// `None` after the history reported a change that has not been read yet.
    last_seen: Option<String>,
    version: RouteVersion,
    listeners: Listeners,
}

/// A [`QueryRouter`] backed by a [`History`] provider.
///
/// Pathnames are the literal paths reported by the history, so navigation sends
/// [`RouteUrl::as_literal_path`] to the provider. The router registers itself as the history's
/// updater: back and forward navigation made outside this router bumps the version and notifies
/// every listener. Providers that never call their updater are still observed on the next read.
pub struct HistoryRouter {
    history: Rc<dyn History>,
    state: Arc<Mutex<HistoryRouterState>>,
}

impl HistoryRouter {
    /// Wrap a history provider and register for its change notifications.
    pub fn new(history: Rc<dyn History>) -> Self {
        let state = Arc::new(Mutex::new(HistoryRouterState {
            last_seen: Some(history.current_route()),
            version: RouteVersion::default(),
            listeners: Listeners::default(),
        }));

        history.updater(Arc::new({
            let state = state.clone();
            move || {
                let listeners = {
                    let mut state = lock(&state);
                    state.last_seen = None;
                    state.version = state.version.next();
                    state.listeners.snapshot()
                };
                trace!("history changed outside the router");
                notify(listeners);
            }
        }));

        Self { history, state }
    }

    /// The wrapped history provider.
    pub fn history(&self) -> &Rc<dyn History> {
        &self.history
    }

    fn observe(&self) -> RouteVersion {
        let route = self.history.current_route();
        let mut state = lock(&self.state);
        match &state.last_seen {
            Some(last_seen) if *last_seen == route => {}
            // the updater already bumped the version for this change
            None => state.last_seen = Some(route),
            Some(_) => {
                state.last_seen = Some(route);
                state.version = state.version.next();
            }
        }
        state.version
    }

    fn navigate_with(&self, url: RouteUrl, method: NavigationMethod) -> Navigation {
        let path = url.as_literal_path();
        debug!(%path, ?method, "navigating history");

        match method {
            NavigationMethod::Push => self.history.push(path),
            NavigationMethod::Replace => self.history.replace(path),
        }

        self.observe();
        let listeners = lock(&self.state).listeners.snapshot();
        notify(listeners);

        future::ready(true).boxed_local()
    }
}

fn lock(state: &Mutex<HistoryRouterState>) -> MutexGuard<'_, HistoryRouterState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl QueryRouter for HistoryRouter {
    fn current(&self) -> RouteUrl {
        RouteUrl::parse(&self.history.current_route())
    }

    fn version(&self) -> RouteVersion {
        self.observe()
    }

    fn push(&self, url: RouteUrl) -> Navigation {
        self.navigate_with(url, NavigationMethod::Push)
    }

    fn replace(&self, url: RouteUrl) -> Navigation {
        self.navigate_with(url, NavigationMethod::Replace)
    }

    fn subscribe(&self, listener: RouteListener) -> SubscriptionId {
        lock(&self.state).listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.state).listeners.remove(id);
    }
}
