//! Drives the hooks through a headless virtual dom.

use std::{cell::RefCell, rc::Rc};

use dioxus_core::{Element, ScopeId, VNode, VirtualDom};
use dioxus_history::MemoryHistory;
use dioxus_route_state::prelude::*;
use futures_util::FutureExt;
use pretty_assertions::assert_eq;

thread_local! {
    static ROUTER: RefCell<Option<RouterHandle>> = const { RefCell::new(None) };
    static CURRENT: RefCell<Option<(Query, CurrentRoute)>> = const { RefCell::new(None) };
    static STATE: RefCell<Option<IdAndSearch>> = const { RefCell::new(None) };
}

#[derive(Clone)]
struct IdAndSearch {
    id: Option<QueryValue>,
    set_id: RouteStateSetter,
    search: Option<QueryValue>,
    set_search: RouteStateSetter,
}

fn provide_router() {
    use_query_router_provider(|| {
        ROUTER.with(|router| router.borrow().clone().expect("install a router before mounting"))
    });
}

fn current_route_app() -> Element {
    provide_router();
    let current = use_current_route();
    CURRENT.with(|slot| *slot.borrow_mut() = Some(current));
    VNode::empty()
}

fn route_state_app() -> Element {
    provide_router();
    let (id, set_id) = use_route_state("id");
    let (search, set_search) = use_route_state("search");
    STATE.with(|slot| {
        *slot.borrow_mut() = Some(IdAndSearch {
            id,
            set_id,
            search,
            set_search,
        })
    });
    VNode::empty()
}

fn foo_router() -> MemoryRouter {
    MemoryRouter::new(RouteUrl::new("/foo/[id]/bar", [("id", "ID")]))
}

fn mount(app: fn() -> Element, router: RouterHandle) -> VirtualDom {
    ROUTER.with(|slot| *slot.borrow_mut() = Some(router));
    let mut dom = VirtualDom::new(app);
    dom.rebuild_in_place();
    dom
}

fn rerender(dom: &mut VirtualDom) {
    dom.mark_dirty(ScopeId::APP);
    _ = dom.render_immediate_to_vec();
}

fn current() -> (Query, CurrentRoute) {
    CURRENT.with(|slot| slot.borrow().clone().expect("the app rendered"))
}

fn state() -> IdAndSearch {
    STATE.with(|slot| slot.borrow().clone().expect("the app rendered"))
}

#[test]
fn current_route_returns_the_query() {
    let _dom = mount(current_route_app, RouterHandle::new(foo_router()));

    let (query, route) = current();
    assert_eq!(query, Query::from([("id", "ID")]));
    assert_eq!(route.pathname(), "/foo/[id]/bar");
}

#[test]
fn current_route_generates_urls() {
    let router = foo_router();
    let _dom = mount(current_route_app, RouterHandle::new(router.clone()));
    let (_, route) = current();

    assert_eq!(
        route.url(QueryUpdates::new()),
        RouteUrl::new("/foo/[id]/bar", [("id", "ID")])
    );
    assert_eq!(route.url([("id", "NEW_ID")]).query, Query::from([("id", "NEW_ID")]));
    assert_eq!(
        route.url([("arg", "ARG")]).query,
        Query::from([("arg", "ARG"), ("id", "ID")])
    );
    assert_eq!(
        route.url([("id", "NEW_ID"), ("arg", "ARG")]).query,
        Query::from([("arg", "ARG"), ("id", "NEW_ID")])
    );
    assert_eq!(
        route.url(QueryUpdates::new().remove("id").set("arg", "ARG")).query,
        Query::from([("arg", "ARG")])
    );

    assert_eq!(router.as_path(), "/foo/ID/bar");
    assert!(!router.can_go_back());
}

#[test]
fn current_route_pushes_updated_params() {
    let router = foo_router();
    let mut dom = mount(current_route_app, RouterHandle::new(router.clone()));

    let (_, route) = current();
    assert_eq!(route.push([("id", "NEW_ID")]).now_or_never(), Some(true));
    rerender(&mut dom);
    assert_eq!(current().0, Query::from([("id", "NEW_ID")]));
    assert_eq!(router.as_path(), "/foo/NEW_ID/bar");

    let (_, route) = current();
    assert_eq!(route.push([("id", "ANOTHER_ID")]).now_or_never(), Some(true));
    rerender(&mut dom);
    assert_eq!(current().0, Query::from([("id", "ANOTHER_ID")]));
}

#[test]
fn current_route_pushes_and_deletes_params() {
    let router = foo_router();
    let mut dom = mount(current_route_app, RouterHandle::new(router.clone()));

    let _ = current().1.push([("arg", "ARG")]);
    rerender(&mut dom);
    assert_eq!(current().0, Query::from([("arg", "ARG"), ("id", "ID")]));

    let _ = current().1.push([("arg", None::<&str>)]);
    rerender(&mut dom);
    assert_eq!(current().0, Query::from([("id", "ID")]));
    assert_eq!(router.as_path(), "/foo/ID/bar");
}

#[test]
fn accessor_is_memoized_until_the_route_changes() {
    let router = foo_router();
    let mut dom = mount(current_route_app, RouterHandle::new(router.clone()));

    let (_, first) = current();
    rerender(&mut dom);
    assert_eq!(current().1, first);

    let _ = first.replace([("page", "2")]);
    rerender(&mut dom);
    let (query, second) = current();
    assert_ne!(second, first);
    assert_eq!(second.version(), router.version());
    assert_eq!(query, Query::from([("id", "ID"), ("page", "2")]));
}

#[test]
fn subscription_lives_as_long_as_the_component() {
    let router = foo_router();
    let dom = mount(current_route_app, RouterHandle::new(router.clone()));
    assert_eq!(router.listener_count(), 1);

    drop(dom);
    assert_eq!(router.listener_count(), 0);
}

#[test]
fn route_state_reads_values() {
    let _dom = mount(route_state_app, RouterHandle::new(foo_router()));

    let state = state();
    assert_eq!(state.id, Some(QueryValue::from("ID")));
    assert_eq!(state.search, None);
}

#[test]
fn route_state_sets_new_values() {
    let router = foo_router();
    let mut dom = mount(route_state_app, RouterHandle::new(router.clone()));

    assert_eq!(state().set_id.replace("123").now_or_never(), Some(true));
    rerender(&mut dom);
    assert_eq!(state().id, Some(QueryValue::from("123")));
    assert_eq!(state().search, None);
    assert_eq!(router.as_path(), "/foo/123/bar");

    assert_eq!(state().set_search.replace("TEST").now_or_never(), Some(true));
    rerender(&mut dom);
    assert_eq!(state().id, Some(QueryValue::from("123")));
    assert_eq!(state().search, Some(QueryValue::from("TEST")));
    assert_eq!(router.as_path(), "/foo/123/bar?search=TEST");

    assert_eq!(state().set_search.replace(None::<&str>).now_or_never(), Some(true));
    rerender(&mut dom);
    assert_eq!(state().id, Some(QueryValue::from("123")));
    assert_eq!(state().search, None);
    assert_eq!(router.as_path(), "/foo/123/bar");

    // every change above replaced the entry in place
    assert!(!router.can_go_back());
}

#[test]
fn route_state_generates_urls() {
    let router = foo_router();
    let _dom = mount(route_state_app, RouterHandle::new(router.clone()));
    let state = state();

    assert_eq!(
        state.set_id.set("123", RouteMethod::Url).into_url(),
        Some(RouteUrl::new("/foo/[id]/bar", [("id", "123")]))
    );
    assert_eq!(
        state.set_search.set("TEST", RouteMethod::Url).into_url(),
        Some(RouteUrl::new(
            "/foo/[id]/bar",
            [("id", "ID"), ("search", "TEST")]
        ))
    );
    assert_eq!(router.as_path(), "/foo/ID/bar");
}

#[test]
fn route_state_push_adds_history() {
    let router = foo_router();
    let mut dom = mount(route_state_app, RouterHandle::new(router.clone()));

    let outcome = state().set_search.set("TEST", RouteMethod::Push);
    assert_eq!(outcome.into_navigation().map(|nav| nav.now_or_never()), Some(Some(true)));
    rerender(&mut dom);
    assert_eq!(state().search, Some(QueryValue::from("TEST")));

    assert!(router.back());
    rerender(&mut dom);
    assert_eq!(state().search, None);
}

#[test]
fn route_state_setter_is_stable_between_navigations() {
    let router = foo_router();
    let mut dom = mount(route_state_app, RouterHandle::new(router.clone()));

    let before = state().set_search;
    rerender(&mut dom);
    assert_eq!(state().set_search, before);

    let _ = before.replace("TEST");
    rerender(&mut dom);
    assert_ne!(state().set_search, before);
    assert_eq!(state().set_search.key(), "search");
}

#[test]
fn cancelled_navigation_leaves_state_alone() {
    let router = foo_router();
    router.set_guard(|url, _| url.query.get_str("id") != Some("forbidden"));
    let mut dom = mount(route_state_app, RouterHandle::new(router.clone()));

    assert_eq!(state().set_id.push("forbidden").now_or_never(), Some(false));
    rerender(&mut dom);
    assert_eq!(state().id, Some(QueryValue::from("ID")));
}

#[test]
fn route_state_over_history() {
    let history = Rc::new(MemoryHistory::with_initial_path("/search?q=rust"));
    let router = RouterHandle::new(HistoryRouter::new(history.clone()));
    let mut dom = mount(route_state_app, router);

    let _ = state().set_search.replace("dioxus");
    rerender(&mut dom);

    assert_eq!(state().search, Some(QueryValue::from("dioxus")));
    assert_eq!(
        dioxus_history::History::current_route(&*history),
        "/search?q=rust&search=dioxus"
    );
}
