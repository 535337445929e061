use dioxus_core::{provide_context, try_consume_context, use_hook};

use crate::router::RouterHandle;

/// Provide a router to every descendant of the current component.
///
/// The initializer only runs on the first render; later renders return the same handle.
///
/// ```rust
/// # use dioxus_core::{Element, VNode};
/// # use dioxus_route_state::prelude::*;
/// fn App() -> Element {
///     use_query_router_provider(|| {
///         RouterHandle::new(MemoryRouter::new(RouteUrl::new("/", Query::new())))
///     });
///
///     VNode::empty()
/// }
/// ```
pub fn use_query_router_provider(init: impl FnOnce() -> RouterHandle) -> RouterHandle {
    use_hook(|| {
        let router = init();
        provide_context(router.clone());
        router
    })
}

/// The router provided by an ancestor through [`use_query_router_provider`].
///
/// # Panics
///
/// Panics if no ancestor provided a router.
pub fn use_query_router() -> RouterHandle {
    use_hook(|| {
        try_consume_context::<RouterHandle>()
            .expect("Must be called in a descendant of a component that provides a query router")
    })
}
