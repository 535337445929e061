//! Hooks for reading and writing query state from components.

mod use_current_route;
pub use use_current_route::*;

mod use_query_router;
pub use use_query_router::*;

mod use_route_state;
pub use use_route_state::*;
