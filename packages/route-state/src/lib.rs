#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://avatars.githubusercontent.com/u/79236386")]
#![doc(html_favicon_url = "https://avatars.githubusercontent.com/u/79236386")]
#![deny(missing_docs)]

pub mod current_route;
pub mod error;
pub mod hooks;
pub mod query;
pub mod route_state;
pub mod router;
pub mod update;
pub mod url;

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::current_route::{CurrentRoute, RouteCache};
    pub use crate::error::QueryError;
    pub use crate::hooks::*;
    pub use crate::query::{Query, QueryValue};
    pub use crate::route_state::{route_state, RouteMethod, RouteStateOutcome, RouteStateSetter};
    pub use crate::router::{
        HistoryRouter, MemoryRouter, MemoryRouterConfig, Navigation, NavigationMethod,
        QueryRouter, RouteSubscription, RouteVersion, RouterHandle,
    };
    pub use crate::update::{QueryUpdate, QueryUpdates};
    pub use crate::url::{build_url, RouteUrl};
}
