mod route_map;
mod router;
mod router_macro;

pub use self::router::{HttpRouter, Method, Route};

/// Verbs a route can be registered for; `"*"` expands to all of them.
pub(crate) const KNOWN_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::HEAD,
];
