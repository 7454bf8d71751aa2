//! [`hyper`] integration: a `Service` that routes each request to a handler.

mod handler;
mod service;
mod service_macro;

pub use self::handler::{BoxHandler, Handler, HandlerFuture, NotFound};
pub use self::service::{RouterService, SharedRouterService};

type Request = hyper::Request<hyper::Body>;
type Response = hyper::Response<hyper::Body>;
type BoxError = Box<dyn std::error::Error + Send + Sync>;
