use super::handler::{BoxHandler, Handler, HandlerFuture, NotFound};
use super::{BoxError, Request, Response};
use crate::http_router::HttpRouter;
use crate::tree::Params;

use std::sync::Arc;
use std::task::{Context, Poll};

use hyper::service::Service;
use tracing::debug;

/// Dispatches requests to the matched handler, or to `default` when no route
/// matches.
pub struct RouterService<H = BoxHandler> {
    router: HttpRouter<H>,
    default: H,
}

/// A cloneable [`RouterService`] for use with `make_service_fn`.
pub struct SharedRouterService<H = BoxHandler>(Arc<RouterService<H>>);

impl<H: Handler> RouterService<H> {
    fn dispatch(&self, req: Request) -> HandlerFuture {
        let (handler, params) = match self.router.find(req.method(), req.uri().path()) {
            Some(found) => found,
            None => {
                debug!(method = %req.method(), path = req.uri().path(), "no route matched");
                (&self.default, Params::default())
            }
        };
        handler.call(req, params)
    }
}

impl<H: Handler> Service<Request> for RouterService<H> {
    type Response = Response;
    type Error = BoxError;
    type Future = HandlerFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        self.dispatch(req)
    }
}

impl<H: Handler> Service<Request> for SharedRouterService<H> {
    type Response = Response;
    type Error = BoxError;
    type Future = HandlerFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        self.0.dispatch(req)
    }
}

impl<H> Clone for SharedRouterService<H> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<H> RouterService<H> {
    pub fn new(default: H) -> Self {
        Self::from_router(HttpRouter::new(), default)
    }

    pub fn from_router(router: HttpRouter<H>, default: H) -> Self {
        Self { router, default }
    }

    pub fn router(&self) -> &HttpRouter<H> {
        &self.router
    }

    pub fn into_shared(self) -> SharedRouterService<H> {
        SharedRouterService(Arc::new(self))
    }
}

impl HttpRouter<BoxHandler> {
    pub fn route(
        &mut self,
        method: &str,
        pattern: &str,
        h: impl Handler,
    ) -> &mut Self {
        self.handle(method, pattern, Box::new(h))
    }

    pub fn with_default(self, default: impl Handler) -> RouterService {
        RouterService::from_router(self, Box::new(default))
    }

    /// Wraps the router in a service answering unmatched requests with 404.
    pub fn into_service(self) -> RouterService {
        self.with_default(NotFound)
    }
}
