use super::{BoxError, Request, Response};
use crate::tree::Params;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use hyper::{Body, StatusCode};

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send>>;

/// An endpoint invoked with the request and the parameters captured for it.
///
/// Any `Fn(Request, Params) -> impl Future<Output = Result<Response, E>>`
/// is a handler.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request, params: Params) -> HandlerFuture;
}

pub type BoxHandler = Box<dyn Handler>;

impl Handler for BoxHandler {
    fn call(&self, req: Request, params: Params) -> HandlerFuture {
        (**self).call(req, params)
    }
}

impl<F, Fut, E> Handler for F
where
    F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, E>> + Send + 'static,
    E: StdError + Send + Sync + 'static,
{
    fn call(&self, req: Request, params: Params) -> HandlerFuture {
        let fut = (self)(req, params);
        Box::pin(async move { fut.await.map_err(|e| Box::new(e) as BoxError) })
    }
}

/// Answers every request with an empty `404 Not Found`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn call(&self, _: Request, _: Params) -> HandlerFuture {
        let mut res = Response::new(Body::empty());
        *res.status_mut() = StatusCode::NOT_FOUND;
        Box::pin(async move { Ok(res) })
    }
}
