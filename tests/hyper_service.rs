#![cfg(feature = "hyper-service")]

use trellis_router::{router_service, Params};

use std::convert::Infallible as Never;

use hyper::service::Service;
use hyper::{Body, Request, Response, StatusCode};

async fn not_found(_: Request<Body>, _: Params) -> Result<Response<Body>, Never> {
    let res = Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::empty())
        .unwrap();
    Ok(res)
}

async fn user(_: Request<Body>, params: Params) -> Result<Response<Body>, Never> {
    let res = Response::builder()
        .header("x-name", params.get(":name").unwrap())
        .body(Body::empty())
        .unwrap();
    Ok(res)
}

async fn file(_: Request<Body>, params: Params) -> Result<Response<Body>, Never> {
    Ok(Response::new(Body::from(params.get("*").unwrap().to_owned())))
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn dispatch() {
    let mut service = router_service! {
        GET "/users/:name" => user,
        @ "/static" => router_service!{
            GET "/*" => file
        };
        _ => not_found
    };

    let res = service.call(request("GET", "/users/alice")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-name"], "alice");

    let res = service.call(request("GET", "/static/css/site.css")).await.unwrap();
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    assert_eq!(&body[..], b"css/site.css");

    let res = service.call(request("POST", "/users/alice")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = service.call(request("GET", "/nowhere")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shared_service() {
    let router = router_service! {
        GET "/users/:name" => user;
        _ => not_found
    };
    let mut a = router.into_shared();
    let mut b = a.clone();

    let res = a.call(request("GET", "/users/bob")).await.unwrap();
    assert_eq!(res.headers()["x-name"], "bob");

    let res = b.call(request("GET", "/users")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn builtin_not_found() {
    let mut service = router_service! {
        GET "/users/:name" => user
    }
    .into_service();

    let res = service.call(request("GET", "/users/carol")).await.unwrap();
    assert_eq!(res.headers()["x-name"], "carol");

    let res = service.call(request("GET", "/missing")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(service.router().is_sealed());
}
