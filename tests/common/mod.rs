#![allow(dead_code)]

pub use cmdserver_test_utils::builders;
pub use cmdserver_test_utils::fake_runner;
pub use cmdserver_test_utils::{TEST_TIMEOUT, init_tracing, within};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Send a `GET` for `uri` through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// Send an arbitrary request through the router.
pub async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.unwrap()
}

/// Collect the full response body.
pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    resp.into_body().collect().await.unwrap().to_bytes().to_vec()
}
