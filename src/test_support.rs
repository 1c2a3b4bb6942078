//! In-process backend for client tests.

use axum::{http::StatusCode, routing::get, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A GET route at `path` that answers 503 for the first `failures` hits and
/// then `200 body`. Returns the router and its hit counter.
pub fn flaky_route(
    path: &str,
    failures: usize,
    body: &'static str,
) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let router = Router::new().route(
        path,
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < failures {
                    (StatusCode::SERVICE_UNAVAILABLE, String::new())
                } else {
                    (StatusCode::OK, body.to_string())
                }
            }
        }),
    );

    (router, hits)
}

/// A GET route at `path` that always answers with `status`.
pub fn failing_route(path: &str, status: StatusCode) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let router = Router::new().route(
        path,
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, String::new())
            }
        }),
    );

    (router, hits)
}
