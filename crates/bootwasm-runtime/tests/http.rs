//! HTTP origin tests against an in-process axum server.

#![cfg(feature = "http")]

use axum::{http::StatusCode, routing::get, Router};
use bootwasm_runtime::prelude::*;
use std::net::SocketAddr;
use std::sync::Arc;

/// Helper: serve `module` at `/app/main_js.wasm` on an ephemeral port.
async fn serve(module: Vec<u8>) -> SocketAddr {
    let app = Router::new()
        .route(
            "/app/main_js.wasm",
            get(move || {
                let module = module.clone();
                async move { module }
            }),
        )
        .route(
            "/app/broken.wasm",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal server error") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn print_module() -> Vec<u8> {
    wat::parse_str(
        r#"
        (module
          (import "imports" "print" (func $print (param i32)))
          (func (export "main") i32.const 42 call $print))
        "#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_load_over_http() {
    let addr = serve(print_module()).await;
    let log = MemoryLog::new();
    let fetcher = fetch::from_origin(&format!("http://{}/app", addr)).unwrap();
    let loader = Loader::new(fetcher, Arc::new(log.clone()));

    let report = loader.bootstrap().await.unwrap();

    assert_eq!(report.origin, format!("http://{}/app/", addr));
    assert_eq!(report.print_calls, 1);
    assert_eq!(log.lines().last().map(String::as_str), Some("42"));
}

#[tokio::test]
async fn test_error_status_fails_compilation() {
    let addr = serve(print_module()).await;
    let log = MemoryLog::new();
    let fetcher = HttpFetcher::new(&format!("http://{}/app/", addr)).unwrap();
    let loader = Loader::new(Arc::new(fetcher), Arc::new(log.clone()))
        .with_config(LoaderConfig::default().with_resource("broken.wasm"));

    let err = loader.load().await.unwrap_err();

    assert!(matches!(err, LoadError::Compile(_)));
    assert_eq!(
        log.lines(),
        vec![
            "fetching main.wasm...",
            "getting wasm bytes...",
            "compiling webassembly module...",
        ]
    );
}

#[tokio::test]
async fn test_unreachable_origin() {
    // Bind then drop a listener so the port is known to be closed.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let fetcher = HttpFetcher::new(&format!("http://{}/", addr)).unwrap();
    let loader = Loader::new(Arc::new(fetcher), Arc::new(MemoryLog::new()));

    assert!(matches!(loader.load().await, Err(LoadError::Fetch { .. })));
}
