//! Serve a static directory so modules can be fetched from an HTTP origin.

use anyhow::{bail, Context, Result};
use axum::Router;
use colored::Colorize;
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir};

/// Router serving `dir`, with `index.html` for directory requests.
pub fn router(dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        .layer(CorsLayer::permissive())
}

pub async fn run(dir: &Path, host: &str, port: u16) -> Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!(
        "{} Serving {} on {}",
        "→".blue(),
        dir.display().to_string().cyan(),
        format!("http://{}/", addr).cyan()
    );
    println!("  Load it with: bootwasm run http://{}/", addr);
    tracing::info!(%addr, dir = %dir.display(), "static server listening");

    axum::serve(listener, router(dir)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootwasm_core::MemoryLog;
    use bootwasm_runtime::{fetch, Loader};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_served_directory_is_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let module = wat::parse_str(
            r#"
            (module
              (import "imports" "print" (func $print (param i32)))
              (func (export "main") i32.const 7 call $print))
            "#,
        )
        .unwrap();
        std::fs::write(dir.path().join("main_js.wasm"), module).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(dir.path());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let log = MemoryLog::new();
        let fetcher = fetch::from_origin(&format!("http://{}/", addr)).unwrap();
        let report = Loader::new(fetcher, Arc::new(log.clone()))
            .load()
            .await
            .unwrap();

        assert_eq!(report.print_calls, 1);
        assert_eq!(log.lines().last().map(String::as_str), Some("7"));
    }
}
