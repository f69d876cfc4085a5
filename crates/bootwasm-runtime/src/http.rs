//! HTTP origins.
//!
//! Requires the `http` feature.

use crate::fetch::{Body, Fetcher};
use async_trait::async_trait;
use bootwasm_core::{LoadError, LoadResult};
use reqwest::Url;

/// Fetches resources relative to a base URL.
///
/// As with a browser fetch, any response counts as fetched whatever its
/// status. The body of an error page goes on to the compiler, which rejects
/// it. Only a request that gets no response is a fetch failure.
pub struct HttpFetcher {
    base: Url,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `base`. A missing trailing slash is added so
    /// that `http://host/app` resolves `main_js.wasm` to `http://host/app/main_js.wasm`.
    pub fn new(base: &str) -> LoadResult<Self> {
        let mut base = Url::parse(base)
            .map_err(|e| LoadError::Config(format!("invalid origin `{}`: {}", base, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LoadError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { base, client })
    }

    /// The URL `path` resolves to.
    pub fn url_for(&self, path: &str) -> LoadResult<Url> {
        self.base.join(path).map_err(|e| LoadError::fetch(path, e))
    }
}

struct HttpBody {
    response: reqwest::Response,
}

#[async_trait]
impl Body for HttpBody {
    async fn bytes(self: Box<Self>) -> LoadResult<Vec<u8>> {
        let bytes = self
            .response
            .bytes()
            .await
            .map_err(|e| LoadError::Body(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn origin(&self) -> String {
        self.base.to_string()
    }

    async fn fetch(&self, path: &str) -> LoadResult<Box<dyn Body>> {
        let url = self.url_for(path)?;
        tracing::debug!(%url, "requesting module");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() {
                LoadError::fetch(path, format!("cannot connect to {}", self.base))
            } else {
                LoadError::fetch(path, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "origin answered with an error status");
        }

        Ok(Box::new(HttpBody { response }))
    }
}
