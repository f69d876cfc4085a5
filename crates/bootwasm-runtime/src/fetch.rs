//! Resource fetching.
//!
//! Fetching is split the way a network fetch is: [`Fetcher::fetch`] resolves
//! once a response is available, and [`Body::bytes`] buffers its content.
//! The loader announces each half separately.

use async_trait::async_trait;
use bootwasm_core::{LoadError, LoadResult};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A response whose body has not been read yet.
#[async_trait]
pub trait Body: Send {
    /// Buffer the whole body.
    async fn bytes(self: Box<Self>) -> LoadResult<Vec<u8>>;
}

/// Source of module bytes addressed by relative path.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short description of where resources come from, for logs and reports.
    fn origin(&self) -> String;

    /// Request `path`, resolving once a response is available.
    async fn fetch(&self, path: &str) -> LoadResult<Box<dyn Body>>;
}

/// Pick a fetcher for `origin`: `http://` and `https://` URLs go over the
/// network, anything else is a local directory.
pub fn from_origin(origin: &str) -> LoadResult<Arc<dyn Fetcher>> {
    if origin.starts_with("http://") || origin.starts_with("https://") {
        #[cfg(feature = "http")]
        {
            return Ok(Arc::new(crate::http::HttpFetcher::new(origin)?));
        }
        #[cfg(not(feature = "http"))]
        {
            return Err(LoadError::Config(format!(
                "HTTP origin `{}` requires the `http` feature",
                origin
            )));
        }
    }
    Ok(Arc::new(FileFetcher::new(origin)))
}

/// Reads resources from a directory.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    /// Serve resources relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Join `path` onto the root, refusing anything that escapes it.
    fn resolve(&self, path: &str) -> LoadResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if escapes || path.is_empty() {
            return Err(LoadError::fetch(path, "path must be relative to the origin"));
        }
        Ok(self.root.join(relative))
    }
}

struct FileBody {
    path: PathBuf,
}

#[async_trait]
impl Body for FileBody {
    async fn bytes(self: Box<Self>) -> LoadResult<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| LoadError::Body(format!("{}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    fn origin(&self) -> String {
        self.root.display().to_string()
    }

    async fn fetch(&self, path: &str) -> LoadResult<Box<dyn Body>> {
        let full = self.resolve(path)?;
        let metadata = tokio::fs::metadata(&full)
            .await
            .map_err(|e| LoadError::fetch(path, e))?;
        if !metadata.is_file() {
            return Err(LoadError::fetch(path, "not a file"));
        }
        Ok(Box::new(FileBody { path: full }))
    }
}

/// What a [`MemoryFetcher`] answers for one path.
#[derive(Debug, Clone)]
enum Resource {
    Bytes(Vec<u8>),
    FetchFailure(String),
    BodyFailure(String),
}

/// Serves resources from memory, with injectable failures.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    resources: HashMap<String, Resource>,
    requests: AtomicUsize,
}

impl MemoryFetcher {
    /// Create an empty fetcher; every path fails until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` at `path`.
    pub fn with_resource(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(path.into(), Resource::Bytes(bytes.into()));
        self
    }

    /// Make the request for `path` fail.
    pub fn with_fetch_failure(
        mut self,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.resources
            .insert(path.into(), Resource::FetchFailure(reason.into()));
        self
    }

    /// Let the request for `path` succeed but fail while reading its body.
    pub fn with_body_failure(mut self, path: impl Into<String>, reason: impl Into<String>) -> Self {
        self.resources
            .insert(path.into(), Resource::BodyFailure(reason.into()));
        self
    }

    /// Number of `fetch` calls made so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

struct MemoryBody {
    result: Result<Vec<u8>, String>,
}

#[async_trait]
impl Body for MemoryBody {
    async fn bytes(self: Box<Self>) -> LoadResult<Vec<u8>> {
        tokio::task::yield_now().await;
        self.result.map_err(LoadError::Body)
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    fn origin(&self) -> String {
        "memory".to_string()
    }

    async fn fetch(&self, path: &str) -> LoadResult<Box<dyn Body>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.resources.get(path) {
            Some(Resource::Bytes(bytes)) => Ok(Box::new(MemoryBody {
                result: Ok(bytes.clone()),
            })),
            Some(Resource::BodyFailure(reason)) => Ok(Box::new(MemoryBody {
                result: Err(reason.clone()),
            })),
            Some(Resource::FetchFailure(reason)) => Err(LoadError::fetch(path, reason)),
            None => Err(LoadError::fetch(path, "not found")),
        }
    }
}
