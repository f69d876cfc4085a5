//! # bootwasm runtime
//!
//! Fetches a WebAssembly module, compiles and instantiates it with wasmtime,
//! and calls its entry point.
//!
//! ## Features
//!
//! - `http` (default): fetch modules from `http://` and `https://` origins
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bootwasm_runtime::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LoadError> {
//!     let fetcher = fetch::from_origin("static")?;
//!     let loader = Loader::new(fetcher, Arc::new(ConsoleLog));
//!     let report = loader.bootstrap().await?;
//!     println!("{} bytes, {} prints", report.byte_len, report.print_calls);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod fetch;
mod host;
pub mod loader;

#[cfg(feature = "http")]
pub mod http;

pub use engine::{CompiledModule, LoadedInstance, WasmEngine};
pub use fetch::{Body, Fetcher, FileFetcher, MemoryFetcher};
pub use host::HostState;
pub use loader::{LoadReport, Loader, LoaderConfig, DEFAULT_ENTRY_POINT, DEFAULT_RESOURCE};

#[cfg(feature = "http")]
pub use http::HttpFetcher;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::fetch;
    pub use crate::{Fetcher, FileFetcher, MemoryFetcher};
    pub use crate::{LoadReport, Loader, LoaderConfig, WasmEngine};
    pub use bootwasm_core::prelude::*;

    #[cfg(feature = "http")]
    pub use crate::HttpFetcher;
}
