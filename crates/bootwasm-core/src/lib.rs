//! # bootwasm core
//!
//! Shared vocabulary for the bootwasm loader.
//!
//! The loader fetches a WebAssembly module, compiles it, instantiates it with
//! a single host import (`print`) and calls its `main` export. This crate
//! holds the engine-independent pieces of that sequence:
//!
//! - [`Stage`]: the straight-line progression of a load and its diagnostic lines
//! - [`ImportSet`]: which namespaces expose the `print` import
//! - [`ModuleInterface`]: declared imports/exports of a compiled module
//! - [`PrintValue`]: values handed to `print`, rendered for the log
//! - [`DiagnosticLog`]: the injectable sink progress and `print` lines go to
//! - [`LoadError`]: every way a load can fail

pub mod error;
pub mod imports;
pub mod interface;
pub mod log;
pub mod stage;
pub mod value;

pub use error::{LoadError, LoadResult};
pub use imports::ImportSet;
pub use interface::{ExportDescriptor, ImportDescriptor, ModuleInterface};
pub use log::{ConsoleLog, DiagnosticLog, MemoryLog, SharedLog, TracingLog};
pub use stage::{Stage, CALLING_LOAD};
pub use value::{PrintSignature, PrintValue, ValueKind};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ConsoleLog, DiagnosticLog, MemoryLog, SharedLog, TracingLog};
    pub use crate::{ImportSet, ModuleInterface, Stage};
    pub use crate::{LoadError, LoadResult};
}
