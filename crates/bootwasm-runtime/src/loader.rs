//! The load pipeline.
//!
//! A load is one straight-line sequence of awaits:
//!
//! ```text
//! not started → fetching → buffering → compiling → instantiating → running → done
//!                    └───────────┴───────────┴─────────────┴────────────┴──→ failed
//! ```
//!
//! Each stage's progress line is written to the diagnostic log immediately
//! before that stage starts, and the first error ends the sequence.

use crate::engine::WasmEngine;
use crate::fetch::Fetcher;
use bootwasm_core::{ImportSet, LoadResult, ModuleInterface, SharedLog, Stage, CALLING_LOAD};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Resource path fetched when none is configured.
pub const DEFAULT_RESOURCE: &str = "main_js.wasm";

/// Export invoked when none is configured.
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// What to load and how to bind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Path of the module, relative to the fetcher's origin.
    pub resource: String,
    /// Zero-argument export to call once instantiated.
    pub entry_point: String,
    /// Namespaces `print` is offered under.
    pub imports: ImportSet,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            resource: DEFAULT_RESOURCE.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            imports: ImportSet::standard(),
        }
    }
}

impl LoaderConfig {
    /// Set the resource path.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    /// Set the entry point.
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    /// Set the import set.
    pub fn with_imports(mut self, imports: ImportSet) -> Self {
        self.imports = imports;
        self
    }
}

/// Summary of a completed load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub resource: String,
    pub origin: String,
    pub byte_len: usize,
    pub print_calls: usize,
    pub stages: Vec<Stage>,
    pub elapsed_ms: u64,
}

/// Fetches, compiles, instantiates and runs one module.
pub struct Loader {
    fetcher: Arc<dyn Fetcher>,
    engine: WasmEngine,
    log: SharedLog,
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with the default configuration and a fresh engine.
    pub fn new(fetcher: Arc<dyn Fetcher>, log: SharedLog) -> Self {
        Self {
            fetcher,
            engine: WasmEngine::new(),
            log,
            config: LoaderConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Write the stage's progress line and trace the transition.
    fn enter(&self, stage: Stage) {
        tracing::debug!(%stage, resource = %self.config.resource, "entering stage");
        if let Some(line) = stage.announcement() {
            self.log.line(line);
        }
    }

    /// Run the whole sequence.
    pub async fn load(&self) -> LoadResult<LoadReport> {
        let started = Instant::now();
        let mut stages = Vec::with_capacity(Stage::STEPS.len());

        let result = self.run_steps(&mut stages).await;
        match result {
            Ok((byte_len, print_calls)) => {
                let report = LoadReport {
                    resource: self.config.resource.clone(),
                    origin: self.fetcher.origin(),
                    byte_len,
                    print_calls,
                    stages,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                };
                tracing::info!(
                    resource = %report.resource,
                    bytes = report.byte_len,
                    prints = report.print_calls,
                    elapsed_ms = report.elapsed_ms,
                    "load complete"
                );
                Ok(report)
            }
            Err(e) => {
                let stage = e.stage().unwrap_or(Stage::Failed);
                tracing::error!(%stage, error = %e, "load failed");
                Err(e)
            }
        }
    }

    async fn run_steps(&self, stages: &mut Vec<Stage>) -> LoadResult<(usize, usize)> {
        let mut stage = Stage::NotStarted;
        let mut advance = |stages: &mut Vec<Stage>| {
            stage = stage.next();
            self.enter(stage);
            stages.push(stage);
        };

        advance(stages);
        let body = self.fetcher.fetch(&self.config.resource).await?;

        advance(stages);
        let bytes = body.bytes().await?;
        let byte_len = bytes.len();

        advance(stages);
        let module = self.engine.compile(bytes).await?;

        advance(stages);
        let mut instance = self
            .engine
            .instantiate(&module, &self.config.imports, Arc::clone(&self.log))
            .await?;

        advance(stages);
        instance.call(&self.config.entry_point)?;

        Ok((byte_len, instance.print_calls()))
    }

    /// Write the bootstrap line, then run the sequence.
    pub async fn bootstrap(&self) -> LoadResult<LoadReport> {
        self.log.line(CALLING_LOAD);
        self.load().await
    }

    /// Write the bootstrap line, then run the sequence as a detached task.
    ///
    /// The bootstrap line is written before this returns; the rest happens on
    /// the runtime. Must be called from within a tokio runtime.
    pub fn spawn(self) -> JoinHandle<LoadResult<LoadReport>> {
        self.log.line(CALLING_LOAD);
        tokio::spawn(async move { self.load().await })
    }

    /// Fetch and compile only, returning the module's declared interface.
    ///
    /// Writes the same progress lines as the first three stages of a load.
    pub async fn inspect(&self) -> LoadResult<ModuleInterface> {
        self.enter(Stage::Fetching);
        let body = self.fetcher.fetch(&self.config.resource).await?;
        self.enter(Stage::Buffering);
        let bytes = body.bytes().await?;
        self.enter(Stage::Compiling);
        let module = self.engine.compile(bytes).await?;
        Ok(module.interface())
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("origin", &self.fetcher.origin())
            .field("config", &self.config)
            .finish()
    }
}
