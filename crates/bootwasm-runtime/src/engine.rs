//! wasmtime engine wrapper.
//!
//! Compilation and instantiation are CPU-bound, so both run on tokio's
//! blocking pool; the calling task suspends until they finish. Calling the
//! entry point is synchronous.

use crate::host::{self, HostState};
use bootwasm_core::{
    ExportDescriptor, ImportDescriptor, ImportSet, LoadError, LoadResult, ModuleInterface,
    SharedLog,
};
use wasmtime::{Engine, ExternType, FuncType, Instance, Linker, Module, Store};

/// Render a function type as `func(i32, i32) -> (i32)`.
pub(crate) fn describe_func(ty: &FuncType) -> String {
    let params: Vec<String> = ty.params().map(|p| p.to_string()).collect();
    let results: Vec<String> = ty.results().map(|r| r.to_string()).collect();
    if results.is_empty() {
        format!("func({})", params.join(", "))
    } else {
        format!("func({}) -> ({})", params.join(", "), results.join(", "))
    }
}

fn describe_extern(ty: &ExternType) -> String {
    match ty {
        ExternType::Func(f) => describe_func(f),
        ExternType::Memory(_) => "memory".to_string(),
        ExternType::Table(_) => "table".to_string(),
        ExternType::Global(_) => "global".to_string(),
        #[allow(unreachable_patterns)]
        _ => "other".to_string(),
    }
}

/// A shared wasmtime engine. Cheap to clone.
#[derive(Clone, Default)]
pub struct WasmEngine {
    engine: Engine,
}

impl WasmEngine {
    /// Engine with wasmtime's default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile binary (or text-format) module bytes.
    pub async fn compile(&self, bytes: Vec<u8>) -> LoadResult<CompiledModule> {
        let engine = self.engine.clone();
        let module = tokio::task::spawn_blocking(move || Module::new(&engine, &bytes))
            .await
            .map_err(|e| LoadError::Compile(format!("compile task failed: {}", e)))?
            .map_err(|e| LoadError::Compile(format!("{:#}", e)))?;
        Ok(CompiledModule { module })
    }

    /// Instantiate `module`, binding `print` from `imports` to `log`.
    pub async fn instantiate(
        &self,
        module: &CompiledModule,
        imports: &ImportSet,
        log: SharedLog,
    ) -> LoadResult<LoadedInstance> {
        let engine = self.engine.clone();
        let module = module.module.clone();
        let imports = imports.clone();

        tokio::task::spawn_blocking(move || -> LoadResult<LoadedInstance> {
            let mut linker = Linker::new(&engine);
            host::link_print(&mut linker, &module, &imports)?;

            let mut store = Store::new(&engine, HostState::new(log));
            let instance = linker
                .instantiate(&mut store, &module)
                .map_err(|e| LoadError::Instantiate(format!("{:#}", e)))?;
            Ok(LoadedInstance { store, instance })
        })
        .await
        .map_err(|e| LoadError::Instantiate(format!("instantiate task failed: {}", e)))?
    }
}

/// A validated, compiled module that has not been instantiated.
#[derive(Clone)]
pub struct CompiledModule {
    module: Module,
}

impl CompiledModule {
    /// Declared imports and exports.
    pub fn interface(&self) -> ModuleInterface {
        let imports = self
            .module
            .imports()
            .map(|import| ImportDescriptor {
                module: import.module().to_string(),
                name: import.name().to_string(),
                kind: describe_extern(&import.ty()),
            })
            .collect();
        let exports = self
            .module
            .exports()
            .map(|export| ExportDescriptor {
                name: export.name().to_string(),
                kind: describe_extern(&export.ty()),
            })
            .collect();
        ModuleInterface { imports, exports }
    }
}

/// An instance together with the store that owns it.
pub struct LoadedInstance {
    store: Store<HostState>,
    instance: Instance,
}

impl LoadedInstance {
    /// Call the zero-argument, no-result export `name`.
    pub fn call(&mut self, name: &str) -> LoadResult<()> {
        let func = self
            .instance
            .get_typed_func::<(), ()>(&mut self.store, name)
            .map_err(|e| LoadError::MissingEntryPoint {
                name: name.to_string(),
                reason: format!("{:#}", e),
            })?;
        func.call(&mut self.store, ())
            .map_err(|e| LoadError::Trap(format!("{:#}", e)))
    }

    /// How many times the module has called `print`.
    pub fn print_calls(&self) -> usize {
        self.store.data().print_calls()
    }
}
