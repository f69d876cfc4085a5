//! Host side of the import set: the `print` function.
//!
//! `print` is bound with the exact function type the module declares, as long
//! as that type is one of the shapes [`PrintSignature`] accepts. Imports the
//! set does not provide are left unbound so that instantiation reports them.

use bootwasm_core::imports::PRINT;
use bootwasm_core::{
    ImportSet, LoadError, LoadResult, PrintSignature, PrintValue, SharedLog, ValueKind,
};
use std::collections::HashSet;
use wasmtime::{Caller, ExternType, Linker, Module, Val, ValType};

/// Per-store state visible to host functions.
pub struct HostState {
    log: SharedLog,
    print_calls: usize,
}

impl HostState {
    pub fn new(log: SharedLog) -> Self {
        Self { log, print_calls: 0 }
    }

    /// How many times the module called `print`.
    pub fn print_calls(&self) -> usize {
        self.print_calls
    }
}

/// Map a wasmtime value type to the numeric kinds `print` understands.
pub(crate) fn value_kind(ty: &ValType) -> Option<ValueKind> {
    match ty {
        ValType::I32 => Some(ValueKind::I32),
        ValType::I64 => Some(ValueKind::I64),
        ValType::F32 => Some(ValueKind::F32),
        ValType::F64 => Some(ValueKind::F64),
        _ => None,
    }
}

/// Define `print` in `linker` for every namespace of `imports` that `module` imports it from.
pub(crate) fn link_print(
    linker: &mut Linker<HostState>,
    module: &Module,
    imports: &ImportSet,
) -> LoadResult<()> {
    let mut linked = HashSet::new();

    for import in module.imports() {
        if !imports.provides(import.module(), import.name()) {
            continue;
        }
        let namespace = import.module().to_string();
        if linked.contains(&namespace) {
            continue;
        }

        let ExternType::Func(ty) = import.ty() else {
            return Err(LoadError::Instantiate(format!(
                "import `{}.{}` must be a function",
                namespace, PRINT
            )));
        };

        let params: Option<Vec<ValueKind>> = ty.params().map(|p| value_kind(&p)).collect();
        let signature = params
            .and_then(|params| PrintSignature::from_types(&params, ty.results().len()))
            .ok_or_else(|| {
                LoadError::Instantiate(format!(
                    "import `{}.{}` has unsupported type {}",
                    namespace,
                    PRINT,
                    crate::engine::describe_func(&ty)
                ))
            })?;

        tracing::debug!(namespace = %namespace, ?signature, "binding print import");
        linker
            .func_new(&namespace, PRINT, ty.clone(), move |mut caller, params, _results| {
                let value = decode(&mut caller, signature, params)?;
                let state = caller.data_mut();
                state.print_calls += 1;
                state.log.line(&value.to_string());
                Ok(())
            })
            .map_err(|e| LoadError::Instantiate(format!("{:#}", e)))?;

        linked.insert(namespace);
    }

    Ok(())
}

fn decode(
    caller: &mut Caller<'_, HostState>,
    signature: PrintSignature,
    params: &[Val],
) -> wasmtime::Result<PrintValue> {
    match signature {
        PrintSignature::Number(_) => match params {
            [Val::I32(v)] => Ok(PrintValue::I32(*v)),
            [Val::I64(v)] => Ok(PrintValue::I64(*v)),
            [Val::F32(bits)] => Ok(PrintValue::F32(f32::from_bits(*bits))),
            [Val::F64(bits)] => Ok(PrintValue::F64(f64::from_bits(*bits))),
            _ => Err(wasmtime::Error::msg("print expects one numeric argument")),
        },
        PrintSignature::Text => {
            let (ptr, len) = match params {
                [Val::I32(ptr), Val::I32(len)] => (*ptr as u32 as usize, *len as u32 as usize),
                _ => return Err(wasmtime::Error::msg("print expects (ptr, len)")),
            };
            let memory = caller
                .get_export("memory")
                .and_then(|export| export.into_memory())
                .ok_or_else(|| {
                    wasmtime::Error::msg("print(ptr, len) requires an exported `memory`")
                })?;

            let data = memory.data(&*caller);
            let end = ptr
                .checked_add(len)
                .filter(|end| *end <= data.len())
                .ok_or_else(|| {
                    wasmtime::Error::msg(format!(
                        "print range {}..{} is out of bounds",
                        ptr,
                        ptr.saturating_add(len)
                    ))
                })?;
            let text = std::str::from_utf8(&data[ptr..end])
                .map_err(|e| wasmtime::Error::msg(format!("print text is not UTF-8: {}", e)))?;
            Ok(PrintValue::Text(text.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind_mapping() {
        assert_eq!(value_kind(&ValType::I32), Some(ValueKind::I32));
        assert_eq!(value_kind(&ValType::F64), Some(ValueKind::F64));
        assert_eq!(value_kind(&ValType::V128), None);
    }
}
