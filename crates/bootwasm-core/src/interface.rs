//! Declared imports and exports of a compiled module.

use crate::imports::ImportSet;
use serde::{Deserialize, Serialize};

/// One declared import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDescriptor {
    pub module: String,
    pub name: String,
    /// Human-readable type, e.g. `func(i32)` or `memory`.
    pub kind: String,
}

/// One declared export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDescriptor {
    pub name: String,
    pub kind: String,
}

/// Everything a module declares at its boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInterface {
    pub imports: Vec<ImportDescriptor>,
    pub exports: Vec<ExportDescriptor>,
}

impl ModuleInterface {
    /// Imports `set` does not supply.
    pub fn unsatisfied(&self, set: &ImportSet) -> Vec<&ImportDescriptor> {
        self.imports
            .iter()
            .filter(|import| !set.provides(&import.module, &import.name))
            .collect()
    }

    /// Whether an export named `name` exists.
    pub fn exports_named(&self, name: &str) -> bool {
        self.exports.iter().any(|e| e.name == name)
    }
}
