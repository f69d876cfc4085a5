//! The host import set.
//!
//! A module sees exactly one host function, `print`. It is registered under
//! a primary namespace (`imports` by default) and optionally under aliases,
//! e.g. `host`, which some toolchains emit.

use serde::{Deserialize, Serialize};

/// Namespace the `print` import is expected under.
pub const DEFAULT_NAMESPACE: &str = "imports";

/// Name of the single host function.
pub const PRINT: &str = "print";

/// Namespaces under which `print` is offered to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSet {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for ImportSet {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            aliases: Vec::new(),
        }
    }
}

impl ImportSet {
    /// `print` under `imports`, no aliases.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Also offer `print` under `namespace`.
    pub fn with_alias(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        if namespace != self.namespace && !self.aliases.contains(&namespace) {
            self.aliases.push(namespace);
        }
        self
    }

    /// Every namespace `print` is offered under, primary first.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.namespace.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether this set supplies `module.name`.
    pub fn provides(&self, module: &str, name: &str) -> bool {
        name == PRINT && self.namespaces().any(|ns| ns == module)
    }
}
