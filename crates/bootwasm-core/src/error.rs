//! Error types for the load sequence.

use crate::stage::Stage;
use thiserror::Error;

/// Errors that abort a load.
///
/// Engine failures arrive as `anyhow`-style errors and are kept as their
/// formatted message chain.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch of `{path}` failed: {reason}")]
    Fetch { path: String, reason: String },

    #[error("reading response body failed: {0}")]
    Body(String),

    #[error("compilation failed: {0}")]
    Compile(String),

    #[error("instantiation failed: {0}")]
    Instantiate(String),

    #[error("entry point `{name}` unavailable: {reason}")]
    MissingEntryPoint { name: String, reason: String },

    #[error("entry point trapped: {0}")]
    Trap(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

impl LoadError {
    /// Build a fetch error for `path`.
    pub fn fetch(path: impl Into<String>, reason: impl ToString) -> Self {
        LoadError::Fetch {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// The stage that was executing when this error occurred, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            LoadError::Fetch { .. } => Some(Stage::Fetching),
            LoadError::Body(_) => Some(Stage::Buffering),
            LoadError::Compile(_) => Some(Stage::Compiling),
            LoadError::Instantiate(_) => Some(Stage::Instantiating),
            LoadError::MissingEntryPoint { .. } | LoadError::Trap(_) => Some(Stage::Running),
            LoadError::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_attribution() {
        assert_eq!(
            LoadError::fetch("main_js.wasm", "connection refused").stage(),
            Some(Stage::Fetching)
        );
        assert_eq!(LoadError::Compile("bad magic".into()).stage(), Some(Stage::Compiling));
        assert_eq!(LoadError::Trap("unreachable".into()).stage(), Some(Stage::Running));
        assert_eq!(LoadError::Config("no origin".into()).stage(), None);
    }

    #[test]
    fn test_display() {
        let err = LoadError::fetch("main_js.wasm", "connection refused");
        assert_eq!(err.to_string(), "fetch of `main_js.wasm` failed: connection refused");
    }
}
