//! Configuration management for the bootwasm CLI.

use anyhow::{Context, Result};
use bootwasm_core::{ConsoleLog, ImportSet, SharedLog, TracingLog};
use bootwasm_runtime::{LoaderConfig, DEFAULT_ENTRY_POINT, DEFAULT_RESOURCE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name searched for in the current and parent directories.
pub const CONFIG_FILE: &str = "bootwasm.toml";

/// bootwasm configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub loader: LoaderSection,
    #[serde(default)]
    pub imports: ImportSet,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSection {
    /// Directory or `http(s)://` base URL the resource is resolved against.
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_resource")]
    pub resource: String,
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogSection {
    #[serde(default)]
    pub sink: SinkKind,
}

/// Where diagnostic lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// One line per message on stdout.
    #[default]
    Console,
    /// INFO events through the tracing subscriber.
    Tracing,
}

fn default_origin() -> String { ".".to_string() }
fn default_resource() -> String { DEFAULT_RESOURCE.to_string() }
fn default_entry_point() -> String { DEFAULT_ENTRY_POINT.to_string() }

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            resource: default_resource(),
            entry_point: default_entry_point(),
        }
    }
}

impl Config {
    /// Load config from `explicit`, or from bootwasm.toml in the current or
    /// parent directories, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(),
        };
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Config::default()),
        }
    }

    /// Parse a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Loader settings derived from this config.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig::default()
            .with_resource(self.loader.resource.clone())
            .with_entry_point(self.loader.entry_point.clone())
            .with_imports(self.imports.clone())
    }

    /// The diagnostic sink selected by `[log] sink`.
    pub fn diagnostic_log(&self) -> SharedLog {
        match self.log.sink {
            SinkKind::Console => Arc::new(ConsoleLog),
            SinkKind::Tracing => Arc::new(TracingLog),
        }
    }
}

/// Find bootwasm.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [loader]
            origin = "http://127.0.0.1:8080/"

            [imports]
            aliases = ["host"]
            "#,
        )
        .unwrap();

        assert_eq!(config.loader.origin, "http://127.0.0.1:8080/");
        assert_eq!(config.loader.resource, "main_js.wasm");
        assert_eq!(config.imports.namespace, "imports");
        assert_eq!(config.log.sink, SinkKind::Console);

        let loader = config.loader_config();
        assert_eq!(loader.entry_point, "main");
        assert!(loader.imports.provides("host", "print"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.log.sink = SinkKind::Tracing;
        config.loader.resource = "app.wasm".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.log.sink, SinkKind::Tracing);
        assert_eq!(loaded.loader.resource, "app.wasm");
    }

    #[test]
    fn test_invalid_sink_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[log]\nsink = \"syslog\"\n");
        assert!(result.is_err());
    }
}
