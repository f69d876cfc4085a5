//! bootwasm CLI - fetch, compile, instantiate and run a WebAssembly module.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{Config, SinkKind};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "bootwasm")]
#[command(
    author,
    version,
    about = "bootwasm - load and run a WebAssembly module",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: bootwasm.toml in this or a parent directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Flags shared by commands that load a module.
#[derive(clap::Args, Debug)]
struct LoadArgs {
    /// Directory or http(s) base URL to fetch from
    origin: Option<String>,

    /// Resource path relative to the origin
    #[arg(short, long)]
    resource: Option<String>,

    /// Extra namespace to offer `print` under (repeatable)
    #[arg(short, long = "alias")]
    aliases: Vec<String>,

    /// Where diagnostic lines go
    #[arg(long, value_enum)]
    sink: Option<SinkKind>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, compile, instantiate and run the module
    Run {
        #[command(flatten)]
        load: LoadArgs,

        /// Export to call after instantiation
        #[arg(short, long)]
        entry_point: Option<String>,
    },

    /// Fetch and compile the module, then list its imports and exports
    Inspect {
        #[command(flatten)]
        load: LoadArgs,
    },

    /// Serve a directory over HTTP
    Serve {
        /// Directory to serve
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Write a default bootwasm.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl LoadArgs {
    /// Fold command-line overrides into the loaded config.
    fn apply(&self, config: &mut Config) {
        if let Some(origin) = &self.origin {
            config.loader.origin = origin.clone();
        }
        if let Some(resource) = &self.resource {
            config.loader.resource = resource.clone();
        }
        for alias in &self.aliases {
            config.imports = config.imports.clone().with_alias(alias.clone());
        }
        if let Some(sink) = self.sink {
            config.log.sink = sink;
        }
    }
}

fn init_tracing(verbose: bool, sink: SinkKind) {
    let level = if verbose {
        Level::DEBUG
    } else if sink == SinkKind::Tracing {
        Level::INFO
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Run { load, entry_point } => {
            load.apply(&mut config);
            if let Some(entry_point) = entry_point {
                config.loader.entry_point = entry_point.clone();
            }
        }
        Commands::Inspect { load } => load.apply(&mut config),
        Commands::Serve { .. } | Commands::Init { .. } => {}
    }
    init_tracing(cli.verbose, config.log.sink);

    match cli.command {
        Commands::Run { load, .. } => commands::run::run(&config, load.json).await,
        Commands::Inspect { load } => commands::inspect::run(&config, load.json).await,
        Commands::Serve { dir, port, host } => commands::serve::run(&dir, &host, port).await,
        Commands::Init { path } => commands::init::run(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "bootwasm",
            "run",
            "http://127.0.0.1:8080/",
            "--resource",
            "app.wasm",
            "--alias",
            "host",
            "--sink",
            "tracing",
            "--entry-point",
            "start",
        ])
        .unwrap();

        let Commands::Run { load, entry_point } = cli.command else {
            panic!("expected run");
        };
        let mut config = Config::default();
        load.apply(&mut config);

        assert_eq!(config.loader.origin, "http://127.0.0.1:8080/");
        assert_eq!(config.loader.resource, "app.wasm");
        assert!(config.imports.provides("host", "print"));
        assert_eq!(config.log.sink, SinkKind::Tracing);
        assert_eq!(entry_point.as_deref(), Some("start"));
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["bootwasm", "inspect"]).unwrap();
        let Commands::Inspect { load } = cli.command else {
            panic!("expected inspect");
        };
        let mut config = Config::default();
        load.apply(&mut config);

        assert_eq!(config.loader.origin, ".");
        assert_eq!(config.loader.resource, "main_js.wasm");
        assert!(!load.json);
    }
}
