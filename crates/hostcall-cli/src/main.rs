//! hostcall CLI
//!
//! Exposes a demo set of native functions through a bridge session and
//! calls them from the command line, the way a guest VM would.

mod commands;
mod natives;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use hostcall_engine::{create_registry_with_config, destroy_registry, BridgeConfig, VmHandle};
use hostcall_sdk::CoercionPolicy;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "hostcall.toml";

#[derive(Parser)]
#[command(name = "hostcall")]
#[command(about = "Call native functions through the hostcall bridge", long_about = None)]
#[command(version)]
struct Cli {
    /// Bridge configuration file (default: ./hostcall.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Coerce arguments like the guest does instead of requiring exact types
    #[arg(long, global = true)]
    lenient: bool,

    /// Log bridge activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List exposed native functions
    List,

    /// Call a native function
    Call {
        /// Function name (e.g. "add", "math.sqrt")
        name: String,
        /// Arguments as JSON literals; bare words are strings
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the effective configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>, lenient: bool) -> anyhow::Result<BridgeConfig> {
    let config = match path {
        Some(path) => BridgeConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => BridgeConfig::from_file(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG))?,
        None => BridgeConfig::default(),
    };

    Ok(if lenient {
        config.with_coercion(CoercionPolicy::Lenient)
    } else {
        config
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.lenient)?;
    let session = create_registry_with_config(VmHandle::new(u64::from(std::process::id())), config);
    natives::install(&session).context("Failed to expose demo natives")?;

    let succeeded = match cli.command {
        Commands::List => {
            commands::list::execute(&session)?;
            true
        }
        Commands::Call { name, args } => commands::call::execute(&session, &name, &args)?,
        Commands::Config => {
            commands::config::execute(&session)?;
            true
        }
    };

    destroy_registry(session);
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
