//! ATP CLI - replace <terraform:...> placeholders in Kubernetes manifests

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "atp")]
#[command(author = "ATP Contributors")]
#[command(version)]
#[command(about = "Replace <terraform:...> placeholders in Kubernetes manifests with Terraform outputs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate manifests with placeholders replaced
    Generate {
        /// Manifest file, directory of manifests, or `-` for stdin
        path: PathBuf,

        /// Configuration file for the state backend
        #[arg(short = 'c', long = "config-path", env = "ATP_CONFIG_PATH")]
        config_path: Option<PathBuf>,
    },

    /// Print the version
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate { path, config_path } => {
            commands::generate::run(&path, config_path.as_deref())
        }
        Commands::Version => commands::version::run(),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
