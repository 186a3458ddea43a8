use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use pipeline_preflight::integrate::IntegrateCommand;
use pipeline_preflight::logging;
use pipeline_preflight::probe::{ProbeSettings, DEFAULT_TIMEOUT_SECS};
use pipeline_preflight::validate_env::ValidateEnvCommand;
use pipeline_preflight::PreflightError;

#[derive(Parser)]
#[command(name = "preflight")]
#[command(version)]
#[command(about = "Pipeline preflight - check submodules and environment configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Project root containing the extraction and orchestration modules"
    )]
    root: PathBuf,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Check the extraction submodule and plan its integration")]
    Integrate,

    #[command(about = "Validate environment files and test service connectivity")]
    ValidateEnv {
        #[arg(long, help = "Skip connectivity probes")]
        skip_probes: bool,

        #[arg(
            long,
            value_name = "SECS",
            default_value_t = DEFAULT_TIMEOUT_SECS,
            help = "Timeout for each connectivity probe"
        )]
        probe_timeout: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("{} {}", "⚠".yellow(), e);
    }

    if cli.verbose {
        eprintln!("{}", "Verbose mode enabled".dimmed());
    }

    if let Err(e) = run(cli) {
        eprintln!("{e}");
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), PreflightError> {
    match cli.command {
        Commands::Integrate => {
            IntegrateCommand::new(cli.root, cli.verbose).execute()?;
        }
        Commands::ValidateEnv {
            skip_probes,
            probe_timeout,
        } => {
            let settings = ProbeSettings {
                timeout: Duration::from_secs(probe_timeout),
                ..ProbeSettings::default()
            };
            ValidateEnvCommand::new(cli.root, cli.verbose)
                .skip_probes(skip_probes)
                .with_settings(settings)
                .execute()?;
        }
    }

    Ok(())
}
