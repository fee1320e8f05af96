mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{LandscapeArgs, PeaksArgs, RunArgs};
use commands::{landscape, peaks, run};

/// nkevo: directional evolution on NK fitness landscapes
///
/// Simulates a haploid population replicating and mutating on a tunable
/// rugged fitness landscape, under a rising selection cutoff and occasional
/// environmental shocks.
#[derive(Parser, Debug)]
#[command(name = "nkevo")]
#[command(author, version, about = "Simulates directional evolution on NK fitness landscapes", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation.
    ///
    /// Parameters come from flags, from a JSON configuration file
    /// (--config), or from a file with individual flags overriding it.
    Run(Box<RunArgs>),

    /// Generate an NK landscape and write it to a file.
    Landscape(LandscapeArgs),

    /// Load a landscape file and list its fitness peaks.
    Peaks(PeaksArgs),
}

fn init_tracing(verbose: u8) -> Result<()> {
    let directive = match verbose {
        0 => "nkevo_sim=info",
        1 => "nkevo_sim=debug",
        _ => "nkevo_sim=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Run(args) => {
            run::run_simulation(&args)?;
        }
        Commands::Landscape(args) => {
            landscape::generate_landscape(&args)?;
        }
        Commands::Peaks(args) => {
            peaks::show_peaks(&args)?;
        }
    }

    Ok(())
}
