use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use nkevo_sim::simulation::Simulation;
use nkevo_sim::storage::{format_stats_row, STATS_HEADER};
use std::io::IsTerminal;

use crate::args::RunArgs;
use crate::defaults::PROGRESS_TEMPLATE;
use crate::printing::{print_landscape, print_parameters, print_summary};

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    println!("🧬 nkevo - Running Simulation");
    println!("============================================\n");

    let config = args.configuration()?;
    let mut sim = Simulation::new(config).context("Failed to initialize simulation")?;

    println!("Configuration:");
    print_parameters(sim.config());
    print_landscape("Landscape", sim.landscape());
    if !sim.config().evolution.shocks.is_empty() {
        print_landscape("Shock landscape", sim.shock_landscape());
    }
    println!();

    let max_generations = sim.config().execution.max_generations;
    let progress = sim.config().execution.progress;
    println!("Running {max_generations} generations...");

    // a hidden bar would swallow the progress rows
    let pb = if args.show_progress_bar() && std::io::stderr().is_terminal() {
        let pb = ProgressBar::new(u64::from(max_generations) + 1);
        pb.set_style(ProgressStyle::with_template(PROGRESS_TEMPLATE)?.progress_chars("#>-"));
        Some(pb)
    } else {
        None
    };
    let report = |line: String| match &pb {
        Some(pb) => pb.println(line),
        None => println!("{line}"),
    };

    if progress > 0 {
        report(STATS_HEADER.to_string());
    }
    let summary = sim.run_with(|population| {
        let generation = population.generation();
        if let Some(pb) = &pb {
            pb.set_position(u64::from(generation));
        }
        if progress > 0 && generation % progress == 0 {
            report(format_stats_row(
                generation,
                population.statistics(),
                population.cutoff(),
            ));
        }
    });

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    print_summary(&summary, sim.paths(), sim.config().execution.trace);
    Ok(())
}
