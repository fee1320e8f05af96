use nkevo_sim::landscape::Landscape;
use nkevo_sim::simulation::{Configuration, InitializationConfig, RunSummary};
use nkevo_sim::storage::{OutputPaths, TraceFormat};

pub fn print_parameters(config: &Configuration) {
    let execution = &config.execution;
    let landscape = &config.landscape;
    let evolution = &config.evolution;

    println!("\n📋 Simulation Configuration");
    println!(
        "  • Generations: {} [-g, --generations]",
        execution.max_generations
    );
    match execution.seed {
        Some(seed) => println!("  • Random Seed: {seed} [--seed]"),
        None => println!("  • Random Seed: Random [--seed]"),
    }
    match &config.initialization {
        InitializationConfig::Random { size } => {
            println!("  • Initial Population: {size} random genomes [-p, --population]")
        }
        InitializationConfig::File { path, size } => println!(
            "  • Initial Population: {} (fallback: {size} random genomes) [--population-file]",
            path.display()
        ),
        InitializationConfig::Genomes { entries } => {
            println!("  • Initial Population: {} listed genotypes", entries.len())
        }
    }

    println!("\n🏔  Landscape");
    println!(
        "  • N = {} [-n], K = {} [-k], epistasis: {} [--epistasis]",
        landscape.n, landscape.k, landscape.epistasis
    );
    if let Some(file) = &landscape.file {
        println!("  • File: {} [-l, --landscape]", file.display());
    }
    if !evolution.shocks.is_empty() {
        match landscape.rho {
            Some(rho) => println!(
                "  • Shock Landscape: correlated, rho = {rho:.2}, seed {} [--rho, --shock-seed]",
                landscape.shock_seed
            ),
            None => println!(
                "  • Shock Landscape: independent, seed {} [--shock-seed]",
                landscape.shock_seed
            ),
        }
    }

    println!("\n⚡ Replication");
    println!("  • Mutation: {} [-m, --mutation]", evolution.mutation);
    println!(
        "  • Fitness Window: [{:.3}, {:.3}] [--min-fit, --max-fit]",
        evolution.replication.min_fit, evolution.replication.max_fit
    );
    if evolution.max_population > 0 {
        println!(
            "  • Population Ceiling: {} (alpha = {:.2}) [--max-population, --alpha]",
            evolution.max_population, evolution.alpha
        );
    }

    println!("\n🎯 Selection");
    println!(
        "  • Cutoffs: {:?} [--cutoffs]",
        evolution.cutoffs.to_list()
    );
    if evolution.shocks.is_empty() {
        println!("  • Shocks: none [--shocks]");
    } else {
        for &(generation, threshold) in evolution.shocks.events() {
            println!("  • Shock at generation {generation}: threshold {threshold:.3}");
        }
    }
    println!();
}

pub fn print_landscape(label: &str, landscape: &Landscape) {
    println!(
        "{label}: N = {}, K = {}, seed {}",
        landscape.n(),
        landscape.k(),
        landscape.seed()
    );
    match (landscape.min_peak(), landscape.max_peak()) {
        (Some(min), Some(max)) => println!(
            "  • {} peaks, fitness {min:.6} to {max:.6}",
            landscape.peaks().len()
        ),
        _ => println!("  • Peaks not located"),
    }
}

pub fn print_summary(summary: &RunSummary, paths: &OutputPaths, trace: TraceFormat) {
    if summary.extinct {
        println!(
            "\n✗ Population extinct at generation {}",
            summary.generation
        );
    } else {
        println!("\n✓ Simulation complete!");
        println!("  Final generation: {}", summary.generation);
        println!(
            "  Population: {} individuals, {} genotypes",
            summary.stats.population_size, summary.stats.unique_genomes
        );
        println!(
            "  Fitness: average {:.4}, max {:.4}",
            summary.stats.average_fitness, summary.stats.max_fitness
        );
    }
    if summary.shocks > 0 {
        println!("  Shocks applied: {}", summary.shocks);
    }

    println!("\n📁 Outputs");
    println!("  • Statistics: {}", paths.stats().display());
    println!("  • Population: {}", paths.population().display());
    println!("  • Landscapes: {}, {}", paths.landscape().display(), paths.shock_landscape().display());
    if let Some(trace) = paths.trace(trace) {
        println!("  • Trace: {}", trace.display());
    }
    println!("  • Configuration: {}", paths.config().display());
}
