//! End-to-end runs through the simulation driver.

use nkevo_sim::evolution::{CutoffSchedule, MutationStrategy, ShockSchedule};
use nkevo_sim::simulation::{read_population, Configuration, InitializationConfig, Simulation};
use nkevo_sim::storage::TraceFormat;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn config_in(dir: &Path, name: &str) -> Configuration {
    let mut config = Configuration::default();
    config.landscape.n = 10;
    config.landscape.k = 3;
    config.execution.max_generations = 15;
    config.execution.seed = Some(4242);
    config.execution.output = dir.join(name);
    config.evolution.mutation = MutationStrategy::MultiRandom { rate: 0.1 };
    config.evolution.cutoffs = CutoffSchedule::from_list(&[0.3, 5.0, 0.4]).unwrap();
    config.evolution.max_population = 3_000;
    config.initialization = InitializationConfig::Random { size: 200 };
    config
}

#[test]
fn test_same_seed_reproduces_outputs() {
    let dir = tempdir().unwrap();
    let mut a = Simulation::new(config_in(dir.path(), "a.txt")).unwrap();
    let mut b = Simulation::new(config_in(dir.path(), "b.txt")).unwrap();
    a.run();
    b.run();

    for prefix in ["stats-", "land-", "pop-"] {
        let left = fs::read_to_string(dir.path().join(format!("{prefix}a.txt"))).unwrap();
        let right = fs::read_to_string(dir.path().join(format!("{prefix}b.txt"))).unwrap();
        assert_eq!(left, right, "{prefix} outputs differ");
    }
}

#[test]
fn test_different_seeds_diverge() {
    let dir = tempdir().unwrap();
    let mut a = Simulation::new(config_in(dir.path(), "a.txt")).unwrap();
    let mut config = config_in(dir.path(), "b.txt");
    config.execution.seed = Some(4243);
    let mut b = Simulation::new(config).unwrap();
    a.run();
    b.run();
    let left = fs::read_to_string(dir.path().join("stats-a.txt")).unwrap();
    let right = fs::read_to_string(dir.path().join("stats-b.txt")).unwrap();
    assert_ne!(left, right);
}

#[test]
fn test_saved_configuration_reproduces_run() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path(), "first.txt");
    config.execution.seed = None;
    let mut first = Simulation::new(config).unwrap();
    first.run();

    let mut replay = Configuration::load(&dir.path().join("conf-first.txt")).unwrap();
    assert_eq!(replay.execution.seed, Some(first.seed()));
    replay.execution.output = dir.path().join("second.txt");
    let mut second = Simulation::new(replay).unwrap();
    second.run();

    let left = fs::read_to_string(dir.path().join("stats-first.txt")).unwrap();
    let right = fs::read_to_string(dir.path().join("stats-second.txt")).unwrap();
    assert_eq!(left, right);
}

#[test]
fn test_landscape_file_is_written_then_reused() {
    let dir = tempdir().unwrap();
    let land = dir.path().join("landscape.txt");
    let mut config = config_in(dir.path(), "a.txt");
    config.landscape.file = Some(land.clone());
    let sim = Simulation::new(config.clone()).unwrap();
    assert!(land.exists());
    let written = fs::read_to_string(&land).unwrap();

    // a different seed no longer matters once the file exists
    config.execution.seed = Some(1);
    let reused = Simulation::new(config).unwrap();
    for g in 0..1024 {
        assert_eq!(reused.landscape().fitness(g), sim.landscape().fitness(g));
    }
    assert_eq!(reused.landscape().peaks(), sim.landscape().peaks());
    assert_eq!(fs::read_to_string(&land).unwrap(), written);
}

#[test]
fn test_final_population_seeds_the_next_run() {
    let dir = tempdir().unwrap();
    let mut first = Simulation::new(config_in(dir.path(), "a.txt")).unwrap();
    let summary = first.run();
    assert!(!summary.extinct);

    let pop_file = dir.path().join("pop-a.txt");
    let entries = read_population(&pop_file, first.population().space()).unwrap();
    let total: u64 = entries.iter().map(|&(_, c)| u64::from(c)).sum();
    assert_eq!(total, summary.stats.population_size);

    let mut config = config_in(dir.path(), "b.txt");
    config.initialization = InitializationConfig::File {
        path: pop_file,
        size: 5,
    };
    let second = Simulation::new(config).unwrap();
    assert_eq!(second.population().population_size(), total);
    assert_eq!(second.generation(), 0);
}

#[test]
fn test_shocks_are_traced() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path(), "s.txt");
    config.landscape.rho = Some(0.5);
    config.evolution.shocks = ShockSchedule::from_list(&[3.0, 0.1, 8.0, 0.2]).unwrap();
    config.execution.trace = TraceFormat::Tsv;
    let mut sim = Simulation::new(config).unwrap();
    let summary = sim.run();
    assert_eq!(summary.shocks, 2);

    let trace = fs::read_to_string(dir.path().join("tsv-s.txt")).unwrap();
    let mut lines = trace.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Generation\tGenome\tCount\tFitness\tCutoff\tshock\tshockFitness"
    );
    let shocked_rows: Vec<Vec<&str>> = lines
        .map(|l| l.split('\t').collect::<Vec<_>>())
        .filter(|fields| fields[5].trim() != "0.000000")
        .collect();
    assert!(!shocked_rows.is_empty());
    for fields in shocked_rows {
        assert!(fields[0] == "3" || fields[0] == "8");
        assert_eq!(fields[4].trim(), "0.000000");
    }
    assert!(dir.path().join("sland-s.txt").exists());
}

#[test]
fn test_configuration_file_drives_a_run() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("json.txt");
    let json = format!(
        r#"{{
            "execution": {{"max_generations": 4, "seed": 9, "progress": 1, "output": {:?}}},
            "landscape": {{"n": 6, "k": 1, "epistasis": "random"}},
            "evolution": {{"mutation": {{"strategy": "replicate"}}, "cutoffs": [0.0]}},
            "initialization": {{"genomes": {{"entries": [[3, 5], [60, 2]]}}}}
        }}"#,
        output.display().to_string()
    );
    let path = dir.path().join("config.json");
    fs::write(&path, json).unwrap();

    let config = Configuration::load(&path).unwrap();
    let mut sim = Simulation::new(config).unwrap();
    assert_eq!(sim.population().population_size(), 7);
    let summary = sim.run();
    assert_eq!(summary.generation, 5);
    // replication without mutation only ever copies the two genotypes
    assert_eq!(summary.stats.unique_genomes, 2);
    assert_eq!(summary.stats.population_size, 7 * 32);
}
