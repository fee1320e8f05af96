use anyhow::{Context, Result};
use nkevo_sim::landscape::{Landscape, NkParams};

use crate::args::PeaksArgs;
use crate::printing::print_landscape;

pub fn show_peaks(args: &PeaksArgs) -> Result<()> {
    let params = NkParams::new(args.genome_length, args.epistasis_size)?;
    let mut landscape = Landscape::load(params, &args.landscape)
        .with_context(|| format!("Failed to load landscape {}", args.landscape.display()))?;
    if args.recompute || !landscape.has_peaks() {
        landscape.locate_peaks();
    }

    print_landscape(&args.landscape.display().to_string(), &landscape);

    let mut peaks: Vec<(u32, f64)> = landscape.peaks().iter().collect();
    peaks.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let shown = match args.limit {
        0 => peaks.len(),
        limit => limit.min(peaks.len()),
    };

    let space = landscape.space();
    println!("\n{:>10}  {:>w$}  {:>9}", "genome", "bits", "fitness", w = space.bits() as usize);
    for &(genome, fitness) in &peaks[..shown] {
        println!(
            "{genome:>10}  {}  {fitness:9.6}",
            space.to_bit_string(genome)
        );
    }
    if shown < peaks.len() {
        println!("... {} more (--limit 0 lists all)", peaks.len() - shown);
    }
    Ok(())
}
