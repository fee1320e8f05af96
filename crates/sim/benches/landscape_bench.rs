use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nkevo_sim::landscape::{Epistasis, Landscape, NkParams};

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");
    for &(n, k) in &[(10u32, 2u32), (16, 4), (24, 8)] {
        let params = NkParams::new(n, k).unwrap();
        let landscape = Landscape::generate(params, Epistasis::Random, 42);
        let genomes: Vec<u32> = (0..1024u32)
            .map(|i| i.wrapping_mul(2_654_435_761) >> (32 - n))
            .collect();
        group.throughput(Throughput::Elements(genomes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("N={n}/K={k}")),
            &genomes,
            |b, genomes| {
                b.iter(|| {
                    genomes
                        .iter()
                        .map(|&g| landscape.fitness(black_box(g)))
                        .sum::<f64>()
                })
            },
        );
    }
    group.finish();
}

fn bench_peaks(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate_peaks");
    group.sample_size(10);
    for &n in &[12u32, 16, 18] {
        let params = NkParams::new(n, 4).unwrap();
        let landscape = Landscape::generate(params, Epistasis::Adjacent, 7);
        group.throughput(Throughput::Elements(1u64 << n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &landscape, |b, landscape| {
            b.iter_batched(
                || landscape.clone(),
                |mut l| {
                    l.locate_peaks();
                    l.peaks().len()
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_correlated(c: &mut Criterion) {
    let params = NkParams::new(14, 6).unwrap();
    let base = Landscape::generate(params, Epistasis::Random, 3);
    c.bench_function("correlated/N=14/K=6", |b| {
        b.iter(|| Landscape::correlated(&base, black_box(0.5), 11))
    });
}

criterion_group!(benches, bench_fitness, bench_peaks, bench_correlated);
criterion_main!(benches);
