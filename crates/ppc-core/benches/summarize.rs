//! Criterion benchmarks for draw flattening, summaries and figure assembly.
//!
//! Pool sizes mirror typical sampler output: 4 chains of 250 to 2500 draws.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ppc_core::inference::InferenceData;
use ppc_core::render::{plot_posterior_predictive_distribution, GridOptions};
use ppc_core::select::{seeded_rng, Selection};
use ppc_core::summary::summarize;

const N_CHAINS: usize = 4;
const N_OBS: usize = 200;

fn chains(n_draws: usize) -> Vec<Vec<Vec<f64>>> {
    (0..N_CHAINS)
        .map(|c| {
            (0..n_draws)
                .map(|d| {
                    (0..N_OBS)
                        .map(|i| i as f64 + ((c * n_draws + d) as f64 * 0.618).sin())
                        .collect()
                })
                .collect()
        })
        .collect()
}

fn observed() -> Vec<f64> {
    (0..N_OBS).map(|i| i as f64).collect()
}

fn bench_from_chains(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference/from_chains");

    for n_draws in [250usize, 1000, 2500] {
        let raw = chains(n_draws);
        group.bench_with_input(BenchmarkId::new("draws", n_draws), &raw, |b, raw| {
            b.iter(|| {
                let data = InferenceData::from_chains(observed(), black_box(raw.clone()));
                black_box(data.unwrap().n_observations());
            })
        });
    }

    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary/summarize");

    for n_draws in [250usize, 1000, 2500] {
        let data = InferenceData::from_chains(observed(), chains(n_draws)).unwrap();
        let selection =
            Selection::explicit((0..4).map(Into::into).collect(), data.n_observations()).unwrap();
        group.bench_with_input(BenchmarkId::new("four_rows", n_draws), &data, |b, data| {
            b.iter(|| {
                let records = summarize(black_box(data), black_box(&selection));
                black_box(records.unwrap().len());
            })
        });
    }

    group.finish();
}

fn bench_grid_figure(c: &mut Criterion) {
    let data = InferenceData::from_chains(observed(), chains(1000)).unwrap();
    let options = GridOptions::default();

    c.bench_function("render/grid_figure", |b| {
        b.iter(|| {
            let (figure, _) =
                plot_posterior_predictive_distribution(&data, &options, &mut seeded_rng(Some(1)))
                    .unwrap();
            black_box(figure.panels.len());
        })
    });
}

criterion_group!(benches, bench_from_chains, bench_summarize, bench_grid_figure);
criterion_main!(benches);
