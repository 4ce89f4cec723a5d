//! Benchmarks for the blocks-world search engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use blocksworld::{estimate, solve, Configuration, Problem, Strategy};

/// Five blocks split over two towers, to be rebuilt as one reversed tower.
fn five_block_problem() -> Problem {
    Problem::new(
        Configuration::from_names(&[&["A", "C", "E"], &["B", "D"], &[]]),
        Configuration::from_names(&[&["E", "D", "C", "B", "A"]]),
    )
    .expect("benchmark problem is well formed")
}

/// Benchmark each strategy on the same problem.
fn bench_strategies(c: &mut Criterion) {
    let problem = five_block_problem();
    let mut group = c.benchmark_group("solve_5_blocks");
    group.sample_size(20);
    for strategy in Strategy::ALL {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| solve(black_box(&problem), strategy))
        });
    }
    group.finish();
}

/// Benchmark successor generation for a mid-search configuration.
fn bench_successors(c: &mut Criterion) {
    let configuration = Configuration::from_names(&[&["A", "C"], &["E"], &["B", "D"], &[]]);

    c.bench_function("successors", |b| {
        b.iter(|| black_box(&configuration).successors())
    });
}

/// Benchmark the penalized heuristic against a single goal tower.
fn bench_estimate(c: &mut Criterion) {
    let problem = five_block_problem();

    c.bench_function("estimate", |b| {
        b.iter(|| estimate(black_box(problem.initial()), black_box(problem.goal())))
    });
}

criterion_group!(benches, bench_strategies, bench_successors, bench_estimate);
criterion_main!(benches);
