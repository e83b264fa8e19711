//! Benchmarks for gate application and sampling
//!
//! Run with: cargo bench -p qsv-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsv_ir::{Axis, CircuitProgram, FixedGate, Gate, UnitaryMatrix};
use qsv_sim::{CancelToken, Executor, SparseState, StateVector, apply, sample_counts};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn superposed(n: usize) -> StateVector {
    (0..n).fold(StateVector::new(n), |s, q| {
        apply(&s, &Gate::fixed(FixedGate::H, q)).unwrap()
    })
}

/// Benchmark single gates on dense states of growing width
fn bench_single_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_dense");

    for n in [4usize, 8, 12] {
        let state = superposed(n);
        let h = Gate::fixed(FixedGate::H, n / 2);
        let rz = Gate::rotation(Axis::Z, 0.3, 0);
        let cx = Gate::Cnot {
            control: 0,
            target: n - 1,
        };

        group.bench_with_input(BenchmarkId::new("h", n), &state, |b, s| {
            b.iter(|| apply(black_box(s), black_box(&h)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("rz", n), &state, |b, s| {
            b.iter(|| apply(black_box(s), black_box(&rz)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("cx", n), &state, |b, s| {
            b.iter(|| apply(black_box(s), black_box(&cx)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark a two-qubit custom matrix against the builtin CNOT
fn bench_custom_matrix(c: &mut Criterion) {
    let one = num_complex::Complex64::new(1.0, 0.0);
    let zero = num_complex::Complex64::new(0.0, 0.0);
    let rows = vec![
        vec![one, zero, zero, zero],
        vec![zero, one, zero, zero],
        vec![zero, zero, zero, one],
        vec![zero, zero, one, zero],
    ];
    let matrix = UnitaryMatrix::from_rows("cx", &rows).unwrap();
    let custom = Gate::unitary("cx", vec![0, 5], matrix);
    let state = superposed(10);

    c.bench_function("custom_cx_10q", |b| {
        b.iter(|| apply(black_box(&state), black_box(&custom)).unwrap());
    });
}

/// Benchmark dense vs sparse on a low-support GHZ program
fn bench_representations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_14q");
    let program = CircuitProgram::ghz(14).unwrap();

    group.bench_function("executor", |b| {
        let executor = Executor::default();
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| {
            executor
                .run(black_box(&program), &mut rng, &CancelToken::new())
                .unwrap()
        });
    });

    group.bench_function("sparse_apply", |b| {
        b.iter(|| {
            program.gates().iter().fold(SparseState::basis(14, 0), |s, g| {
                apply(&s, black_box(g)).unwrap()
            })
        });
    });

    group.finish();
}

/// Benchmark shot sampling
fn bench_sampling(c: &mut Criterion) {
    let state = superposed(10);
    c.bench_function("sample_1024_shots_10q", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| sample_counts(black_box(&state), 1024, &mut rng).unwrap());
    });
}

criterion_group!(
    benches,
    bench_single_gates,
    bench_custom_matrix,
    bench_representations,
    bench_sampling
);
criterion_main!(benches);
