//! Behavioural properties of the simulator.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use proptest::strategy::Union;
use qsv_ir::{Axis, CircuitProgram, FixedGate, Gate, SingleQubitGate, UnitaryMatrix};
use qsv_sim::{
    AmplitudeBuffer, CancelToken, Executor, SimError, StateVector, apply, measure_qubit,
    sample_counts,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn arb_gate(n: usize) -> impl Strategy<Value = Gate> {
    let q = 0..n;
    let pair = (0..n, 0..n).prop_filter("distinct", |(a, b)| a != b);
    let angle = -7.0f64..7.0;
    let mut kinds: Vec<BoxedStrategy<Gate>> = vec![
        (prop::sample::select(FixedGate::ALL.to_vec()), q.clone())
            .prop_map(|(g, t)| Gate::fixed(g, t))
            .boxed(),
        (angle.clone(), q.clone())
            .prop_map(|(a, t)| Gate::rotation(Axis::X, a, t))
            .boxed(),
        (angle.clone(), q.clone())
            .prop_map(|(a, t)| Gate::rotation(Axis::Y, a, t))
            .boxed(),
        (angle.clone(), q.clone())
            .prop_map(|(a, t)| Gate::rotation(Axis::Z, a, t))
            .boxed(),
        (angle.clone(), q)
            .prop_map(|(a, t)| Gate::Phase {
                angle: a,
                target: t
            })
            .boxed(),
        pair.clone()
            .prop_map(|(c, t)| Gate::Cnot {
                control: c,
                target: t
            })
            .boxed(),
        pair.clone()
            .prop_map(|(c, t)| Gate::Cz {
                control: c,
                target: t
            })
            .boxed(),
        pair.clone().prop_map(|(a, b)| Gate::Swap { a, b }).boxed(),
        (pair.clone(), Just(vec![0usize, 1, 2, 3]).prop_shuffle(), angle.clone())
            .prop_map(|((a, b), order, phi)| {
                Gate::unitary("perm_phase", vec![a, b], phased_permutation(&order, phi))
            })
            .boxed(),
        (pair.clone(), angle.clone())
            .prop_map(|((a, b), theta)| {
                let body = vec![
                    Gate::fixed(FixedGate::H, 0),
                    Gate::Cnot {
                        control: 0,
                        target: 1,
                    },
                    Gate::rotation(Axis::Z, theta, 1),
                ];
                Gate::circuit("entangle", vec![a, b], body)
            })
            .boxed(),
        (pair, angle.clone())
            .prop_map(|((c, t), theta)| {
                Gate::controlled(
                    "cry",
                    vec![c],
                    t,
                    SingleQubitGate::Rotation {
                        axis: Axis::Y,
                        angle: theta,
                    },
                )
            })
            .boxed(),
    ];
    if n >= 3 {
        let triple = Just((0..n).collect::<Vec<_>>()).prop_shuffle();
        kinds.push(
            triple
                .clone()
                .prop_map(|order| Gate::Toffoli {
                    control1: order[0],
                    control2: order[1],
                    target: order[2],
                })
                .boxed(),
        );
        kinds.push(
            (triple, angle)
                .prop_map(|(order, phi)| {
                    Gate::controlled(
                        "ccp",
                        vec![order[0], order[1]],
                        order[2],
                        SingleQubitGate::Phase { angle: phi },
                    )
                })
                .boxed(),
        );
    }
    Union::new(kinds)
}

/// Permutation matrix `|j⟩ → |order[j]⟩` with a phase on the first column.
fn phased_permutation(order: &[usize], phi: f64) -> UnitaryMatrix {
    let data = Array2::from_shape_fn((4, 4), |(r, c)| {
        if r != order[c] {
            Complex64::new(0.0, 0.0)
        } else if c == 0 {
            Complex64::from_polar(1.0, phi)
        } else {
            Complex64::new(1.0, 0.0)
        }
    });
    UnitaryMatrix::new("perm_phase", data).unwrap()
}

fn arb_start_and_gates() -> impl Strategy<Value = (StateVector, Vec<Gate>)> {
    (2usize..=5).prop_flat_map(|n| {
        (
            0..(1usize << n),
            prop::collection::vec(arb_gate(n), 1..=20),
        )
            .prop_map(move |(index, gates)| (StateVector::basis(n, index), gates))
    })
}

// ---------------------------------------------------------------------------
// Normalization and involution
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn norm_is_preserved_after_every_gate((start, gates) in arb_start_and_gates()) {
        let mut state = start;
        for gate in &gates {
            state = apply(&state, gate).unwrap();
            prop_assert!((state.norm_sqr() - 1.0).abs() < 1e-9, "after {}", gate.name());
        }
    }

    #[test]
    fn x_twice_is_identity((start, gates) in arb_start_and_gates(), target in 0usize..2) {
        let mut state = start;
        for gate in &gates {
            state = apply(&state, gate).unwrap();
        }
        let x = Gate::fixed(FixedGate::X, target);
        let twice = apply(&apply(&state, &x).unwrap(), &x).unwrap();
        for (a, b) in twice.amplitudes().iter().zip(state.amplitudes()) {
            prop_assert!((a - b).norm() < 1e-12);
        }
    }
}

#[test]
fn cnot_flips_target_when_control_set() {
    let mut program = CircuitProgram::new(2).with_initial_bits("10").unwrap();
    program.cx(0, 1).unwrap();
    let outcome = qsv_sim::run(&program).unwrap();
    for (i, amp) in outcome.state.amplitudes().iter().enumerate() {
        let expected = if i == 3 { 1.0 } else { 0.0 };
        assert!((amp.norm() - expected).abs() < 1e-12, "index {i}");
    }
}

#[test]
fn custom_matrix_with_three_qubits_is_applied() {
    // Cyclic shift |j⟩ → |j+1 mod 8⟩ on qubits (2, 0, 1).
    let rows: Vec<Vec<Complex64>> = (0..8)
        .map(|r| {
            (0..8)
                .map(|c| {
                    if r == (c + 1) % 8 {
                        Complex64::new(1.0, 0.0)
                    } else {
                        Complex64::new(0.0, 0.0)
                    }
                })
                .collect()
        })
        .collect();
    let shift = UnitaryMatrix::from_rows("inc", &rows).unwrap();
    let gate = Gate::unitary("inc", vec![2, 0, 1], shift);

    // Local value for index 0b011 (q0=0, q1=1, q2=1) is q2 q0 q1 = 0b101 = 5.
    // 5 + 1 = 6 = 0b110 → q2=1, q0=1, q1=0 → global 0b101.
    let out = apply(&StateVector::basis(3, 0b011), &gate).unwrap();
    assert_eq!(out, StateVector::basis(3, 0b101));
}

// ---------------------------------------------------------------------------
// Sampling and measurement
// ---------------------------------------------------------------------------

#[test]
fn sample_counts_sum_to_shots() {
    let mut program = CircuitProgram::new(3);
    program.h(0).unwrap().ry(1.1, 1).unwrap().cx(1, 2).unwrap();
    let state = qsv_sim::run(&program).unwrap().state;
    let mut rng = StdRng::seed_from_u64(99);
    for shots in [1, 7, 1000, 4096] {
        let counts = sample_counts(&state, shots, &mut rng).unwrap();
        assert_eq!(counts.total(), shots);
    }
}

#[test]
fn measurement_frequency_matches_probability() {
    let plus = apply(&StateVector::new(1), &Gate::fixed(FixedGate::H, 0)).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 10_000;
    let zeros = (0..trials)
        .filter(|_| measure_qubit(&plus, 0, &mut rng).unwrap().0 == 0)
        .count();
    let freq = zeros as f64 / f64::from(trials);
    // 99% band for a fair coin over 10k trials.
    let band = 2.576 * (0.25 / f64::from(trials)).sqrt();
    assert!((freq - 0.5).abs() < band, "frequency {freq}");
}

#[test]
fn bell_measurements_are_correlated() {
    let mut program = CircuitProgram::bell().unwrap();
    program.measure(0).unwrap().measure(1).unwrap();
    let executor = Executor::default();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        let outcome = executor
            .run(&program, &mut rng, &CancelToken::new())
            .unwrap();
        assert_eq!(outcome.measurements[&0], outcome.measurements[&1]);
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn invalid_program_is_rejected_before_running() {
    let request = r#"{"numQubits": 2, "gates": [{"type": "H", "params": [0]}]}"#;
    let request: qsv_ir::ProgramRequest = serde_json::from_str(request).unwrap();
    let mut program = CircuitProgram::try_from(&request).unwrap();
    assert!(program.cx(1, 1).is_err());

    let executor = Executor::default();
    let wide = CircuitProgram::new(16);
    assert!(matches!(
        executor.check(&wide),
        Err(SimError::TooManyQubits { requested: 16, max: 15 })
    ));
}
