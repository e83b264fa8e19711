//! Entanglement and reduction properties over simulated states.

use proptest::prelude::*;
use qsv_analysis::{
    DensityMatrix, StateStatistics, analyze_pairwise, analyze_qubits, concurrence, negativity,
    reduced_density_matrix,
};
use qsv_ir::{Axis, CircuitProgram, Gate};
use qsv_sim::{StateVector, apply};

fn simulate(program: &CircuitProgram) -> StateVector {
    qsv_sim::run(program).unwrap().state
}

/// `cos a |00⟩ + sin a |11⟩`
fn partially_entangled(a: f64) -> StateVector {
    let mut program = CircuitProgram::new(2);
    program.ry(2.0 * a, 0).unwrap().cx(0, 1).unwrap();
    simulate(&program)
}

fn arb_product_state() -> impl Strategy<Value = StateVector> {
    (2usize..=4).prop_flat_map(|n| {
        prop::collection::vec((-3.2f64..3.2, -3.2f64..3.2), n).prop_map(move |angles| {
            angles
                .iter()
                .enumerate()
                .fold(StateVector::new(n), |state, (q, &(theta, phi))| {
                    let state = apply(&state, &Gate::rotation(Axis::Y, theta, q)).unwrap();
                    apply(&state, &Gate::rotation(Axis::Z, phi, q)).unwrap()
                })
        })
    })
}

fn arb_two_qubit_state() -> impl Strategy<Value = StateVector> {
    prop::collection::vec((-3.2f64..3.2, -3.2f64..3.2, -3.2f64..3.2), 1..=3).prop_map(|layers| {
        let mut program = CircuitProgram::new(2);
        for (a, b, c) in layers {
            program
                .ry(a, 0)
                .unwrap()
                .rx(b, 1)
                .unwrap()
                .cx(0, 1)
                .unwrap()
                .rz(c, 1)
                .unwrap();
        }
        simulate(&program)
    })
}

// ---------------------------------------------------------------------------
// Fixed states
// ---------------------------------------------------------------------------

#[test]
fn bell_state_is_maximally_entangled() {
    let state = simulate(&CircuitProgram::bell().unwrap());
    let rho = DensityMatrix::from_state(&state);
    assert!((concurrence(&rho).unwrap() - 1.0).abs() < 1e-9);
    assert!((negativity(&rho).unwrap() - 0.5).abs() < 1e-9);

    let stats = StateStatistics::compute(&state).unwrap();
    assert!(stats.possible_maximal_entanglement);
}

#[test]
fn concurrence_follows_schmidt_angle() {
    for a in [0.0, 0.2, 0.5, std::f64::consts::FRAC_PI_4, 1.1] {
        let rho = DensityMatrix::from_state(&partially_entangled(a));
        let expected = (2.0 * a).sin().abs();
        assert!((concurrence(&rho).unwrap() - expected).abs() < 1e-7, "a = {a}");
        assert!((negativity(&rho).unwrap() - expected / 2.0).abs() < 1e-7, "a = {a}");
    }
}

#[test]
fn ghz_single_qubits_are_maximally_mixed() {
    let state = simulate(&CircuitProgram::ghz(4).unwrap());
    for report in analyze_qubits(&state).unwrap() {
        assert!((report.entropy - 1.0).abs() < 1e-9);
    }
    let pairwise = analyze_pairwise(&state).unwrap();
    assert_eq!(pairwise.pairs.len(), 6);
    assert!(!pairwise.fully_entangled);
}

#[test]
fn mixed_reduced_pair_from_three_qubits() {
    // Bell pair on (0, 1) tensored with |+⟩ on 2.
    let mut program = CircuitProgram::new(3);
    program.h(0).unwrap().cx(0, 1).unwrap().h(2).unwrap();
    let state = simulate(&program);

    let pairwise = analyze_pairwise(&state).unwrap();
    assert!(pairwise.pair(0, 1).unwrap().entangled);
    assert!(!pairwise.pair(0, 2).unwrap().entangled);
    assert!(!pairwise.pair(1, 2).unwrap().entangled);
    assert_eq!(pairwise.partners[&2].len(), 0);
    assert!(!pairwise.fully_entangled);

    let reduced = reduced_density_matrix(&state, &[0, 1]).unwrap();
    assert!((reduced.purity() - 1.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn product_states_are_pure_and_separable(state in arb_product_state()) {
        for report in analyze_qubits(&state).unwrap() {
            prop_assert!((report.purity - 1.0).abs() < 1e-9);
            prop_assert!(report.entropy < 1e-6);
        }
        for (key, metrics) in &analyze_pairwise(&state).unwrap().pairs {
            prop_assert!(metrics.negativity < 1e-9, "pair {}", key);
            prop_assert!(!metrics.entangled, "pair {}", key);
        }
        prop_assert!(StateStatistics::compute(&state).unwrap().product_state);
    }

    #[test]
    fn reduced_purities_agree_for_pure_pairs(state in arb_two_qubit_state()) {
        let a = reduced_density_matrix(&state, &[0]).unwrap().purity();
        let b = reduced_density_matrix(&state, &[1]).unwrap().purity();
        prop_assert!((a - b).abs() < 1e-9);

        // For pure two-qubit states Tr ρ_A² = 1 - C²/2.
        let c = concurrence(&DensityMatrix::from_state(&state)).unwrap();
        prop_assert!((a - (1.0 - c * c / 2.0)).abs() < 1e-6, "purity {} concurrence {}", a, c);
    }

    #[test]
    fn measures_stay_in_range(state in arb_two_qubit_state()) {
        let rho = DensityMatrix::from_state(&state);
        let c = concurrence(&rho).unwrap();
        let n = negativity(&rho).unwrap();
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&c));
        prop_assert!((-1e-9..=0.5 + 1e-9).contains(&n));
        prop_assert!(rho.is_hermitian(1e-12));
    }
}
