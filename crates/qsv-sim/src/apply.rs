//! Gate application.
//!
//! Every gate is applied by visiting the non-zero source amplitudes and
//! scattering their contributions into a freshly zeroed output buffer. The
//! input is never written, so several source indices may safely feed the
//! same destination index.

use ndarray::Array2;
use num_complex::Complex64;
use qsv_ir::{Gate, UnitaryMatrix, phase_matrix, rotation_matrix};

use crate::buffer::{AmplitudeBuffer, qubit_mask};
use crate::error::{SimError, SimResult};

/// Apply a unitary gate and return the new state.
///
/// The gate is validated against the state's register width first.
/// [`Gate::Measure`] is rejected with [`SimError::NonUnitary`]; measurement
/// goes through [`crate::measure::measure_qubit`] or the executor.
pub fn apply<B: AmplitudeBuffer>(state: &B, gate: &Gate) -> SimResult<B> {
    gate.validate(state.num_qubits())?;
    apply_validated(state, gate)
}

/// Apply a gate already known to be valid for this register.
pub(crate) fn apply_validated<B: AmplitudeBuffer>(state: &B, gate: &Gate) -> SimResult<B> {
    let n = state.num_qubits();
    let mut out = match gate {
        Gate::Fixed { gate, target } => scatter_single(state, &gate.matrix(), qubit_mask(n, *target), 0),
        Gate::Rotation {
            axis,
            angle,
            target,
        } => scatter_single(
            state,
            &rotation_matrix(*axis, *angle),
            qubit_mask(n, *target),
            0,
        ),
        Gate::Phase { angle, target } => {
            scatter_single(state, &phase_matrix(*angle), qubit_mask(n, *target), 0)
        }
        Gate::Cnot { control, target } => {
            let (c, t) = (qubit_mask(n, *control), qubit_mask(n, *target));
            permute(state, |i| if i & c != 0 { i ^ t } else { i })
        }
        Gate::Cz { control, target } => {
            let both = qubit_mask(n, *control) | qubit_mask(n, *target);
            let mut out = state.zeroed_like();
            state.for_each_nonzero(|i, a| {
                let sign = if i & both == both { -1.0 } else { 1.0 };
                out.accumulate(i, a * sign);
            });
            out
        }
        Gate::Swap { a, b } => {
            let (ma, mb) = (qubit_mask(n, *a), qubit_mask(n, *b));
            permute(state, |i| {
                if ((i & ma) != 0) != ((i & mb) != 0) {
                    i ^ (ma | mb)
                } else {
                    i
                }
            })
        }
        Gate::Toffoli {
            control1,
            control2,
            target,
        } => {
            let controls = qubit_mask(n, *control1) | qubit_mask(n, *control2);
            let t = qubit_mask(n, *target);
            permute(state, |i| if i & controls == controls { i ^ t } else { i })
        }
        Gate::Unitary(g) => scatter_unitary(state, &g.matrix, &g.qubits),
        Gate::Controlled(g) => {
            let controls = g.controls.iter().fold(0, |acc, &q| acc | qubit_mask(n, q));
            scatter_single(state, &g.base.matrix(), qubit_mask(n, g.target), controls)
        }
        Gate::Circuit(g) => {
            let mut current: Option<B> = None;
            for inner in &g.body {
                let source = current.as_ref().unwrap_or(state);
                current = Some(apply_validated(source, &inner.remapped(&g.qubits))?);
            }
            match current {
                Some(out) => out,
                None => permute(state, |i| i),
            }
        }
        Gate::Measure { .. } => return Err(SimError::NonUnitary(gate.name().to_string())),
    };
    out.compact();
    Ok(out)
}

/// Scatter a 2x2 matrix on the target bit.
///
/// Indices whose `controls` bits are not all set are copied unchanged.
/// With `controls == 0` the gate is unconditional.
fn scatter_single<B: AmplitudeBuffer>(
    state: &B,
    u: &Array2<Complex64>,
    target: usize,
    controls: usize,
) -> B {
    let mut out = state.zeroed_like();
    state.for_each_nonzero(|i, a| {
        if i & controls != controls {
            out.accumulate(i, a);
            return;
        }
        let b = usize::from(i & target != 0);
        out.accumulate(i & !target, u[[0, b]] * a);
        out.accumulate(i | target, u[[1, b]] * a);
    });
    out
}

/// Scatter a `2^k x 2^k` matrix over an ordered qubit tuple.
///
/// `qubits[0]` is the most significant bit of the matrix index.
fn scatter_unitary<B: AmplitudeBuffer>(state: &B, u: &UnitaryMatrix, qubits: &[usize]) -> B {
    let n = state.num_qubits();
    let k = qubits.len();
    let masks: Vec<usize> = qubits.iter().map(|&q| qubit_mask(n, q)).collect();
    let all = masks.iter().fold(0, |acc, m| acc | m);

    // offsets[j] is the index pattern for local value j.
    let offsets: Vec<usize> = (0..1usize << k)
        .map(|j| {
            masks
                .iter()
                .enumerate()
                .filter(|(m, _)| (j >> (k - 1 - m)) & 1 == 1)
                .fold(0, |acc, (_, mask)| acc | mask)
        })
        .collect();

    let mut out = state.zeroed_like();
    state.for_each_nonzero(|i, a| {
        let b = masks
            .iter()
            .fold(0, |acc, &mask| (acc << 1) | usize::from(i & mask != 0));
        let base = i & !all;
        for (j, &offset) in offsets.iter().enumerate() {
            let coeff = u.get(j, b);
            if coeff.re != 0.0 || coeff.im != 0.0 {
                out.accumulate(base | offset, coeff * a);
            }
        }
    });
    out
}

fn permute<B: AmplitudeBuffer>(state: &B, dest: impl Fn(usize) -> usize) -> B {
    let mut out = state.zeroed_like();
    state.for_each_nonzero(|i, a| out.accumulate(dest(i), a));
    out
}
