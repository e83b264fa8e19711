//! Sparse state storage for registers above the dense limit.
//!
//! Only basis states with non-negligible amplitude are stored. This is a
//! best-effort representation: a Hadamard layer over `k` qubits multiplies
//! the support by `2^k`, so an entangling or superposing program can end up
//! as dense as a [`StateVector`] with hash-map overhead on top.

use num_complex::Complex64;
use rustc_hash::FxHashMap;

use crate::buffer::AmplitudeBuffer;
use crate::statevector::StateVector;

/// Entries with `|a|²` at or below this are dropped.
pub const PRUNE_THRESHOLD: f64 = 1e-30;

/// Map from occupied basis index to amplitude.
#[derive(Debug, Clone, Default)]
pub struct SparseState {
    num_qubits: usize,
    amplitudes: FxHashMap<usize, Complex64>,
}

impl SparseState {
    /// Computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let mut amplitudes = FxHashMap::default();
        amplitudes.insert(index, Complex64::new(1.0, 0.0));
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Copy the non-zero entries of a dense vector.
    pub fn from_dense(state: &StateVector) -> Self {
        let mut sparse = Self {
            num_qubits: state.num_qubits(),
            amplitudes: FxHashMap::default(),
        };
        state.for_each_nonzero(|i, a| sparse.accumulate(i, a));
        sparse.compact();
        sparse
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> StateVector {
        let mut dense = StateVector::zeros(self.num_qubits);
        for (&i, &a) in &self.amplitudes {
            dense.accumulate(i, a);
        }
        dense
    }

    /// Number of stored basis states.
    pub fn support_len(&self) -> usize {
        self.amplitudes.len()
    }
}

impl AmplitudeBuffer for SparseState {
    #[inline]
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn zeroed_like(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            amplitudes: FxHashMap::with_capacity_and_hasher(
                self.amplitudes.len(),
                Default::default(),
            ),
        }
    }

    fn for_each_nonzero<F: FnMut(usize, Complex64)>(&self, mut f: F) {
        for (&i, &a) in &self.amplitudes {
            f(i, a);
        }
    }

    fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes
            .get(&index)
            .copied()
            .unwrap_or_else(|| Complex64::new(0.0, 0.0))
    }

    fn accumulate(&mut self, index: usize, value: Complex64) {
        if value.re == 0.0 && value.im == 0.0 {
            return;
        }
        *self
            .amplitudes
            .entry(index)
            .or_insert_with(|| Complex64::new(0.0, 0.0)) += value;
    }

    fn scale(&mut self, factor: f64) {
        for amp in self.amplitudes.values_mut() {
            *amp *= factor;
        }
    }

    fn compact(&mut self) {
        self.amplitudes.retain(|_, a| a.norm_sqr() > PRUNE_THRESHOLD);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_and_dense_conversion() {
        let sparse = SparseState::basis(3, 6);
        assert_eq!(sparse.support_len(), 1);
        let dense = sparse.to_dense();
        assert_eq!(dense, StateVector::basis(3, 6));
        assert_eq!(SparseState::from_dense(&dense).support_len(), 1);
    }

    #[test]
    fn test_cancelling_amplitudes_are_pruned() {
        let mut sparse = SparseState::basis(1, 0);
        sparse.accumulate(1, Complex64::new(0.5, 0.0));
        sparse.accumulate(1, Complex64::new(-0.5, 0.0));
        assert_eq!(sparse.support_len(), 2);
        sparse.compact();
        assert_eq!(sparse.support_len(), 1);
        assert_eq!(sparse.amplitude(1), Complex64::new(0.0, 0.0));
    }
}
