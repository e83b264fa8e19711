//! Dense state-vector storage.

use num_complex::Complex64;
use qsv_ir::complex::{ONE, ZERO};

use crate::buffer::AmplitudeBuffer;
use crate::error::{SimError, SimResult};

/// A dense state vector of `2^n` amplitudes.
///
/// Index `i` is the basis state whose bitstring is the binary form of `i`
/// with qubit 0 as the most significant bit.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl StateVector {
    /// Create a new state vector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        Self::basis(num_qubits, 0)
    }

    /// Computational basis state `|index⟩`.
    ///
    /// The caller guarantees `index < 2^num_qubits`.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[index] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// All-zero amplitudes. Not a valid state until something is scattered in.
    pub(crate) fn zeros(num_qubits: usize) -> Self {
        Self {
            amplitudes: vec![ZERO; 1 << num_qubits],
            num_qubits,
        }
    }

    /// Wrap an arbitrary amplitude vector, normalizing it.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(SimError::InvalidLength(len));
        }
        let mut state = Self {
            num_qubits: len.trailing_zeros() as usize,
            amplitudes,
        };
        state.normalize()?;
        Ok(state)
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Borrow the amplitudes.
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume into the raw amplitude vector.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Rescale to unit norm.
    pub fn normalize(&mut self) -> SimResult<()> {
        let norm_sqr = self.norm_sqr();
        if norm_sqr <= 0.0 || !norm_sqr.is_finite() {
            return Err(SimError::ZeroNorm);
        }
        self.scale(norm_sqr.sqrt().recip());
        Ok(())
    }
}

impl AmplitudeBuffer for StateVector {
    #[inline]
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn zeroed_like(&self) -> Self {
        Self::zeros(self.num_qubits)
    }

    fn for_each_nonzero<F: FnMut(usize, Complex64)>(&self, mut f: F) {
        for (i, &a) in self.amplitudes.iter().enumerate() {
            if a != ZERO {
                f(i, a);
            }
        }
    }

    #[inline]
    fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes[index]
    }

    #[inline]
    fn accumulate(&mut self, index: usize, value: Complex64) {
        self.amplitudes[index] += value;
    }

    fn scale(&mut self, factor: f64) {
        for amp in &mut self.amplitudes {
            *amp *= factor;
        }
    }

    fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }
}
