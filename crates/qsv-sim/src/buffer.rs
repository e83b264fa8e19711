//! Storage abstraction shared by the dense and sparse state representations.

use num_complex::Complex64;

/// Bit mask of qubit `target` in an `n`-qubit basis index.
///
/// Qubit 0 is the most significant bit.
#[inline]
pub fn qubit_mask(num_qubits: usize, target: usize) -> usize {
    1 << (num_qubits - 1 - target)
}

/// Value of qubit `target` in basis index `index`.
#[inline]
pub fn bit(index: usize, num_qubits: usize, target: usize) -> usize {
    (index >> (num_qubits - 1 - target)) & 1
}

/// Amplitude storage a gate can be scattered through.
///
/// Gate application never writes into the buffer it reads from: it asks for
/// an empty buffer of the same shape, visits the source amplitudes, and
/// accumulates into the fresh one.
pub trait AmplitudeBuffer: Sized {
    /// Register width.
    fn num_qubits(&self) -> usize;

    /// An all-zero buffer with the same register width.
    fn zeroed_like(&self) -> Self;

    /// Visit every stored amplitude that is not exactly zero.
    fn for_each_nonzero<F: FnMut(usize, Complex64)>(&self, f: F);

    /// Amplitude of basis state `index`.
    fn amplitude(&self, index: usize) -> Complex64;

    /// `buffer[index] += value`.
    fn accumulate(&mut self, index: usize, value: Complex64);

    /// Multiply every amplitude by `factor`.
    fn scale(&mut self, factor: f64);

    /// Drop storage for amplitudes that no longer matter. No-op for dense.
    fn compact(&mut self) {}

    /// Hilbert-space dimension `2^n`.
    #[inline]
    fn dim(&self) -> usize {
        1 << self.num_qubits()
    }

    /// `Σ |a_i|²`.
    fn norm_sqr(&self) -> f64 {
        let mut total = 0.0;
        self.for_each_nonzero(|_, a| total += a.norm_sqr());
        total
    }
}
