//! Density matrices and partial traces.
//!
//! The full matrix costs `4^n` entries, so it is built only below a caller
//! supplied ceiling. Reduced matrices for small qubit subsets are computed
//! straight from the amplitudes via [`reduced_density_matrix`], which never
//! materialises the full matrix and therefore works up to the state-vector
//! ceiling.

use ndarray::Array2;
use num_complex::Complex64;
use qsv_sim::{StateVector, qubit_mask};
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};

/// Trace drift above this is logged before dividing it out.
const TRACE_TOLERANCE: f64 = 1e-9;

/// `ρ` for an `n`-qubit register, row `i` / column `j` in basis-index order.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    num_qubits: usize,
    data: Array2<Complex64>,
}

impl DensityMatrix {
    /// `ρ[i][j] = ψ[i] · conj(ψ[j])`.
    pub fn from_state(state: &StateVector) -> Self {
        let psi = state.amplitudes();
        let dim = psi.len();
        Self {
            num_qubits: state.num_qubits(),
            data: Array2::from_shape_fn((dim, dim), |(i, j)| psi[i] * psi[j].conj()),
        }
    }

    /// [`DensityMatrix::from_state`] refusing registers wider than `max_qubits`.
    pub fn from_state_limited(state: &StateVector, max_qubits: usize) -> AnalysisResult<Self> {
        if state.num_qubits() > max_qubits {
            return Err(AnalysisError::DensityTooLarge {
                num_qubits: state.num_qubits(),
                max: max_qubits,
            });
        }
        Ok(Self::from_state(state))
    }

    /// Wrap a square `2^n x 2^n` array.
    ///
    /// Returns `None` when the shape is not a power-of-two square.
    pub fn from_array(data: Array2<Complex64>) -> Option<Self> {
        let (rows, cols) = data.dim();
        if rows != cols || rows == 0 || !rows.is_power_of_two() {
            return None;
        }
        Some(Self {
            num_qubits: rows.trailing_zeros() as usize,
            data,
        })
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix dimension `2^n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    /// Entry `ρ[i][j]`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Complex64 {
        self.data[[i, j]]
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array2<Complex64> {
        &self.data
    }

    /// Row-major nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Complex64>> {
        self.data.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// `Tr ρ` (real part).
    pub fn trace(&self) -> f64 {
        self.data.diag().iter().map(|c| c.re).sum()
    }

    /// `Tr ρ²`.
    pub fn purity(&self) -> f64 {
        // Tr(ρ²) = Σ_ij ρ_ij ρ_ji = Σ_ij |ρ_ij|² for Hermitian ρ.
        self.data.iter().map(Complex64::norm_sqr).sum()
    }

    /// Whether `|ρ[i][j] - conj(ρ[j][i])| <= tol` everywhere.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        let dim = self.dim();
        (0..dim).all(|i| (i..dim).all(|j| (self.data[[i, j]] - self.data[[j, i]].conj()).norm() <= tol))
    }

    /// Trace out every qubit not in `keep`.
    ///
    /// `keep[0]` becomes the most significant bit of the reduced index. The
    /// result is divided by its trace.
    pub fn partial_trace(&self, keep: &[usize]) -> AnalysisResult<DensityMatrix> {
        let layout = SubsystemLayout::new(self.num_qubits, keep)?;
        let reduced = Array2::from_shape_fn((layout.kept.len(), layout.kept.len()), |(a, b)| {
            layout
                .traced
                .iter()
                .map(|&r| self.data[[layout.kept[a] | r, layout.kept[b] | r]])
                .sum::<Complex64>()
        });
        normalized(reduced)
    }
}

/// Reduced density matrix on `keep`, computed from amplitudes.
///
/// `ρ_red[a][b] = Σ_r ψ[a ⊕ r] · conj(ψ[b ⊕ r])`, where `r` runs over the
/// traced-out bit patterns. Same result as building the full matrix and
/// calling [`DensityMatrix::partial_trace`].
pub fn reduced_density_matrix(state: &StateVector, keep: &[usize]) -> AnalysisResult<DensityMatrix> {
    let layout = SubsystemLayout::new(state.num_qubits(), keep)?;
    let psi = state.amplitudes();
    let reduced = Array2::from_shape_fn((layout.kept.len(), layout.kept.len()), |(a, b)| {
        layout
            .traced
            .iter()
            .map(|&r| psi[layout.kept[a] | r] * psi[layout.kept[b] | r].conj())
            .sum::<Complex64>()
    });
    normalized(reduced)
}

/// Bit patterns of the kept and traced-out qubit sets.
struct SubsystemLayout {
    /// `kept[a]` is the full-index pattern for reduced index `a`.
    kept: Vec<usize>,
    /// Every pattern the traced-out qubits can take.
    traced: Vec<usize>,
}

impl SubsystemLayout {
    fn new(num_qubits: usize, keep: &[usize]) -> AnalysisResult<Self> {
        if keep.is_empty() {
            return Err(AnalysisError::EmptySelection);
        }
        for (pos, &q) in keep.iter().enumerate() {
            if q >= num_qubits {
                return Err(AnalysisError::QubitOutOfRange {
                    qubit: q,
                    num_qubits,
                });
            }
            if keep[..pos].contains(&q) {
                return Err(AnalysisError::DuplicateQubit(q));
            }
        }

        let kept_masks: Vec<usize> = keep.iter().map(|&q| qubit_mask(num_qubits, q)).collect();
        let traced_masks: Vec<usize> = (0..num_qubits)
            .filter(|q| !keep.contains(q))
            .map(|q| qubit_mask(num_qubits, q))
            .collect();

        Ok(Self {
            kept: patterns(&kept_masks),
            traced: patterns(&traced_masks),
        })
    }
}

/// All `2^k` combinations of `masks`, with `masks[0]` as the high bit.
fn patterns(masks: &[usize]) -> Vec<usize> {
    let k = masks.len();
    (0..1usize << k)
        .map(|value| {
            masks
                .iter()
                .enumerate()
                .filter(|(m, _)| (value >> (k - 1 - m)) & 1 == 1)
                .fold(0, |acc, (_, mask)| acc | mask)
        })
        .collect()
}

fn normalized(mut reduced: Array2<Complex64>) -> AnalysisResult<DensityMatrix> {
    let trace: f64 = reduced.diag().iter().map(|c| c.re).sum();
    if trace <= 0.0 || !trace.is_finite() {
        return Err(AnalysisError::ZeroTrace);
    }
    if (trace - 1.0).abs() > TRACE_TOLERANCE {
        debug!(trace, "Reduced density matrix trace drifted; renormalizing");
    }
    reduced.mapv_inplace(|c| c / trace);
    DensityMatrix::from_array(reduced).ok_or(AnalysisError::ZeroTrace)
}
