//! Two-qubit entanglement measures and the pairwise entanglement graph.
//!
//! The pairwise graph is a heuristic: a pair counts as entangled when its
//! reduced two-qubit state has non-zero concurrence or negativity. GHZ-type
//! states can be genuinely multipartite entangled while every two-qubit
//! reduction is separable, so "fully entangled" here means "every pair
//! shows bipartite entanglement", not a formal multipartite witness.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::density::{DensityMatrix, reduced_density_matrix};
use crate::eigen::{hermitian_eigenvalues, psd_sqrt};
use crate::error::{AnalysisError, AnalysisResult};
use qsv_sim::StateVector;

/// Eigenvalues above `-NEGATIVITY_NOISE` count as non-negative.
pub const NEGATIVITY_NOISE: f64 = 1e-12;

/// Eigenvalues of `√ρ·ρ̃·√ρ` below this are treated as zero before the square root.
pub const CONCURRENCE_NOISE: f64 = 1e-12;

/// A pair is marked entangled when either measure exceeds this.
pub const ENTANGLEMENT_THRESHOLD: f64 = 1e-6;

fn require_two_qubits(rho: &DensityMatrix) -> AnalysisResult<()> {
    if rho.num_qubits() != 2 {
        return Err(AnalysisError::WrongQubitCount {
            expected: 2,
            got: rho.num_qubits(),
        });
    }
    Ok(())
}

/// Partial transpose of a two-qubit density matrix on `subsystem` (0 or 1).
///
/// With indices written as `(a, b)` for qubit pair values, transposing
/// subsystem 0 maps `ρ[(i,j)][(k,l)]` to position `[(k,j)][(i,l)]`.
pub fn partial_transpose(rho: &DensityMatrix, subsystem: usize) -> AnalysisResult<Array2<Complex64>> {
    require_two_qubits(rho)?;
    if subsystem > 1 {
        return Err(AnalysisError::InvalidSubsystem(subsystem));
    }
    Ok(Array2::from_shape_fn((4, 4), |(row, col)| {
        let (i, j) = (row >> 1, row & 1);
        let (k, l) = (col >> 1, col & 1);
        if subsystem == 0 {
            rho.get((k << 1) | j, (i << 1) | l)
        } else {
            rho.get((i << 1) | l, (k << 1) | j)
        }
    }))
}

/// `-Σ` of the negative eigenvalues of the partial transpose on qubit 0.
pub fn negativity(rho: &DensityMatrix) -> AnalysisResult<f64> {
    let transposed = partial_transpose(rho, 0)?;
    Ok(-hermitian_eigenvalues(&transposed)
        .into_iter()
        .filter(|&l| l < -NEGATIVITY_NOISE)
        .sum::<f64>())
}

/// Wootters concurrence of a two-qubit density matrix.
///
/// The eigenvalues of `ρ·ρ̃` are taken from the Hermitian matrix
/// `√ρ · ρ̃ · √ρ`, which has the same spectrum.
pub fn concurrence(rho: &DensityMatrix) -> AnalysisResult<f64> {
    require_two_qubits(rho)?;
    let r = rho.as_array();

    // σy⊗σy is the anti-diagonal (-1, 1, 1, -1), so
    // ρ̃[i][j] = s_i s_j conj(ρ[3-i][3-j]).
    let sign = [-1.0, 1.0, 1.0, -1.0];
    let flipped = Array2::from_shape_fn((4, 4), |(i, j)| {
        r[[3 - i, 3 - j]].conj() * (sign[i] * sign[j])
    });

    let root = psd_sqrt(r);
    let product = root.dot(&flipped).dot(&root);
    let mut lambdas: Vec<f64> = hermitian_eigenvalues(&product)
        .into_iter()
        .map(|l| if l < CONCURRENCE_NOISE { 0.0 } else { l.sqrt() })
        .collect();
    lambdas.sort_by(|a, b| b.total_cmp(a));

    Ok((lambdas[0] - lambdas[1] - lambdas[2] - lambdas[3]).max(0.0))
}

/// Measures for one qubit pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairMetrics {
    /// Concurrence in `[0, 1]`.
    pub concurrence: f64,
    /// Negativity in `[0, 0.5]`.
    pub negativity: f64,
    /// Whether either measure exceeds [`ENTANGLEMENT_THRESHOLD`].
    pub entangled: bool,
}

impl PairMetrics {
    /// Evaluate both measures on a two-qubit density matrix.
    pub fn from_density(rho: &DensityMatrix) -> AnalysisResult<Self> {
        let concurrence = concurrence(rho)?;
        let negativity = negativity(rho)?;
        Ok(Self {
            concurrence,
            negativity,
            entangled: concurrence > ENTANGLEMENT_THRESHOLD
                || negativity > ENTANGLEMENT_THRESHOLD,
        })
    }
}

/// Pairwise entanglement graph of a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntanglementReport {
    /// Register width.
    pub num_qubits: usize,
    /// Metrics keyed `"i-j"` with `i < j`.
    pub pairs: BTreeMap<String, PairMetrics>,
    /// Entangled partners of each qubit.
    pub partners: BTreeMap<usize, BTreeSet<usize>>,
    /// Every qubit is entangled with all `n - 1` others.
    pub fully_entangled: bool,
}

impl EntanglementReport {
    /// Metrics for the pair `(a, b)` in either order.
    pub fn pair(&self, a: usize, b: usize) -> Option<&PairMetrics> {
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        self.pairs.get(&pair_key(i, j))
    }

    /// Whether any pair is entangled.
    pub fn any_entangled(&self) -> bool {
        self.pairs.values().any(|m| m.entangled)
    }

    /// Short multi-line description.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.num_qubits < 2 {
            out.push_str("Single qubit: no pairwise entanglement.\n");
            return out;
        }
        if self.fully_entangled {
            out.push_str("All qubits are pairwise entangled.\n");
        } else if self.any_entangled() {
            out.push_str("Some qubit pairs are entangled.\n");
        } else {
            out.push_str("No pairwise entanglement detected.\n");
        }
        for (key, metrics) in &self.pairs {
            if metrics.entangled {
                let _ = writeln!(
                    out,
                    "  q{}: concurrence {:.4}, negativity {:.4}",
                    key.replace('-', " ~ q"),
                    metrics.concurrence,
                    metrics.negativity
                );
            }
        }
        out
    }
}

fn pair_key(i: usize, j: usize) -> String {
    format!("{i}-{j}")
}

/// Reduce onto every unordered pair and evaluate concurrence and negativity.
pub fn analyze_pairwise(state: &StateVector) -> AnalysisResult<EntanglementReport> {
    let n = state.num_qubits();
    let mut pairs = BTreeMap::new();
    let mut partners: BTreeMap<usize, BTreeSet<usize>> =
        (0..n).map(|q| (q, BTreeSet::new())).collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let reduced = reduced_density_matrix(state, &[i, j])?;
            let metrics = PairMetrics::from_density(&reduced)?;
            if metrics.entangled {
                partners.entry(i).or_default().insert(j);
                partners.entry(j).or_default().insert(i);
            }
            pairs.insert(pair_key(i, j), metrics);
        }
    }

    let fully_entangled = n >= 2 && partners.values().all(|p| p.len() == n - 1);
    Ok(EntanglementReport {
        num_qubits: n,
        pairs,
        partners,
        fully_entangled,
    })
}
