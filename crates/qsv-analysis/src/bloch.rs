//! Single-qubit Bloch vectors, entropy and mixedness.

use serde::{Deserialize, Serialize};

use crate::density::{DensityMatrix, reduced_density_matrix};
use crate::error::{AnalysisError, AnalysisResult};
use qsv_sim::StateVector;

/// Real 3-vector with `ρ = (I + xσx + yσy + zσz) / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlochVector {
    /// `⟨σx⟩`.
    pub x: f64,
    /// `⟨σy⟩`.
    pub y: f64,
    /// `⟨σz⟩`.
    pub z: f64,
}

impl BlochVector {
    /// Read the vector off a single-qubit density matrix.
    pub fn from_density(rho: &DensityMatrix) -> AnalysisResult<Self> {
        if rho.num_qubits() != 1 {
            return Err(AnalysisError::WrongQubitCount {
                expected: 1,
                got: rho.num_qubits(),
            });
        }
        let off = rho.get(0, 1);
        Ok(Self {
            x: 2.0 * off.re,
            y: -2.0 * off.im,
            z: rho.get(0, 0).re - rho.get(1, 1).re,
        })
    }

    /// `r = |v|`.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Von Neumann entropy in bits.
    pub fn entropy(&self) -> f64 {
        let r = self.length().min(1.0);
        let l1 = (1.0 + r) / 2.0;
        let l2 = (1.0 - r) / 2.0;
        -(xlog2x(l1) + xlog2x(l2))
    }

    /// `Tr ρ² = (1 + r²) / 2`.
    pub fn purity(&self) -> f64 {
        let r = self.length();
        (1.0 + r * r) / 2.0
    }

    /// `1 - purity`.
    pub fn mixedness(&self) -> f64 {
        1.0 - self.purity()
    }

    /// Polar angle from +z, in radians.
    pub fn theta(&self) -> f64 {
        let r = self.length();
        if r == 0.0 { 0.0 } else { (self.z / r).clamp(-1.0, 1.0).acos() }
    }

    /// Azimuth from +x in the xy-plane, in radians.
    pub fn phi(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

fn xlog2x(p: f64) -> f64 {
    if p <= 0.0 { 0.0 } else { p * p.log2() }
}

/// Coarse mixedness bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mixedness {
    /// `mixedness <= 0.1`.
    Pure,
    /// `0.1 < mixedness <= 0.3`.
    SlightlyMixed,
    /// `0.3 < mixedness <= 0.7`.
    Mixed,
    /// `mixedness > 0.7`. Unreachable for a single qubit, where mixedness
    /// tops out at 0.5.
    HighlyMixed,
}

impl Mixedness {
    /// Classify a mixedness value.
    pub fn classify(mixedness: f64) -> Self {
        if mixedness > 0.7 {
            Mixedness::HighlyMixed
        } else if mixedness > 0.3 {
            Mixedness::Mixed
        } else if mixedness > 0.1 {
            Mixedness::SlightlyMixed
        } else {
            Mixedness::Pure
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Mixedness::Pure => "Pure",
            Mixedness::SlightlyMixed => "Slightly Mixed",
            Mixedness::Mixed => "Mixed",
            Mixedness::HighlyMixed => "Highly Mixed",
        }
    }
}

/// Per-qubit view of a state.
#[derive(Debug, Clone, PartialEq)]
pub struct QubitReport {
    /// Qubit index.
    pub qubit: usize,
    /// Reduced 2x2 density matrix.
    pub reduced: DensityMatrix,
    /// Bloch vector of `reduced`.
    pub bloch: BlochVector,
    /// Von Neumann entropy in bits.
    pub entropy: f64,
    /// `Tr ρ²`.
    pub purity: f64,
    /// `1 - purity`.
    pub mixedness: f64,
    /// Bucketed mixedness.
    pub classification: Mixedness,
}

impl QubitReport {
    fn from_reduced(qubit: usize, reduced: DensityMatrix) -> AnalysisResult<Self> {
        let bloch = BlochVector::from_density(&reduced)?;
        let mixedness = bloch.mixedness();
        Ok(Self {
            qubit,
            reduced,
            bloch,
            entropy: bloch.entropy(),
            purity: bloch.purity(),
            mixedness,
            classification: Mixedness::classify(mixedness),
        })
    }
}

/// Reduce onto every qubit and summarise each one.
pub fn analyze_qubits(state: &StateVector) -> AnalysisResult<Vec<QubitReport>> {
    (0..state.num_qubits())
        .map(|q| QubitReport::from_reduced(q, reduced_density_matrix(state, &[q])?))
        .collect()
}
