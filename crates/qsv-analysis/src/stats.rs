//! Summary statistics over a state's amplitudes and outcome distribution.

use serde::{Deserialize, Serialize};

use crate::bloch::{BlochVector, QubitReport, analyze_qubits};
use crate::error::AnalysisResult;
use qsv_sim::StateVector;

/// Outcomes with probability at or below this count as absent.
const NONZERO_PROBABILITY: f64 = 1e-10;

/// Bloch length every qubit must exceed for the product-state heuristic.
const PRODUCT_BLOCH_LENGTH: f64 = 0.95;

/// Outcomes above this count toward the two-peak entanglement heuristic.
const SIGNIFICANT_PROBABILITY: f64 = 0.01;

/// Amplitude and probability summary of a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateStatistics {
    /// `2^n`.
    pub dimension: usize,
    /// Largest `|a|` over all amplitudes.
    pub max_amplitude: f64,
    /// Smallest `|a|`, zero entries included.
    pub min_amplitude: f64,
    /// Mean of `|a|` over the `2^n` entries.
    pub mean_amplitude: f64,
    /// Largest outcome probability `|a|²`.
    pub max_probability: f64,
    /// Smallest probability above `1e-10`, or 0 when none qualifies.
    pub min_nonzero_probability: f64,
    /// Shannon entropy of the outcome distribution, in bits.
    pub entropy: f64,
    /// Every qubit's Bloch vector is nearly unit length.
    pub product_state: bool,
    /// Exactly two significant outcomes, one of them near 0.5.
    pub possible_maximal_entanglement: bool,
}

impl StateStatistics {
    /// Compute statistics, deriving per-qubit Bloch vectors on the way.
    pub fn compute(state: &StateVector) -> AnalysisResult<Self> {
        let reports = analyze_qubits(state)?;
        Ok(Self::with_qubits(state, &reports))
    }

    /// Compute statistics reusing already derived per-qubit reports.
    pub fn with_qubits(state: &StateVector, qubits: &[QubitReport]) -> Self {
        let moduli: Vec<f64> = state.amplitudes().iter().map(|a| a.norm()).collect();
        let probabilities: Vec<f64> = moduli.iter().map(|m| m * m).collect();
        let dimension = moduli.len();

        let max_amplitude = moduli.iter().copied().fold(0.0, f64::max);
        let min_amplitude = moduli.iter().copied().fold(f64::INFINITY, f64::min);
        let mean_amplitude = moduli.iter().sum::<f64>() / dimension as f64;
        let max_probability = probabilities.iter().copied().fold(0.0, f64::max);
        let min_nonzero_probability = probabilities
            .iter()
            .copied()
            .filter(|&p| p > NONZERO_PROBABILITY)
            .reduce(f64::min)
            .unwrap_or(0.0);

        let entropy = -probabilities
            .iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| p * p.log2())
            .sum::<f64>();

        let product_state = qubits
            .iter()
            .map(|r| r.bloch)
            .all(|b: BlochVector| b.length() > PRODUCT_BLOCH_LENGTH);

        let significant = probabilities
            .iter()
            .filter(|&&p| p > SIGNIFICANT_PROBABILITY)
            .count();
        let near_half = probabilities
            .iter()
            .any(|&p| (p - 0.5).abs() < SIGNIFICANT_PROBABILITY);

        Self {
            dimension,
            max_amplitude,
            min_amplitude,
            mean_amplitude,
            max_probability,
            min_nonzero_probability,
            entropy,
            product_state,
            possible_maximal_entanglement: near_half && significant == 2,
        }
    }
}
