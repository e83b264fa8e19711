//! Serializable simulation results.

use std::collections::BTreeMap;

use num_complex::Complex64;
use qsv_analysis::{
    BlochVector, DensityMatrix, EntanglementReport, Mixedness, PairMetrics, QubitReport,
    StateStatistics,
};
use qsv_ir::WireComplex;
use qsv_sim::{Counts, Representation};
use serde::{Deserialize, Serialize};

/// Complex matrix as nested rows of `{re, im}` objects.
pub type WireMatrix = Vec<Vec<WireComplex>>;

fn wire_matrix(rho: &DensityMatrix) -> WireMatrix {
    rho.to_rows()
        .into_iter()
        .map(|row| row.into_iter().map(WireComplex::from).collect())
        .collect()
}

/// Everything produced by one simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub num_qubits: usize,
    /// Final amplitudes in basis-index order.
    pub state_vector: Vec<WireComplex>,
    /// `|ψ_i|²` in basis-index order.
    pub probabilities: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_matrix: Option<WireMatrix>,
    /// Single-qubit reduced matrices keyed by qubit index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_density_matrices: Option<BTreeMap<usize, WireMatrix>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qubits: Option<Vec<QubitSummary>>,
    /// Pair metrics keyed `"i-j"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairwise: Option<BTreeMap<String, PairMetrics>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entanglement: Option<EntanglementSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<Counts>,
    /// Mid-circuit measurement outcomes keyed `q<index>`.
    pub measurements: BTreeMap<String, u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<StateStatistics>,
    pub representation: Representation,
    pub gates_applied: usize,
    pub elapsed_ms: u64,
}

impl SimulationReport {
    /// Report holding the state alone.
    pub fn from_state(
        state: &qsv_sim::StateVector,
        measurements: &BTreeMap<usize, u8>,
        representation: Representation,
        gates_applied: usize,
    ) -> Self {
        Self {
            num_qubits: state.num_qubits(),
            state_vector: state.amplitudes().iter().copied().map(WireComplex::from).collect(),
            probabilities: qsv_sim::probabilities(state),
            density_matrix: None,
            reduced_density_matrices: None,
            qubits: None,
            pairwise: None,
            entanglement: None,
            counts: None,
            measurements: measurements
                .iter()
                .map(|(q, outcome)| (format!("q{q}"), *outcome))
                .collect(),
            statistics: None,
            representation,
            gates_applied,
            elapsed_ms: 0,
        }
    }

    /// Attach the full density matrix.
    pub fn set_density_matrix(&mut self, rho: &DensityMatrix) {
        self.density_matrix = Some(wire_matrix(rho));
    }

    /// Attach per-qubit reduced matrices and summaries.
    pub fn set_qubits(&mut self, reports: &[QubitReport], include_matrices: bool) {
        if include_matrices {
            self.reduced_density_matrices = Some(
                reports
                    .iter()
                    .map(|r| (r.qubit, wire_matrix(&r.reduced)))
                    .collect(),
            );
        }
        self.qubits = Some(reports.iter().map(QubitSummary::from).collect());
    }

    /// Attach the pairwise entanglement graph.
    pub fn set_entanglement(&mut self, report: &EntanglementReport) {
        self.pairwise = Some(report.pairs.clone());
        self.entanglement = Some(EntanglementSummary {
            fully_entangled: report.fully_entangled,
            partners: report
                .partners
                .iter()
                .map(|(q, set)| (*q, set.iter().copied().collect()))
                .collect(),
            summary: report.summary(),
        });
    }

    /// Amplitudes as complex numbers.
    pub fn amplitudes(&self) -> Vec<Complex64> {
        self.state_vector.iter().copied().map(Complex64::from).collect()
    }
}

/// Per-qubit Bloch, entropy and mixedness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QubitSummary {
    pub qubit: usize,
    pub bloch: BlochVector,
    pub bloch_length: f64,
    pub theta: f64,
    pub phi: f64,
    pub entropy: f64,
    pub purity: f64,
    pub mixedness: f64,
    pub classification: Mixedness,
}

impl From<&QubitReport> for QubitSummary {
    fn from(r: &QubitReport) -> Self {
        Self {
            qubit: r.qubit,
            bloch: r.bloch,
            bloch_length: r.bloch.length(),
            theta: r.bloch.theta(),
            phi: r.bloch.phi(),
            entropy: r.entropy,
            purity: r.purity,
            mixedness: r.mixedness,
            classification: r.classification,
        }
    }
}

/// Entanglement graph summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntanglementSummary {
    pub fully_entangled: bool,
    /// Entangled partners of each qubit.
    pub partners: BTreeMap<usize, Vec<usize>>,
    pub summary: String,
}
