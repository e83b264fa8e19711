//! `qsv-analysis`: quantities derived from a simulated state.
//!
//! - [`DensityMatrix`]: `ρ = |ψ⟩⟨ψ|` with a caller-supplied qubit ceiling,
//!   and partial traces onto any ordered subset of qubits.
//! - [`reduced_density_matrix`]: the same reduction computed straight from
//!   amplitudes, usable for per-qubit and per-pair analysis on registers
//!   too wide for the full matrix.
//! - [`BlochVector`] and [`analyze_qubits`]: Bloch coordinates, von Neumann
//!   entropy and mixedness for every qubit.
//! - [`concurrence`], [`negativity`] and [`analyze_pairwise`]: two-qubit
//!   entanglement measures over every pair.
//! - [`StateStatistics`]: amplitude and outcome-distribution summary.
//!
//! # Example
//!
//! ```rust
//! use qsv_analysis::{analyze_pairwise, analyze_qubits};
//! use qsv_ir::CircuitProgram;
//!
//! let state = qsv_sim::run(&CircuitProgram::bell().unwrap()).unwrap().state;
//!
//! let qubits = analyze_qubits(&state).unwrap();
//! assert!((qubits[0].entropy - 1.0).abs() < 1e-9);
//!
//! let report = analyze_pairwise(&state).unwrap();
//! assert!(report.fully_entangled);
//! ```

pub mod bloch;
pub mod density;
pub mod eigen;
pub mod entanglement;
pub mod error;
pub mod stats;

pub use bloch::{BlochVector, Mixedness, QubitReport, analyze_qubits};
pub use density::{DensityMatrix, reduced_density_matrix};
pub use entanglement::{
    ENTANGLEMENT_THRESHOLD, EntanglementReport, PairMetrics, analyze_pairwise, concurrence,
    negativity, partial_transpose,
};
pub use error::{AnalysisError, AnalysisResult};
pub use stats::StateStatistics;
