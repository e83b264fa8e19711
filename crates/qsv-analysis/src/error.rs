//! Error types for the analysis crate.

use thiserror::Error;

/// Errors produced while deriving density matrices and entanglement measures.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// Full density matrix requested above the configured ceiling.
    #[error("Density matrix for {num_qubits} qubits exceeds the limit of {max} qubits")]
    DensityTooLarge {
        /// Register width.
        num_qubits: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// Qubit index outside the register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit state")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// Same qubit listed twice in a selection.
    #[error("Qubit {0} selected more than once")]
    DuplicateQubit(usize),

    /// Partial trace asked to keep nothing.
    #[error("At least one qubit must be kept")]
    EmptySelection,

    /// Operation needs a matrix on a specific number of qubits.
    #[error("Expected a {expected}-qubit density matrix, got {got} qubits")]
    WrongQubitCount {
        /// Required width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// Partial transpose subsystem must be 0 or 1.
    #[error("Invalid subsystem {0} for a two-qubit partial transpose")]
    InvalidSubsystem(usize),

    /// Reduced matrix has zero or non-finite trace.
    #[error("Density matrix has zero trace")]
    ZeroTrace,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
