//! Error types for the sim crate.

use qsv_ir::IrError;
use thiserror::Error;

/// Errors produced while executing or measuring a state.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Program was rejected before execution.
    #[error("Invalid program: {0}")]
    Ir(#[from] IrError),

    /// Register exceeds the configured ceiling.
    #[error("Program has {requested} qubits but the simulator only supports {max}")]
    TooManyQubits {
        /// Requested register width.
        requested: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// Run was cancelled between two gates.
    #[error("Simulation cancelled after {gates_applied} gates")]
    Cancelled {
        /// Gates fully applied before the cancellation was observed.
        gates_applied: usize,
    },

    /// State has zero total probability and cannot be measured or normalized.
    #[error("State has zero norm")]
    ZeroNorm,

    /// A non-unitary operation was passed to the pure gate applicator.
    #[error("Gate '{0}' is not unitary; measure through the executor instead")]
    NonUnitary(String),

    /// Qubit index outside the register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit state")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// Amplitude vector length is not a power of two.
    #[error("State vector of length {0} is not a power of two")]
    InvalidLength(usize),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
