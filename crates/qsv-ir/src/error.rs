//! Error types for the IR crate.

use thiserror::Error;

/// Validation errors raised while authoring or loading a program.
///
/// Every variant is produced before execution starts; a program that
/// fails validation is never run.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside `[0, n)`.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit register{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// The same qubit appears twice among a gate's operands.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Custom matrix fails the unitarity check.
    #[error("Matrix for gate '{gate_name}' is not unitary (max |U†U - I| = {deviation:.3e})")]
    NotUnitary {
        /// Name of the custom gate.
        gate_name: String,
        /// Largest entry of `|U†U - I|`.
        deviation: f64,
    },

    /// Matrix is not square with a power-of-two dimension.
    #[error("Matrix for gate '{gate_name}' has invalid shape {rows}x{cols}")]
    InvalidMatrixShape {
        /// Name of the custom gate.
        gate_name: String,
        /// Row count.
        rows: usize,
        /// Column count (of the first short/long row when ragged).
        cols: usize,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Gate type name not recognised by the wire format.
    #[error("Unknown gate type '{0}'")]
    UnknownGateType(String),

    /// Parameterised gate without an angle.
    #[error("Gate '{0}' requires an angle")]
    MissingAngle(String),

    /// Custom matrix gate without a matrix.
    #[error("Custom matrix gate '{0}' has no matrix")]
    MissingMatrix(String),

    /// Custom gate payload is malformed.
    #[error("Invalid custom gate '{gate_name}': {reason}")]
    InvalidCustomGate {
        /// Name of the custom gate.
        gate_name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Initial basis index does not fit the register.
    #[error("Initial basis index {index} out of range for {num_qubits} qubits")]
    InitialStateOutOfRange {
        /// The requested index.
        index: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// A program needs at least one qubit.
    #[error("Program must have at least one qubit")]
    EmptyRegister,

    /// Register too wide for a `usize` basis index.
    #[error("Register of {0} qubits cannot be indexed")]
    RegisterTooWide(usize),

    /// Bitstring contains characters other than '0' and '1'.
    #[error("Invalid bitstring '{0}'")]
    InvalidBitstring(String),

    /// Complex literal could not be parsed.
    #[error("Invalid complex number '{0}' (use forms like 1, i, -0.5i, 0.5-0.3i)")]
    InvalidComplex(String),

    /// Angle is NaN or infinite.
    #[error("Gate '{gate_name}' has a non-finite angle")]
    NonFiniteAngle {
        /// Name of the gate.
        gate_name: String,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
