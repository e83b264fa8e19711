//! qsv Circuit Program Representation
//!
//! This crate holds everything needed to describe a simulation request
//! before any amplitude is touched: complex helpers, the gate catalog,
//! validated custom unitaries, the [`CircuitProgram`] itself, its JSON wire
//! format, and an OpenQASM 2.0 exporter.
//!
//! # Bit convention
//!
//! For an `n`-qubit register, qubit 0 is the **most significant** bit of a
//! basis index: bit `t` of index `i` is `(i >> (n - 1 - t)) & 1`. Every
//! crate in the workspace uses this convention, including bitstrings
//! (qubit 0 is the leftmost character) and custom-matrix operands
//! (`qubits[0]` is the most significant bit of the matrix index).
//!
//! # Example: Building a Bell program
//!
//! ```rust
//! use qsv_ir::CircuitProgram;
//!
//! let mut program = CircuitProgram::new(2);
//! program.h(0).unwrap().cx(0, 1).unwrap();
//!
//! assert_eq!(program.len(), 2);
//! assert_eq!(program, CircuitProgram::bell().unwrap());
//! ```
//!
//! # Example: Loading a request
//!
//! ```rust
//! use qsv_ir::{CircuitProgram, ProgramRequest};
//!
//! let json = r#"{"numQubits": 1, "gates": [{"type": "Rx", "params": [0], "angle": 1.0}]}"#;
//! let request: ProgramRequest = serde_json::from_str(json).unwrap();
//! let program = CircuitProgram::try_from(&request).unwrap();
//! assert_eq!(program.gates()[0].name(), "rx");
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase-family gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Axis rotations |
//! | `Phase` | 1 | `diag(1, e^{iφ})` |
//! | `CNOT`, `CZ` | 2 | Controlled-X and controlled-Z |
//! | `SWAP` | 2 | Exchange two qubits |
//! | `CCNOT` | 3 | Toffoli gate |
//! | custom matrix | k | Any validated `2^k x 2^k` unitary |
//! | custom circuit | k | Named sub-circuit over `k` mapped qubits |
//! | custom control | k+1 | Single-qubit gate under `k` controls |
//! | `Measure` | 1 | Collapsing computational-basis measurement |

pub mod complex;
pub mod error;
pub mod gate;
pub mod matrix;
pub mod program;
pub mod qasm;
pub mod wire;

pub use complex::{WireComplex, approx_eq, parse_complex};
pub use error::{IrError, IrResult};
pub use gate::{
    Axis, ControlledGate, CustomCircuit, CustomUnitary, FixedGate, Gate, GateKind,
    SingleQubitGate, phase_matrix, rotation_matrix,
};
pub use matrix::{UNITARITY_TOLERANCE, UnitaryMatrix};
pub use program::{CircuitProgram, parse_bitstring};
pub use qasm::to_qasm2;
pub use wire::{GateSpec, ProgramRequest};
