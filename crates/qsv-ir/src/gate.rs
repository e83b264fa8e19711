//! Quantum gate types and the fixed gate catalog.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::complex::{I, ONE, ZERO};
use crate::error::{IrError, IrResult};
use crate::matrix::{UnitaryMatrix, mat2};

/// Fixed single-qubit gates with no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixedGate {
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
}

impl FixedGate {
    /// Every fixed gate, in catalog order.
    pub const ALL: [FixedGate; 8] = [
        FixedGate::X,
        FixedGate::Y,
        FixedGate::Z,
        FixedGate::H,
        FixedGate::S,
        FixedGate::Sdg,
        FixedGate::T,
        FixedGate::Tdg,
    ];

    /// Get the name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            FixedGate::X => "x",
            FixedGate::Y => "y",
            FixedGate::Z => "z",
            FixedGate::H => "h",
            FixedGate::S => "s",
            FixedGate::Sdg => "sdg",
            FixedGate::T => "t",
            FixedGate::Tdg => "tdg",
        }
    }

    /// The 2x2 unitary of this gate.
    pub fn matrix(self) -> Array2<Complex64> {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        match self {
            FixedGate::X => mat2(ZERO, ONE, ONE, ZERO),
            FixedGate::Y => mat2(ZERO, -I, I, ZERO),
            FixedGate::Z => mat2(ONE, ZERO, ZERO, -ONE),
            FixedGate::H => mat2(h, h, h, -h),
            FixedGate::S => mat2(ONE, ZERO, ZERO, I),
            FixedGate::Sdg => mat2(ONE, ZERO, ZERO, -I),
            FixedGate::T => mat2(ONE, ZERO, ZERO, Complex64::from_polar(1.0, FRAC_PI_4)),
            FixedGate::Tdg => mat2(ONE, ZERO, ZERO, Complex64::from_polar(1.0, -FRAC_PI_4)),
        }
    }
}

/// Rotation axis of an `R_axis(θ)` gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Rotation around X.
    X,
    /// Rotation around Y.
    Y,
    /// Rotation around Z.
    Z,
}

impl Axis {
    /// Gate name of the rotation about this axis.
    #[inline]
    pub fn gate_name(self) -> &'static str {
        match self {
            Axis::X => "rx",
            Axis::Y => "ry",
            Axis::Z => "rz",
        }
    }
}

/// `R_axis(θ)` with θ in radians.
pub fn rotation_matrix(axis: Axis, theta: f64) -> Array2<Complex64> {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    match axis {
        Axis::X => mat2(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        ),
        Axis::Y => mat2(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        ),
        Axis::Z => mat2(
            Complex64::from_polar(1.0, -theta / 2.0),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, theta / 2.0),
        ),
    }
}

/// `diag(1, e^{iφ})` with φ in radians.
pub fn phase_matrix(phi: f64) -> Array2<Complex64> {
    mat2(ONE, ZERO, ZERO, Complex64::from_polar(1.0, phi))
}

/// A single-qubit operation usable as the base of a controlled gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SingleQubitGate {
    /// One of the fixed catalog gates.
    Fixed {
        /// Which gate.
        gate: FixedGate,
    },
    /// Axis rotation.
    Rotation {
        /// Rotation axis.
        axis: Axis,
        /// Angle in radians.
        angle: f64,
    },
    /// Phase gate.
    Phase {
        /// Angle in radians.
        angle: f64,
    },
}

impl SingleQubitGate {
    /// Get the name of this gate.
    pub fn name(&self) -> &'static str {
        match self {
            SingleQubitGate::Fixed { gate } => gate.name(),
            SingleQubitGate::Rotation { axis, .. } => axis.gate_name(),
            SingleQubitGate::Phase { .. } => "phase",
        }
    }

    /// The 2x2 unitary.
    pub fn matrix(&self) -> Array2<Complex64> {
        match *self {
            SingleQubitGate::Fixed { gate } => gate.matrix(),
            SingleQubitGate::Rotation { axis, angle } => rotation_matrix(axis, angle),
            SingleQubitGate::Phase { angle } => phase_matrix(angle),
        }
    }

    /// Angle, if the gate is parameterised.
    pub fn angle(&self) -> Option<f64> {
        match *self {
            SingleQubitGate::Fixed { .. } => None,
            SingleQubitGate::Rotation { angle, .. } | SingleQubitGate::Phase { angle } => {
                Some(angle)
            }
        }
    }

    /// Place this operation on a target qubit.
    pub fn on(self, target: usize) -> Gate {
        match self {
            SingleQubitGate::Fixed { gate } => Gate::Fixed { gate, target },
            SingleQubitGate::Rotation { axis, angle } => Gate::Rotation {
                axis,
                angle,
                target,
            },
            SingleQubitGate::Phase { angle } => Gate::Phase { angle, target },
        }
    }
}

impl From<FixedGate> for SingleQubitGate {
    fn from(gate: FixedGate) -> Self {
        SingleQubitGate::Fixed { gate }
    }
}

/// A user-defined unitary on an ordered qubit tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomUnitary {
    /// The name of the gate.
    pub name: String,
    /// Operands; `qubits[0]` is the most significant bit of the matrix index.
    pub qubits: Vec<usize>,
    /// Validated `2^k x 2^k` unitary.
    pub matrix: UnitaryMatrix,
}

/// A named sub-circuit reused as a single gate.
///
/// Body gates address local qubits `0..qubits.len()`; local qubit `i`
/// maps to program qubit `qubits[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCircuit {
    /// The name of the gate.
    pub name: String,
    /// Program qubits the body is mapped onto.
    pub qubits: Vec<usize>,
    /// Body gates in local numbering.
    pub body: Vec<Gate>,
}

/// A single-qubit gate applied to `target` iff every control qubit is 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlledGate {
    /// The name of the gate.
    pub name: String,
    /// Control qubits.
    pub controls: Vec<usize>,
    /// Target qubit.
    pub target: usize,
    /// Operation applied on the target.
    pub base: SingleQubitGate,
}

/// Coarse gate tag, one per [`Gate`] variant family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// X, Y, Z, H, S, S†, T, T†.
    FixedUnitary,
    /// Rx, Ry, Rz.
    Rotation,
    /// Phase(φ).
    Phase,
    /// CNOT or CZ.
    Controlled,
    /// SWAP.
    Swap,
    /// Toffoli (CCNOT).
    Toffoli,
    /// Custom unitary matrix.
    CustomMatrix,
    /// Custom sub-circuit.
    CustomCircuit,
    /// Custom multi-controlled single-qubit gate.
    CustomControl,
    /// Projective measurement in the computational basis.
    Measure,
}

/// A gate placed on concrete qubits.
///
/// The enum is closed: unknown gate types cannot be represented, so the
/// simulator has no "skip" path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Gate {
    /// Fixed single-qubit gate.
    Fixed {
        /// Which gate.
        gate: FixedGate,
        /// Target qubit.
        target: usize,
    },
    /// Axis rotation.
    Rotation {
        /// Rotation axis.
        axis: Axis,
        /// Angle in radians.
        angle: f64,
        /// Target qubit.
        target: usize,
    },
    /// Phase gate.
    Phase {
        /// Angle in radians.
        angle: f64,
        /// Target qubit.
        target: usize,
    },
    /// Controlled-X.
    Cnot {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// Controlled-Z.
    Cz {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// SWAP.
    Swap {
        /// First qubit.
        a: usize,
        /// Second qubit.
        b: usize,
    },
    /// Toffoli (CCNOT).
    Toffoli {
        /// First control.
        control1: usize,
        /// Second control.
        control2: usize,
        /// Target qubit.
        target: usize,
    },
    /// Custom unitary matrix.
    Unitary(CustomUnitary),
    /// Custom sub-circuit.
    Circuit(CustomCircuit),
    /// Custom multi-controlled gate.
    Controlled(ControlledGate),
    /// Collapsing measurement of one qubit.
    Measure {
        /// Measured qubit.
        target: usize,
    },
}

impl Gate {
    /// Fixed gate on `target`.
    pub fn fixed(gate: FixedGate, target: usize) -> Self {
        Gate::Fixed { gate, target }
    }

    /// Rotation about `axis` by `angle` radians.
    pub fn rotation(axis: Axis, angle: f64, target: usize) -> Self {
        Gate::Rotation {
            axis,
            angle,
            target,
        }
    }

    /// Custom unitary on `qubits`.
    pub fn unitary(name: impl Into<String>, qubits: Vec<usize>, matrix: UnitaryMatrix) -> Self {
        Gate::Unitary(CustomUnitary {
            name: name.into(),
            qubits,
            matrix,
        })
    }

    /// Custom sub-circuit mapped onto `qubits`.
    pub fn circuit(name: impl Into<String>, qubits: Vec<usize>, body: Vec<Gate>) -> Self {
        Gate::Circuit(CustomCircuit {
            name: name.into(),
            qubits,
            body,
        })
    }

    /// Multi-controlled single-qubit gate.
    pub fn controlled(
        name: impl Into<String>,
        controls: Vec<usize>,
        target: usize,
        base: SingleQubitGate,
    ) -> Self {
        Gate::Controlled(ControlledGate {
            name: name.into(),
            controls,
            target,
            base,
        })
    }

    /// Get the tag of this gate.
    pub fn kind(&self) -> GateKind {
        match self {
            Gate::Fixed { .. } => GateKind::FixedUnitary,
            Gate::Rotation { .. } => GateKind::Rotation,
            Gate::Phase { .. } => GateKind::Phase,
            Gate::Cnot { .. } | Gate::Cz { .. } => GateKind::Controlled,
            Gate::Swap { .. } => GateKind::Swap,
            Gate::Toffoli { .. } => GateKind::Toffoli,
            Gate::Unitary(_) => GateKind::CustomMatrix,
            Gate::Circuit(_) => GateKind::CustomCircuit,
            Gate::Controlled(_) => GateKind::CustomControl,
            Gate::Measure { .. } => GateKind::Measure,
        }
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        match self {
            Gate::Fixed { gate, .. } => gate.name(),
            Gate::Rotation { axis, .. } => axis.gate_name(),
            Gate::Phase { .. } => "phase",
            Gate::Cnot { .. } => "cnot",
            Gate::Cz { .. } => "cz",
            Gate::Swap { .. } => "swap",
            Gate::Toffoli { .. } => "ccnot",
            Gate::Unitary(g) => &g.name,
            Gate::Circuit(g) => &g.name,
            Gate::Controlled(g) => &g.name,
            Gate::Measure { .. } => "measure",
        }
    }

    /// Operands in order (controls before targets).
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Gate::Fixed { target, .. }
            | Gate::Rotation { target, .. }
            | Gate::Phase { target, .. }
            | Gate::Measure { target } => vec![*target],
            Gate::Cnot { control, target } | Gate::Cz { control, target } => {
                vec![*control, *target]
            }
            Gate::Swap { a, b } => vec![*a, *b],
            Gate::Toffoli {
                control1,
                control2,
                target,
            } => vec![*control1, *control2, *target],
            Gate::Unitary(g) => g.qubits.clone(),
            Gate::Circuit(g) => g.qubits.clone(),
            Gate::Controlled(g) => {
                let mut qubits = g.controls.clone();
                qubits.push(g.target);
                qubits
            }
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits().len()
    }

    /// Whether the gate is a unitary (everything but [`Gate::Measure`]).
    #[inline]
    pub fn is_unitary(&self) -> bool {
        !matches!(self, Gate::Measure { .. })
    }

    /// Copy of this gate with every qubit `q` replaced by `map[q]`.
    ///
    /// Used to lower custom-circuit bodies onto program qubits. The caller
    /// guarantees every qubit is a valid index into `map`.
    #[must_use]
    pub fn remapped(&self, map: &[usize]) -> Gate {
        let m = |q: usize| map[q];
        match self {
            Gate::Fixed { gate, target } => Gate::Fixed {
                gate: *gate,
                target: m(*target),
            },
            Gate::Rotation {
                axis,
                angle,
                target,
            } => Gate::Rotation {
                axis: *axis,
                angle: *angle,
                target: m(*target),
            },
            Gate::Phase { angle, target } => Gate::Phase {
                angle: *angle,
                target: m(*target),
            },
            Gate::Cnot { control, target } => Gate::Cnot {
                control: m(*control),
                target: m(*target),
            },
            Gate::Cz { control, target } => Gate::Cz {
                control: m(*control),
                target: m(*target),
            },
            Gate::Swap { a, b } => Gate::Swap { a: m(*a), b: m(*b) },
            Gate::Toffoli {
                control1,
                control2,
                target,
            } => Gate::Toffoli {
                control1: m(*control1),
                control2: m(*control2),
                target: m(*target),
            },
            Gate::Unitary(g) => Gate::Unitary(CustomUnitary {
                name: g.name.clone(),
                qubits: g.qubits.iter().map(|&q| m(q)).collect(),
                matrix: g.matrix.clone(),
            }),
            Gate::Circuit(g) => Gate::Circuit(CustomCircuit {
                name: g.name.clone(),
                qubits: g.qubits.iter().map(|&q| m(q)).collect(),
                body: g.body.clone(),
            }),
            Gate::Controlled(g) => Gate::Controlled(ControlledGate {
                name: g.name.clone(),
                controls: g.controls.iter().map(|&q| m(q)).collect(),
                target: m(g.target),
                base: g.base,
            }),
            Gate::Measure { target } => Gate::Measure { target: m(*target) },
        }
    }

    /// Check operands against a `num_qubits`-wide register.
    ///
    /// Custom-circuit bodies are checked recursively against their own
    /// local width.
    pub fn validate(&self, num_qubits: usize) -> IrResult<()> {
        let qubits = self.qubits();
        let context = || Some(self.name().to_string());

        for (pos, &q) in qubits.iter().enumerate() {
            if q >= num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: q,
                    num_qubits,
                    gate_name: context(),
                });
            }
            if qubits[..pos].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: context(),
                });
            }
        }

        match self {
            Gate::Rotation { angle, .. } | Gate::Phase { angle, .. } if !angle.is_finite() => {
                Err(IrError::NonFiniteAngle {
                    gate_name: self.name().to_string(),
                })
            }
            Gate::Unitary(g) => {
                if g.matrix.num_qubits() != g.qubits.len() {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: g.name.clone(),
                        expected: g.matrix.num_qubits(),
                        got: g.qubits.len(),
                    });
                }
                Ok(())
            }
            Gate::Controlled(g) => {
                if g.controls.is_empty() {
                    return Err(IrError::InvalidCustomGate {
                        gate_name: g.name.clone(),
                        reason: "at least one control qubit is required".to_string(),
                    });
                }
                if let Some(angle) = g.base.angle() {
                    if !angle.is_finite() {
                        return Err(IrError::NonFiniteAngle {
                            gate_name: g.name.clone(),
                        });
                    }
                }
                Ok(())
            }
            Gate::Circuit(g) => {
                if g.qubits.is_empty() || g.body.is_empty() {
                    return Err(IrError::InvalidCustomGate {
                        gate_name: g.name.clone(),
                        reason: "custom circuit needs qubits and at least one gate".to_string(),
                    });
                }
                if g.body.iter().any(Gate::contains_measure) {
                    return Err(IrError::InvalidCustomGate {
                        gate_name: g.name.clone(),
                        reason: "custom circuits cannot contain measurements".to_string(),
                    });
                }
                g.body
                    .iter()
                    .try_for_each(|inner| inner.validate(g.qubits.len()))
            }
            _ => Ok(()),
        }
    }

    fn contains_measure(&self) -> bool {
        match self {
            Gate::Measure { .. } => true,
            Gate::Circuit(g) => g.body.iter().any(Gate::contains_measure),
            _ => false,
        }
    }
}
