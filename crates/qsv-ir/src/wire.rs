//! JSON request format shared with the presentation layer.
//!
//! ```json
//! {
//!   "numQubits": 2,
//!   "initialBasisIndex": 0,
//!   "gates": [
//!     {"type": "H", "params": [0]},
//!     {"type": "CNOT", "params": [0, 1]},
//!     {"type": "Rx", "params": [1], "angle": 1.5707963}
//!   ]
//! }
//! ```
//!
//! Gate type names are matched case-insensitively. Anything the engine does
//! not know is rejected here with [`IrError::UnknownGateType`].

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::complex::WireComplex;
use crate::error::{IrError, IrResult};
use crate::gate::{Axis, FixedGate, Gate, SingleQubitGate};
use crate::matrix::UnitaryMatrix;
use crate::program::CircuitProgram;

const CUSTOM_MATRIX: &str = "CUSTOM_MATRIX";
const CUSTOM_CIRCUIT: &str = "CUSTOM_CIRCUIT";
const CUSTOM_CONTROL: &str = "CUSTOM_CONTROL";

/// Inbound program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRequest {
    /// Register width.
    pub num_qubits: usize,
    /// Starting basis index. Takes precedence over `initial_states`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_basis_index: Option<usize>,
    /// Starting basis state as one bit per qubit, qubit 0 first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_states: Option<Vec<u8>>,
    /// Gates in program order.
    #[serde(default)]
    pub gates: Vec<GateSpec>,
}

/// One gate as sent over the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateSpec {
    /// Gate type name (`"H"`, `"CNOT"`, `"CUSTOM"`, ...).
    #[serde(rename = "type")]
    pub gate_type: String,
    /// Qubit operands.
    #[serde(default)]
    pub params: Vec<usize>,
    /// Angle in radians for rotations and phase gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Row-major matrix for custom matrix gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<WireComplex>>>,
    /// Display name of a custom gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `CUSTOM_MATRIX`, `CUSTOM_CIRCUIT` or `CUSTOM_CONTROL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
    /// Body of a custom circuit, or the single base gate of a custom control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_gates: Option<Vec<GateSpec>>,
}

impl GateSpec {
    /// Plain gate spec with operands.
    pub fn new(gate_type: impl Into<String>, params: Vec<usize>) -> Self {
        Self {
            gate_type: gate_type.into(),
            params,
            ..Self::default()
        }
    }

    /// Attach an angle.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Convert to a [`Gate`].
    ///
    /// Checks the gate type, operand count and custom payloads. Qubit range
    /// checks need the register width and happen in
    /// [`CircuitProgram::push`].
    pub fn to_gate(&self) -> IrResult<Gate> {
        let upper = self.gate_type.trim().to_ascii_uppercase();

        if let Some(base) = self.single_qubit_base(&upper)? {
            self.expect_params(1)?;
            return Ok(base.on(self.params[0]));
        }

        match upper.as_str() {
            "CNOT" | "CX" => {
                self.expect_params(2)?;
                Ok(Gate::Cnot {
                    control: self.params[0],
                    target: self.params[1],
                })
            }
            "CZ" => {
                self.expect_params(2)?;
                Ok(Gate::Cz {
                    control: self.params[0],
                    target: self.params[1],
                })
            }
            "SWAP" => {
                self.expect_params(2)?;
                Ok(Gate::Swap {
                    a: self.params[0],
                    b: self.params[1],
                })
            }
            "CCNOT" | "CCX" | "TOFFOLI" => {
                self.expect_params(3)?;
                Ok(Gate::Toffoli {
                    control1: self.params[0],
                    control2: self.params[1],
                    target: self.params[2],
                })
            }
            "MEASURE" => {
                self.expect_params(1)?;
                Ok(Gate::Measure {
                    target: self.params[0],
                })
            }
            "CUSTOM" => {
                let custom_type = self
                    .custom_type
                    .as_deref()
                    .map(str::to_ascii_uppercase)
                    .ok_or_else(|| self.invalid_custom("missing customType"))?;
                self.to_custom_gate(&custom_type)
            }
            CUSTOM_MATRIX | CUSTOM_CIRCUIT | CUSTOM_CONTROL => self.to_custom_gate(&upper),
            _ => Err(IrError::UnknownGateType(self.gate_type.clone())),
        }
    }

    /// Single-qubit base operation named by `upper`, if it is one.
    fn single_qubit_base(&self, upper: &str) -> IrResult<Option<SingleQubitGate>> {
        let fixed = match upper {
            "X" => Some(FixedGate::X),
            "Y" => Some(FixedGate::Y),
            "Z" => Some(FixedGate::Z),
            "H" => Some(FixedGate::H),
            "S" => Some(FixedGate::S),
            "SDG" => Some(FixedGate::Sdg),
            "T" => Some(FixedGate::T),
            "TDG" => Some(FixedGate::Tdg),
            _ => None,
        };
        if let Some(gate) = fixed {
            return Ok(Some(SingleQubitGate::Fixed { gate }));
        }

        let axis = match upper {
            "RX" => Some(Axis::X),
            "RY" => Some(Axis::Y),
            "RZ" => Some(Axis::Z),
            _ => None,
        };
        if let Some(axis) = axis {
            return Ok(Some(SingleQubitGate::Rotation {
                axis,
                angle: self.require_angle()?,
            }));
        }

        if matches!(upper, "PHASE" | "P" | "U1") {
            return Ok(Some(SingleQubitGate::Phase {
                angle: self.require_angle()?,
            }));
        }

        Ok(None)
    }

    fn to_custom_gate(&self, custom_type: &str) -> IrResult<Gate> {
        let name = self.display_name();
        match custom_type {
            CUSTOM_MATRIX => {
                let rows = self
                    .matrix
                    .as_ref()
                    .ok_or_else(|| IrError::MissingMatrix(name.clone()))?;
                let rows: Vec<Vec<Complex64>> = rows
                    .iter()
                    .map(|row| row.iter().copied().map(Complex64::from).collect())
                    .collect();
                let matrix = UnitaryMatrix::from_rows(&name, &rows)?;
                self.expect_params(matrix.num_qubits())?;
                Ok(Gate::unitary(name, self.params.clone(), matrix))
            }
            CUSTOM_CIRCUIT => {
                let body = self
                    .sub_gates
                    .as_deref()
                    .filter(|gates| !gates.is_empty())
                    .ok_or_else(|| self.invalid_custom("custom circuit has no sub-gates"))?
                    .iter()
                    .map(GateSpec::to_gate)
                    .collect::<IrResult<Vec<_>>>()?;
                Ok(Gate::circuit(name, self.params.clone(), body))
            }
            CUSTOM_CONTROL => {
                let base_spec = match self.sub_gates.as_deref() {
                    Some([single]) => single,
                    _ => {
                        return Err(
                            self.invalid_custom("custom control must wrap exactly one sub-gate")
                        );
                    }
                };
                let upper = base_spec.gate_type.trim().to_ascii_uppercase();
                let base_spec = GateSpec {
                    angle: base_spec.angle.or(self.angle),
                    ..base_spec.clone()
                };
                let base = base_spec.single_qubit_base(&upper)?.ok_or_else(|| {
                    self.invalid_custom(&format!(
                        "unsupported controlled base gate '{}'",
                        base_spec.gate_type
                    ))
                })?;
                let Some((&target, controls)) = self.params.split_last() else {
                    return Err(self.invalid_custom("missing target qubit"));
                };
                Ok(Gate::controlled(name, controls.to_vec(), target, base))
            }
            other => Err(IrError::UnknownGateType(other.to_string())),
        }
    }

    fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.gate_type.clone())
    }

    fn require_angle(&self) -> IrResult<f64> {
        self.angle
            .ok_or_else(|| IrError::MissingAngle(self.gate_type.clone()))
    }

    fn expect_params(&self, expected: usize) -> IrResult<()> {
        if self.params.len() != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: self.display_name(),
                expected,
                got: self.params.len(),
            });
        }
        Ok(())
    }

    fn invalid_custom(&self, reason: &str) -> IrError {
        IrError::InvalidCustomGate {
            gate_name: self.display_name(),
            reason: reason.to_string(),
        }
    }
}

impl From<&Gate> for GateSpec {
    fn from(gate: &Gate) -> Self {
        let params = gate.qubits();
        match gate {
            Gate::Fixed { gate: fixed, .. } => GateSpec::new(fixed_wire_name(*fixed), params),
            Gate::Rotation { axis, angle, .. } => {
                GateSpec::new(rotation_wire_name(*axis), params).with_angle(*angle)
            }
            Gate::Phase { angle, .. } => GateSpec::new("Phase", params).with_angle(*angle),
            Gate::Cnot { .. } => GateSpec::new("CNOT", params),
            Gate::Cz { .. } => GateSpec::new("CZ", params),
            Gate::Swap { .. } => GateSpec::new("SWAP", params),
            Gate::Toffoli { .. } => GateSpec::new("CCNOT", params),
            Gate::Measure { .. } => GateSpec::new("MEASURE", params),
            Gate::Unitary(g) => GateSpec {
                name: Some(g.name.clone()),
                custom_type: Some(CUSTOM_MATRIX.to_string()),
                matrix: Some(g.matrix.clone().into()),
                ..GateSpec::new("CUSTOM", params)
            },
            Gate::Circuit(g) => GateSpec {
                name: Some(g.name.clone()),
                custom_type: Some(CUSTOM_CIRCUIT.to_string()),
                sub_gates: Some(g.body.iter().map(GateSpec::from).collect()),
                ..GateSpec::new("CUSTOM", params)
            },
            Gate::Controlled(g) => GateSpec {
                name: Some(g.name.clone()),
                custom_type: Some(CUSTOM_CONTROL.to_string()),
                angle: g.base.angle(),
                sub_gates: Some(vec![GateSpec::from(&g.base.on(g.target))]),
                ..GateSpec::new("CUSTOM", params)
            },
        }
    }
}

fn fixed_wire_name(gate: FixedGate) -> &'static str {
    match gate {
        FixedGate::X => "X",
        FixedGate::Y => "Y",
        FixedGate::Z => "Z",
        FixedGate::H => "H",
        FixedGate::S => "S",
        FixedGate::Sdg => "Sdg",
        FixedGate::T => "T",
        FixedGate::Tdg => "Tdg",
    }
}

fn rotation_wire_name(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "Rx",
        Axis::Y => "Ry",
        Axis::Z => "Rz",
    }
}

impl TryFrom<&ProgramRequest> for CircuitProgram {
    type Error = IrError;

    fn try_from(request: &ProgramRequest) -> IrResult<Self> {
        if request.num_qubits == 0 {
            return Err(IrError::EmptyRegister);
        }

        let initial_index = match (request.initial_basis_index, &request.initial_states) {
            (Some(index), _) => index,
            (None, Some(bits)) => bits_to_index(bits, request.num_qubits)?,
            (None, None) => 0,
        };

        let mut program = CircuitProgram::new(request.num_qubits).with_initial_index(initial_index)?;
        for spec in &request.gates {
            program.push(spec.to_gate()?)?;
        }
        Ok(program)
    }
}

impl TryFrom<ProgramRequest> for CircuitProgram {
    type Error = IrError;

    fn try_from(request: ProgramRequest) -> IrResult<Self> {
        CircuitProgram::try_from(&request)
    }
}

impl From<&CircuitProgram> for ProgramRequest {
    fn from(program: &CircuitProgram) -> Self {
        Self {
            num_qubits: program.num_qubits(),
            initial_basis_index: Some(program.initial_basis_index()),
            initial_states: None,
            gates: program.gates().iter().map(GateSpec::from).collect(),
        }
    }
}

fn bits_to_index(bits: &[u8], num_qubits: usize) -> IrResult<usize> {
    let as_text = || bits.iter().map(u8::to_string).collect::<String>();
    if bits.len() != num_qubits {
        return Err(IrError::InvalidBitstring(as_text()));
    }
    bits.iter().try_fold(0usize, |acc, &bit| match bit {
        0 | 1 => Ok((acc << 1) | usize::from(bit)),
        _ => Err(IrError::InvalidBitstring(as_text())),
    })
}
