//! Circuit programs: register width, initial basis state, ordered gates.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Axis, FixedGate, Gate};

/// Widest register whose basis index still fits a `usize` shift.
pub const MAX_INDEXABLE_QUBITS: usize = usize::BITS as usize - 1;

/// A complete simulation request.
///
/// Programs are stateless: each run starts from `initial_basis_index` and
/// replays every gate. Undo is "drop the last gate and run again".
///
/// Bit convention: qubit 0 is the most significant bit of a basis index,
/// qubit `n-1` the least significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitProgram {
    num_qubits: usize,
    initial_basis_index: usize,
    gates: Vec<Gate>,
}

impl CircuitProgram {
    /// Empty program on `num_qubits` qubits starting from `|0...0⟩`.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            initial_basis_index: 0,
            gates: vec![],
        }
    }

    /// Set the initial basis index.
    pub fn with_initial_index(mut self, index: usize) -> IrResult<Self> {
        check_width(self.num_qubits)?;
        if index >= 1usize << self.num_qubits {
            return Err(IrError::InitialStateOutOfRange {
                index,
                num_qubits: self.num_qubits,
            });
        }
        self.initial_basis_index = index;
        Ok(self)
    }

    /// Set the initial basis state from a bitstring such as `"010"`
    /// (qubit 0 first).
    pub fn with_initial_bits(self, bits: &str) -> IrResult<Self> {
        if bits.len() != self.num_qubits {
            return Err(IrError::InvalidBitstring(bits.to_string()));
        }
        let index = parse_bitstring(bits)?;
        self.with_initial_index(index)
    }

    /// Number of qubits in the register.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Basis index the run starts from.
    #[inline]
    pub fn initial_basis_index(&self) -> usize {
        self.initial_basis_index
    }

    /// Initial basis state as a per-qubit bit list (qubit 0 first).
    pub fn initial_bits(&self) -> Vec<u8> {
        (0..self.num_qubits)
            .map(|q| ((self.initial_basis_index >> (self.num_qubits - 1 - q)) & 1) as u8)
            .collect()
    }

    /// Gates in program order.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates.
    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the program has no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Whether any gate collapses the state.
    pub fn has_measurements(&self) -> bool {
        self.gates.iter().any(|g| !g.is_unitary())
    }

    /// Validate and append a gate.
    ///
    /// A gate that fails validation is not added.
    pub fn push(&mut self, gate: Gate) -> IrResult<&mut Self> {
        gate.validate(self.num_qubits)?;
        self.gates.push(gate);
        Ok(self)
    }

    /// Remove and return the last gate.
    pub fn undo(&mut self) -> Option<Gate> {
        self.gates.pop()
    }

    /// Remove every gate, keeping register width and initial state.
    pub fn clear(&mut self) {
        self.gates.clear();
    }

    /// Re-check the whole program.
    pub fn validate(&self) -> IrResult<()> {
        if self.num_qubits == 0 {
            return Err(IrError::EmptyRegister);
        }
        check_width(self.num_qubits)?;
        if self.initial_basis_index >= 1usize << self.num_qubits {
            return Err(IrError::InitialStateOutOfRange {
                index: self.initial_basis_index,
                num_qubits: self.num_qubits,
            });
        }
        self.gates
            .iter()
            .try_for_each(|gate| gate.validate(self.num_qubits))
    }

    // =========================================================================
    // Builder helpers
    // =========================================================================

    /// Apply H.
    pub fn h(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::fixed(FixedGate::H, q))
    }

    /// Apply X.
    pub fn x(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::fixed(FixedGate::X, q))
    }

    /// Apply Y.
    pub fn y(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::fixed(FixedGate::Y, q))
    }

    /// Apply Z.
    pub fn z(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::fixed(FixedGate::Z, q))
    }

    /// Apply S.
    pub fn s(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::fixed(FixedGate::S, q))
    }

    /// Apply S†.
    pub fn sdg(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::fixed(FixedGate::Sdg, q))
    }

    /// Apply T.
    pub fn t(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::fixed(FixedGate::T, q))
    }

    /// Apply T†.
    pub fn tdg(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::fixed(FixedGate::Tdg, q))
    }

    /// Apply Rx(θ).
    pub fn rx(&mut self, theta: f64, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::rotation(Axis::X, theta, q))
    }

    /// Apply Ry(θ).
    pub fn ry(&mut self, theta: f64, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::rotation(Axis::Y, theta, q))
    }

    /// Apply Rz(θ).
    pub fn rz(&mut self, theta: f64, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::rotation(Axis::Z, theta, q))
    }

    /// Apply Phase(φ).
    pub fn phase(&mut self, phi: f64, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::Phase {
            angle: phi,
            target: q,
        })
    }

    /// Apply CNOT.
    pub fn cx(&mut self, control: usize, target: usize) -> IrResult<&mut Self> {
        self.push(Gate::Cnot { control, target })
    }

    /// Apply CZ.
    pub fn cz(&mut self, control: usize, target: usize) -> IrResult<&mut Self> {
        self.push(Gate::Cz { control, target })
    }

    /// Apply SWAP.
    pub fn swap(&mut self, a: usize, b: usize) -> IrResult<&mut Self> {
        self.push(Gate::Swap { a, b })
    }

    /// Apply Toffoli.
    pub fn ccx(&mut self, control1: usize, control2: usize, target: usize) -> IrResult<&mut Self> {
        self.push(Gate::Toffoli {
            control1,
            control2,
            target,
        })
    }

    /// Measure one qubit (collapsing).
    pub fn measure(&mut self, q: usize) -> IrResult<&mut Self> {
        self.push(Gate::Measure { target: q })
    }

    // =========================================================================
    // Canonical programs
    // =========================================================================

    /// `(|00⟩ + |11⟩)/√2`.
    pub fn bell() -> IrResult<Self> {
        let mut program = Self::new(2);
        program.h(0)?.cx(0, 1)?;
        Ok(program)
    }

    /// `(|0...0⟩ + |1...1⟩)/√2` on `n` qubits.
    pub fn ghz(n: usize) -> IrResult<Self> {
        let mut program = Self::new(n);
        program.h(0)?;
        for q in 1..n {
            program.cx(q - 1, q)?;
        }
        Ok(program)
    }
}

fn check_width(num_qubits: usize) -> IrResult<()> {
    if num_qubits > MAX_INDEXABLE_QUBITS {
        return Err(IrError::RegisterTooWide(num_qubits));
    }
    Ok(())
}

/// Parse a bitstring (qubit 0 first) into a basis index.
pub fn parse_bitstring(bits: &str) -> IrResult<usize> {
    if bits.is_empty() || bits.len() > MAX_INDEXABLE_QUBITS {
        return Err(IrError::InvalidBitstring(bits.to_string()));
    }
    bits.chars().try_fold(0usize, |acc, c| match c {
        '0' => Ok(acc << 1),
        '1' => Ok((acc << 1) | 1),
        _ => Err(IrError::InvalidBitstring(bits.to_string())),
    })
}
