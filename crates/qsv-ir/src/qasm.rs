//! OpenQASM 2.0 export.

use std::fmt::Write;

use crate::gate::{FixedGate, Gate, SingleQubitGate};
use crate::program::CircuitProgram;

/// Emit a program as OpenQASM 2.0 source.
///
/// The initial basis state is prepared with `x` gates. Mid-circuit
/// measurements are dropped and every qubit is measured at the end, so the
/// output describes the sampling experiment rather than a single collapsed
/// run. Custom matrices have no `qelib1.inc` equivalent and are emitted as
/// `// opaque` comments.
pub fn to_qasm2(program: &CircuitProgram) -> String {
    let mut emitter = Qasm2Emitter::default();
    emitter.emit_program(program);
    emitter.output
}

#[derive(Default)]
struct Qasm2Emitter {
    output: String,
}

impl Qasm2Emitter {
    fn emit_program(&mut self, program: &CircuitProgram) {
        let n = program.num_qubits();
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");
        self.writeln(&format!("qreg q[{n}];"));
        self.writeln(&format!("creg c[{n}];"));

        for (q, bit) in program.initial_bits().into_iter().enumerate() {
            if bit == 1 {
                self.writeln(&format!("x q[{q}];"));
            }
        }

        for gate in program.gates() {
            self.emit_gate(gate);
        }

        for q in 0..n {
            self.writeln(&format!("measure q[{q}] -> c[{q}];"));
        }
    }

    fn emit_gate(&mut self, gate: &Gate) {
        match gate {
            Gate::Fixed { gate, target } => self.op(gate.name(), None, &[*target]),
            Gate::Rotation {
                axis,
                angle,
                target,
            } => self.op(axis.gate_name(), Some(*angle), &[*target]),
            Gate::Phase { angle, target } => self.op("u1", Some(*angle), &[*target]),
            Gate::Cnot { control, target } => self.op("cx", None, &[*control, *target]),
            Gate::Cz { control, target } => self.op("cz", None, &[*control, *target]),
            Gate::Swap { a, b } => self.op("swap", None, &[*a, *b]),
            Gate::Toffoli {
                control1,
                control2,
                target,
            } => self.op("ccx", None, &[*control1, *control2, *target]),
            Gate::Circuit(c) => {
                for inner in &c.body {
                    self.emit_gate(&inner.remapped(&c.qubits));
                }
            }
            Gate::Controlled(c)
                if c.base == SingleQubitGate::from(FixedGate::X) && c.controls.len() <= 2 =>
            {
                let name = if c.controls.len() == 1 { "cx" } else { "ccx" };
                self.op(name, None, &gate.qubits());
            }
            Gate::Unitary(_) | Gate::Controlled(_) => {
                let line = format!("// opaque {} {}", gate.name(), operands(&gate.qubits()));
                self.writeln(&line);
            }
            Gate::Measure { .. } => {}
        }
    }

    fn op(&mut self, name: &str, angle: Option<f64>, qubits: &[usize]) {
        let line = match angle {
            Some(theta) => format!("{name}({theta:.6}) {};", operands(qubits)),
            None => format!("{name} {};", operands(qubits)),
        };
        self.writeln(&line);
    }

    fn writeln(&mut self, line: &str) {
        let _ = writeln!(self.output, "{line}");
    }
}

fn operands(qubits: &[usize]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{q}]"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Axis;

    #[test]
    fn test_bell_export() {
        let program = CircuitProgram::bell().unwrap();
        let qasm = to_qasm2(&program);
        assert_eq!(
            qasm,
            "OPENQASM 2.0;\n\
             include \"qelib1.inc\";\n\
             qreg q[2];\n\
             creg c[2];\n\
             h q[0];\n\
             cx q[0],q[1];\n\
             measure q[0] -> c[0];\n\
             measure q[1] -> c[1];\n"
        );
    }

    #[test]
    fn test_initial_state_and_angles() {
        let mut program = CircuitProgram::new(2).with_initial_bits("01").unwrap();
        program.rx(0.5, 0).unwrap().phase(1.0, 1).unwrap().measure(0).unwrap();
        let qasm = to_qasm2(&program);
        assert!(qasm.contains("x q[1];\n"));
        assert!(!qasm.contains("x q[0];\n"));
        assert!(qasm.contains("rx(0.500000) q[0];\n"));
        assert!(qasm.contains("u1(1.000000) q[1];\n"));
        assert_eq!(qasm.matches("measure").count(), 2);
    }

    #[test]
    fn test_custom_gates() {
        let mut program = CircuitProgram::new(3);
        program
            .push(Gate::circuit(
                "pair",
                vec![2, 0],
                vec![
                    Gate::fixed(FixedGate::H, 0),
                    Gate::Cnot {
                        control: 0,
                        target: 1,
                    },
                ],
            ))
            .unwrap();
        program
            .push(Gate::controlled("cnot2", vec![0, 1], 2, FixedGate::X.into()))
            .unwrap();
        program
            .push(Gate::controlled(
                "crz",
                vec![0],
                1,
                SingleQubitGate::Rotation {
                    axis: Axis::Z,
                    angle: 0.1,
                },
            ))
            .unwrap();

        let qasm = to_qasm2(&program);
        assert!(qasm.contains("h q[2];\ncx q[2],q[0];\n"));
        assert!(qasm.contains("ccx q[0],q[1],q[2];\n"));
        assert!(qasm.contains("// opaque crz q[0],q[1]\n"));
    }
}
