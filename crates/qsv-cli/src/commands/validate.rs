//! Validate command implementation.

use anyhow::Result;
use console::style;

use qsv_engine::{Engine, EngineConfig};

use super::common::load_request;

/// Execute the validate command.
pub fn execute(config: EngineConfig, input: &str) -> Result<()> {
    let request = load_request(input)?;
    let engine = Engine::try_new(config)?;
    let program = engine.check(&request)?;

    println!(
        "{} {} is valid: {} qubits, {} gates{}",
        style("✓").green().bold(),
        style(input).green(),
        program.num_qubits(),
        program.len(),
        if program.has_measurements() {
            ", with mid-circuit measurements"
        } else {
            ""
        }
    );

    let limits = &engine.config().limits;
    if program.num_qubits() > limits.dense_qubit_limit {
        println!(
            "  Note: above {} qubits the sparse store is used",
            limits.dense_qubit_limit
        );
    }
    if program.num_qubits() > limits.max_density_qubits {
        println!(
            "  Note: density matrix output is unavailable above {} qubits",
            limits.max_density_qubits
        );
    }

    Ok(())
}
