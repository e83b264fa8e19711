//! QASM export command implementation.

use anyhow::Result;
use console::style;

use qsv_ir::{CircuitProgram, to_qasm2};

use super::common::{load_request, write_output};

/// Execute the qasm command.
pub fn execute(input: &str, output: Option<&str>) -> Result<()> {
    let request = load_request(input)?;
    let program = CircuitProgram::try_from(request)?;
    let source = to_qasm2(&program);

    match output {
        Some(path) => {
            write_output(path, &source)?;
            eprintln!(
                "{} Wrote {} ({} gates)",
                style("✓").green().bold(),
                style(path).green(),
                program.len()
            );
        }
        None => print!("{source}"),
    }

    Ok(())
}
