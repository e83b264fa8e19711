//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum state-vector simulation and analysis",
        style("qsv").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsv-ir        Circuit programs, gate catalog, wire format");
    println!("  qsv-sim       State-vector simulator and measurement");
    println!("  qsv-analysis  Density matrices, Bloch vectors, entanglement");
    println!("  qsv-engine    Configuration, analysis pipeline, worker");
    println!("  qsv-cli       Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
