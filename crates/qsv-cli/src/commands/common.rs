//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qsv_engine::{EngineConfig, SimulationReport};
use qsv_ir::ProgramRequest;

/// Load a program request from a JSON file.
pub fn load_request(path: &str) -> Result<ProgramRequest> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    serde_json::from_str(&source).with_context(|| format!("Failed to parse program: {path}"))
}

/// Load engine configuration from an optional file plus `QSV_*` overrides.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    EngineConfig::load(path.map(Path::new)).context("Failed to load configuration")
}

/// Write `contents` to `path`.
pub fn write_output(path: &str, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write file: {path}"))
}

/// Print a report as tables.
pub fn print_report(report: &SimulationReport) {
    let n = report.num_qubits;

    println!(
        "\n{} State ({} qubits, {:?} storage, {} gates):",
        style("✓").green().bold(),
        n,
        report.representation,
        report.gates_applied
    );

    let amplitudes = report.amplitudes();
    let mut shown = 0;
    for (index, (amp, prob)) in amplitudes.iter().zip(&report.probabilities).enumerate() {
        if *prob <= 1e-12 {
            continue;
        }
        if shown == 16 {
            println!("  ...");
            break;
        }
        println!(
            "  |{}⟩  {:>+.4}{:>+.4}i  p = {:.4}",
            style(qsv_sim::bitstring(index, n)).cyan(),
            amp.re,
            amp.im,
            prob
        );
        shown += 1;
    }

    if !report.measurements.is_empty() {
        println!("\n{} Measurements:", style("→").cyan().bold());
        for (qubit, outcome) in &report.measurements {
            println!("  {qubit} = {outcome}");
        }
    }

    if let Some(qubits) = &report.qubits {
        println!("\n{} Qubits:", style("→").cyan().bold());
        println!(
            "  {:<4} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
            "q", "x", "y", "z", "|r|", "entropy", "state"
        );
        for q in qubits {
            println!(
                "  {:<4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4}  {}",
                q.qubit,
                q.bloch.x,
                q.bloch.y,
                q.bloch.z,
                q.bloch_length,
                q.entropy,
                q.classification.label()
            );
        }
    }

    if let Some(entanglement) = &report.entanglement {
        println!("\n{} Entanglement:", style("→").cyan().bold());
        for line in entanglement.summary.lines() {
            println!("  {line}");
        }
    }

    if let Some(stats) = &report.statistics {
        println!("\n{} Statistics:", style("→").cyan().bold());
        println!("  Shannon entropy:   {:.4} bits", stats.entropy);
        println!("  Max probability:   {:.4}", stats.max_probability);
        println!("  Product state:     {}", stats.product_state);
        if stats.possible_maximal_entanglement {
            println!("  {}", style("Possible maximal entanglement").magenta());
        }
    }

    if let Some(counts) = &report.counts {
        print_counts(counts);
    }

    println!("\n  Elapsed: {} ms", style(report.elapsed_ms).yellow());
}

/// Print sampled counts as a histogram.
pub fn print_counts(counts: &qsv_sim::Counts) {
    println!(
        "\n{} Counts ({} shots):",
        style("✓").green().bold(),
        counts.total()
    );

    let sorted = counts.sorted();
    let total = counts.total() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
