//! Run command implementation.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use qsv_engine::{AnalysisOptions, Engine, EngineConfig, SimulationWorker};

use super::common::{load_request, print_report, write_output};
use crate::OutputFormat;

/// Arguments of the run command.
pub struct RunArgs<'a> {
    pub input: &'a str,
    pub shots: Option<u64>,
    pub seed: Option<u64>,
    pub density: bool,
    pub no_analysis: bool,
    pub format: OutputFormat,
    pub output: Option<&'a str>,
}

/// Execute the run command.
pub async fn execute(config: EngineConfig, args: RunArgs<'_>) -> Result<()> {
    let request = load_request(args.input)?;
    let shots = args.shots.unwrap_or(config.sampling.shots);
    let table = args.format == OutputFormat::Table;
    debug!(
        num_qubits = request.num_qubits,
        gates = request.gates.len(),
        "Loaded program from {}",
        args.input
    );

    if table {
        println!(
            "{} Running {} ({} qubits, {} gates, {} shots)",
            style("→").cyan().bold(),
            style(args.input).green(),
            request.num_qubits,
            request.gates.len(),
            shots
        );
    }

    let engine = Engine::try_new(config)?;
    let mut options = if args.no_analysis {
        AnalysisOptions::none()
    } else {
        engine.auto_options(request.num_qubits)
    };
    if args.density {
        options.density_matrix = true;
    }
    options.shots = Some(shots);
    options.seed = args.seed;

    let worker = SimulationWorker::new(engine);
    let handle = worker.submit(request, options)?;

    let spinner = ProgressBar::new_spinner();
    if table {
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Simulating (run {})...", handle.id()));
        spinner.enable_steady_tick(Duration::from_millis(100));
    } else {
        spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let result = handle.wait().await;
    spinner.finish_and_clear();
    let report = result?;

    if let Some(path) = args.output {
        write_output(path, &serde_json::to_string_pretty(&report)?)?;
        if table {
            println!("  Report written to {}", style(path).green());
        }
    }

    match args.format {
        OutputFormat::Table => print_report(&report),
        OutputFormat::Json if args.output.is_none() => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Json => {}
    }

    Ok(())
}
