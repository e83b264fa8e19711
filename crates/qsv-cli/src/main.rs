//! qsv Command-Line Interface
//!
//! Runs circuit programs on the state-vector engine and prints amplitudes,
//! per-qubit Bloch data, pairwise entanglement and sampled counts.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;

mod commands;

use commands::{qasm, run, validate, version};

/// qsv - quantum state-vector simulation and analysis
#[derive(Parser)]
#[command(name = "qsv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine configuration file (YAML)
    #[arg(long, global = true, env = "QSV_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Table,
    /// Pretty-printed JSON report
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a program and print the analysis
    Run {
        /// Input program (JSON)
        #[arg(short, long)]
        input: String,

        /// Number of shots to sample (defaults to the configured value)
        #[arg(short, long)]
        shots: Option<u64>,

        /// RNG seed for measurements and sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Always include the full density matrix (fails above the density ceiling)
        #[arg(long)]
        density: bool,

        /// Skip density, Bloch, entanglement and statistics
        #[arg(long, conflicts_with = "density")]
        no_analysis: bool,

        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Write the JSON report to this file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Export a program as OpenQASM 2.0
    Qasm {
        /// Input program (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check a program against the gate catalog and engine limits
    Validate {
        /// Input program (JSON)
        #[arg(short, long)]
        input: String,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let config = match commands::common::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let mut logging = config.logging.clone();
    logging.level = filter.to_string();
    if let Err(e) = qsv_engine::init_tracing(&logging) {
        eprintln!("{} logging disabled: {e}", style("Warning:").yellow().bold());
    }

    // Execute command
    let result = match cli.command {
        Commands::Run {
            input,
            shots,
            seed,
            density,
            no_analysis,
            format,
            output,
        } => {
            let args = run::RunArgs {
                input: &input,
                shots,
                seed,
                density,
                no_analysis,
                format,
                output: output.as_deref(),
            };
            run::execute(config, args).await
        }

        Commands::Qasm { input, output } => qasm::execute(&input, output.as_deref()),

        Commands::Validate { input } => validate::execute(config, &input),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
