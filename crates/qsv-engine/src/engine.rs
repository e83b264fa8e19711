//! Request-to-report pipeline.

use std::time::Instant;

use qsv_analysis::{
    AnalysisError, DensityMatrix, StateStatistics, analyze_pairwise, analyze_qubits,
};
use qsv_ir::{CircuitProgram, ProgramRequest};
use qsv_sim::{CancelToken, Executor, sample_counts};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{EngineConfig, LimitsConfig};
use crate::error::{EngineError, EngineResult};
use crate::report::SimulationReport;

/// Which derived quantities to produce after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Full `4^n` density matrix. Requesting it above the density ceiling
    /// is an error.
    pub density_matrix: bool,
    /// Per-qubit reduced matrices, Bloch vectors and entropies.
    pub reduced: bool,
    /// Concurrence and negativity for every qubit pair.
    pub pairwise: bool,
    /// Shots to sample from the final state.
    pub shots: Option<u64>,
    /// Amplitude and distribution statistics.
    pub statistics: bool,
    /// Seed overriding the configured one.
    pub seed: Option<u64>,
}

impl AnalysisOptions {
    /// Nothing beyond the state vector.
    pub fn none() -> Self {
        Self::default()
    }

    /// Density products only while the register fits under the density
    /// ceiling; statistics always.
    pub fn auto(num_qubits: usize, limits: &LimitsConfig) -> Self {
        let small = num_qubits <= limits.max_density_qubits;
        Self {
            density_matrix: small,
            reduced: small,
            pairwise: small,
            shots: None,
            statistics: true,
            seed: None,
        }
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Runs programs and derives the requested analysis.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    executor: Executor,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine. `config` is assumed validated.
    pub fn new(config: EngineConfig) -> Self {
        let executor = Executor::new(config.limits.executor_options());
        Self { config, executor }
    }

    /// Validate `config` and create an engine.
    pub fn try_new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Default analysis for a register of `num_qubits`.
    pub fn auto_options(&self, num_qubits: usize) -> AnalysisOptions {
        AnalysisOptions::auto(num_qubits, &self.config.limits)
    }

    /// Decode and validate a request without running it.
    pub fn check(&self, request: &ProgramRequest) -> EngineResult<CircuitProgram> {
        let program = CircuitProgram::try_from(request)?;
        self.executor.check(&program)?;
        Ok(program)
    }

    /// Decode `request`, run it and build the report.
    pub fn simulate(
        &self,
        request: &ProgramRequest,
        options: &AnalysisOptions,
        cancel: &CancelToken,
    ) -> EngineResult<SimulationReport> {
        let program = CircuitProgram::try_from(request)?;
        self.simulate_program(&program, options, cancel)
    }

    /// Run `program` and build the report.
    #[instrument(
        skip(self, program, options, cancel),
        fields(num_qubits = program.num_qubits(), gates = program.len())
    )]
    pub fn simulate_program(
        &self,
        program: &CircuitProgram,
        options: &AnalysisOptions,
        cancel: &CancelToken,
    ) -> EngineResult<SimulationReport> {
        let start = Instant::now();
        let limits = &self.config.limits;
        let n = program.num_qubits();

        self.executor.check(program)?;
        if options.density_matrix && n > limits.max_density_qubits {
            return Err(AnalysisError::DensityTooLarge {
                num_qubits: n,
                max: limits.max_density_qubits,
            }
            .into());
        }

        let mut rng = match options.seed.or(self.config.sampling.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let outcome = self.executor.run(program, &mut rng, cancel)?;
        let state = &outcome.state;
        let mut report = SimulationReport::from_state(
            state,
            &outcome.measurements,
            outcome.representation,
            outcome.gates_applied,
        );

        let check_cancel = || {
            if cancel.is_cancelled() {
                Err(EngineError::Cancelled {
                    gates_applied: outcome.gates_applied,
                })
            } else {
                Ok(())
            }
        };

        if options.density_matrix {
            check_cancel()?;
            let rho = DensityMatrix::from_state_limited(state, limits.max_density_qubits)?;
            report.set_density_matrix(&rho);
        }

        if options.reduced || options.statistics {
            check_cancel()?;
            let qubits = analyze_qubits(state)?;
            if options.reduced {
                report.set_qubits(&qubits, true);
            }
            if options.statistics {
                report.statistics = Some(StateStatistics::with_qubits(state, &qubits));
            }
        }

        if options.pairwise {
            check_cancel()?;
            let entanglement = analyze_pairwise(state)?;
            debug!(
                fully_entangled = entanglement.fully_entangled,
                "Pairwise entanglement computed"
            );
            report.set_entanglement(&entanglement);
        }

        if let Some(shots) = options.shots {
            check_cancel()?;
            report.counts = Some(sample_counts(state, shots, &mut rng)?);
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            elapsed_ms = report.elapsed_ms,
            representation = ?report.representation,
            "Simulation finished"
        );
        Ok(report)
    }
}
