//! Program execution.

use std::collections::BTreeMap;
use std::time::Instant;

use qsv_ir::{CircuitProgram, Gate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::apply::apply_validated;
use crate::buffer::AmplitudeBuffer;
use crate::cancel::CancelToken;
use crate::error::{SimError, SimResult};
use crate::measure::measure_qubit;
use crate::sparse::SparseState;
use crate::statevector::StateVector;

/// Default register ceiling.
pub const DEFAULT_MAX_QUBITS: usize = 15;
/// Default width above which the sparse store is used.
pub const DEFAULT_DENSE_QUBIT_LIMIT: usize = 12;
/// Default norm drift tolerated before renormalizing.
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Executor limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutorOptions {
    /// Largest register accepted.
    pub max_qubits: usize,
    /// Largest register simulated with dense storage.
    pub dense_qubit_limit: usize,
    /// Allowed `|‖ψ‖² - 1|` after a unitary gate.
    pub norm_tolerance: f64,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            dense_qubit_limit: DEFAULT_DENSE_QUBIT_LIMIT,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
        }
    }
}

/// Storage used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// `2^n` amplitude vector.
    Dense,
    /// Occupied-index map.
    Sparse,
}

/// Result of running a program.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Final state, always expanded to dense form.
    pub state: StateVector,
    /// Last outcome observed for each measured qubit.
    pub measurements: BTreeMap<usize, u8>,
    /// Number of top-level gates applied.
    pub gates_applied: usize,
    /// Storage the run used.
    pub representation: Representation,
    /// Wall-clock time of the gate loop.
    pub elapsed_ms: u64,
}

/// Replays a program from its initial basis state.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: ExecutorOptions,
}

impl Executor {
    /// Create an executor with the given limits.
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }

    /// Configured limits.
    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Validate `program` and check it against the register ceiling.
    pub fn check(&self, program: &CircuitProgram) -> SimResult<()> {
        program.validate()?;
        if program.num_qubits() > self.options.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: program.num_qubits(),
                max: self.options.max_qubits,
            });
        }
        Ok(())
    }

    /// Run `program` to completion.
    ///
    /// Gates execute strictly in order. `cancel` is polled before every
    /// gate. Randomness for measurements comes from `rng`, so a seeded RNG
    /// gives a reproducible run.
    #[instrument(
        skip(self, program, rng, cancel),
        fields(num_qubits = program.num_qubits(), gates = program.len())
    )]
    pub fn run<R: Rng + ?Sized>(
        &self,
        program: &CircuitProgram,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> SimResult<ExecutionOutcome> {
        self.check(program)?;
        let start = Instant::now();

        let n = program.num_qubits();
        let initial = program.initial_basis_index();
        let (state, measurements, representation) = if n > self.options.dense_qubit_limit {
            debug!("Using sparse storage for {} qubits", n);
            let (state, log) = self.replay(SparseState::basis(n, initial), program, rng, cancel)?;
            (state.to_dense(), log, Representation::Sparse)
        } else {
            let (state, log) = self.replay(StateVector::basis(n, initial), program, rng, cancel)?;
            (state, log, Representation::Dense)
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(ExecutionOutcome {
            state,
            measurements,
            gates_applied: program.len(),
            representation,
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }

    fn replay<B, R>(
        &self,
        mut state: B,
        program: &CircuitProgram,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> SimResult<(B, BTreeMap<usize, u8>)>
    where
        B: AmplitudeBuffer,
        R: Rng + ?Sized,
    {
        let mut measurements = BTreeMap::new();

        for (applied, gate) in program.gates().iter().enumerate() {
            if cancel.is_cancelled() {
                debug!("Cancelled after {} gates", applied);
                return Err(SimError::Cancelled {
                    gates_applied: applied,
                });
            }

            match gate {
                Gate::Measure { target } => {
                    let (outcome, collapsed) = measure_qubit(&state, *target, rng)?;
                    debug!("Measured qubit {} -> {}", target, outcome);
                    measurements.insert(*target, outcome);
                    state = collapsed;
                }
                _ => {
                    state = apply_validated(&state, gate)?;
                    self.correct_drift(&mut state, applied, gate)?;
                }
            }
        }

        Ok((state, measurements))
    }

    fn correct_drift<B: AmplitudeBuffer>(
        &self,
        state: &mut B,
        position: usize,
        gate: &Gate,
    ) -> SimResult<()> {
        let norm_sqr = state.norm_sqr();
        if norm_sqr <= 0.0 || !norm_sqr.is_finite() {
            return Err(SimError::ZeroNorm);
        }
        let drift = (norm_sqr - 1.0).abs();
        if drift > self.options.norm_tolerance {
            warn!(
                gate = gate.name(),
                position, drift, "Norm drift exceeds tolerance; renormalizing"
            );
            state.scale(norm_sqr.sqrt().recip());
        }
        Ok(())
    }
}

/// Run with default limits, a thread-local RNG and no cancellation.
pub fn run(program: &CircuitProgram) -> SimResult<ExecutionOutcome> {
    Executor::default().run(program, &mut rand::thread_rng(), &CancelToken::new())
}
