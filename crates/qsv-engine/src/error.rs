//! Error types for the engine.

use qsv_analysis::AnalysisError;
use qsv_ir::IrError;
use qsv_sim::SimError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while running a simulation request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Request failed to decode or validate.
    #[error("Invalid program: {0}")]
    Program(#[from] IrError),

    /// Simulation failed.
    #[error("Simulation error: {0}")]
    Simulation(SimError),

    /// Derived-quantity computation failed.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Run was cancelled before completion.
    #[error("Simulation cancelled after {gates_applied} gates")]
    Cancelled {
        /// Gates applied before the cancel was observed.
        gates_applied: usize,
    },

    /// No async runtime available to host the worker.
    #[error("No tokio runtime: {0}")]
    Runtime(String),

    /// Worker task went away without producing a result.
    #[error("Simulation worker stopped unexpectedly: {0}")]
    WorkerDropped(String),
}

impl From<SimError> for EngineError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::Cancelled { gates_applied } => EngineError::Cancelled { gates_applied },
            SimError::Ir(e) => EngineError::Program(e),
            other => EngineError::Simulation(other),
        }
    }
}

impl EngineError {
    /// Whether the error is the caller's fault (bad input or limits).
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            EngineError::Program(_)
                | EngineError::Simulation(SimError::TooManyQubits { .. })
                | EngineError::Analysis(AnalysisError::DensityTooLarge { .. })
        )
    }
}
