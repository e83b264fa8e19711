//! `qsv-engine`: simulation runtime.
//!
//! Ties the program representation, the simulator and the analysis crate
//! together behind a single [`Engine::simulate`] call, with:
//!
//! - [`EngineConfig`]: YAML file plus `QSV_*` environment overrides.
//! - [`AnalysisOptions`]: which derived quantities to compute.
//! - [`SimulationReport`]: camelCase JSON result.
//! - [`SimulationWorker`]: runs a request on tokio's blocking pool and hands
//!   back a cancellable [`SimulationHandle`].
//! - [`init_tracing`]: console or JSON log output.
//!
//! # Example
//!
//! ```rust
//! use qsv_engine::{AnalysisOptions, Engine};
//! use qsv_ir::ProgramRequest;
//! use qsv_sim::CancelToken;
//!
//! let request: ProgramRequest = serde_json::from_str(
//!     r#"{"numQubits": 2, "gates": [
//!         {"type": "H", "params": [0]},
//!         {"type": "CNOT", "params": [0, 1]}
//!     ]}"#,
//! ).unwrap();
//!
//! let engine = Engine::default();
//! let options = engine.auto_options(2).with_shots(100);
//! let report = engine.simulate(&request, &options, &CancelToken::new()).unwrap();
//!
//! assert_eq!(report.counts.unwrap().total(), 100);
//! assert!(report.entanglement.unwrap().fully_entangled);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod worker;

pub use config::{ConfigError, EngineConfig, LimitsConfig, LogFormat, LoggingConfig, SamplingConfig};
pub use engine::{AnalysisOptions, Engine};
pub use error::{EngineError, EngineResult};
pub use logging::init_tracing;
pub use report::{EntanglementSummary, QubitSummary, SimulationReport};
pub use worker::{SimulationHandle, SimulationWorker};
