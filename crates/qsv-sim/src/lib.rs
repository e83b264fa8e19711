//! `qsv-sim`: state-vector simulation.
//!
//! Runs a [`qsv_ir::CircuitProgram`] from its initial basis state and
//! produces the final amplitude vector together with the outcomes of any
//! mid-circuit measurements.
//!
//! - **Gate application** ([`apply()`]): pure; scatters into a fresh buffer.
//!   Written once against [`AmplitudeBuffer`] and used for both the dense
//!   [`StateVector`] and the best-effort [`SparseState`].
//! - **Execution** ([`Executor`]): validation and ceilings up front, cooperative
//!   cancellation between gates, renormalization on numeric drift.
//! - **Measurement** ([`measure_qubit`], [`sample_counts`]): collapsing
//!   single-qubit measurement and non-collapsing shot sampling.
//!
//! # Quick start
//!
//! ```rust
//! use qsv_ir::CircuitProgram;
//! use qsv_sim::{Executor, CancelToken, sample_counts};
//! use rand::SeedableRng;
//!
//! let program = CircuitProgram::bell().unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let outcome = Executor::default()
//!     .run(&program, &mut rng, &CancelToken::new())
//!     .unwrap();
//!
//! let counts = sample_counts(&outcome.state, 1000, &mut rng).unwrap();
//! assert_eq!(counts.total(), 1000);
//! assert_eq!(counts.get("01") + counts.get("10"), 0);
//! ```

pub mod apply;
pub mod buffer;
pub mod cancel;
pub mod error;
pub mod executor;
pub mod measure;
pub mod sparse;
pub mod statevector;

pub use apply::apply;
pub use buffer::{AmplitudeBuffer, bit, qubit_mask};
pub use cancel::CancelToken;
pub use error::{SimError, SimResult};
pub use executor::{ExecutionOutcome, Executor, ExecutorOptions, Representation, run};
pub use measure::{
    Counts, bitstring, expectation_z, measure_qubit, probabilities, sample_counts,
};
pub use sparse::SparseState;
pub use statevector::StateVector;
