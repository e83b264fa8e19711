//! Background simulation off the caller's thread.
//!
//! Each submission runs on tokio's blocking pool and reports back over a
//! oneshot channel. The returned [`SimulationHandle`] can cancel the run;
//! cancellation is observed before the next gate.

use std::sync::Arc;

use qsv_ir::ProgramRequest;
use qsv_sim::CancelToken;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use crate::engine::{AnalysisOptions, Engine};
use crate::error::{EngineError, EngineResult};
use crate::report::SimulationReport;

/// Submits simulations to the blocking pool.
#[derive(Debug, Clone)]
pub struct SimulationWorker {
    engine: Arc<Engine>,
}

impl SimulationWorker {
    /// Wrap an engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Engine used for every run.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Start a run and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        request: ProgramRequest,
        options: AnalysisOptions,
    ) -> EngineResult<SimulationHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| EngineError::Runtime(e.to_string()))?;

        let id = Uuid::new_v4();
        let cancel = CancelToken::new();
        let (tx, rx) = oneshot::channel();

        let engine = Arc::clone(&self.engine);
        let token = cancel.clone();
        let span = info_span!("simulation", run_id = %id);

        runtime.spawn_blocking(move || {
            let _guard = span.enter();
            debug!("Simulation started");
            let result = engine.simulate(&request, &options, &token);
            if tx.send(result).is_err() {
                debug!("Simulation handle dropped before completion");
            }
        });

        Ok(SimulationHandle { id, cancel, rx })
    }

    /// Submit and wait for the report.
    pub async fn run(
        &self,
        request: ProgramRequest,
        options: AnalysisOptions,
    ) -> EngineResult<SimulationReport> {
        let handle = self.submit(request, options)?;
        let id = handle.id();
        handle
            .wait()
            .instrument(info_span!("await_simulation", run_id = %id))
            .await
    }
}

/// Handle to one in-flight simulation.
#[derive(Debug)]
pub struct SimulationHandle {
    id: Uuid,
    cancel: CancelToken,
    rx: oneshot::Receiver<EngineResult<SimulationReport>>,
}

impl SimulationHandle {
    /// Run identifier, also recorded on the tracing span.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the running simulation.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Wait for the run to finish.
    pub async fn wait(self) -> EngineResult<SimulationReport> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => {
                warn!(run_id = %self.id, "Simulation task ended without a result");
                Err(EngineError::WorkerDropped(format!(
                    "run {} produced no result",
                    self.id
                )))
            }
        }
    }
}
