use crate::{errors::CoreEngineError, model::Artifact};

/// Señal ligera emitida por un paso junto a su resultado. El motor la
/// persiste como evento `StepSignal` sin interpretarla.
#[derive(Debug, Clone)]
pub struct StepSignal {
    pub signal: String,
    pub data: serde_json::Value,
}

/// Resultado neutro de ejecutar un paso.
pub enum StepRunResult {
    Success { outputs: Vec<Artifact> },
    SuccessWithSignals { outputs: Vec<Artifact>, signals: Vec<StepSignal> },
    Failure { error: CoreEngineError },
}
