//! Errores del motor.
//!
//! Se serializan porque viajan dentro de los eventos `StepFailed`. Las
//! variantes distinguen las tres salidas de una campaña fallida: error
//! de configuración (entrada inservible), control de calidad reprobado
//! y fallo interno.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("flow already completed")] FlowCompleted,
    #[error("flow has failed previously (stop-on-failure invariant)")] FlowHasFailed,
    #[error("missing required inputs")] MissingInputs,
    #[error("configuration: {0}")] Configuration(String),
    #[error("check failed: {0}")] CheckFailed(String),
    #[error("internal: {0}")] Internal(String),
}
