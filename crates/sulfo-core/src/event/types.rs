//! Tipos de evento del flujo.
//!
//! Toda ejecución del motor queda registrada como una secuencia
//! append-only de eventos. El estado del flujo nunca se guarda aparte:
//! se reconstruye releyendo los eventos en orden (replay), de modo que
//! la secuencia es a la vez bitácora y única fuente de verdad.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreEngineError;

/// Contrato observable del motor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FlowEventKind {
    /// Primer evento de todo `flow_id`: fija la definición y el número
    /// de pasos.
    FlowInitialized { definition_hash: String, step_count: usize },
    /// Un paso comenzó a ejecutarse. No implica éxito.
    StepStarted { step_index: usize, step_id: String },
    /// Un paso terminó bien, con los hashes de sus outputs y su
    /// fingerprint.
    StepFinished {
        step_index: usize,
        step_id: String,
        outputs: Vec<String>,
        fingerprint: String,
    },
    /// Un paso falló de forma terminal. El flujo no continúa.
    StepFailed {
        step_index: usize,
        step_id: String,
        error: CoreEngineError,
        fingerprint: String,
    },
    /// Hito ligero reportado por un paso (por ejemplo, desborde de
    /// placa). No altera el estado del flujo.
    StepSignal {
        step_index: usize,
        step_id: String,
        signal: String,
        data: serde_json::Value,
    },
    /// Cierre del flujo, con el fingerprint agregado de los pasos
    /// exitosos.
    FlowCompleted { flow_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEvent {
    pub seq: u64, // orden de append dentro del flujo
    pub flow_id: Uuid,
    pub kind: FlowEventKind,
    pub ts: DateTime<Utc>, // metadato; no participa en fingerprints
}
