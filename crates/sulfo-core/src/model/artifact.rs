//! Artifact neutral del flujo.
//!
//! Un `Artifact` es la unidad de datos que viaja entre pasos. El motor
//! no interpreta su contenido:
//! - `payload` es JSON genérico; la semántica la ponen los adapters.
//! - `hash` lo calcula el motor sobre el JSON canonicalizado y sirve de
//!   identidad para deduplicar y trazar outputs.
//! - `metadata` es información auxiliar que no entra al hash.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tipos neutrales de artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// JSON genérico sin semántica.
    GenericJson,
}

/// Artifact producido/consumido por los pasos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub hash: String,            // hash canónico del payload, asignado por el motor
    pub payload: Value,
    pub metadata: Option<Value>, // no entra al hash
}

impl Artifact {
    /// Constructor interno; los adapters crean artifacts a través de
    /// `ArtifactSpec::into_artifact`.
    pub(crate) fn new_unhashed(kind: ArtifactKind, payload: Value, metadata: Option<Value>) -> Self {
        Self { kind,
               hash: String::new(),
               payload,
               metadata }
    }
}
