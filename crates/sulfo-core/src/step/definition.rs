use serde_json::Value;

use super::run_result::StepRunResult;
use crate::model::ExecutionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind { Source, Transform, Sink, Check }

/// Interfaz neutral de un paso. Las implementaciones deben ser puras
/// respecto a input + params.
pub trait StepDefinition: std::fmt::Debug {
    /// Identificador estable y único dentro del flujo.
    fn id(&self) -> &str;

    /// Nombre amigable opcional.
    fn name(&self) -> &str {
        self.id()
    }

    /// Parámetros base deterministas.
    fn base_params(&self) -> Value;

    /// Ejecución del paso. Solo puede depender de input + params.
    fn run(&self, ctx: &ExecutionContext) -> StepRunResult;

    /// Tipo general del paso.
    fn kind(&self) -> StepKind;

    /// Hash que identifica esta definición de paso dentro del flujo.
    /// Participa en el fingerprint de los fallos.
    fn definition_hash(&self) -> String {
        let hash_input = serde_json::json!({
            "id": self.id(),
            "kind": format!("{:?}", self.kind()),
            "base_params": self.base_params(),
        });
        crate::hashing::hash_value(&hash_input)
    }
}
