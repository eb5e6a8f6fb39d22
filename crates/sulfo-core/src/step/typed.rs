use serde::{de::DeserializeOwned, Serialize};

use super::{StepKind, StepRunResult, StepSignal};
use crate::errors::CoreEngineError;
use crate::model::ArtifactSpec;

/// Resultado tipado de ejecutar un `TypedStep`.
///
/// Permite trabajar con outputs fuertemente tipados al implementar un
/// paso y convertirlos después a la representación neutra del motor.
pub enum StepRunResultTyped<Out: ArtifactSpec + Clone> {
    Success { outputs: Vec<Out> },
    SuccessWithSignals { outputs: Vec<Out>, signals: Vec<StepSignal> },
    Failure { error: CoreEngineError },
}

impl<Out: ArtifactSpec + Clone> StepRunResultTyped<Out> {
    /// Convierte al resultado neutro serializando los outputs. Un fallo
    /// de serialización degrada el resultado a `Failure` en lugar de
    /// abortar el proceso.
    pub fn into_neutral(self) -> StepRunResult {
        fn encode<Out: ArtifactSpec + Clone>(outputs: Vec<Out>) -> Result<Vec<crate::model::Artifact>, CoreEngineError> {
            outputs.into_iter()
                   .map(|o| o.into_artifact().map_err(|e| CoreEngineError::Internal(format!("encode output artifact: {e}"))))
                   .collect()
        }

        match self {
            StepRunResultTyped::Success { outputs } => match encode(outputs) {
                Ok(arts) => StepRunResult::Success { outputs: arts },
                Err(error) => StepRunResult::Failure { error },
            },
            StepRunResultTyped::SuccessWithSignals { outputs, signals } => match encode(outputs) {
                Ok(arts) => StepRunResult::SuccessWithSignals { outputs: arts, signals },
                Err(error) => StepRunResult::Failure { error },
            },
            StepRunResultTyped::Failure { error } => StepRunResult::Failure { error },
        }
    }
}

/// Interfaz de alto nivel para definir pasos con tipos fuertes
/// (Params / Input / Output).
///
/// Los implementadores escriben `run_typed` con tipos concretos; el
/// adaptador de abajo convierte esa ejecución a la interfaz neutra
/// `StepDefinition`.
pub trait TypedStep {
    /// Parámetros deserializables y clonables, con `Default`.
    type Params: DeserializeOwned + Serialize + Clone + Default;
    /// Tipo concreto esperado como input.
    type Input: ArtifactSpec + Clone;
    /// Tipo concreto producido como output.
    type Output: ArtifactSpec + Clone;

    /// Identificador estable del paso dentro del flujo.
    fn id(&self) -> &'static str;

    /// Nombre amigable; por defecto el id.
    fn name(&self) -> &str {
        self.id()
    }

    /// Tipo general del paso.
    fn kind(&self) -> StepKind;

    /// Parámetros por defecto deterministas.
    fn params_default(&self) -> Self::Params {
        Default::default()
    }

    /// Ejecución tipada. Para `Source`, `input` es `None`.
    fn run_typed(&self, input: Option<Self::Input>, params: Self::Params) -> StepRunResultTyped<Self::Output>;
}

// -------------------------------------------------------------
// Adaptador: todo `TypedStep` implementa el `StepDefinition` neutro.
// -------------------------------------------------------------
impl<T> crate::step::StepDefinition for T where T: TypedStep + 'static + std::fmt::Debug
{
    fn id(&self) -> &str {
        self.id()
    }

    fn name(&self) -> &str {
        <Self as TypedStep>::name(self)
    }

    fn base_params(&self) -> serde_json::Value {
        serde_json::to_value(self.params_default()).unwrap_or(serde_json::Value::Null)
    }

    fn run(&self, ctx: &crate::model::ExecutionContext) -> StepRunResult {
        // Params ilegibles caen a los defaults del paso
        let params: <Self as TypedStep>::Params = ctx.params_as().unwrap_or_else(|_| self.params_default());

        // Un input presente pero indecodificable es un fallo del paso,
        // no un pánico del motor
        let typed_in: Option<<Self as TypedStep>::Input> = match ctx.input.as_ref() {
            None => None,
            Some(artifact) => match <Self as TypedStep>::Input::from_artifact(artifact) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    return StepRunResult::Failure { error: CoreEngineError::Internal(format!("decode input artifact: {e}")) }
                }
            },
        };

        <Self as TypedStep>::run_typed(self, typed_in, params).into_neutral()
    }

    fn kind(&self) -> StepKind {
        <Self as TypedStep>::kind(self)
    }

    fn definition_hash(&self) -> String {
        let hash_input = serde_json::json!({
            "id": self.id(),
            "kind": format!("{:?}", self.kind()),
            "base_params": self.base_params(),
            "type": std::any::type_name::<T>(),
        });
        crate::hashing::hash_value(&hash_input)
    }
}
