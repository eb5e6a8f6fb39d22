//! sulfo-core: motor lineal determinista de campañas.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod repo;
pub mod step;

pub use engine::{FlowCtx, FlowEngine};
pub use errors::CoreEngineError;
pub use event::{EventStore, FlowEvent, FlowEventKind, InMemoryEventStore};
pub use model::{Artifact, ArtifactKind, ArtifactSpec};
pub use repo::{build_flow_definition, build_flow_definition_auto, FlowDefinition, FlowRepository, InMemoryFlowRepository};
pub use step::{Pipe, SameAs, StepDefinition, StepKind, StepRunResult, StepRunResultTyped, StepSignal, StepStatus, TypedStep};
