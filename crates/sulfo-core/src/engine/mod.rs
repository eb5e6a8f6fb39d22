//! Motor de flujos: núcleo, builder y contexto.

pub mod builder;
pub mod core;
pub mod flow_ctx;

pub use builder::{EngineBuilder, EngineBuilderInit};
pub use core::FlowEngine;
pub use flow_ctx::FlowCtx;

pub use crate::event::{EventStore, FlowEvent, FlowEventKind, InMemoryEventStore};
pub use crate::repo::{FlowDefinition, FlowRepository, InMemoryFlowRepository};
pub use crate::step::{StepRunResult, StepStatus};

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::errors::CoreEngineError;
    use crate::model::{Artifact, ArtifactKind, ExecutionContext};
    use crate::repo::build_flow_definition_auto;
    use crate::step::{StepDefinition, StepKind};

    // Implementaciones crudas de StepDefinition, sin macros, para
    // ejercitar la interfaz neutral tal como la ve el motor.

    #[derive(Debug)]
    struct SeedStep;

    impl StepDefinition for SeedStep {
        fn id(&self) -> &str { "seed" }
        fn base_params(&self) -> serde_json::Value { json!({}) }
        fn run(&self, _ctx: &ExecutionContext) -> StepRunResult {
            StepRunResult::Success { outputs: vec![Artifact { kind: ArtifactKind::GenericJson,
                                                              hash: String::new(),
                                                              payload: json!({"pairs": 4}),
                                                              metadata: None }] }
        }
        fn kind(&self) -> StepKind { StepKind::Source }
    }

    #[derive(Debug)]
    struct DoubleStep;

    impl StepDefinition for DoubleStep {
        fn id(&self) -> &str { "double" }
        fn base_params(&self) -> serde_json::Value { json!({}) }
        fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
            match &ctx.input {
                Some(input) => {
                    let n = input.payload["pairs"].as_u64().unwrap_or(0);
                    StepRunResult::Success { outputs: vec![Artifact { kind: ArtifactKind::GenericJson,
                                                                      hash: String::new(),
                                                                      payload: json!({"pairs": n * 2}),
                                                                      metadata: None }] }
                }
                None => StepRunResult::Failure { error: CoreEngineError::MissingInputs },
            }
        }
        fn kind(&self) -> StepKind { StepKind::Transform }
    }

    #[derive(Debug)]
    struct AlwaysFailsStep;

    impl StepDefinition for AlwaysFailsStep {
        fn id(&self) -> &str { "always_fails" }
        fn base_params(&self) -> serde_json::Value { json!({}) }
        fn run(&self, _ctx: &ExecutionContext) -> StepRunResult {
            StepRunResult::Failure { error: CoreEngineError::CheckFailed("1 well without structure".into()) }
        }
        fn kind(&self) -> StepKind { StepKind::Check }
    }

    fn linear_definition() -> FlowDefinition {
        build_flow_definition_auto(vec![Box::new(SeedStep), Box::new(DoubleStep)])
    }

    #[test]
    fn flow_runs_to_completion_and_records_events() {
        let mut engine = FlowEngine::new_with_stores(InMemoryEventStore::default(), InMemoryFlowRepository::new());
        engine.set_default_definition(linear_definition());

        let flow_id = engine.run().expect("flow should complete");
        assert_eq!(engine.default_flow_id(), Some(flow_id));

        let variants = engine.event_variants().expect("events must exist");
        assert_eq!(variants, vec!["I", "S", "F", "S", "F", "C"]);

        // el output del último paso quedó en la cache con su hash
        let events = engine.get_events().expect("events");
        let last_output = events.iter()
                                .rev()
                                .find_map(|e| match &e.kind {
                                    FlowEventKind::StepFinished { outputs, .. } => outputs.first().cloned(),
                                    _ => None,
                                })
                                .expect("finished step with output");
        let artifact = engine.get_artifact(&last_output).expect("artifact stored");
        assert_eq!(artifact.payload["pairs"], json!(8));
        assert_eq!(artifact.hash, last_output);
    }

    #[test]
    fn step_by_step_then_completed_error() {
        let mut engine = FlowEngine::new_with_stores(InMemoryEventStore::default(), InMemoryFlowRepository::new());
        engine.set_default_definition(linear_definition());

        assert!(engine.step().is_ok());
        assert!(engine.step().is_ok());
        assert_eq!(engine.step(), Err(CoreEngineError::FlowCompleted));

        assert!(engine.flow_fingerprint().is_some());
    }

    #[test]
    fn failed_step_freezes_the_flow() {
        let mut engine = FlowEngine::new_with_stores(InMemoryEventStore::default(), InMemoryFlowRepository::new());
        engine.set_default_definition(build_flow_definition_auto(vec![Box::new(SeedStep),
                                                                      Box::new(AlwaysFailsStep)]));

        let err = engine.run().expect_err("flow must fail");
        assert!(matches!(err, CoreEngineError::CheckFailed(_)));

        // reintentar no re-ejecuta nada: el fallo es terminal
        assert_eq!(engine.step(), Err(CoreEngineError::FlowHasFailed));

        let variants = engine.event_variants().expect("events");
        assert_eq!(variants, vec!["I", "S", "F", "S", "X"]);
        assert!(engine.flow_fingerprint().is_none());
    }

    #[test]
    fn flow_ctx_drives_an_explicit_flow() {
        let mut engine = FlowEngine::new_with_stores(InMemoryEventStore::default(), InMemoryFlowRepository::new());
        let definition = linear_definition();
        let flow_id = Uuid::new_v4();

        let mut ctx = FlowCtx::new(&mut engine, flow_id, &definition);
        assert!(ctx.step().is_ok());
        assert!(ctx.run_n(5).is_ok()); // se detiene al completar
        assert!(ctx.run_to_completion().is_ok()); // idempotente una vez completo
    }

    #[test]
    fn same_data_same_flow_fingerprint() {
        let run_once = || {
            let mut engine = FlowEngine::new_with_stores(InMemoryEventStore::default(), InMemoryFlowRepository::new());
            engine.set_default_definition(linear_definition());
            engine.run().expect("flow should complete");
            engine.flow_fingerprint().expect("fingerprint present")
        };
        assert_eq!(run_once(), run_once());
    }
}
