//! Builder del `FlowEngine`.
//!
//! Patrón builder verificado en tiempo de compilación: obliga a declarar
//! el primer paso (fuente) y a encadenar pasos cuyos tipos de entrada y
//! salida coincidan.
//!
//! - `EngineBuilderInit` es el estado inicial: solo las stores.
//! - `EngineBuilder<S, E, R>` recuerda el tipo de salida del último paso
//!   (`S::Output`, vía `PhantomData`) y acumula los pasos como
//!   `Vec<Box<dyn StepDefinition>>`.
//! - `add_step` exige con `SameAs` que la entrada del paso nuevo sea el
//!   output del anterior.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::engine::FlowEngine;
use crate::event::EventStore;
use crate::repo::FlowRepository;
use crate::step::{SameAs, StepDefinition, TypedStep};

/// Estado inicial del builder.
#[derive(Debug)]
pub struct EngineBuilderInit<E: EventStore, R: FlowRepository> {
    /// Store de eventos que usará el motor.
    pub event_store: E,
    /// Repositorio que reconstruye el estado del flujo.
    pub repository: R,
}

impl<E: EventStore, R: FlowRepository> EngineBuilderInit<E, R> {
    /// Define el primer paso del flujo.
    ///
    /// Conceptualmente debe ser un `Source`; la aserción solo corre en
    /// builds de desarrollo.
    #[inline]
    pub fn first_step<S>(self, step: S) -> EngineBuilder<S, E, R>
        where S: TypedStep + Debug + 'static
    {
        debug_assert!(matches!(step.kind(), crate::step::StepKind::Source),
                      "el primer paso debe ser de tipo Source");

        EngineBuilder { event_store: self.event_store,
                        repository: self.repository,
                        steps: vec![Box::new(step)],
                        _out: PhantomData::<S::Output> }
    }
}

/// Builder que acumula pasos y garantiza compatibilidad de tipos entre
/// pasos adyacentes.
#[derive(Debug)]
pub struct EngineBuilder<S: TypedStep + Debug + 'static, E: EventStore, R: FlowRepository> {
    event_store: E,
    repository: R,
    steps: Vec<Box<dyn StepDefinition>>,
    _out: PhantomData<S::Output>,
}

impl<S: TypedStep + Debug + 'static, E: EventStore, R: FlowRepository> EngineBuilder<S, E, R> {
    /// Añade el siguiente paso. `N::Input` debe coincidir con
    /// `S::Output`; el chequeo ocurre en compilación.
    #[inline]
    pub fn add_step<N>(mut self, next: N) -> EngineBuilder<N, E, R>
        where N: TypedStep + Debug + 'static,
              N::Input: SameAs<S::Output>
    {
        self.steps.push(Box::new(next));

        EngineBuilder { event_store: self.event_store,
                        repository: self.repository,
                        steps: self.steps,
                        _out: PhantomData }
    }

    /// Construye el `FlowEngine`, generando la definición a partir de
    /// los pasos acumulados.
    #[inline]
    pub fn build(self) -> FlowEngine<E, R> {
        let mut engine = FlowEngine::new_with_stores(self.event_store, self.repository);
        let definition = crate::repo::build_flow_definition_auto(self.steps);
        engine.set_default_definition(definition);
        engine
    }
}
