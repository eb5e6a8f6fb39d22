use std::marker::PhantomData;

use super::{StepDefinition, TypedStep};
use crate::repo::{build_flow_definition_auto, FlowDefinition};

/// Marker trait para exigir igualdad de tipos en compilación.
/// Solo se implementa para tipos idénticos.
pub trait SameAs<T> {}
impl<T> SameAs<T> for T {}

/// Builder tipado de definiciones: garantiza en compilación que el input
/// de cada paso coincide con el output del anterior.
///
/// Uso:
///   let definition = Pipe::new(NormalizeStep::new(...))
///       .then(EnumerateStep::new())
///       .build();
pub struct Pipe<S: TypedStep + 'static> {
    steps: Vec<Box<dyn StepDefinition>>,
    _out: PhantomData<<S as TypedStep>::Output>,
}

impl<S: TypedStep + std::fmt::Debug + 'static> Pipe<S> {
    pub fn new(step: S) -> Self {
        Self { steps: vec![Box::new(step)],
               _out: PhantomData }
    }

    /// Encadena el siguiente paso exigiendo `N::Input == S::Output`.
    pub fn then<N>(mut self, next: N) -> Pipe<N>
        where N: TypedStep + std::fmt::Debug + 'static,
              <N as TypedStep>::Input: SameAs<<S as TypedStep>::Output>
    {
        self.steps.push(Box::new(next));
        Pipe::<N> { steps: self.steps,
                    _out: PhantomData }
    }

    /// Construye la `FlowDefinition`; la compatibilidad de adyacencia ya
    /// quedó verificada por `then`.
    pub fn build(self) -> FlowDefinition {
        build_flow_definition_auto(self.steps)
    }
}
