//! Definiciones relacionadas a los pasos del flujo.
//!
//! Un paso es una unidad determinista que transforma a lo sumo un
//! `Artifact` de entrada en 0..n artifacts de salida. Este módulo
//! define:
//! - `StepDefinition`: interfaz neutral usada por el motor.
//! - `TypedStep`: interfaz de alto nivel con tipos fuertes.
//! - `StepRunResult` y las señales (`StepSignal`).
//! - `Pipe` para construir definiciones tipadas validadas en
//!   compilación.

pub mod definition;
pub mod macros;
pub mod pipeline;
mod run_result;
mod status;
pub mod typed;

pub use definition::{StepDefinition, StepKind};
pub use pipeline::{Pipe, SameAs};
pub use run_result::{StepRunResult, StepSignal};
pub use status::StepStatus;
pub use typed::{StepRunResultTyped, TypedStep};
