//! sulfo-adapters: capa de adaptación Dominio ↔ Core
//!
//! Este crate provee:
//! - Artifacts tipados que transportan los tipos de dominio entre pasos.
//! - Los seis pasos de la campaña: `NormalizeReagentsStep` (Source),
//!   `EnumerateProductsStep`, `AnnotateDescriptorsStep`,
//!   `AssignPlateStep`, `ReconcileDispenseStep` (Transforms) y
//!   `QcGateStep` (Check).
//! - Entrada y salida de tablas CSV (`csv_io`) y escritura SDF V2000
//!   (`sdf`), fuera del flujo: los pasos trabajan solo sobre artifacts.
//!
//! El core solo conoce `Artifact { kind, hash, payload, metadata }`; los
//! artifacts de aquí serializan los tipos de dominio a payload JSON con
//! las macros del core.

pub mod artifacts;
pub mod csv_io;
pub mod error;
pub mod sdf;
pub mod steps;

pub use error::PipelineError;
