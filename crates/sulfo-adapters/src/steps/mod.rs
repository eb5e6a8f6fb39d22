//! Pasos de la campaña de sulfonamidas, en orden de flujo:
//! normalizar → enumerar → anotar → emplacar → reconciliar → compuerta QC.
//!
//! La campaña de enumeración usa los cuatro primeros; la de
//! reconciliación encadena los seis.

pub mod annotate;
pub mod enumerate;
pub mod normalize;
pub mod plate;
pub mod qc_gate;
pub mod reconcile;

pub use annotate::AnnotateDescriptorsStep;
pub use enumerate::EnumerateProductsStep;
pub use normalize::NormalizeReagentsStep;
pub use plate::AssignPlateStep;
pub use qc_gate::QcGateStep;
pub use reconcile::ReconcileDispenseStep;
