//! AssignPlateStep (Transform)
//!
//! Mapea la serie anotada sobre una placa de 96 pocillos en orden por
//! columnas. Una serie que desborda la placa no pierde productos: los
//! sobrantes quedan sin pocillo y el paso emite la señal
//! `plate_overflow` con el conteo.

use sulfo_core::typed_step;
use sulfo_core::{StepKind, StepRunResultTyped, StepSignal};
use sulfo_domain::assign_wells;

use crate::artifacts::{AnnotatedProductsArtifact, PlateMapArtifact};

typed_step! {
    step AssignPlateStep {
        id: "assign_plate",
        kind: StepKind::Transform,
        input: AnnotatedProductsArtifact,
        output: PlateMapArtifact,
        params: (),
        try_run(_me, inp, _p) {{
            let assignment = assign_wells(inp.annotated.len());
            let wells: Vec<String> = assignment.wells.iter().map(|w| w.label()).collect();
            let out = PlateMapArtifact { annotated: inp.annotated,
                                         wells,
                                         unmapped: assignment.unmapped,
                                         amine_count: inp.amine_count };
            if assignment.unmapped > 0 {
                tracing::warn!(unmapped = assignment.unmapped, "library exceeds plate capacity");
                let signal = StepSignal { signal: "plate_overflow".to_string(),
                                          data: serde_json::json!({ "unmapped": assignment.unmapped }) };
                StepRunResultTyped::SuccessWithSignals { outputs: vec![out], signals: vec![signal] }
            } else {
                StepRunResultTyped::Success { outputs: vec![out] }
            }
        }}
    }
}
