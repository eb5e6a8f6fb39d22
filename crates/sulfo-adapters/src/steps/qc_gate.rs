//! QcGateStep (Check)
//!
//! Compuerta de calidad de la campaña: el flujo solo termina bien cuando
//! ningún pocillo reconciliado quedó sin estructura. El registro
//! autoritativo pasa intacto hacia adelante.

use sulfo_core::errors::CoreEngineError;
use sulfo_core::typed_step;
use sulfo_core::{StepKind, StepRunResultTyped};

use crate::artifacts::AuthoritativeArtifact;

typed_step! {
    step QcGateStep {
        id: "qc_gate",
        kind: StepKind::Check,
        input: AuthoritativeArtifact,
        output: AuthoritativeArtifact,
        params: (),
        try_run(_me, inp, _p) {{
            if inp.report.is_clean() {
                tracing::info!(wells = inp.report.total_wells, "qc gate passed");
                StepRunResultTyped::Success { outputs: vec![inp] }
            } else {
                StepRunResultTyped::Failure {
                    error: CoreEngineError::CheckFailed(format!(
                        "{} of {} wells have no structure",
                        inp.report.missing_smiles, inp.report.total_wells
                    )),
                }
            }
        }}
    }
}
