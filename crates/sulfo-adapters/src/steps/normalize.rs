//! NormalizeReagentsStep (Source de la campaña)
//!
//! - Valida y canonicaliza las dos tablas crudas de reactivos en
//!   colecciones ordenadas.
//! - Cualquier problema de configuración (columna de identificadores
//!   ausente en modo estricto, identificadores repetidos, colección
//!   vacía) falla el flujo antes de enumerar nada.

use sulfo_core::errors::CoreEngineError;
use sulfo_core::typed_step;
use sulfo_core::StepRunResultTyped;
use sulfo_domain::{ReagentCollection, ReagentRole};

use crate::artifacts::ReagentsArtifact;
use crate::csv_io::ReagentTable;

fn normalize_or_fail(
    role: ReagentRole,
    table: &ReagentTable,
    strict_ids: bool,
) -> Result<ReagentCollection, CoreEngineError> {
    ReagentCollection::normalize(role, &table.rows, strict_ids, table.id_column_present)
        .map_err(|e| {
            tracing::error!(role = %role, error = %e, "reagent table rejected");
            CoreEngineError::Configuration(e.to_string())
        })
}

typed_step! {
    source NormalizeReagentsStep {
        id: "normalize_reagents",
        output: ReagentsArtifact,
        params: (),
        fields { sulfonyls: ReagentTable,
                 amines: ReagentTable,
                 strict_ids: bool },
        try_run(me, _p) {{
            let sulfonyls = match normalize_or_fail(ReagentRole::Sulfonyl, &me.sulfonyls, me.strict_ids) {
                Ok(col) => col,
                Err(error) => return StepRunResultTyped::Failure { error },
            };
            let amines = match normalize_or_fail(ReagentRole::Amine, &me.amines, me.strict_ids) {
                Ok(col) => col,
                Err(error) => return StepRunResultTyped::Failure { error },
            };
            tracing::info!(sulfonyls = sulfonyls.len(),
                           sulfonyls_dropped = sulfonyls.dropped(),
                           amines = amines.len(),
                           amines_dropped = amines.dropped(),
                           "reagent tables normalized");
            StepRunResultTyped::Success { outputs: vec![ReagentsArtifact { sulfonyls, amines }] }
        }}
    }
}
