//! ReconcileDispenseStep (Transform)
//!
//! Une el mapa de dispensado del robot con la química enumerada: un
//! registro autoritativo por fila de dispensado, en el mismo orden, más
//! el reporte de control de calidad. Los pares que el robot pipeteó pero
//! la enumeración no conoce quedan reportados, nunca descartados.

use sulfo_core::typed_step;
use sulfo_core::StepKind;
use sulfo_domain::{reconcile, DispenseRecord, ProductIndex};

use crate::artifacts::{AuthoritativeArtifact, PlateMapArtifact};

typed_step! {
    step ReconcileDispenseStep {
        id: "reconcile_dispense",
        kind: StepKind::Transform,
        input: PlateMapArtifact,
        output: AuthoritativeArtifact,
        params: (),
        fields { records: Vec<DispenseRecord> },
        run(me, inp, _p) {
            let products: Vec<_> = inp.annotated.iter().map(|a| a.product.clone()).collect();
            let index            = ProductIndex::from_products(&products, inp.amine_count);
            let (records, report) = reconcile(&me.records, &index);
            tracing::info!(wells = report.total_wells,
                           missing = report.missing_smiles,
                           "dispense map reconciled");
            AuthoritativeArtifact { records, report }
        }
    }
}
