//! Tests de integración del pipeline completo
//! (normalizar → enumerar → anotar → emplacar → reconciliar → QC)
//! sobre el motor en memoria.

use sulfo_adapters::artifacts::{AnnotatedProductsArtifact, AuthoritativeArtifact, PlateMapArtifact};
use sulfo_adapters::csv_io::ReagentTable;
use sulfo_adapters::steps::{AnnotateDescriptorsStep, AssignPlateStep, EnumerateProductsStep,
                            NormalizeReagentsStep, QcGateStep, ReconcileDispenseStep};
use sulfo_core::{ArtifactSpec, CoreEngineError, FlowEngine, FlowEventKind, InMemoryEventStore,
                 InMemoryFlowRepository, StepRunResultTyped, TypedStep};
use sulfo_domain::{product_id, AnnotatedProduct, DispenseRecord, Product, ProductStatus,
                   RawReagentRow};

fn reagent_table(entries: &[(&str, &str)]) -> ReagentTable {
    ReagentTable {
        rows: entries
            .iter()
            .enumerate()
            .map(|(index, (id, smiles))| RawReagentRow {
                index,
                id: Some(id.to_string()),
                name: None,
                smiles: Some(smiles.to_string()),
            })
            .collect(),
        id_column_present: true,
    }
}

fn dispense(well: &str, s: usize, a: usize) -> DispenseRecord {
    DispenseRecord { well: well.to_string(),
                     sulfonyl_index: s,
                     amine_index: a,
                     sulfonyl_source_well: format!("A{s}"),
                     amine_source_well: format!("B{a}") }
}

/// Campaña 2x2 completa, de las tablas crudas a la compuerta de calidad.
fn campaign_engine(records: Vec<DispenseRecord>) -> FlowEngine<InMemoryEventStore, InMemoryFlowRepository> {
    let sulfonyls = reagent_table(&[("S1", "CS(=O)(=O)Cl"), ("S2", "CCS(=O)(=O)Cl")]);
    let amines = reagent_table(&[("A1", "CN"), ("A2", "CCN")]);
    FlowEngine::<InMemoryEventStore, InMemoryFlowRepository>::new()
        .first_step(NormalizeReagentsStep::new(sulfonyls, amines, false))
        .add_step(EnumerateProductsStep::new())
        .add_step(AnnotateDescriptorsStep::new())
        .add_step(AssignPlateStep::new())
        .add_step(ReconcileDispenseStep::new(records))
        .add_step(QcGateStep::new())
        .build()
}

fn step_output_hash(engine: &FlowEngine<InMemoryEventStore, InMemoryFlowRepository>, step_id: &str) -> String {
    engine.get_events()
          .into_iter()
          .flatten()
          .find_map(|e| match e.kind {
              FlowEventKind::StepFinished { step_id: id, outputs, .. } if id == step_id => outputs.first().cloned(),
              _ => None,
          })
          .expect("step output hash")
}

#[test]
fn full_campaign_reconciles_every_dispensed_well() {
    let records = vec![dispense("A1", 1, 1),
                       dispense("B1", 1, 2),
                       dispense("C1", 2, 1),
                       dispense("D1", 2, 2)];
    let mut engine = campaign_engine(records);
    engine.run().expect("campaign completes");

    let variants = engine.event_variants().expect("variants");
    assert_eq!(variants,
               vec!["I", "S", "F", "S", "F", "S", "F", "S", "F", "S", "F", "S", "F", "C"]);

    let hash = step_output_hash(&engine, "qc_gate");
    let artifact = engine.get_artifact(&hash).expect("artifact in cache");
    let authoritative = AuthoritativeArtifact::from_artifact(artifact).expect("typed decode");

    assert_eq!(authoritative.records.len(), 4);
    assert!(authoritative.report.is_clean());

    // un registro por fila de dispensado, en su orden
    let ids: Vec<&str> = authoritative.records
                                      .iter()
                                      .filter_map(|r| r.product_id.as_deref())
                                      .collect();
    assert_eq!(ids, vec!["P0001", "P0002", "P0003", "P0004"]);
    assert!(authoritative.records.iter().all(|r| r.smiles.is_some()));

    let first = &authoritative.records[0];
    assert_eq!(first.well, "A1");
    assert_eq!(first.sulfonyl_id, "S1");
    assert_eq!(first.amine_id, "A1");
    assert_eq!(first.sulfonyl_source_well, "A1");
    assert_eq!(first.status, Some(ProductStatus::Ok));
}

#[test]
fn campaign_fingerprint_is_reproducible() {
    let run_once = || {
        let mut engine = campaign_engine(vec![dispense("A1", 1, 1)]);
        engine.run().expect("campaign completes");
        engine.flow_fingerprint().expect("fingerprint")
    };
    assert_eq!(run_once(), run_once());

    // otra química, otro fingerprint
    let mut other = FlowEngine::<InMemoryEventStore, InMemoryFlowRepository>::new()
        .first_step(NormalizeReagentsStep::new(reagent_table(&[("S1", "CS(=O)(=O)Cl")]),
                                               reagent_table(&[("A1", "CN")]),
                                               false))
        .add_step(EnumerateProductsStep::new())
        .add_step(AnnotateDescriptorsStep::new())
        .add_step(AssignPlateStep::new())
        .add_step(ReconcileDispenseStep::new(vec![dispense("A1", 1, 1)]))
        .add_step(QcGateStep::new())
        .build();
    other.run().expect("campaign completes");
    assert_ne!(run_once(), other.flow_fingerprint().expect("fingerprint"));
}

#[test]
fn enumeration_campaign_reports_plate_overflow() {
    // 5 x 20 = 100 productos: 4 quedan fuera de la placa
    let table = |prefix: &str, tail: &str, count: usize| ReagentTable {
        rows: (0..count).map(|i| RawReagentRow { index: i,
                                                 id: Some(format!("{prefix}{}", i + 1)),
                                                 name: None,
                                                 smiles: Some(format!("{}{tail}", "C".repeat(i + 1))) })
                        .collect(),
        id_column_present: true,
    };

    let mut engine = FlowEngine::<InMemoryEventStore, InMemoryFlowRepository>::new()
        .first_step(NormalizeReagentsStep::new(table("S", "S(=O)(=O)Cl", 5), table("A", "N", 20), false))
        .add_step(EnumerateProductsStep::new())
        .add_step(AnnotateDescriptorsStep::new())
        .add_step(AssignPlateStep::new())
        .build();
    engine.run().expect("campaign completes");

    // la señal de desborde queda en el log de eventos, antes del cierre
    let variants = engine.event_variants().expect("variants");
    assert_eq!(variants, vec!["I", "S", "F", "S", "F", "S", "F", "S", "G", "F", "C"]);

    let hash = step_output_hash(&engine, "assign_plate");
    let artifact = engine.get_artifact(&hash).expect("artifact in cache");
    let plate = PlateMapArtifact::from_artifact(artifact).expect("typed decode");
    assert_eq!(plate.wells.len(), 96);
    assert_eq!(plate.unmapped, 4);
    assert_eq!(plate.wells.first().map(String::as_str), Some("A1"));
    assert_eq!(plate.wells.last().map(String::as_str), Some("H12"));
}

#[test]
fn plate_step_signals_overflow_with_the_count() {
    let structureless = |pair_index: usize| AnnotatedProduct {
        product: Product { product_id: product_id(pair_index),
                           pair_index,
                           sulfonyl_id: "S1".to_string(),
                           amine_id: format!("A{}", pair_index + 1),
                           smiles: None,
                           status: ProductStatus::ParseFailed },
        descriptors: None,
    };
    let annotated: Vec<AnnotatedProduct> = (0..100).map(structureless).collect();

    let result = AssignPlateStep::new().run_typed(Some(AnnotatedProductsArtifact { annotated, amine_count: 100 }), ());
    match result {
        StepRunResultTyped::SuccessWithSignals { outputs, signals } => {
            assert_eq!(outputs.len(), 1);
            assert_eq!(outputs[0].unmapped, 4);
            assert_eq!(signals.len(), 1);
            assert_eq!(signals[0].signal, "plate_overflow");
            assert_eq!(signals[0].data, serde_json::json!({ "unmapped": 4 }));
        }
        _ => panic!("expected an overflow signal"),
    }
}

#[test]
fn qc_gate_fails_the_campaign_when_wells_lack_structure() {
    // el segundo pocillo apunta a un sulfonilo que la enumeración no tiene
    let records = vec![dispense("A1", 1, 1), dispense("B1", 9, 1)];
    let mut engine = campaign_engine(records);

    let err = engine.run().expect_err("qc gate must reject");
    assert_eq!(err, CoreEngineError::CheckFailed("1 of 2 wells have no structure".to_string()));

    let variants = engine.event_variants().expect("variants");
    assert_eq!(variants,
               vec!["I", "S", "F", "S", "F", "S", "F", "S", "F", "S", "F", "S", "X"]);
    assert!(engine.flow_fingerprint().is_none());

    // la reconciliación sí terminó; el pocillo huérfano viaja en su output
    let hash = step_output_hash(&engine, "reconcile_dispense");
    let artifact = engine.get_artifact(&hash).expect("artifact in cache");
    let authoritative = AuthoritativeArtifact::from_artifact(artifact).expect("typed decode");
    assert_eq!(authoritative.records[1].product_id, None);
    assert_eq!(authoritative.report.missing_smiles, 1);
}
