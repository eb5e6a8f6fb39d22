//! Orquestación de los subcomandos del binario.
//!
//! `enumerate` y `run` montan la campaña sobre el motor de flujo y
//! decodifican los artifacts finales para escribir las tablas;
//! `reconcile` es el cruce directo de dos archivos ya enumerados, sin
//! motor de por medio. Las líneas de resultado (`Wrote <archivo>`,
//! conteos) van a stdout; el diagnóstico sale por el logger a stderr.

use std::path::{Path, PathBuf};

use sulfo_adapters::artifacts::{AuthoritativeArtifact, PlateMapArtifact};
use sulfo_adapters::steps::{AnnotateDescriptorsStep, AssignPlateStep, EnumerateProductsStep,
                            NormalizeReagentsStep, QcGateStep, ReconcileDispenseStep};
use sulfo_adapters::{csv_io, sdf, PipelineError};
use sulfo_core::{ArtifactSpec, CoreEngineError, FlowEngine, FlowEventKind, InMemoryEventStore,
                 InMemoryFlowRepository};
use sulfo_domain::{reconcile, AuthoritativeRecord, DispenseRecord, QcReport, ReagentRole};

use crate::cli::{EnumerateArgs, ReconcileArgs, RunArgs};
use crate::config::CONFIG;

type CampaignEngine = FlowEngine<InMemoryEventStore, InMemoryFlowRepository>;

/// Enumera la biblioteca y escribe la tabla final y la vista de placa.
pub fn enumerate_library(args: &EnumerateArgs) -> Result<(), PipelineError> {
    let mut engine = campaign_engine(args, None)?;
    engine.run()?;

    let plate: PlateMapArtifact = step_output(&engine, "assign_plate")?;
    log_fingerprint(&engine);
    print_counts(&plate);
    write_enumeration_outputs(args, &plate)
}

/// Cruza un mapa de dispensado con una tabla de productos ya escrita.
///
/// Las dos salidas se escriben siempre; el veredicto llega después,
/// para que el reporte quede disponible aunque la corrida falle.
pub fn reconcile_from_files(args: &ReconcileArgs) -> Result<(), PipelineError> {
    let records = csv_io::read_dispense_map(&args.dest_map)?;
    let index = csv_io::read_products_table(&args.products)?;

    let (rows, report) = reconcile(&records, &index);
    tracing::info!(wells = report.total_wells,
                   missing_smiles = report.missing_smiles,
                   "dispense map reconciled");
    write_reconciliation_outputs(&args.out, &args.qc, &rows, &report)?;

    qc_verdict(&report).map_err(PipelineError::from)
}

/// Campaña completa: enumeración y reconciliación en un solo flujo.
pub fn run_campaign(args: &RunArgs) -> Result<(), PipelineError> {
    let records = csv_io::read_dispense_map(&args.dest_map)?;
    let mut engine = campaign_engine(&args.enumerate, Some(records))?;

    // Un control de calidad fallido no debe impedir escribir las
    // tablas; cualquier otro error sí aborta aquí mismo.
    let verdict = match engine.run() {
        Ok(_) => Ok(()),
        Err(e @ CoreEngineError::CheckFailed(_)) => Err(e),
        Err(e) => return Err(e.into()),
    };

    let plate: PlateMapArtifact = step_output(&engine, "assign_plate")?;
    let authoritative: AuthoritativeArtifact = step_output(&engine, "reconcile_dispense")?;
    log_fingerprint(&engine);
    print_counts(&plate);
    write_enumeration_outputs(&args.enumerate, &plate)?;
    write_reconciliation_outputs(&args.out, &args.qc, &authoritative.records,
                                 &authoritative.report)?;

    verdict?;
    Ok(())
}

/// Lee las listas de reactivos y arma el flujo de la campaña: cuatro
/// pasos para enumerar, seis cuando hay mapa de dispensado que
/// reconciliar.
fn campaign_engine(args: &EnumerateArgs,
                   records: Option<Vec<DispenseRecord>>)
                   -> Result<CampaignEngine, PipelineError> {
    let strict = args.strict_ids || CONFIG.strict_ids;
    let sulfonyls = csv_io::read_reagent_table(&args.sulfonyl_chlorides, ReagentRole::Sulfonyl)?;
    let amines = csv_io::read_reagent_table(&args.amines, ReagentRole::Amine)?;

    let base = FlowEngine::<InMemoryEventStore, InMemoryFlowRepository>::new()
        .first_step(NormalizeReagentsStep::new(sulfonyls, amines, strict))
        .add_step(EnumerateProductsStep::new())
        .add_step(AnnotateDescriptorsStep::new())
        .add_step(AssignPlateStep::new());

    let engine = match records {
        Some(records) => base.add_step(ReconcileDispenseStep::new(records))
                             .add_step(QcGateStep::new())
                             .build(),
        None => base.build(),
    };
    Ok(engine)
}

/// Decodifica el último output que dejó el paso indicado.
fn step_output<T: ArtifactSpec>(engine: &CampaignEngine, step_id: &str) -> Result<T, PipelineError> {
    let events = engine.get_events()
                       .ok_or_else(|| internal("no flow has been executed".to_string()))?;
    let hash = events.iter()
                     .rev()
                     .find_map(|e| match &e.kind {
                         FlowEventKind::StepFinished { step_id: id, outputs, .. } if id == step_id => {
                             outputs.first().cloned()
                         }
                         _ => None,
                     })
                     .ok_or_else(|| internal(format!("step {step_id} left no output")))?;
    let artifact = engine.get_artifact(&hash)
                         .ok_or_else(|| internal(format!("artifact {hash} is not stored")))?;
    T::from_artifact(artifact).map_err(|e| internal(e.to_string()))
}

fn internal(message: String) -> PipelineError {
    PipelineError::Engine(CoreEngineError::Internal(message))
}

fn log_fingerprint(engine: &CampaignEngine) {
    if let Some(fp) = engine.flow_fingerprint() {
        tracing::info!(%fp, "flow fingerprint");
    }
}

/// Una línea de conteos a stdout, como la espera el operador.
fn print_counts(plate: &PlateMapArtifact) {
    let total = plate.annotated.len();
    let amines = plate.amine_count;
    let sulfonyls = if amines == 0 { 0 } else { total / amines };
    println!("Sulfonyl chlorides: {sulfonyls} | Amines: {amines} | Products: {total}");
}

fn write_enumeration_outputs(args: &EnumerateArgs,
                             plate: &PlateMapArtifact)
                             -> Result<(), PipelineError> {
    let base = args.out_basename.clone().unwrap_or_else(|| CONFIG.out_basename.clone());

    let products_path = PathBuf::from(format!("{base}_final_products.csv"));
    csv_io::write_products_csv(&products_path, &plate.annotated)?;
    println!("Wrote {}", products_path.display());

    let plate_path = PathBuf::from(format!("{base}_plate_map_96.csv"));
    csv_io::write_plate_csv(&plate_path, &plate.annotated, &plate.wells)?;
    println!("Wrote {}", plate_path.display());

    if args.emit_sdf {
        let sdf_path = PathBuf::from(format!("{base}_final_products.sdf"));
        let written = sdf::write_sdf(&sdf_path, &plate.annotated, &plate.wells)?;
        println!("Wrote {} ({written} records)", sdf_path.display());
    }
    Ok(())
}

fn write_reconciliation_outputs(out: &Path,
                                qc: &Path,
                                records: &[AuthoritativeRecord],
                                report: &QcReport)
                                -> Result<(), PipelineError> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    csv_io::write_authoritative_csv(out, records)?;
    println!("Wrote {}", out.display());
    csv_io::write_qc_report(qc, report)?;
    println!("Wrote {}", qc.display());
    Ok(())
}

fn qc_verdict(report: &QcReport) -> Result<(), CoreEngineError> {
    if report.is_clean() {
        Ok(())
    } else {
        Err(CoreEngineError::CheckFailed(format!("{} of {} wells have no structure",
                                                 report.missing_smiles, report.total_wells)))
    }
}
