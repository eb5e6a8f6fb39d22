//! Lectura y escritura de las tablas de la campaña.
//!
//! Políticas de encabezado, en orden de preferencia:
//! - estructura: `SMILES`, `smiles`, `Smiles`; sin ella la tabla es
//!   inservible;
//! - identificador: la columna preferida del rol (`S_ID` / `Amine_ID`),
//!   después `id`; sin ninguna, los identificadores se autogeneran por
//!   posición durante la normalización;
//! - nombre: `name` o `Name`, opcional.
//!
//! El mapa de dispensado usa los encabezados exactos del extractor del
//! robot y sus índices de reactivo vienen en base 1.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Writer};
use sulfo_domain::{
    AnnotatedProduct, AuthoritativeRecord, DispenseRecord, ProductIndex, ProductInfo,
    ProductStatus, QcReport, RawReagentRow, ReagentRole,
};

use crate::error::PipelineError;

const SMILES_HEADERS: [&str; 3] = ["SMILES", "smiles", "Smiles"];

const DISPENSE_HEADERS: [&str; 5] = [
    "Well",
    "Sulfonyl chloride #",
    "Amine #",
    "Sulfonyl source well",
    "Amine source well",
];

/// Tabla cruda de reactivos tal como salió del archivo.
#[derive(Debug, Clone, Default)]
pub struct ReagentTable {
    pub rows: Vec<RawReagentRow>,
    /// La columna de identificadores preferida del rol estaba presente.
    pub id_column_present: bool,
}

fn header_position(headers: &StringRecord, wanted: &str) -> Option<usize> {
    headers.iter().position(|h| h == wanted)
}

/// Celda recortada; vacía cuenta como ausente.
fn cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Lee una tabla de reactivos aplicando la política de encabezados.
///
/// No valida química: entrega las filas crudas para que la
/// normalización del dominio decida qué sobrevive.
pub fn read_reagent_table(path: &Path, role: ReagentRole) -> Result<ReagentTable, PipelineError> {
    let file = path.display().to_string();
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let smiles_idx = match SMILES_HEADERS.iter().find_map(|h| header_position(&headers, h)) {
        Some(i) => i,
        None => return Err(PipelineError::MissingColumn { file, column: "SMILES" }),
    };

    let preferred_idx = header_position(&headers, role.id_column());
    let id_idx = preferred_idx.or_else(|| header_position(&headers, "id"));
    let name_idx = header_position(&headers, "name").or_else(|| header_position(&headers, "Name"));

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        rows.push(RawReagentRow {
            index,
            id: cell(&record, id_idx),
            name: cell(&record, name_idx),
            smiles: cell(&record, Some(smiles_idx)),
        });
    }

    Ok(ReagentTable {
        rows,
        id_column_present: preferred_idx.is_some(),
    })
}

/// Lee el mapa de dispensado del robot.
///
/// Los cinco encabezados son obligatorios y los índices de reactivo
/// deben ser enteros; una celda ilegible detiene la lectura con el
/// número de línea del archivo.
pub fn read_dispense_map(path: &Path) -> Result<Vec<DispenseRecord>, PipelineError> {
    let file = path.display().to_string();
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut positions = [0usize; 5];
    for (slot, wanted) in DISPENSE_HEADERS.into_iter().enumerate() {
        positions[slot] = header_position(&headers, wanted).ok_or_else(|| {
            PipelineError::MissingColumn {
                file: file.clone(),
                column: wanted,
            }
        })?;
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = i + 2; // encabezado + base 1

        let text = |slot: usize| record.get(positions[slot]).unwrap_or("").trim().to_string();
        let index = |slot: usize, what: &str| -> Result<usize, PipelineError> {
            let raw = record.get(positions[slot]).unwrap_or("").trim();
            raw.parse().map_err(|_| PipelineError::BadCell {
                file: file.clone(),
                line,
                message: format!("cannot read {what} from {raw:?}"),
            })
        };

        records.push(DispenseRecord {
            well: text(0),
            sulfonyl_index: index(1, "sulfonyl chloride index")?,
            amine_index: index(2, "amine index")?,
            sulfonyl_source_well: text(3),
            amine_source_well: text(4),
        });
    }

    Ok(records)
}

/// Reconstruye el índice de productos desde la tabla final en disco.
///
/// Las posiciones de reactivo se recuperan del orden de primera
/// aparición de `S_ID` / `Amine_ID` en la tabla, que por el contrato de
/// orden de la enumeración coincide con el orden de las colecciones
/// originales.
pub fn read_products_table(path: &Path) -> Result<ProductIndex, PipelineError> {
    let file = path.display().to_string();
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let need = |column: &'static str| -> Result<usize, PipelineError> {
        header_position(&headers, column).ok_or_else(|| PipelineError::MissingColumn {
            file: file.clone(),
            column,
        })
    };
    let pid_idx = need("ProductID")?;
    let sid_idx = need("S_ID")?;
    let aid_idx = need("Amine_ID")?;
    let smiles_idx = need("SMILES")?;
    let status_idx = need("Status")?;

    let mut sulfonyl_ids: Vec<String> = Vec::new();
    let mut amine_ids: Vec<String> = Vec::new();
    let mut entries = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = i + 2;

        let sid = record.get(sid_idx).unwrap_or("").trim().to_string();
        let aid = record.get(aid_idx).unwrap_or("").trim().to_string();
        let s_pos = position_of(&mut sulfonyl_ids, &sid);
        let a_pos = position_of(&mut amine_ids, &aid);

        let status: ProductStatus =
            record
                .get(status_idx)
                .unwrap_or("")
                .trim()
                .parse()
                .map_err(|message| PipelineError::BadCell {
                    file: file.clone(),
                    line,
                    message,
                })?;

        entries.push((
            (s_pos, a_pos),
            ProductInfo {
                product_id: record.get(pid_idx).unwrap_or("").trim().to_string(),
                sulfonyl_id: sid,
                amine_id: aid,
                smiles: cell(&record, Some(smiles_idx)),
                status,
            },
        ));
    }

    Ok(ProductIndex::from_parts(sulfonyl_ids, amine_ids, entries))
}

/// Posición de primera aparición, registrando el valor si es nuevo.
fn position_of(seen: &mut Vec<String>, value: &str) -> usize {
    match seen.iter().position(|v| v == value) {
        Some(pos) => pos,
        None => {
            seen.push(value.to_string());
            seen.len() - 1
        }
    }
}

/// Representación mínima exacta, como la imprime el lenguaje.
pub(crate) fn fmt_float(value: f64) -> String {
    format!("{value}")
}

/// Celdas de descriptores en el orden del encabezado final; todas
/// vacías cuando el producto no tiene perfil.
pub(crate) fn descriptor_cells(annotated: &AnnotatedProduct) -> [String; 8] {
    match &annotated.descriptors {
        Some(d) => [
            fmt_float(d.mol_wt),
            fmt_float(d.log_p),
            fmt_float(d.tpsa),
            d.hbd.to_string(),
            d.hba.to_string(),
            d.rot_bonds.to_string(),
            d.ring_count.to_string(),
            fmt_float(d.frac_csp3),
        ],
        None => Default::default(),
    }
}

/// Escribe la tabla final de productos con sus descriptores.
pub fn write_products_csv(path: &Path, annotated: &[AnnotatedProduct]) -> Result<(), PipelineError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([
        "ProductID", "S_ID", "Amine_ID", "SMILES", "Status", "MolWt", "LogP", "TPSA", "HBD",
        "HBA", "RotBonds", "RingCount", "FracCSP3",
    ])?;

    for item in annotated {
        let p = &item.product;
        let mut row = vec![
            p.product_id.clone(),
            p.sulfonyl_id.clone(),
            p.amine_id.clone(),
            p.smiles.clone().unwrap_or_default(),
            p.status.as_str().to_string(),
        ];
        row.extend(descriptor_cells(item));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Escribe la vista de placa en orden de enumeración.
///
/// Es la proyección de la enumeración sobre la placa, no la verdad del
/// robot; esa llega por el mapa de dispensado.
pub fn write_plate_csv(
    path: &Path,
    annotated: &[AnnotatedProduct],
    wells: &[String],
) -> Result<(), PipelineError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Well", "ProductID", "ProductSMILES", "S_ID", "Amine_ID"])?;

    for (well, item) in wells.iter().zip(annotated) {
        let p = &item.product;
        writer.write_record([
            well.as_str(),
            p.product_id.as_str(),
            p.smiles.as_deref().unwrap_or(""),
            p.sulfonyl_id.as_str(),
            p.amine_id.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Escribe la tabla autoritativa, una fila por registro de dispensado.
pub fn write_authoritative_csv(
    path: &Path,
    records: &[AuthoritativeRecord],
) -> Result<(), PipelineError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([
        "Well", "S_ID", "Amine_ID", "SulfonylSourceWell", "AmineSourceWell", "ProductID",
        "SMILES", "Status",
    ])?;

    for r in records {
        writer.write_record([
            r.well.as_str(),
            r.sulfonyl_id.as_str(),
            r.amine_id.as_str(),
            r.sulfonyl_source_well.as_str(),
            r.amine_source_well.as_str(),
            r.product_id.as_deref().unwrap_or(""),
            r.smiles.as_deref().unwrap_or(""),
            r.status.map(ProductStatus::as_str).unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Escribe el reporte de calidad tal cual lo produce `QcReport::render`.
pub fn write_qc_report(path: &Path, report: &QcReport) -> Result<(), PipelineError> {
    fs::write(path, report.render())?;
    Ok(())
}
