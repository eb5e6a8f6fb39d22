//! Reconciliación del mapa de dispensado del robot con la química
//! enumerada.
//!
//! El mapa de dispensado es la verdad sobre qué se pipeteó en cada
//! pocillo; la enumeración es la verdad sobre qué química corresponde a
//! cada par. La unión produce exactamente un registro autoritativo por
//! fila de dispensado, y el reporte de control de calidad cuenta los
//! pocillos que quedaron sin estructura.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::indexing::pair_positions;
use crate::product::{Product, ProductStatus};

/// Fila del mapa de dispensado tal como la reporta el robot.
///
/// Los índices de reactivo son base 1, como los imprime el equipo de
/// laboratorio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenseRecord {
    pub well: String,
    pub sulfonyl_index: usize,
    pub amine_index: usize,
    pub sulfonyl_source_well: String,
    pub amine_source_well: String,
}

/// Química resuelta de un par, lista para unirse a un pocillo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub product_id: String,
    pub sulfonyl_id: String,
    pub amine_id: String,
    pub smiles: Option<String>,
    pub status: ProductStatus,
}

/// Vista de los productos indexada por posiciones (base 0) de reactivo.
///
/// Guarda además los identificadores por posición, para poder nombrar a
/// los reactivos de un pocillo cuyo par no existe en la enumeración.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductIndex {
    sulfonyl_ids: Vec<String>,
    amine_ids: Vec<String>,
    by_pos: HashMap<(usize, usize), ProductInfo>,
}

impl ProductIndex {
    /// Construye el índice desde la salida del enumerador.
    ///
    /// `amine_count` es el tamaño del lazo interno con el que se
    /// calcularon los índices de par.
    pub fn from_products(products: &[Product], amine_count: usize) -> Self {
        let mut index = ProductIndex::default();
        if amine_count == 0 {
            return index;
        }
        for product in products {
            let (s_pos, a_pos) = pair_positions(product.pair_index, amine_count);
            index.note_id(s_pos, a_pos, &product.sulfonyl_id, &product.amine_id);
            index.by_pos.insert(
                (s_pos, a_pos),
                ProductInfo {
                    product_id:  product.product_id.clone(),
                    sulfonyl_id: product.sulfonyl_id.clone(),
                    amine_id:    product.amine_id.clone(),
                    smiles:      product.smiles.clone(),
                    status:      product.status,
                },
            );
        }
        index
    }

    /// Construye el índice desde partes ya resueltas, por ejemplo una
    /// tabla de productos leída de disco.
    pub fn from_parts(
        sulfonyl_ids: Vec<String>,
        amine_ids: Vec<String>,
        entries: Vec<((usize, usize), ProductInfo)>,
    ) -> Self {
        ProductIndex {
            sulfonyl_ids,
            amine_ids,
            by_pos: entries.into_iter().collect(),
        }
    }

    fn note_id(&mut self, s_pos: usize, a_pos: usize, sulfonyl_id: &str, amine_id: &str) {
        if self.sulfonyl_ids.len() <= s_pos {
            self.sulfonyl_ids.resize(s_pos + 1, String::new());
        }
        if self.sulfonyl_ids[s_pos].is_empty() {
            self.sulfonyl_ids[s_pos] = sulfonyl_id.to_string();
        }
        if self.amine_ids.len() <= a_pos {
            self.amine_ids.resize(a_pos + 1, String::new());
        }
        if self.amine_ids[a_pos].is_empty() {
            self.amine_ids[a_pos] = amine_id.to_string();
        }
    }

    pub fn get(&self, s_pos: usize, a_pos: usize) -> Option<&ProductInfo> {
        self.by_pos.get(&(s_pos, a_pos))
    }

    pub fn sulfonyl_id(&self, s_pos: usize) -> Option<&str> {
        self.sulfonyl_ids.get(s_pos).map(String::as_str)
    }

    pub fn amine_id(&self, a_pos: usize) -> Option<&str> {
        self.amine_ids.get(a_pos).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pos.is_empty()
    }
}

/// Registro autoritativo: un pocillo físico unido a su química.
///
/// Los campos opcionales quedan en `None` cuando el par dispensado no
/// existe en la enumeración; el pocillo se reporta igual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritativeRecord {
    pub well: String,
    pub sulfonyl_id: String,
    pub amine_id: String,
    pub sulfonyl_source_well: String,
    pub amine_source_well: String,
    pub product_id: Option<String>,
    pub smiles: Option<String>,
    pub status: Option<ProductStatus>,
}

/// Pocillo sin estructura, tal como aparece en el reporte de calidad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingWell {
    pub well: String,
    pub sulfonyl_id: String,
    pub amine_id: String,
}

/// Reporte de control de calidad de la reconciliación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcReport {
    pub total_wells: usize,
    pub missing_smiles: usize,
    pub missing: Vec<MissingWell>,
}

impl QcReport {
    /// La campaña solo pasa el control cuando ningún pocillo quedó sin
    /// estructura.
    pub fn is_clean(&self) -> bool {
        self.missing_smiles == 0
    }

    /// Texto plano del reporte, estable línea a línea.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Total wells: {}\n", self.total_wells));
        out.push_str(&format!("Missing SMILES: {}\n", self.missing_smiles));
        if !self.missing.is_empty() {
            out.push_str("Missing rows (Well, S_ID, Amine_ID):\n");
            for row in &self.missing {
                out.push_str(&format!("  {}, {}, {}\n", row.well, row.sulfonyl_id, row.amine_id));
            }
        }
        out
    }
}

/// Une cada fila de dispensado con su producto.
///
/// Devuelve exactamente un registro por fila de entrada, en el mismo
/// orden. Las filas cuyo par no existe, o cuyo producto no tiene
/// estructura, se cuentan en el reporte; jamás se descartan en
/// silencio.
pub fn reconcile(
    records: &[DispenseRecord],
    index: &ProductIndex,
) -> (Vec<AuthoritativeRecord>, QcReport) {
    let mut out = Vec::with_capacity(records.len());
    let mut missing = Vec::new();

    for record in records {
        // del índice base 1 del robot a las posiciones base 0
        let positions = record
            .sulfonyl_index
            .checked_sub(1)
            .zip(record.amine_index.checked_sub(1));
        let info = positions.and_then(|(s, a)| index.get(s, a));

        let authoritative = match info {
            Some(product) => AuthoritativeRecord {
                well:                 record.well.clone(),
                sulfonyl_id:          product.sulfonyl_id.clone(),
                amine_id:             product.amine_id.clone(),
                sulfonyl_source_well: record.sulfonyl_source_well.clone(),
                amine_source_well:    record.amine_source_well.clone(),
                product_id:           Some(product.product_id.clone()),
                smiles:               product.smiles.clone(),
                status:               Some(product.status),
            },
            None => {
                let sulfonyl_id = positions
                    .and_then(|(s, _)| index.sulfonyl_id(s))
                    .unwrap_or("")
                    .to_string();
                let amine_id = positions
                    .and_then(|(_, a)| index.amine_id(a))
                    .unwrap_or("")
                    .to_string();
                tracing::warn!(well = %record.well, "dispensed pair is not part of the enumeration");
                AuthoritativeRecord {
                    well:                 record.well.clone(),
                    sulfonyl_id,
                    amine_id,
                    sulfonyl_source_well: record.sulfonyl_source_well.clone(),
                    amine_source_well:    record.amine_source_well.clone(),
                    product_id:           None,
                    smiles:               None,
                    status:               None,
                }
            }
        };

        if authoritative.smiles.is_none() {
            missing.push(MissingWell {
                well:        authoritative.well.clone(),
                sulfonyl_id: authoritative.sulfonyl_id.clone(),
                amine_id:    authoritative.amine_id.clone(),
            });
        }
        out.push(authoritative);
    }

    let report = QcReport {
        total_wells:    records.len(),
        missing_smiles: missing.len(),
        missing,
    };
    (out, report)
}
