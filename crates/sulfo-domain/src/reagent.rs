use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sulfo_chem::normalize_smiles;

use crate::error::DomainError;

/// Rol de un reactivo dentro de la campaña de sulfonamidas.
///
/// El rol determina la columna de identificadores que se espera en la
/// tabla de entrada y el prefijo de los identificadores autogenerados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReagentRole {
    Sulfonyl,
    Amine,
}

impl ReagentRole {
    /// Columna de identificadores preferida en la tabla de entrada.
    pub fn id_column(self) -> &'static str {
        match self {
            ReagentRole::Sulfonyl => "S_ID",
            ReagentRole::Amine => "Amine_ID",
        }
    }

    /// Prefijo de los identificadores autogenerados cuando la tabla no
    /// trae columna de identificadores.
    pub fn auto_prefix(self) -> &'static str {
        match self {
            ReagentRole::Sulfonyl => "S_",
            ReagentRole::Amine => "A_",
        }
    }
}

impl fmt::Display for ReagentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReagentRole::Sulfonyl => write!(f, "sulfonyl chloride"),
            ReagentRole::Amine => write!(f, "amine"),
        }
    }
}

/// Fila cruda de una tabla de reactivos, antes de la normalización.
///
/// `index` es la posición de la fila en la tabla original (base 0) y se
/// usa para generar identificadores estables cuando `id` falta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReagentRow {
    pub index: usize,
    pub id: Option<String>,
    pub name: Option<String>,
    pub smiles: Option<String>,
}

/// Reactivo validado: identificador único, nombre legible y SMILES en
/// forma canónica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reagent {
    pub rid: String,
    pub name: String,
    pub smiles: String,
}

/// Colección inmutable de reactivos de un mismo rol.
///
/// Se construye una sola vez a partir de las filas crudas y después solo
/// se lee. El orden de los reactivos es el orden de la tabla de entrada
/// y define las posiciones usadas por la enumeración. El hash del
/// conjunto cubre identificadores y estructuras, de modo que dos
/// colecciones con el mismo hash enumeran exactamente la misma química.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReagentCollection {
    role: ReagentRole,
    reagents: Vec<Reagent>,
    dropped: usize,
    set_hash: String,
}

impl ReagentCollection {
    /// Normaliza las filas crudas de una tabla de reactivos.
    ///
    /// Reglas, en orden:
    /// - En modo estricto la columna de identificadores del rol debe
    ///   existir en la tabla (`id_column_present`); si no, error.
    /// - Cada fila sin `id` recibe uno autogenerado a partir de su
    ///   posición original (`S_000003`, `A_000014`, ...).
    /// - Un identificador repetido es un error, nunca una fusión.
    /// - Las filas sin estructura o con SMILES inválido se descartan y
    ///   se cuentan en `dropped`.
    /// - Los SMILES válidos se reescriben en forma canónica.
    ///
    /// # Errores
    ///
    /// `MissingIdColumn`, `DuplicateReagentId` o `EmptyCollection` si no
    /// sobrevive ninguna fila.
    pub fn normalize(
        role: ReagentRole,
        rows: &[RawReagentRow],
        strict_ids: bool,
        id_column_present: bool,
    ) -> Result<Self, DomainError> {
        if strict_ids && !id_column_present {
            return Err(DomainError::MissingIdColumn {
                column: role.id_column(),
            });
        }

        let mut reagents = Vec::with_capacity(rows.len());
        let mut seen = HashSet::new();
        let mut dropped = 0usize;

        for row in rows {
            let rid = match row.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(id) => id.to_string(),
                None => format!("{}{:06}", role.auto_prefix(), row.index),
            };
            if !seen.insert(rid.clone()) {
                return Err(DomainError::DuplicateReagentId { id: rid, role });
            }

            let raw = match row.smiles.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => s,
                None => {
                    tracing::warn!(role = %role, row = row.index, id = %rid, "row dropped: no structure");
                    dropped += 1;
                    continue;
                }
            };
            let smiles = match normalize_smiles(raw) {
                Ok(canonical) => canonical,
                Err(e) => {
                    tracing::warn!(role = %role, row = row.index, id = %rid, error = %e, "row dropped: unparseable structure");
                    dropped += 1;
                    continue;
                }
            };

            let name = match row.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(n) => n.to_string(),
                None => rid.clone(),
            };

            reagents.push(Reagent { rid, name, smiles });
        }

        if reagents.is_empty() {
            return Err(DomainError::EmptyCollection { role });
        }
        Ok(Self::assemble(role, reagents, dropped))
    }

    /// Construye una colección a partir de reactivos ya normalizados.
    ///
    /// Pensado para reconstruir colecciones desde artefactos o para
    /// pruebas. Mantiene las garantías de unicidad y no vacuidad, pero
    /// no reescribe los SMILES.
    ///
    /// # Errores
    ///
    /// `DuplicateReagentId` o `EmptyCollection`.
    pub fn from_reagents(role: ReagentRole, reagents: Vec<Reagent>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for reagent in &reagents {
            if !seen.insert(reagent.rid.clone()) {
                return Err(DomainError::DuplicateReagentId {
                    id: reagent.rid.clone(),
                    role,
                });
            }
        }
        if reagents.is_empty() {
            return Err(DomainError::EmptyCollection { role });
        }
        Ok(Self::assemble(role, reagents, 0))
    }

    fn assemble(role: ReagentRole, reagents: Vec<Reagent>, dropped: usize) -> Self {
        let set_hash = Self::calculate_set_hash(role, &reagents);
        ReagentCollection {
            role,
            reagents,
            dropped,
            set_hash,
        }
    }

    /// Hash SHA-256 del conjunto: rol, identificadores y SMILES en orden.
    fn calculate_set_hash(role: ReagentRole, reagents: &[Reagent]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(role.id_column().as_bytes());
        for reagent in reagents {
            hasher.update([0u8]);
            hasher.update(reagent.rid.as_bytes());
            hasher.update([0u8]);
            hasher.update(reagent.smiles.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    // Getters

    pub fn role(&self) -> ReagentRole {
        self.role
    }

    pub fn reagents(&self) -> &[Reagent] {
        &self.reagents
    }

    pub fn get(&self, position: usize) -> Option<&Reagent> {
        self.reagents.get(position)
    }

    pub fn len(&self) -> usize {
        self.reagents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reagents.is_empty()
    }

    /// Filas descartadas durante la normalización.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn set_hash(&self) -> &str {
        &self.set_hash
    }
}

impl fmt::Display for ReagentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} collection: {} reagents ({} dropped)",
            self.role,
            self.reagents.len(),
            self.dropped
        )
    }
}

impl<'a> IntoIterator for &'a ReagentCollection {
    type Item = &'a Reagent;
    type IntoIter = std::slice::Iter<'a, Reagent>;

    fn into_iter(self) -> Self::IntoIter {
        self.reagents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, id: Option<&str>, name: Option<&str>, smiles: Option<&str>) -> RawReagentRow {
        RawReagentRow {
            index,
            id: id.map(String::from),
            name: name.map(String::from),
            smiles: smiles.map(String::from),
        }
    }

    #[test]
    fn normalize_keeps_order_and_canonicalizes() -> Result<(), DomainError> {
        let rows = vec![
            row(0, Some("S1"), Some("mesyl chloride"), Some("CS(=O)(=O)Cl")),
            row(1, Some("S2"), None, Some("OCC")),
        ];
        let col = ReagentCollection::normalize(ReagentRole::Sulfonyl, &rows, false, true)?;
        assert_eq!(col.len(), 2);
        assert_eq!(col.get(0).map(|r| r.rid.as_str()), Some("S1"));
        // SMILES reescrito en forma canónica, no copiado tal cual
        assert_eq!(col.get(1).map(|r| r.smiles.as_str()), Some("CCO"));
        // el nombre cae al identificador cuando falta
        assert_eq!(col.get(1).map(|r| r.name.as_str()), Some("S2"));
        assert_eq!(col.dropped(), 0);
        Ok(())
    }

    #[test]
    fn normalize_generates_ids_from_row_position() -> Result<(), DomainError> {
        let rows = vec![
            row(0, None, None, Some("CCO")),
            row(3, Some("  "), None, Some("CCN")),
        ];
        let col = ReagentCollection::normalize(ReagentRole::Amine, &rows, false, false)?;
        assert_eq!(col.get(0).map(|r| r.rid.as_str()), Some("A_000000"));
        assert_eq!(col.get(1).map(|r| r.rid.as_str()), Some("A_000003"));
        Ok(())
    }

    #[test]
    fn normalize_drops_bad_rows_but_counts_them() -> Result<(), DomainError> {
        let rows = vec![
            row(0, Some("A1"), None, Some("CCN")),
            row(1, Some("A2"), None, Some("not-a-smiles(((")),
            row(2, Some("A3"), None, None),
        ];
        let col = ReagentCollection::normalize(ReagentRole::Amine, &rows, false, true)?;
        assert_eq!(col.len(), 1);
        assert_eq!(col.dropped(), 2);
        Ok(())
    }

    #[test]
    fn strict_mode_requires_the_id_column() {
        let rows = vec![row(0, None, None, Some("CCN"))];
        let err = ReagentCollection::normalize(ReagentRole::Amine, &rows, true, false);
        assert_eq!(
            err,
            Err(DomainError::MissingIdColumn { column: "Amine_ID" })
        );
    }

    #[test]
    fn duplicate_ids_are_an_error_not_a_merge() {
        let rows = vec![
            row(0, Some("S1"), None, Some("CCO")),
            row(1, Some("S1"), None, Some("CCN")),
        ];
        let err = ReagentCollection::normalize(ReagentRole::Sulfonyl, &rows, false, true);
        assert!(matches!(
            err,
            Err(DomainError::DuplicateReagentId { ref id, role: ReagentRole::Sulfonyl }) if id == "S1"
        ));
    }

    #[test]
    fn empty_after_drops_is_an_error() {
        let rows = vec![row(0, Some("A1"), None, Some("x#y#z"))];
        let err = ReagentCollection::normalize(ReagentRole::Amine, &rows, false, true);
        assert_eq!(
            err,
            Err(DomainError::EmptyCollection {
                role: ReagentRole::Amine
            })
        );
    }

    #[test]
    fn set_hash_tracks_ids_and_structures() -> Result<(), DomainError> {
        let base = vec![row(0, Some("S1"), None, Some("CCO"))];
        let same = ReagentCollection::normalize(ReagentRole::Sulfonyl, &base, false, true)?;
        let again = ReagentCollection::normalize(ReagentRole::Sulfonyl, &base, false, true)?;
        assert_eq!(same.set_hash(), again.set_hash());

        let other_rows = vec![row(0, Some("S1"), None, Some("CCN"))];
        let other = ReagentCollection::normalize(ReagentRole::Sulfonyl, &other_rows, false, true)?;
        assert_ne!(same.set_hash(), other.set_hash());

        // el mismo contenido bajo otro rol también cambia el hash
        let as_amine = ReagentCollection::normalize(ReagentRole::Amine, &base, false, true)?;
        assert_ne!(same.set_hash(), as_amine.set_hash());
        Ok(())
    }

    #[test]
    fn from_reagents_revalidates_uniqueness() {
        let dup = vec![
            Reagent {
                rid: "A1".into(),
                name: "a".into(),
                smiles: "CCN".into(),
            },
            Reagent {
                rid: "A1".into(),
                name: "b".into(),
                smiles: "CCO".into(),
            },
        ];
        assert!(ReagentCollection::from_reagents(ReagentRole::Amine, dup).is_err());
    }

    #[test]
    fn collection_iterates_in_input_order() -> Result<(), DomainError> {
        let rows = vec![
            row(0, Some("A1"), None, Some("CCN")),
            row(1, Some("A2"), None, Some("NC1CC1")),
        ];
        let col = ReagentCollection::normalize(ReagentRole::Amine, &rows, false, true)?;
        let ids: Vec<&str> = col.into_iter().map(|r| r.rid.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2"]);
        Ok(())
    }
}
