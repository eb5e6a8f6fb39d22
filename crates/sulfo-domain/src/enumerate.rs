//! Enumeración cartesiana de la biblioteca de sulfonamidas.

use sulfo_chem::{combine, parse_smiles, sulfonamide_couple, write_smiles, ChemError, Molecule};

use crate::indexing::{pair_index, product_id};
use crate::product::{Product, ProductStatus};
use crate::reagent::ReagentCollection;

/// Enumera el producto cartesiano completo de ambas colecciones.
///
/// Devuelve exactamente `sulfonyls.len() * amines.len()` productos, en
/// orden de índice de par (sulfonilos en el lazo externo). Ningún par se
/// omite: los fallos químicos degradan el estado del producto, nunca lo
/// eliminan. Cada reactivo se interpreta una sola vez, por caras que
/// sean las colecciones.
pub fn enumerate(sulfonyls: &ReagentCollection, amines: &ReagentCollection) -> Vec<Product> {
    let sulfonyl_mols: Vec<Result<Molecule, ChemError>> = sulfonyls
        .reagents()
        .iter()
        .map(|r| parse_smiles(&r.smiles))
        .collect();
    let amine_mols: Vec<Result<Molecule, ChemError>> = amines
        .reagents()
        .iter()
        .map(|r| parse_smiles(&r.smiles))
        .collect();

    let mut products = Vec::with_capacity(sulfonyls.len() * amines.len());
    for (s_pos, sulfonyl) in sulfonyls.reagents().iter().enumerate() {
        for (a_pos, amine) in amines.reagents().iter().enumerate() {
            let idx = pair_index(s_pos, a_pos, amines.len());
            let (smiles, status) = pair_outcome(&sulfonyl_mols[s_pos], &amine_mols[a_pos], idx);
            products.push(Product {
                product_id: product_id(idx),
                pair_index:  idx,
                sulfonyl_id: sulfonyl.rid.clone(),
                amine_id:    amine.rid.clone(),
                smiles,
                status,
            });
        }
    }
    products
}

/// Resultado químico de un par: acoplamiento, unión de respaldo o nada.
fn pair_outcome(
    sulfonyl: &Result<Molecule, ChemError>,
    amine: &Result<Molecule, ChemError>,
    idx: usize,
) -> (Option<String>, ProductStatus) {
    let (s, a) = match (sulfonyl, amine) {
        (Ok(s), Ok(a)) => (s, a),
        _ => return (None, ProductStatus::ParseFailed),
    };

    match sulfonamide_couple(s, a) {
        Ok(coupled) => match write_smiles(&coupled) {
            Ok(smiles) => (Some(smiles), ProductStatus::Ok),
            Err(e) => {
                tracing::warn!(pair = idx, error = %e, "coupled product could not be written");
                (None, ProductStatus::ParseFailed)
            }
        },
        Err(reason) => {
            tracing::debug!(pair = idx, reason = %reason, "coupling failed, falling back to plain combination");
            match combine(s, a).and_then(|m| write_smiles(&m)) {
                Ok(smiles) => (Some(smiles), ProductStatus::FallbackCombineMols),
                Err(e) => {
                    tracing::warn!(pair = idx, error = %e, "fallback combination failed");
                    (None, ProductStatus::ParseFailed)
                }
            }
        }
    }
}
