//! Acoplamiento sulfonamida sobre el grafo molecular.
//!
//! Implementa una única transformación bimolecular: el azufre de un grupo
//! `S(=O)(=O)Cl` pierde el cloro y se enlaza al nitrógeno de una amina
//! primaria o secundaria, que pierde un hidrógeno. La detección de sitios es
//! estricta: cero candidatos o más de uno en cualquiera de los dos lados se
//! reporta como fallo clasificado, nunca se elige un sitio al azar.

use thiserror::Error;

use crate::error::ChemError;
use crate::molecule::{Bond, BondOrder, Molecule};

/// Fallos clasificados del acoplamiento. `Sanitize` cubre el chequeo de
/// valencias sobre el producto ya editado.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("no sulfonyl chloride site in first reagent")]
    NoSulfonylSite,
    #[error("ambiguous sulfonyl chloride site ({count} candidates)")]
    AmbiguousSulfonylSite { count: usize },
    #[error("no N-H amine site in second reagent")]
    NoAmineSite,
    #[error("ambiguous amine site ({count} candidates)")]
    AmbiguousAmineSite { count: usize },
    #[error("product failed sanitization: {0}")]
    Sanitize(#[from] ChemError),
}

/// Sitio sulfonilo: el azufre y el cloro que se elimina.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SulfonylSite {
    pub sulfur: usize,
    pub chloride: usize,
}

/// Busca grupos `S(=O)(=O)Cl`: azufre alifático neutro con exactamente dos
/// oxígenos por doble enlace; cada cloro unido por enlace simple cuenta como
/// un candidato propio (el cloruro de sulfurilo da dos).
pub fn find_sulfonyl_sites(mol: &Molecule) -> Vec<SulfonylSite> {
    let mut sites = Vec::new();
    for s in 0..mol.atom_count() {
        let atom = mol.atom(s);
        if atom.atomic_number != 16 || atom.is_aromatic || atom.formal_charge != 0 {
            continue;
        }
        let mut double_oxygens = 0;
        let mut chlorides = Vec::new();
        for &(v, bi) in mol.incident(s) {
            match (mol.atom(v).atomic_number, mol.bonds()[bi].order) {
                (8, BondOrder::Double) => double_oxygens += 1,
                (17, BondOrder::Single) => chlorides.push(v),
                _ => {}
            }
        }
        if double_oxygens == 2 {
            sites.extend(chlorides.into_iter().map(|chloride| SulfonylSite { sulfur: s, chloride }));
        }
    }
    sites
}

/// Busca nitrógenos de amina primaria o secundaria: alifáticos, neutros,
/// con uno o dos hidrógenos totales y que no sean amídicos.
pub fn find_amine_sites(mol: &Molecule) -> Vec<usize> {
    (0..mol.atom_count()).filter(|&i| {
                             let a = mol.atom(i);
                             a.atomic_number == 7
                             && !a.is_aromatic
                             && a.formal_charge == 0
                             && (1..=2).contains(&mol.total_hydrogens(i))
                             && !is_amide_like(mol, i)
                         })
                         .collect()
}

/// Un nitrógeno unido por enlace simple a un carbono carbonílico no cuenta
/// como amina.
fn is_amide_like(mol: &Molecule, n: usize) -> bool {
    mol.incident(n).iter().any(|&(c, bi)| {
                              mol.bonds()[bi].order == BondOrder::Single
                              && mol.atom(c).atomic_number == 6
                              && mol.incident(c).iter().any(|&(o, cbi)| {
                                                           mol.atom(o).atomic_number == 8
                                                           && mol.bonds()[cbi].order == BondOrder::Double
                                                       })
                          })
}

/// Aplica el acoplamiento sulfonamida. Exige exactamente un sitio por lado,
/// elimina el cloro, forma el enlace S–N simple, descuenta un hidrógeno del
/// nitrógeno y verifica las valencias del producto.
pub fn sulfonamide_couple(sulfonyl: &Molecule, amine: &Molecule) -> Result<Molecule, TransformError> {
    let s_sites = find_sulfonyl_sites(sulfonyl);
    let site = match s_sites.len() {
        0 => return Err(TransformError::NoSulfonylSite),
        1 => s_sites[0],
        count => return Err(TransformError::AmbiguousSulfonylSite { count }),
    };
    let n_sites = find_amine_sites(amine);
    let amine_n = match n_sites.len() {
        0 => return Err(TransformError::NoAmineSite),
        1 => n_sites[0],
        count => return Err(TransformError::AmbiguousAmineSite { count }),
    };

    let merged = Molecule::merge(sulfonyl, amine);
    let sulfur = site.sulfur;
    let nitrogen = amine_n + sulfonyl.atom_count();

    // el H perdido sale del conteo implícito; si el N solo tiene hidrógenos
    // explícitos, se elimina el de menor índice
    let mut removed = vec![site.chloride];
    let drop_implicit_h = merged.atom(nitrogen).implicit_hydrogens > 0;
    if !drop_implicit_h {
        match merged.neighbors(nitrogen).find(|&v| merged.atom(v).atomic_number == 1) {
            Some(h) => removed.push(h),
            None => return Err(TransformError::NoAmineSite),
        }
    }

    let product = rebuild_with_bond(&merged, &removed, sulfur, nitrogen, drop_implicit_h)?;
    product.check_valences().map_err(TransformError::Sanitize)?;
    Ok(product)
}

/// Combinación de respaldo: los dos reactivos como fragmentos desconectados
/// de una sola estructura. No forma enlaces ni valida química; solo rechaza
/// entradas vacías.
pub fn combine(a: &Molecule, b: &Molecule) -> Result<Molecule, ChemError> {
    if a.is_empty() || b.is_empty() {
        return Err(ChemError::EmptyMolecule);
    }
    Ok(Molecule::merge(a, b))
}

/// Reconstruye el grafo sin los átomos de `removed`, agregando el enlace
/// S–N y descontando un hidrógeno implícito del nitrógeno si corresponde.
fn rebuild_with_bond(merged: &Molecule,
                     removed: &[usize],
                     sulfur: usize,
                     nitrogen: usize,
                     drop_implicit_h: bool)
                     -> Result<Molecule, TransformError> {
    let mut map = vec![usize::MAX; merged.atom_count()];
    let mut atoms = Vec::with_capacity(merged.atom_count() - removed.len());
    for (i, atom) in merged.atoms().iter().enumerate() {
        if removed.contains(&i) {
            continue;
        }
        map[i] = atoms.len();
        let mut a = atom.clone();
        if i == nitrogen && drop_implicit_h {
            a.implicit_hydrogens -= 1;
        }
        atoms.push(a);
    }
    let mut bonds = Vec::with_capacity(merged.bonds().len());
    for bond in merged.bonds() {
        if map[bond.a] == usize::MAX || map[bond.b] == usize::MAX {
            continue;
        }
        bonds.push(Bond { a: map[bond.a], b: map[bond.b], order: bond.order });
    }
    bonds.push(Bond { a: map[sulfur], b: map[nitrogen], order: BondOrder::Single });
    Molecule::from_graph(atoms, bonds).map_err(TransformError::Sanitize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::write_smiles;
    use crate::smiles::parse_smiles;

    #[test]
    fn couples_methanesulfonyl_chloride_with_methylamine() {
        let sulfonyl = parse_smiles("CS(=O)(=O)Cl").unwrap();
        let amine = parse_smiles("CN").unwrap();
        let product = sulfonamide_couple(&sulfonyl, &amine).unwrap();
        assert_eq!(product.atom_count(), 6);
        assert!(product.atoms().iter().all(|a| a.atomic_number != 17));
        let n = product.atoms().iter().position(|a| a.atomic_number == 7).unwrap();
        let s = product.atoms().iter().position(|a| a.atomic_number == 16).unwrap();
        assert_eq!(product.total_hydrogens(n), 1);
        assert_eq!(product.bond_between(s, n).map(|b| b.order), Some(BondOrder::Single));
    }

    #[test]
    fn secondary_amine_ends_without_hydrogens() {
        let sulfonyl = parse_smiles("c1ccc(cc1)S(=O)(=O)Cl").unwrap();
        let piperidine = parse_smiles("C1CCNCC1").unwrap();
        let product = sulfonamide_couple(&sulfonyl, &piperidine).unwrap();
        let n = product.atoms().iter().position(|a| a.atomic_number == 7).unwrap();
        assert_eq!(product.total_hydrogens(n), 0);
        assert_eq!(product.ring_count(), 2);
    }

    #[test]
    fn missing_sites_are_classified() {
        let sulfonyl = parse_smiles("CS(=O)(=O)Cl").unwrap();
        let ethanol = parse_smiles("CCO").unwrap();
        assert_eq!(sulfonamide_couple(&ethanol, &ethanol), Err(TransformError::NoSulfonylSite));
        assert_eq!(sulfonamide_couple(&sulfonyl, &ethanol), Err(TransformError::NoAmineSite));
        let tertiary = parse_smiles("CN(C)C").unwrap();
        assert_eq!(sulfonamide_couple(&sulfonyl, &tertiary), Err(TransformError::NoAmineSite));
    }

    #[test]
    fn ambiguous_sites_are_rejected() {
        let sulfuryl = parse_smiles("O=S(=O)(Cl)Cl").unwrap();
        let amine = parse_smiles("CN").unwrap();
        assert_eq!(sulfonamide_couple(&sulfuryl, &amine),
                   Err(TransformError::AmbiguousSulfonylSite { count: 2 }));
        let sulfonyl = parse_smiles("CS(=O)(=O)Cl").unwrap();
        let diamine = parse_smiles("NCCN").unwrap();
        assert_eq!(sulfonamide_couple(&sulfonyl, &diamine),
                   Err(TransformError::AmbiguousAmineSite { count: 2 }));
    }

    #[test]
    fn amide_and_aromatic_nitrogens_do_not_qualify() {
        let sulfonyl = parse_smiles("CS(=O)(=O)Cl").unwrap();
        let acetamide = parse_smiles("CC(=O)N").unwrap();
        assert_eq!(sulfonamide_couple(&sulfonyl, &acetamide), Err(TransformError::NoAmineSite));
        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        assert_eq!(sulfonamide_couple(&sulfonyl, &pyrrole), Err(TransformError::NoAmineSite));
    }

    #[test]
    fn aniline_is_a_valid_amine() {
        let sulfonyl = parse_smiles("CS(=O)(=O)Cl").unwrap();
        let aniline = parse_smiles("Nc1ccccc1").unwrap();
        let product = sulfonamide_couple(&sulfonyl, &aniline).unwrap();
        let n = product.atoms().iter().position(|a| a.atomic_number == 7).unwrap();
        assert_eq!(product.total_hydrogens(n), 1);
    }

    #[test]
    fn coupling_is_deterministic() {
        let sulfonyl = parse_smiles("c1ccc(cc1)S(=O)(=O)Cl").unwrap();
        let amine = parse_smiles("NCCO").unwrap();
        let a = write_smiles(&sulfonamide_couple(&sulfonyl, &amine).unwrap()).unwrap();
        let b = write_smiles(&sulfonamide_couple(&sulfonyl, &amine).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn combine_keeps_fragments_apart() {
        let a = parse_smiles("CS(=O)(=O)Cl").unwrap();
        let b = parse_smiles("CN").unwrap();
        let merged = combine(&a, &b).unwrap();
        assert_eq!(merged.fragments().len(), 2);
        assert_eq!(merged.atom_count(), a.atom_count() + b.atom_count());
        let empty = Molecule::from_graph(vec![], vec![]).unwrap();
        assert!(combine(&empty, &b).is_err());
    }
}
