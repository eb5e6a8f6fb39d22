//! Descriptores fisicoquímicos calculados sobre el grafo.
//!
//! El conjunto cubre lo que la tabla de productos publica: peso molecular,
//! logP por contribuciones atómicas (Wildman–Crippen simplificado), TPSA por
//! fragmentos de Ertl (solo clases de N y O), donantes y aceptores de enlace
//! de hidrógeno, enlaces rotables, anillos y fracción de carbonos sp3.

use serde::{Deserialize, Serialize};

use crate::element;
use crate::molecule::{BondOrder, Molecule};

/// Valores con los que se anota cada producto enumerado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    pub mol_wt: f64,
    pub log_p: f64,
    pub tpsa: f64,
    pub hbd: u32,
    pub hba: u32,
    pub rot_bonds: u32,
    pub ring_count: u32,
    pub frac_csp3: f64,
}

/// Calcula el conjunto completo.
pub fn compute_descriptors(mol: &Molecule) -> DescriptorSet {
    DescriptorSet { mol_wt: mol_wt(mol),
                    log_p: crippen_logp(mol),
                    tpsa: tpsa(mol),
                    hbd: hb_donors(mol),
                    hba: hb_acceptors(mol),
                    rot_bonds: rotatable_bonds(mol),
                    ring_count: mol.ring_count() as u32,
                    frac_csp3: fraction_csp3(mol) }
}

/// Peso molecular: pesos atómicos estándar más los hidrógenos implícitos.
pub fn mol_wt(mol: &Molecule) -> f64 {
    let heavy: f64 = mol.atoms().iter().map(|a| element::atomic_weight(a.atomic_number)).sum();
    let implicit_h: u32 = mol.atoms().iter().map(|a| u32::from(a.implicit_hydrogens)).sum();
    heavy + f64::from(implicit_h) * 1.008
}

/// LogP por contribuciones atómicas, clasificación compacta al estilo
/// Wildman–Crippen. Los hidrógenos aportan según el átomo al que cuelgan.
pub fn crippen_logp(mol: &Molecule) -> f64 {
    let in_ring = ring_atom_flags(mol);
    let mut logp = 0.0;
    for i in 0..mol.atom_count() {
        logp += crippen_atom(mol, i, in_ring[i]);
        let atom = mol.atom(i);
        if atom.atomic_number == 1 {
            continue;
        }
        let h = f64::from(atom.implicit_hydrogens);
        logp += if atom.atomic_number == 6 { h * 0.1230 } else { h * -0.2677 };
    }
    logp
}

fn crippen_atom(mol: &Molecule, idx: usize, in_ring: bool) -> f64 {
    let atom = mol.atom(idx);
    let has_double = mol.incident(idx).iter().any(|&(_, bi)| mol.bonds()[bi].order == BondOrder::Double);
    let hetero_neighbor = mol.neighbors(idx).any(|n| {
                                              let z = mol.atom(n).atomic_number;
                                              z != 6 && z != 1
                                          });
    match atom.atomic_number {
        1 => {
            // H explícito: aporta según su vecino pesado
            match mol.neighbors(idx).next().map(|n| mol.atom(n).atomic_number) {
                Some(6) => 0.1230,
                Some(_) => -0.2677,
                None => 0.0,
            }
        }
        6 => {
            if atom.is_aromatic {
                if hetero_neighbor {
                    -0.14
                } else {
                    0.296
                }
            } else if has_double {
                if hetero_neighbor {
                    -0.03
                } else {
                    0.08
                }
            } else if in_ring {
                0.1441
            } else {
                match mol.degree(idx) {
                    0..=2 => 0.1441,
                    3 => 0.0,
                    _ => -0.04,
                }
            }
        }
        7 => {
            if atom.is_aromatic {
                -0.3187
            } else if atom.formal_charge > 0 {
                -1.0190
            } else if has_double {
                -0.5262
            } else {
                -0.4458
            }
        }
        8 => {
            if atom.formal_charge < 0 {
                -1.189
            } else if has_double {
                -0.3339
            } else if mol.degree(idx) >= 2 {
                -0.2893
            } else {
                -0.3567
            }
        }
        9 => 0.4118,
        15 => 0.2836,
        16 => {
            if has_double {
                -0.1084
            } else if atom.formal_charge != 0 {
                -0.5188
            } else {
                0.6237
            }
        }
        17 => 0.6895,
        35 => 0.8813,
        53 => 1.050,
        _ => 0.0,
    }
}

/// TPSA de Ertl restringida a las clases de nitrógeno y oxígeno; azufre y
/// fósforo no aportan. El nitro con cargas separadas recibe el tratamiento
/// del grupo neutro equivalente.
pub fn tpsa(mol: &Molecule) -> f64 {
    (0..mol.atom_count()).map(|i| tpsa_contribution(mol, i)).sum()
}

fn tpsa_contribution(mol: &Molecule, idx: usize) -> f64 {
    let atom = mol.atom(idx);
    let h = mol.total_hydrogens(idx);
    let degree = mol.degree(idx);
    let has_double = mol.incident(idx).iter().any(|&(_, bi)| mol.bonds()[bi].order == BondOrder::Double);
    let has_triple = mol.incident(idx).iter().any(|&(_, bi)| mol.bonds()[bi].order == BondOrder::Triple);
    match atom.atomic_number {
        7 => {
            if atom.formal_charge > 0 {
                if is_nitro_nitrogen(mol, idx) {
                    return 11.68;
                }
                return match h {
                    0 => 0.0,
                    1 => 4.44,
                    2 => 16.61,
                    _ => 27.64,
                };
            }
            if atom.formal_charge < 0 {
                return 0.0;
            }
            if atom.is_aromatic {
                return if h >= 1 {
                    15.79
                } else if degree >= 3 {
                    4.93
                } else {
                    12.89
                };
            }
            if has_triple {
                return 23.79;
            }
            if has_double {
                return if h >= 1 { 23.85 } else { 12.36 };
            }
            match h {
                0 => 3.24,
                1 => 12.03,
                _ => 26.02,
            }
        }
        8 => {
            if atom.formal_charge < 0 {
                if is_nitro_oxygen(mol, idx) {
                    return 17.07;
                }
                return 23.06;
            }
            if atom.is_aromatic {
                return 13.14;
            }
            if has_double {
                return 17.07;
            }
            if h >= 1 {
                return 20.23;
            }
            9.23
        }
        _ => 0.0,
    }
}

/// N+ de un grupo nitro con cargas separadas: un oxígeno por doble enlace y
/// un oxígeno aniónico por enlace simple.
fn is_nitro_nitrogen(mol: &Molecule, n: usize) -> bool {
    let mut double_o = false;
    let mut anionic_o = false;
    for &(v, bi) in mol.incident(n) {
        let a = mol.atom(v);
        if a.atomic_number != 8 {
            continue;
        }
        match mol.bonds()[bi].order {
            BondOrder::Double => double_o = true,
            BondOrder::Single if a.formal_charge < 0 => anionic_o = true,
            _ => {}
        }
    }
    double_o && anionic_o
}

fn is_nitro_oxygen(mol: &Molecule, o: usize) -> bool {
    mol.neighbors(o).any(|v| {
                        let a = mol.atom(v);
                        a.atomic_number == 7 && a.formal_charge > 0 && is_nitro_nitrogen(mol, v)
                    })
}

/// Donantes: átomos de N u O con al menos un hidrógeno; cada átomo cuenta
/// una vez sin importar cuántos hidrógenos lleve.
pub fn hb_donors(mol: &Molecule) -> u32 {
    (0..mol.atom_count()).filter(|&i| {
                             matches!(mol.atom(i).atomic_number, 7 | 8) && mol.total_hydrogens(i) >= 1
                         })
                         .count() as u32
}

/// Aceptores: conteo simple de átomos de N u O.
pub fn hb_acceptors(mol: &Molecule) -> u32 {
    mol.atoms().iter().filter(|a| matches!(a.atomic_number, 7 | 8)).count() as u32
}

/// Enlaces rotables: simples, fuera de anillo, con grado pesado >= 2 en
/// ambos extremos, excluyendo amidas C–N y extremos con triple enlace.
pub fn rotatable_bonds(mol: &Molecule) -> u32 {
    let ring_flags = mol.ring_bond_flags();
    mol.bonds()
       .iter()
       .enumerate()
       .filter(|(bi, bond)| {
           bond.order == BondOrder::Single
           && !ring_flags[*bi]
           && mol.heavy_degree(bond.a) >= 2
           && mol.heavy_degree(bond.b) >= 2
           && !touches_triple(mol, bond.a)
           && !touches_triple(mol, bond.b)
           && !is_amide_bond(mol, bond.a, bond.b)
       })
       .count() as u32
}

fn touches_triple(mol: &Molecule, idx: usize) -> bool {
    mol.incident(idx).iter().any(|&(_, bi)| mol.bonds()[bi].order == BondOrder::Triple)
}

fn is_amide_bond(mol: &Molecule, a: usize, b: usize) -> bool {
    let pair = [(a, b), (b, a)];
    pair.iter().any(|&(c, n)| {
                   mol.atom(c).atomic_number == 6
                   && mol.atom(n).atomic_number == 7
                   && mol.incident(c).iter().any(|&(o, bi)| {
                                                mol.atom(o).atomic_number == 8
                                                && mol.bonds()[bi].order == BondOrder::Double
                                            })
               })
}

/// Fracción de carbonos sp3: sin aromaticidad ni enlaces múltiples.
pub fn fraction_csp3(mol: &Molecule) -> f64 {
    let carbons: Vec<usize> =
        (0..mol.atom_count()).filter(|&i| mol.atom(i).atomic_number == 6).collect();
    if carbons.is_empty() {
        return 0.0;
    }
    let sp3 = carbons.iter()
                     .filter(|&&i| {
                         !mol.atom(i).is_aromatic
                         && !mol.incident(i).iter().any(|&(_, bi)| {
                                                       matches!(mol.bonds()[bi].order,
                                                                BondOrder::Double
                                                                | BondOrder::Triple
                                                                | BondOrder::Aromatic)
                                                   })
                     })
                     .count();
    sp3 as f64 / carbons.len() as f64
}

fn ring_atom_flags(mol: &Molecule) -> Vec<bool> {
    let bond_flags = mol.ring_bond_flags();
    let mut atoms = vec![false; mol.atom_count()];
    for (bi, bond) in mol.bonds().iter().enumerate() {
        if bond_flags[bi] {
            atoms[bond.a] = true;
            atoms[bond.b] = true;
        }
    }
    atoms
}
