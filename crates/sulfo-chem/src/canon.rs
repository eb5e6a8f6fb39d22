//! Escritura canónica de SMILES.
//!
//! El escritor produce una forma única por molécula: primero asigna rangos
//! canónicos por refinamiento iterativo de invariantes (estilo Morgan) y
//! luego recorre el grafo en DFS ordenado por rango. Dos cadenas de entrada
//! distintas para la misma molécula convergen a la misma salida, lo que
//! permite usar la forma escrita como clave estable de deduplicación.

use crate::element;
use crate::error::ChemError;
use crate::molecule::{Bond, BondOrder, Molecule};
use crate::smiles::{inferred_implicit_hydrogens, parse_smiles};

/// Escribe la molécula en forma canónica.
pub fn write_smiles(mol: &Molecule) -> Result<String, ChemError> {
    if mol.is_empty() {
        return Err(ChemError::EmptyMolecule);
    }
    let ranks = canonical_ranks(mol);
    let closures = plan_ring_closures(mol, &ranks)?;
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut out = String::new();
    loop {
        let start = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| ranks[i]);
        match start {
            Some(s) => {
                if !out.is_empty() {
                    out.push('.');
                }
                emit(mol, s, None, &ranks, &mut visited, &closures, &mut out)?;
            }
            None => break,
        }
    }
    Ok(out)
}

/// Analiza y reescribe: la forma normalizada de una cadena SMILES.
pub fn normalize_smiles(input: &str) -> Result<String, ChemError> {
    write_smiles(&parse_smiles(input)?)
}

/// Rangos canónicos por refinamiento de invariantes. El invariante inicial
/// combina elemento, aromaticidad, grado, carga, hidrógenos totales e
/// isótopo; cada iteración incorpora los rangos vecinos (con el orden de
/// enlace) hasta que la partición deja de afinarse.
fn canonical_ranks(mol: &Molecule) -> Vec<u32> {
    let initial: Vec<_> = (0..mol.atom_count()).map(|i| {
                                                   let a = mol.atom(i);
                                                   (a.atomic_number,
                                                    a.is_aromatic,
                                                    mol.degree(i),
                                                    i16::from(a.formal_charge),
                                                    mol.total_hydrogens(i),
                                                    a.isotope.unwrap_or(0))
                                               })
                                               .collect();
    let mut ranks = ranks_from(&initial);
    for _ in 0..mol.atom_count() {
        let refined: Vec<_> = (0..mol.atom_count()).map(|i| {
                                                       let mut nbr: Vec<(u8, u32)> =
                                                           mol.incident(i)
                                                              .iter()
                                                              .map(|&(v, bi)| {
                                                                  (bond_weight(mol.bonds()[bi].order), ranks[v])
                                                              })
                                                              .collect();
                                                       nbr.sort_unstable();
                                                       (ranks[i], nbr)
                                                   })
                                                   .collect();
        let next = ranks_from(&refined);
        if distinct(&next) == distinct(&ranks) {
            break;
        }
        ranks = next;
    }
    ranks
}

fn bond_weight(order: BondOrder) -> u8 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Aromatic => 2,
        BondOrder::Double => 3,
        BondOrder::Triple => 4,
    }
}

/// Convierte claves ordenables en rangos densos 0..k.
fn ranks_from<T: Ord>(keys: &[T]) -> Vec<u32> {
    let mut idx: Vec<usize> = (0..keys.len()).collect();
    idx.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    let mut ranks = vec![0u32; keys.len()];
    let mut rank = 0u32;
    for w in 1..idx.len() {
        if keys[idx[w]] != keys[idx[w - 1]] {
            rank += 1;
        }
        ranks[idx[w]] = rank;
    }
    ranks
}

fn distinct(ranks: &[u32]) -> u32 {
    ranks.iter().max().map(|m| m + 1).unwrap_or(0)
}

/// Cierres de anillo por átomo: `(número, símbolo de enlace, es apertura)`,
/// ordenados por número.
type ClosurePlan = Vec<Vec<(u16, Option<char>, bool)>>;

/// Recorre el grafo en el mismo orden que la emisión y asigna un número a
/// cada arista de retroceso. La apertura queda en el átomo que se emite
/// primero; el símbolo de enlace solo se escribe en la apertura.
fn plan_ring_closures(mol: &Molecule, ranks: &[u32]) -> Result<ClosurePlan, ChemError> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut used = vec![false; mol.bonds().len()];
    let mut plan: ClosurePlan = vec![Vec::new(); n];
    let mut next: u16 = 1;
    loop {
        let start = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| ranks[i]);
        match start {
            Some(s) => plan_dfs(mol, s, None, ranks, &mut visited, &mut used, &mut next, &mut plan),
            None => break,
        }
    }
    if next > 100 {
        return Err(ChemError::Write(format!("too many ring closures ({})", next - 1)));
    }
    for list in &mut plan {
        list.sort_unstable_by_key(|e| e.0);
    }
    Ok(plan)
}

fn plan_dfs(mol: &Molecule,
            u: usize,
            parent: Option<usize>,
            ranks: &[u32],
            visited: &mut [bool],
            used: &mut [bool],
            next: &mut u16,
            plan: &mut ClosurePlan) {
    visited[u] = true;
    for (v, bi) in ordered_neighbors(mol, u, parent, ranks) {
        if visited[v] {
            if !used[bi] {
                used[bi] = true;
                let num = *next;
                *next += 1;
                let symbol = bond_token(mol, &mol.bonds()[bi]);
                plan[v].push((num, symbol, true));
                plan[u].push((num, symbol, false));
            }
        } else {
            plan_dfs(mol, v, Some(u), ranks, visited, used, next, plan);
        }
    }
}

fn emit(mol: &Molecule,
        u: usize,
        parent: Option<usize>,
        ranks: &[u32],
        visited: &mut [bool],
        closures: &ClosurePlan,
        out: &mut String) -> Result<(), ChemError> {
    visited[u] = true;
    out.push_str(&atom_token(mol, u)?);
    for &(num, symbol, opening) in &closures[u] {
        if opening {
            if let Some(c) = symbol {
                out.push(c);
            }
        }
        push_ring_number(num, out);
    }
    let neighbors = ordered_neighbors(mol, u, parent, ranks);
    for (i, &(v, bi)) in neighbors.iter().enumerate() {
        if visited[v] {
            // arista de anillo, ya planificada
            continue;
        }
        let has_more = neighbors[i + 1..].iter().any(|&(m, _)| !visited[m]);
        let symbol = bond_token(mol, &mol.bonds()[bi]);
        if has_more {
            out.push('(');
            if let Some(c) = symbol {
                out.push(c);
            }
            emit(mol, v, Some(u), ranks, visited, closures, out)?;
            out.push(')');
        } else {
            if let Some(c) = symbol {
                out.push(c);
            }
            emit(mol, v, Some(u), ranks, visited, closures, out)?;
        }
    }
    Ok(())
}

/// Vecinos de `u` sin el padre, ordenados por rango canónico.
fn ordered_neighbors(mol: &Molecule, u: usize, parent: Option<usize>, ranks: &[u32]) -> Vec<(usize, usize)> {
    let mut neighbors: Vec<(usize, usize)> = mol.incident(u)
                                                .iter()
                                                .copied()
                                                .filter(|&(v, _)| Some(v) != parent)
                                                .collect();
    neighbors.sort_by_key(|&(v, _)| ranks[v]);
    neighbors
}

/// Símbolo del enlace en la salida. Un enlace simple entre dos átomos
/// aromáticos debe escribirse `-` porque el implícito allí es aromático;
/// un enlace aromático fuera de un entorno aromático se escribe `:`.
fn bond_token(mol: &Molecule, bond: &Bond) -> Option<char> {
    let both_aromatic = mol.atom(bond.a).is_aromatic && mol.atom(bond.b).is_aromatic;
    match bond.order {
        BondOrder::Single => {
            if both_aromatic {
                Some('-')
            } else {
                None
            }
        }
        BondOrder::Double => Some('='),
        BondOrder::Triple => Some('#'),
        BondOrder::Aromatic => {
            if both_aromatic {
                None
            } else {
                Some(':')
            }
        }
    }
}

fn push_ring_number(num: u16, out: &mut String) {
    if num < 10 {
        out.push((b'0' + num as u8) as char);
    } else {
        out.push('%');
        out.push_str(&num.to_string());
    }
}

/// Token de un átomo. Se escribe sin corchetes solo si pertenece al
/// subconjunto orgánico, no tiene carga ni isótopo y su conteo de
/// hidrógenos coincide con el que inferiría el analizador.
fn atom_token(mol: &Molecule, idx: usize) -> Result<String, ChemError> {
    let atom = mol.atom(idx);
    let info = element::by_number(atom.atomic_number)
        .ok_or_else(|| ChemError::Write(format!("unknown atomic number {}", atom.atomic_number)))?;
    if atom.is_aromatic && !element::has_aromatic_form(atom.atomic_number) {
        return Err(ChemError::Write(format!("element {} has no aromatic form", info.symbol)));
    }
    let inferred =
        inferred_implicit_hydrogens(atom.atomic_number, atom.is_aromatic, mol.degree(idx), mol.bond_order_sum(idx));
    let bare = atom.formal_charge == 0
               && atom.isotope.is_none()
               && element::in_organic_subset(atom.atomic_number)
               && atom.implicit_hydrogens == inferred;
    let symbol = if atom.is_aromatic { info.symbol.to_ascii_lowercase() } else { info.symbol.to_string() };
    if bare {
        return Ok(symbol);
    }
    let mut token = String::from("[");
    if let Some(iso) = atom.isotope {
        token.push_str(&iso.to_string());
    }
    token.push_str(&symbol);
    if atom.implicit_hydrogens > 0 {
        token.push('H');
        if atom.implicit_hydrogens > 1 {
            token.push_str(&atom.implicit_hydrogens.to_string());
        }
    }
    if atom.formal_charge > 0 {
        token.push('+');
        if atom.formal_charge > 1 {
            token.push_str(&atom.formal_charge.to_string());
        }
    } else if atom.formal_charge < 0 {
        token.push('-');
        if atom.formal_charge < -1 {
            token.push_str(&atom.formal_charge.unsigned_abs().to_string());
        }
    }
    token.push(']');
    Ok(token)
}
