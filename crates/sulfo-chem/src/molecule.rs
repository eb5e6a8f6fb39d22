//! Grafo molecular inmutable.
//!
//! Representación mínima pero suficiente para el dominio: átomos con carga,
//! aromaticidad e hidrógenos implícitos; enlaces con orden; adyacencia
//! precalculada y ordenada por índice para recorridos deterministas.

use crate::element;
use crate::error::ChemError;

/// Orden de enlace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contribución del enlace a la valencia (aromático cuenta 1.5).
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

/// Átomo del grafo. `implicit_hydrogens` queda fijado al construir la
/// molécula (por el parser o por una edición de reacción).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
}

impl Atom {
    /// Átomo neutro sin isótopo ni hidrógenos asignados.
    pub fn new(atomic_number: u8) -> Self {
        Self { atomic_number,
               formal_charge: 0,
               isotope: None,
               is_aromatic: false,
               implicit_hydrogens: 0 }
    }
}

/// Enlace no dirigido entre dos índices de átomo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

/// Molécula inmutable: átomos, enlaces y adyacencia `(vecino, enlace)`
/// ordenada por índice de vecino.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Construye una molécula validando el grafo: índices dentro de rango,
    /// sin lazos (a == b) y sin enlaces duplicados.
    pub fn from_graph(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, ChemError> {
        let n = atoms.len();
        let mut seen: Vec<(usize, usize)> = Vec::with_capacity(bonds.len());
        for bond in &bonds {
            if bond.a >= n || bond.b >= n {
                return Err(ChemError::Graph(format!("bond {}-{} out of range ({} atoms)", bond.a, bond.b, n)));
            }
            if bond.a == bond.b {
                return Err(ChemError::Graph(format!("self bond on atom {}", bond.a)));
            }
            let key = (bond.a.min(bond.b), bond.a.max(bond.b));
            if seen.contains(&key) {
                return Err(ChemError::Graph(format!("duplicate bond {}-{}", key.0, key.1)));
            }
            seen.push(key);
        }
        let adjacency = build_adjacency(n, &bonds);
        Ok(Self { atoms, bonds, adjacency })
    }

    /// Unión disjunta de dos moléculas (fragmentos desconectados). Los índices
    /// de `b` quedan desplazados por `a.atom_count()`.
    pub fn merge(a: &Molecule, b: &Molecule) -> Molecule {
        let offset = a.atoms.len();
        let mut atoms = a.atoms.clone();
        atoms.extend(b.atoms.iter().cloned());
        let mut bonds = a.bonds.clone();
        bonds.extend(b.bonds.iter().map(|bd| Bond { a: bd.a + offset,
                                                    b: bd.b + offset,
                                                    order: bd.order }));
        let adjacency = build_adjacency(atoms.len(), &bonds);
        Molecule { atoms, bonds, adjacency }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    /// Vecinos de un átomo como pares `(índice de átomo, índice de enlace)`,
    /// en orden ascendente de átomo.
    pub fn incident(&self, idx: usize) -> &[(usize, usize)] {
        &self.adjacency[idx]
    }

    /// Índices de los átomos vecinos en orden ascendente.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[idx].iter().map(|(n, _)| *n)
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency[idx].len()
    }

    /// Grado contando solo vecinos pesados (no hidrógeno explícito).
    pub fn heavy_degree(&self, idx: usize) -> usize {
        self.neighbors(idx).filter(|&n| self.atoms[n].atomic_number != 1).count()
    }

    pub fn bond_between(&self, i: usize, j: usize) -> Option<&Bond> {
        self.adjacency[i].iter().find(|(n, _)| *n == j).map(|(_, b)| &self.bonds[*b])
    }

    /// Suma de órdenes de enlace del átomo (aromático cuenta 1.5).
    pub fn bond_order_sum(&self, idx: usize) -> f64 {
        self.adjacency[idx].iter().map(|(_, b)| self.bonds[*b].order.as_f64()).sum()
    }

    /// Hidrógenos totales: implícitos más vecinos H explícitos.
    pub fn total_hydrogens(&self, idx: usize) -> u32 {
        let explicit = self.neighbors(idx).filter(|&n| self.atoms[n].atomic_number == 1).count() as u32;
        self.atoms[idx].implicit_hydrogens as u32 + explicit
    }

    /// Componentes conexas, cada una con sus índices en orden ascendente. El
    /// orden de las componentes sigue al menor índice de cada una.
    pub fn fragments(&self) -> Vec<Vec<usize>> {
        let n = self.atoms.len();
        let mut seen = vec![false; n];
        let mut out = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            let mut comp = Vec::new();
            let mut queue = vec![start];
            seen[start] = true;
            while let Some(u) = queue.pop() {
                comp.push(u);
                for v in self.neighbors(u) {
                    if !seen[v] {
                        seen[v] = true;
                        queue.push(v);
                    }
                }
            }
            comp.sort_unstable();
            out.push(comp);
        }
        out
    }

    /// Marca por enlace si pertenece a algún ciclo (un enlace está en un ciclo
    /// si y solo si no es un puente del grafo).
    pub fn ring_bond_flags(&self) -> Vec<bool> {
        let n = self.atoms.len();
        let mut disc = vec![usize::MAX; n];
        let mut low = vec![usize::MAX; n];
        let mut is_bridge = vec![false; self.bonds.len()];
        let mut timer = 0usize;
        for start in 0..n {
            if disc[start] == usize::MAX {
                self.bridge_dfs(start, None, &mut disc, &mut low, &mut is_bridge, &mut timer);
            }
        }
        is_bridge.iter().map(|b| !b).collect()
    }

    fn bridge_dfs(&self,
                  u: usize,
                  parent_bond: Option<usize>,
                  disc: &mut [usize],
                  low: &mut [usize],
                  is_bridge: &mut [bool],
                  timer: &mut usize) {
        disc[u] = *timer;
        low[u] = *timer;
        *timer += 1;
        for &(v, bond_idx) in &self.adjacency[u] {
            if Some(bond_idx) == parent_bond {
                continue;
            }
            if disc[v] != usize::MAX {
                low[u] = low[u].min(disc[v]);
            } else {
                self.bridge_dfs(v, Some(bond_idx), disc, low, is_bridge, timer);
                low[u] = low[u].min(low[v]);
                if low[v] > disc[u] {
                    is_bridge[bond_idx] = true;
                }
            }
        }
    }

    /// Número ciclomático: enlaces − átomos + componentes.
    pub fn ring_count(&self) -> usize {
        let components = self.fragments().len();
        (self.bonds.len() + components).saturating_sub(self.atoms.len())
    }

    /// Verifica que ningún átomo exceda su valencia máxima permitida
    /// (considerando carga formal). Devuelve el primer átomo en conflicto.
    /// Los enlaces aromáticos cuentan 1: el esqueleto sigma es lo que limita
    /// (un [nH] de pirrol usa 3, no 4).
    pub fn check_valences(&self) -> Result<(), ChemError> {
        for (idx, atom) in self.atoms.iter().enumerate() {
            let sigma: f64 = self.adjacency[idx]
                                 .iter()
                                 .map(|(_, b)| match self.bonds[*b].order {
                                     BondOrder::Aromatic => 1.0,
                                     other => other.as_f64(),
                                 })
                                 .sum();
            let used = sigma.round() as u32 + atom.implicit_hydrogens as u32;
            if let Some(max) = element::max_allowed_valence(atom.atomic_number, atom.formal_charge) {
                if used > max as u32 {
                    let symbol = element::by_number(atom.atomic_number).map(|e| e.symbol).unwrap_or("?");
                    return Err(ChemError::Graph(format!("valence {} exceeds {} for {} at atom {}",
                                                        used, max, symbol, idx)));
                }
            }
        }
        Ok(())
    }
}

fn build_adjacency(n: usize, bonds: &[Bond]) -> Vec<Vec<(usize, usize)>> {
    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (idx, bond) in bonds.iter().enumerate() {
        adjacency[bond.a].push((bond.b, idx));
        adjacency[bond.b].push((bond.a, idx));
    }
    for list in &mut adjacency {
        list.sort_unstable();
    }
    adjacency
}
