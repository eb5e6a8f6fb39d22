//! Analizador de SMILES.
//!
//! Acepta el subconjunto orgánico (B, C, N, O, P, S, F, Cl, Br, I y sus
//! formas aromáticas minúsculas), átomos entre corchetes con isótopo, carga
//! y conteo de hidrógenos, ramas, cierres de anillo (incluido `%nn`) y
//! fragmentos separados por punto. La quiralidad (`@`), los marcadores de
//! estéreo (`/`, `\`) y los mapas de átomo (`:n`) se consumen y descartan.
//!
//! Tras el análisis se calculan los hidrógenos implícitos de los átomos sin
//! corchete y se verifica la valencia de todo el grafo; una molécula que no
//! sanea se rechaza como error de análisis.

use std::collections::HashMap;

use crate::element;
use crate::error::ChemError;
use crate::molecule::{Atom, Bond, BondOrder, Molecule};

/// Analiza una cadena SMILES y construye la molécula saneada.
pub fn parse_smiles(input: &str) -> Result<Molecule, ChemError> {
    Parser::new(input.trim()).run()
}

/// Hidrógenos implícitos que el analizador infiere para un átomo sin
/// corchete dado su entorno. El escritor usa la misma regla para decidir
/// cuándo un átomo necesita corchetes: si el conteo real difiere del
/// inferido, se escribe explícito.
pub(crate) fn inferred_implicit_hydrogens(atomic_number: u8,
                                          aromatic: bool,
                                          degree: usize,
                                          order_sum: f64)
                                          -> u8 {
    if aromatic {
        // En un átomo aromático cada enlace del esqueleto cuenta 1 y un
        // electrón queda reservado para el sistema pi.
        let used = degree.min(u8::MAX as usize) as u8;
        match element::smallest_valence_covering(atomic_number, used) {
            Some(target) => target.saturating_sub(1).saturating_sub(used),
            None => 0,
        }
    } else {
        let used = order_sum.round() as u8;
        match element::smallest_valence_covering(atomic_number, used) {
            Some(target) => target.saturating_sub(used),
            None => 0,
        }
    }
}

fn default_order(a: &Atom, b: &Atom) -> BondOrder {
    if a.is_aromatic && b.is_aromatic {
        BondOrder::Aromatic
    } else {
        BondOrder::Single
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Átomos de corchete: su conteo de H es explícito y no se recalcula.
    h_fixed: Vec<bool>,
    prev: Option<usize>,
    pending: Option<BondOrder>,
    branch_stack: Vec<usize>,
    ring_map: HashMap<u16, (usize, Option<BondOrder>)>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { bytes: input.as_bytes(),
               pos: 0,
               atoms: Vec::new(),
               bonds: Vec::new(),
               h_fixed: Vec::new(),
               prev: None,
               pending: None,
               branch_stack: Vec::new(),
               ring_map: HashMap::new() }
    }

    fn run(mut self) -> Result<Molecule, ChemError> {
        while let Some(&c) = self.bytes.get(self.pos) {
            match c {
                b'(' => {
                    let cur = self.prev.ok_or_else(|| self.err("branch before any atom"))?;
                    if self.pending.is_some() {
                        return Err(self.err("bond symbol before '('"));
                    }
                    self.branch_stack.push(cur);
                    self.pos += 1;
                }
                b')' => {
                    if self.pending.is_some() {
                        return Err(self.err("bond symbol before ')'"));
                    }
                    let back = self.branch_stack.pop().ok_or_else(|| self.err("unmatched ')'"))?;
                    self.prev = Some(back);
                    self.pos += 1;
                }
                b'-' | b'/' | b'\\' => self.set_pending(BondOrder::Single)?,
                b'=' => self.set_pending(BondOrder::Double)?,
                b'#' => self.set_pending(BondOrder::Triple)?,
                b':' => self.set_pending(BondOrder::Aromatic)?,
                b'.' => {
                    if self.pending.is_some() {
                        return Err(self.err("bond symbol before '.'"));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'%' => {
                    let d1 = self.bytes.get(self.pos + 1).copied().filter(u8::is_ascii_digit);
                    let d2 = self.bytes.get(self.pos + 2).copied().filter(u8::is_ascii_digit);
                    match (d1, d2) {
                        (Some(x), Some(y)) => {
                            self.pos += 3;
                            let n = u16::from(x - b'0') * 10 + u16::from(y - b'0');
                            self.ring_closure(n)?;
                        }
                        _ => return Err(self.err("'%' requires two digits")),
                    }
                }
                b'0'..=b'9' => {
                    self.pos += 1;
                    self.ring_closure(u16::from(c - b'0'))?;
                }
                b'[' => self.bracket_atom()?,
                _ => self.organic_atom()?,
            }
        }
        if self.pending.is_some() {
            return Err(ChemError::Parse("dangling bond symbol at end of input".into()));
        }
        if !self.branch_stack.is_empty() {
            return Err(ChemError::Parse("unmatched '('".into()));
        }
        if let Some(n) = self.ring_map.keys().min() {
            return Err(ChemError::Parse(format!("unclosed ring bond {n}")));
        }
        if self.atoms.is_empty() {
            return Err(ChemError::EmptyMolecule);
        }
        self.assign_implicit_hydrogens();
        let mol = Molecule::from_graph(self.atoms, self.bonds)
            .map_err(|e| ChemError::Parse(e.to_string()))?;
        mol.check_valences().map_err(|e| ChemError::Parse(e.to_string()))?;
        Ok(mol)
    }

    fn err(&self, msg: &str) -> ChemError {
        ChemError::Parse(format!("{} (position {})", msg, self.pos))
    }

    fn set_pending(&mut self, order: BondOrder) -> Result<(), ChemError> {
        if self.pending.is_some() {
            return Err(self.err("consecutive bond symbols"));
        }
        self.pending = Some(order);
        self.pos += 1;
        Ok(())
    }

    fn push_atom(&mut self, atom: Atom, fixed: bool) -> Result<(), ChemError> {
        let idx = self.atoms.len();
        if let Some(prev) = self.prev {
            let order = self.pending.take().unwrap_or_else(|| default_order(&self.atoms[prev], &atom));
            self.bonds.push(Bond { a: prev, b: idx, order });
        } else if self.pending.is_some() {
            return Err(self.err("bond symbol without preceding atom"));
        }
        self.atoms.push(atom);
        self.h_fixed.push(fixed);
        self.prev = Some(idx);
        Ok(())
    }

    fn ring_closure(&mut self, n: u16) -> Result<(), ChemError> {
        let cur = self.prev.ok_or_else(|| self.err("ring closure before any atom"))?;
        let pend = self.pending.take();
        match self.ring_map.remove(&n) {
            Some((other, other_pend)) => {
                if other == cur {
                    return Err(self.err("ring closure bonds an atom to itself"));
                }
                let order = match (pend, other_pend) {
                    (Some(x), Some(y)) if x != y => {
                        return Err(ChemError::Parse(format!("conflicting bond orders for ring closure {n}")));
                    }
                    (Some(x), _) => x,
                    (None, Some(y)) => y,
                    (None, None) => default_order(&self.atoms[other], &self.atoms[cur]),
                };
                self.bonds.push(Bond { a: other, b: cur, order });
            }
            None => {
                self.ring_map.insert(n, (cur, pend));
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<(), ChemError> {
        let c = self.bytes[self.pos];
        // halógenos de dos letras
        if c == b'C' && self.bytes.get(self.pos + 1) == Some(&b'l') {
            self.pos += 2;
            return self.push_atom(Atom::new(17), false);
        }
        if c == b'B' && self.bytes.get(self.pos + 1) == Some(&b'r') {
            self.pos += 2;
            return self.push_atom(Atom::new(35), false);
        }
        let (number, aromatic) = match c {
            b'B' => (5, false),
            b'C' => (6, false),
            b'N' => (7, false),
            b'O' => (8, false),
            b'P' => (15, false),
            b'S' => (16, false),
            b'F' => (9, false),
            b'I' => (53, false),
            b'b' => (5, true),
            b'c' => (6, true),
            b'n' => (7, true),
            b'o' => (8, true),
            b'p' => (15, true),
            b's' => (16, true),
            _ => return Err(self.err(&format!("unexpected character '{}'", c as char))),
        };
        self.pos += 1;
        let mut atom = Atom::new(number);
        atom.is_aromatic = aromatic;
        self.push_atom(atom, false)
    }

    fn bracket_atom(&mut self) -> Result<(), ChemError> {
        self.pos += 1; // '['
        let isotope = self.read_number();
        let (number, aromatic) = self.read_element_symbol()?;
        // quiralidad: se consume y descarta
        while self.bytes.get(self.pos) == Some(&b'@') {
            self.pos += 1;
        }
        let mut hydrogens = 0u16;
        if self.bytes.get(self.pos) == Some(&b'H') {
            self.pos += 1;
            hydrogens = self.read_number().unwrap_or(1);
        }
        let charge = self.read_charge();
        if self.bytes.get(self.pos) == Some(&b':') {
            self.pos += 1;
            if self.read_number().is_none() {
                return Err(self.err("atom map without digits"));
            }
        }
        if self.bytes.get(self.pos) != Some(&b']') {
            return Err(self.err("expected ']'"));
        }
        self.pos += 1;
        if aromatic && !element::has_aromatic_form(number) {
            return Err(self.err("element has no aromatic form"));
        }
        let atom = Atom { atomic_number: number,
                          formal_charge: charge,
                          isotope,
                          is_aromatic: aromatic,
                          implicit_hydrogens: hydrogens.min(u16::from(u8::MAX)) as u8 };
        self.push_atom(atom, true)
    }

    fn read_element_symbol(&mut self) -> Result<(u8, bool), ChemError> {
        let c = *self.bytes.get(self.pos).ok_or_else(|| self.err("truncated bracket atom"))?;
        if c.is_ascii_uppercase() {
            if let Some(&d) = self.bytes.get(self.pos + 1) {
                if d.is_ascii_lowercase() {
                    let two = format!("{}{}", c as char, d as char);
                    if let Some(info) = element::by_symbol(&two) {
                        self.pos += 2;
                        return Ok((info.number, false));
                    }
                }
            }
            let one = (c as char).to_string();
            if let Some(info) = element::by_symbol(&one) {
                self.pos += 1;
                return Ok((info.number, false));
            }
            Err(self.err(&format!("unknown element '{}'", c as char)))
        } else {
            let number = match c {
                b'b' => 5,
                b'c' => 6,
                b'n' => 7,
                b'o' => 8,
                b'p' => 15,
                b's' => 16,
                _ => return Err(self.err(&format!("unexpected character '{}' in bracket", c as char))),
            };
            self.pos += 1;
            Ok((number, true))
        }
    }

    fn read_number(&mut self) -> Option<u16> {
        let start = self.pos;
        let mut value = 0u32;
        while let Some(&c) = self.bytes.get(self.pos) {
            if !c.is_ascii_digit() {
                break;
            }
            value = (value * 10 + u32::from(c - b'0')).min(9999);
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(value as u16)
        }
    }

    fn read_charge(&mut self) -> i8 {
        let sign: i16 = match self.bytes.get(self.pos) {
            Some(&b'+') => 1,
            Some(&b'-') => -1,
            _ => return 0,
        };
        self.pos += 1;
        if let Some(n) = self.read_number() {
            return (sign * i16::from(n.min(15) as u8)) as i8;
        }
        // forma repetida ++ / --
        let repeat = if sign > 0 { b'+' } else { b'-' };
        let mut magnitude: i16 = 1;
        while self.bytes.get(self.pos) == Some(&repeat) {
            magnitude += 1;
            self.pos += 1;
        }
        (sign * magnitude) as i8
    }

    fn assign_implicit_hydrogens(&mut self) {
        let mut degree = vec![0usize; self.atoms.len()];
        let mut order_sum = vec![0f64; self.atoms.len()];
        for bond in &self.bonds {
            degree[bond.a] += 1;
            degree[bond.b] += 1;
            order_sum[bond.a] += bond.order.as_f64();
            order_sum[bond.b] += bond.order.as_f64();
        }
        for (i, atom) in self.atoms.iter_mut().enumerate() {
            if !self.h_fixed[i] {
                atom.implicit_hydrogens =
                    inferred_implicit_hydrogens(atom.atomic_number, atom.is_aromatic, degree[i], order_sum[i]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_hydrogens_for_organic_subset() {
        let mol = parse_smiles("C").unwrap();
        assert_eq!(mol.atom(0).implicit_hydrogens, 4);
        let mol = parse_smiles("O").unwrap();
        assert_eq!(mol.atom(0).implicit_hydrogens, 2);
        let mol = parse_smiles("N").unwrap();
        assert_eq!(mol.atom(0).implicit_hydrogens, 3);
        let mol = parse_smiles("Cl").unwrap();
        assert_eq!(mol.atom(0).implicit_hydrogens, 1);
    }

    #[test]
    fn two_letter_halogens_beat_single_letters() {
        let mol = parse_smiles("ClCBr").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.atom(0).atomic_number, 17);
        assert_eq!(mol.atom(2).atomic_number, 35);
    }

    #[test]
    fn benzene_ring_is_aromatic() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bonds().len(), 6);
        assert!(mol.atoms().iter().all(|a| a.is_aromatic));
        assert!(mol.bonds().iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(mol.atoms().iter().all(|a| a.implicit_hydrogens == 1));
        assert_eq!(mol.ring_count(), 1);
    }

    #[test]
    fn aromatic_nitrogen_hydrogens() {
        // piridina: el N no lleva H; pirrol: el [nH] lo fija el corchete
        let pyridine = parse_smiles("c1ccncc1").unwrap();
        let n = pyridine.atoms().iter().find(|a| a.atomic_number == 7).unwrap();
        assert_eq!(n.implicit_hydrogens, 0);
        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        let n = pyrrole.atoms().iter().find(|a| a.atomic_number == 7).unwrap();
        assert_eq!(n.implicit_hydrogens, 1);
    }

    #[test]
    fn bracket_atoms_carry_charge_isotope_and_hydrogens() {
        let mol = parse_smiles("[NH4+]").unwrap();
        let a = mol.atom(0);
        assert_eq!((a.atomic_number, a.formal_charge, a.implicit_hydrogens), (7, 1, 4));
        let mol = parse_smiles("[13CH4]").unwrap();
        assert_eq!(mol.atom(0).isotope, Some(13));
        let mol = parse_smiles("C[O-]").unwrap();
        let o = mol.atom(1);
        assert_eq!((o.formal_charge, o.implicit_hydrogens), (-1, 0));
    }

    #[test]
    fn sulfonyl_chloride_sulfur_has_no_hydrogens() {
        let mol = parse_smiles("CS(=O)(=O)Cl").unwrap();
        let s = mol.atoms().iter().position(|a| a.atomic_number == 16).unwrap();
        assert_eq!(mol.atom(s).implicit_hydrogens, 0);
        assert_eq!(mol.bond_order_sum(s), 6.0);
    }

    #[test]
    fn branches_and_dots() {
        let mol = parse_smiles("CC(C)C").unwrap();
        assert_eq!(mol.degree(1), 3);
        let mol = parse_smiles("C.O").unwrap();
        assert_eq!(mol.fragments().len(), 2);
    }

    #[test]
    fn stereo_markers_become_single_bonds() {
        let mol = parse_smiles("C/C=C/C").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_between(1, 2).unwrap().order, BondOrder::Double);
        assert_eq!(mol.bond_between(0, 1).unwrap().order, BondOrder::Single);
    }

    #[test]
    fn percent_ring_closure() {
        let a = parse_smiles("C%12CCCCC%12").unwrap();
        let b = parse_smiles("C1CCCCC1").unwrap();
        assert_eq!(a.ring_count(), b.ring_count());
        assert_eq!(a.atom_count(), b.atom_count());
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert!(parse_smiles("").is_err());
        assert!(parse_smiles("C(").is_err());
        assert!(parse_smiles("C)").is_err());
        assert!(parse_smiles("C1CC").is_err());
        assert!(parse_smiles("C=").is_err());
        assert!(parse_smiles("C==C").is_err());
        assert!(parse_smiles("C=1CCCCC#1").is_err());
        assert!(parse_smiles("[Xx]").is_err());
        assert!(parse_smiles("C[NH").is_err());
    }

    #[test]
    fn valence_violations_are_rejected() {
        // N neutro tetracoordinado y nitro en forma pentavalente
        assert!(parse_smiles("N(C)(C)(C)C").is_err());
        assert!(parse_smiles("CN(=O)=O").is_err());
        // la forma con cargas separadas sí sanea
        assert!(parse_smiles("C[N+](=O)[O-]").is_ok());
    }
}
