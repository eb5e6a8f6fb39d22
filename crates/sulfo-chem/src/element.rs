//! Tabla de elementos soportados por el kernel.
//!
//! Cubre el subconjunto orgánico de SMILES más los elementos que aparecen en
//! reactivos típicos de acoplamiento sulfonamida. Las valencias listadas son
//! las permitidas para el cálculo de hidrógenos implícitos y el chequeo de
//! saneamiento post-transformación.

/// Datos estáticos de un elemento.
#[derive(Debug, Clone, Copy)]
pub struct ElementInfo {
    pub number: u8,
    pub symbol: &'static str,
    pub weight: f64,
    /// Valencias permitidas en orden ascendente (vacío = sin chequeo).
    pub valences: &'static [u8],
}

pub const ELEMENTS: &[ElementInfo] = &[
    ElementInfo { number: 1, symbol: "H", weight: 1.008, valences: &[1] },
    ElementInfo { number: 5, symbol: "B", weight: 10.811, valences: &[3] },
    ElementInfo { number: 6, symbol: "C", weight: 12.011, valences: &[4] },
    ElementInfo { number: 7, symbol: "N", weight: 14.007, valences: &[3] },
    ElementInfo { number: 8, symbol: "O", weight: 15.999, valences: &[2] },
    ElementInfo { number: 9, symbol: "F", weight: 18.998, valences: &[1] },
    ElementInfo { number: 14, symbol: "Si", weight: 28.086, valences: &[4] },
    ElementInfo { number: 15, symbol: "P", weight: 30.974, valences: &[3, 5] },
    ElementInfo { number: 16, symbol: "S", weight: 32.06, valences: &[2, 4, 6] },
    ElementInfo { number: 17, symbol: "Cl", weight: 35.453, valences: &[1] },
    ElementInfo { number: 35, symbol: "Br", weight: 79.904, valences: &[1] },
    ElementInfo { number: 53, symbol: "I", weight: 126.904, valences: &[1] },
];

/// Busca un elemento por símbolo (sensible a mayúsculas: "Cl", no "CL").
pub fn by_symbol(symbol: &str) -> Option<&'static ElementInfo> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Busca un elemento por número atómico.
pub fn by_number(number: u8) -> Option<&'static ElementInfo> {
    ELEMENTS.iter().find(|e| e.number == number)
}

/// Peso atómico estándar; 0.0 para números desconocidos (no ocurre con
/// moléculas construidas por el parser).
pub fn atomic_weight(number: u8) -> f64 {
    by_number(number).map(|e| e.weight).unwrap_or(0.0)
}

/// Elementos que pueden escribirse sin corchetes en SMILES.
pub fn in_organic_subset(number: u8) -> bool {
    matches!(number, 5 | 6 | 7 | 8 | 9 | 15 | 16 | 17 | 35 | 53)
}

/// Elementos con forma aromática minúscula (b, c, n, o, p, s).
pub fn has_aromatic_form(number: u8) -> bool {
    matches!(number, 5 | 6 | 7 | 8 | 15 | 16)
}

/// Menor valencia permitida que cubre `used`; si ninguna alcanza, la mayor.
/// Sustenta el cálculo de hidrógenos implícitos para elementos hipervalentes
/// (S y P aceptan 2/4/6 y 3/5 respectivamente).
pub fn smallest_valence_covering(number: u8, used: u8) -> Option<u8> {
    let info = by_number(number)?;
    if info.valences.is_empty() {
        return None;
    }
    for v in info.valences {
        if *v >= used {
            return Some(*v);
        }
    }
    info.valences.last().copied()
}

/// Valencia máxima permitida para el chequeo de saneamiento. Una carga formal
/// positiva amplía el máximo en su magnitud (p. ej. N+ tetravalente).
pub fn max_allowed_valence(number: u8, formal_charge: i8) -> Option<u8> {
    let info = by_number(number)?;
    let base = info.valences.last().copied()?;
    if formal_charge > 0 {
        Some(base.saturating_add(formal_charge as u8))
    } else {
        Some(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_symbol_and_number() {
        assert_eq!(by_symbol("Cl").map(|e| e.number), Some(17));
        assert_eq!(by_number(16).map(|e| e.symbol), Some("S"));
        assert!(by_symbol("Xx").is_none());
    }

    #[test]
    fn hypervalent_sulfur_valences() {
        assert_eq!(smallest_valence_covering(16, 1), Some(2));
        assert_eq!(smallest_valence_covering(16, 3), Some(4));
        assert_eq!(smallest_valence_covering(16, 6), Some(6));
        // más allá de la mayor permitida: devuelve la mayor
        assert_eq!(smallest_valence_covering(16, 7), Some(6));
    }

    #[test]
    fn charge_extends_max_valence() {
        assert_eq!(max_allowed_valence(7, 0), Some(3));
        assert_eq!(max_allowed_valence(7, 1), Some(4));
        assert_eq!(max_allowed_valence(8, -1), Some(2));
    }
}
