//! Asignación de pocillos en una placa de 96.
//!
//! El orden de llenado es por columnas: la columna 1 se llena de la fila
//! A a la H antes de pasar a la columna 2. Los productos que no caben en
//! la placa no se descartan; quedan contados como `unmapped`.

use std::fmt;

pub const PLATE_ROWS: usize = 8;
pub const PLATE_COLUMNS: usize = 12;
pub const PLATE_CAPACITY: usize = PLATE_ROWS * PLATE_COLUMNS;

/// Posición física en la placa: fila `A..H`, columna `1..12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellPosition {
    row: u8,
    column: u8,
}

impl WellPosition {
    /// Posición del índice `idx` en orden por columnas: 0 es A1, 1 es
    /// B1, 7 es H1, 8 es A2 y 95 es H12. `None` fuera de la capacidad.
    pub fn from_index(idx: usize) -> Option<Self> {
        if idx >= PLATE_CAPACITY {
            return None;
        }
        Some(WellPosition {
            row: (idx % PLATE_ROWS) as u8,
            column: (idx / PLATE_ROWS) as u8,
        })
    }

    /// Etiqueta legible, `A1` a `H12`, sin ceros de relleno.
    pub fn label(&self) -> String {
        format!("{}{}", (b'A' + self.row) as char, self.column + 1)
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn column(&self) -> u8 {
        self.column
    }
}

impl fmt::Display for WellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Resultado del mapeo de una serie de productos sobre la placa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateAssignment {
    /// Una posición por producto, en orden de índice de par, hasta la
    /// capacidad de la placa.
    pub wells: Vec<WellPosition>,
    /// Productos sin pocillo por desbordar la placa.
    pub unmapped: usize,
}

/// Asigna pocillos a los primeros `product_count` productos.
pub fn assign_wells(product_count: usize) -> PlateAssignment {
    let mapped = product_count.min(PLATE_CAPACITY);
    PlateAssignment {
        wells: (0..mapped).filter_map(WellPosition::from_index).collect(),
        unmapped: product_count.saturating_sub(PLATE_CAPACITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_major_corners() {
        let labels: Vec<String> = [0, 1, 7, 8, 95]
            .iter()
            .filter_map(|&i| WellPosition::from_index(i))
            .map(|w| w.label())
            .collect();
        assert_eq!(labels, vec!["A1", "B1", "H1", "A2", "H12"]);
    }

    #[test]
    fn out_of_capacity_has_no_position() {
        assert_eq!(WellPosition::from_index(96), None);
        assert_eq!(WellPosition::from_index(1000), None);
    }

    #[test]
    fn all_labels_are_distinct() {
        let labels: std::collections::HashSet<String> = (0..PLATE_CAPACITY)
            .filter_map(WellPosition::from_index)
            .map(|w| w.label())
            .collect();
        assert_eq!(labels.len(), PLATE_CAPACITY);
    }

    #[test]
    fn assign_wells_reports_overflow_instead_of_dropping() {
        let small = assign_wells(5);
        assert_eq!(small.wells.len(), 5);
        assert_eq!(small.unmapped, 0);

        let full = assign_wells(96);
        assert_eq!(full.wells.len(), 96);
        assert_eq!(full.unmapped, 0);

        let over = assign_wells(100);
        assert_eq!(over.wells.len(), 96);
        assert_eq!(over.unmapped, 4);
        assert_eq!(over.wells[95].label(), "H12");
    }
}
