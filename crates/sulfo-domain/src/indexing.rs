//! Identidad determinista de pares y productos.
//!
//! La enumeración recorre el producto cartesiano con los sulfonilos en el
//! lazo externo y las aminas en el interno. Estas funciones son la única
//! fuente del índice de par y del identificador de producto; cualquier
//! otra capa que necesite reconstruirlos pasa por aquí.

/// Índice de par para las posiciones (base 0) de sulfonilo y amina.
pub fn pair_index(sulfonyl_pos: usize, amine_pos: usize, amine_count: usize) -> usize {
    sulfonyl_pos * amine_count + amine_pos
}

/// Posiciones (sulfonilo, amina) de un índice de par.
///
/// Inversa exacta de [`pair_index`]. `amine_count` debe ser positivo;
/// las colecciones vacías se rechazan antes de llegar aquí.
pub fn pair_positions(pair_index: usize, amine_count: usize) -> (usize, usize) {
    (pair_index / amine_count, pair_index % amine_count)
}

/// Identificador estable de producto: `P` seguido del índice de par en
/// base 1, con ceros a la izquierda hasta cuatro dígitos.
pub fn product_id(pair_index: usize) -> String {
    format!("P{:04}", pair_index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_index_walks_amines_innermost() {
        // 2 sulfonilos x 3 aminas
        let order: Vec<usize> = (0..2)
            .flat_map(|s| (0..3).map(move |a| pair_index(s, a, 3)))
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn pair_positions_inverts_pair_index() {
        for s in 0..5 {
            for a in 0..7 {
                let idx = pair_index(s, a, 7);
                assert_eq!(pair_positions(idx, 7), (s, a));
            }
        }
    }

    #[test]
    fn product_ids_are_one_based_and_padded() {
        assert_eq!(product_id(0), "P0001");
        assert_eq!(product_id(41), "P0042");
        assert_eq!(product_id(9998), "P9999");
        // más allá de cuatro dígitos el ancho crece sin truncar
        assert_eq!(product_id(9999), "P10000");
    }
}
