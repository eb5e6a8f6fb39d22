//! Anotación fisicoquímica de los productos enumerados.

use serde::{Deserialize, Serialize};
use sulfo_chem::{compute_descriptors, parse_smiles, DescriptorSet};

use crate::product::Product;

/// Producto con su perfil fisicoquímico.
///
/// `descriptors` es `None` cuando el producto no tiene estructura.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedProduct {
    pub product: Product,
    pub descriptors: Option<DescriptorSet>,
}

/// Anota cada producto que tenga estructura.
///
/// Los productos sin SMILES pasan de largo con `descriptors` en `None`;
/// nunca se pierden de la serie.
pub fn annotate(products: &[Product]) -> Vec<AnnotatedProduct> {
    products
        .iter()
        .map(|p| {
            let descriptors = p.smiles.as_deref().and_then(|smiles| match parse_smiles(smiles) {
                Ok(mol) => Some(compute_descriptors(&mol)),
                Err(e) => {
                    tracing::warn!(product = %p.product_id, error = %e, "stored structure does not parse");
                    None
                }
            });
            AnnotatedProduct {
                product: p.clone(),
                descriptors,
            }
        })
        .collect()
}
