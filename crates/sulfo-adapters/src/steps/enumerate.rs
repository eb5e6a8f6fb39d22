//! EnumerateProductsStep (Transform)
//!
//! Producto cartesiano completo de ambas colecciones: sulfonilos en el
//! lazo externo, aminas en el interno. Un fallo químico degrada el
//! estado del producto; ningún par desaparece de la biblioteca.

use sulfo_core::typed_step;
use sulfo_core::StepKind;
use sulfo_domain::{enumerate, ProductStatus};

use crate::artifacts::{ProductsArtifact, ReagentsArtifact};

typed_step! {
    step EnumerateProductsStep {
        id: "enumerate_products",
        kind: StepKind::Transform,
        input: ReagentsArtifact,
        output: ProductsArtifact,
        params: (),
        run(_me, inp, _p) {
            let products    = enumerate(&inp.sulfonyls, &inp.amines);
            let ok          = products.iter().filter(|p| p.status == ProductStatus::Ok).count();
            let fallback    = products.iter().filter(|p| p.status == ProductStatus::FallbackCombineMols).count();
            let parse_failed = products.len() - ok - fallback;
            tracing::info!(total = products.len(), ok, fallback, parse_failed, "library enumerated");
            ProductsArtifact { products, amine_count: inp.amines.len() }
        }
    }
}
