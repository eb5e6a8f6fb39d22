//! AnnotateDescriptorsStep (Transform)
//!
//! Calcula el perfil fisicoquímico de cada producto con estructura. Los
//! productos sin estructura siguen en la serie con descriptores en
//! `None`.

use sulfo_core::typed_step;
use sulfo_core::StepKind;
use sulfo_domain::annotate;

use crate::artifacts::{AnnotatedProductsArtifact, ProductsArtifact};

typed_step! {
    step AnnotateDescriptorsStep {
        id: "annotate_descriptors",
        kind: StepKind::Transform,
        input: ProductsArtifact,
        output: AnnotatedProductsArtifact,
        params: (),
        run(_me, inp, _p) {
            let annotated = annotate(&inp.products);
            let with_profile = annotated.iter().filter(|a| a.descriptors.is_some()).count();
            tracing::info!(total = annotated.len(), with_profile, "descriptors annotated");
            AnnotatedProductsArtifact { annotated, amine_count: inp.amine_count }
        }
    }
}
