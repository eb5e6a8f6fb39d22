//! Artifacts tipados que fluyen entre los pasos de la campaña.
//!
//! Solo definen la forma del payload JSON que se serializa en un
//! `sulfo_core::Artifact` neutro; el hash lo calcula el motor sobre el
//! payload canónico, así que campos estables implican fingerprints
//! estables.

use sulfo_core::typed_artifact;
use sulfo_domain::{AnnotatedProduct, AuthoritativeRecord, QcReport, ReagentCollection};

// Las dos colecciones normalizadas con las que se enumera. Cada una
// lleva dentro su hash de conjunto (provenance).
typed_artifact!(ReagentsArtifact { sulfonyls: ReagentCollection,
                                   amines: ReagentCollection });

// Enumeración completa. `amine_count` es el tamaño del lazo interno,
// necesario río abajo para invertir índices de par.
typed_artifact!(ProductsArtifact { products: Vec<sulfo_domain::Product>,
                                   amine_count: usize });

// Productos con su perfil fisicoquímico, en el mismo orden de la
// enumeración.
typed_artifact!(AnnotatedProductsArtifact { annotated: Vec<AnnotatedProduct>,
                                            amine_count: usize });

// Vista de placa: `wells[i]` es la etiqueta del producto `i`; los
// productos que desbordan la placa se cuentan en `unmapped`.
typed_artifact!(PlateMapArtifact { annotated: Vec<AnnotatedProduct>,
                                   wells: Vec<String>,
                                   unmapped: usize,
                                   amine_count: usize });

// Resultado de la reconciliación: tabla autoritativa más su reporte de
// control de calidad.
typed_artifact!(AuthoritativeArtifact { records: Vec<AuthoritativeRecord>,
                                        report: QcReport });
