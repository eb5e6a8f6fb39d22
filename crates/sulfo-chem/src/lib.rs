//! sulfo-chem: kernel químico del dominio sulfonamida
//!
//! Grafo molecular, SMILES (análisis y escritura canónica), el acoplamiento
//! sulfonamida con su combinación de respaldo y los descriptores que anotan
//! cada producto. Sin dependencias de motor ni de E/S: todo lo de aquí es
//! puro y determinista.
pub mod canon;
pub mod descriptors;
pub mod element;
pub mod error;
pub mod molecule;
pub mod reaction;
pub mod smiles;

pub use canon::{normalize_smiles, write_smiles};
pub use descriptors::{compute_descriptors, DescriptorSet};
pub use error::ChemError;
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use reaction::{combine, sulfonamide_couple, TransformError};
pub use smiles::parse_smiles;
