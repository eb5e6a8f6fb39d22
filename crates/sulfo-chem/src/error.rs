use thiserror::Error;

/// Errores del kernel químico.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChemError {
    #[error("smiles parse error: {0}")]
    Parse(String),
    #[error("molecule has no atoms")]
    EmptyMolecule,
    #[error("invalid molecular graph: {0}")]
    Graph(String),
    #[error("smiles write error: {0}")]
    Write(String),
}
