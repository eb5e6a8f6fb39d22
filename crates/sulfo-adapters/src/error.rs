//! Errores de la capa de adaptación.
//!
//! Cubren la entrada/salida de tablas y la forma de sus encabezados. Los
//! errores químicos nunca llegan hasta aquí: el dominio los degrada a
//! estados de producto o a filas descartadas.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("i/o: {0}")] Io(#[from] std::io::Error),
    #[error("csv: {0}")] Csv(#[from] csv::Error),
    #[error(transparent)] Domain(#[from] sulfo_domain::DomainError),
    #[error(transparent)] Engine(#[from] sulfo_core::CoreEngineError),
    #[error("{file}: missing required column {column:?}")] MissingColumn { file: String, column: &'static str },
    #[error("{file}, line {line}: {message}")] BadCell { file: String, line: usize, message: String },
}
