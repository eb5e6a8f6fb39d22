use thiserror::Error;

use crate::reagent::ReagentRole;

/// Errores de configuración del dominio. Todos abortan la campaña antes
/// de enumerar: una entrada mal formada nunca produce una placa parcial.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("required identifier column '{column}' is missing (strict mode)")]
    MissingIdColumn { column: &'static str },

    #[error("duplicate reagent id '{id}' in the {role} table")]
    DuplicateReagentId { id: String, role: ReagentRole },

    #[error("the {role} table has no usable rows")]
    EmptyCollection { role: ReagentRole },
}
