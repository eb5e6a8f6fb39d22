//! Constantes del motor.
//!
//! Valores estáticos que participan en el cálculo de fingerprints. La
//! versión del motor entra al hash de cada paso: un cambio incompatible
//! del motor invalida los fingerprints aunque la definición y los datos
//! no cambien.

/// Versión lógica del motor de campañas. Mantener estable mientras no
/// haya cambios incompatibles en el cálculo de fingerprints.
pub const ENGINE_VERSION: &str = "S1.0";
