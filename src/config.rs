//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`) con los valores por defecto del binario. Las banderas de
//! línea de comandos tienen prioridad sobre el entorno.

use once_cell::sync::Lazy;
use std::env;

/// Configuración global de la aplicación.
pub struct AppConfig {
    /// Filtro de `tracing` (sintaxis de `EnvFilter`).
    pub log_filter: String,
    /// Basename por defecto de los archivos de la enumeración.
    pub out_basename: String,
    /// Exigir columna de identificadores en las listas de reactivos.
    pub strict_ids: bool,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| AppConfig {
    log_filter: env::var("SULFOLIB_LOG").unwrap_or_else(|_| "info".to_string()),
    out_basename: env::var("SULFOLIB_OUT_BASENAME").unwrap_or_else(|_| "library".to_string()),
    strict_ids: env_flag("SULFOLIB_STRICT_IDS"),
});

/// Interpreta una variable de entorno como bandera booleana.
fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| {
                      let v = v.trim().to_ascii_lowercase();
                      v == "1" || v == "true" || v == "yes"
                  })
                  .unwrap_or(false)
}
