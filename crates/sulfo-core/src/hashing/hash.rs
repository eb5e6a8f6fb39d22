//! Hash helpers. Abstraen el algoritmo para poder cambiarlo sin tocar el
//! resto del motor.

use blake3::Hasher;
use serde_json::Value;

use super::to_canonical_json;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hashea un `Value` JSON sobre su forma canónica. Dos valores con las
/// mismas claves y contenidos producen el mismo hash sin importar el
/// orden de inserción.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}
