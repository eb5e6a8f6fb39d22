//! Tipado fuerte opcional sobre `Artifact`, sin meter semántica de
//! dominio en el motor.
//!
//! Un tipo de datos que implementa `ArtifactSpec` puede viajar por el
//! flujo como JSON neutro y reconstruirse con verificación de kind,
//! versión de esquema y una validación ligera.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{Artifact, ArtifactKind};

/// Errores al decodificar un artifact tipado.
#[derive(Debug)]
pub enum ArtifactDecodeError {
    KindMismatch { expected: ArtifactKind, found: ArtifactKind },
    VersionMismatch { expected: u32, found: Option<u32> },
    Serialize(String),
    Deserialize(String),
    Validation(String),
}

impl std::fmt::Display for ArtifactDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactDecodeError::KindMismatch { expected, found } => {
                write!(f, "artifact kind mismatch: expected {expected:?}, found {found:?}")
            }
            ArtifactDecodeError::VersionMismatch { expected, found } => {
                write!(f, "schema version mismatch: expected {expected}, found {found:?}")
            }
            ArtifactDecodeError::Serialize(e) => write!(f, "serialize: {e}"),
            ArtifactDecodeError::Deserialize(e) => write!(f, "deserialize: {e}"),
            ArtifactDecodeError::Validation(e) => write!(f, "validation: {e}"),
        }
    }
}

/// Especificación de un artifact tipado.
pub trait ArtifactSpec: Sized + Serialize + DeserializeOwned + Clone {
    /// Kind asociado, para distinguir en runtime.
    const KIND: ArtifactKind;
    /// Versión de esquema; incrementar en cambios incompatibles.
    const SCHEMA_VERSION: u32 = 1;

    /// Validación semántica ligera, sin efectos secundarios.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Campo del payload que lleva la versión de esquema.
    fn version_field_name() -> &'static str {
        "schema_version"
    }

    /// Serializa a un `Artifact` sin hash (lo añade el motor). La
    /// versión de esquema se inserta en el payload si el tipo no la
    /// trae como campo propio.
    fn into_artifact(self) -> Result<Artifact, ArtifactDecodeError> {
        let mut value =
            serde_json::to_value(&self).map_err(|e| ArtifactDecodeError::Serialize(e.to_string()))?;
        if let Value::Object(map) = &mut value {
            map.entry(Self::version_field_name().to_string())
               .or_insert(Value::from(Self::SCHEMA_VERSION));
        }
        Ok(Artifact::new_unhashed(Self::KIND, value, None))
    }

    /// Decodifica desde un artifact neutro verificando kind, versión y
    /// validación. El campo de versión sobrante lo ignora serde.
    fn from_artifact(a: &Artifact) -> Result<Self, ArtifactDecodeError> {
        if a.kind != Self::KIND {
            return Err(ArtifactDecodeError::KindMismatch { expected: Self::KIND,
                                                           found: a.kind.clone() });
        }
        let found_version = a.payload
                             .get(Self::version_field_name())
                             .and_then(|v| v.as_u64())
                             .map(|v| v as u32);
        match found_version {
            Some(v) if v == Self::SCHEMA_VERSION => {}
            other => {
                return Err(ArtifactDecodeError::VersionMismatch { expected: Self::SCHEMA_VERSION,
                                                                  found: other })
            }
        }
        let decoded: Self = serde_json::from_value(a.payload.clone())
            .map_err(|e| ArtifactDecodeError::Deserialize(e.to_string()))?;
        decoded.validate().map_err(ArtifactDecodeError::Validation)?;
        Ok(decoded)
    }
}
