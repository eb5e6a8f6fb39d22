use std::fmt;

use serde::{Deserialize, Serialize};

/// Estado químico de un producto enumerado.
///
/// La enumeración nunca omite un par: cuando la transformación dirigida
/// falla, el par se degrada de forma explícita en lugar de desaparecer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    /// Acoplamiento de sulfonamida aplicado con éxito.
    #[serde(rename = "OK")]
    Ok,
    /// La transformación falló; el producto es la unión sin reaccionar
    /// de ambos reactivos.
    #[serde(rename = "FALLBACK_COMBINEMOLS")]
    FallbackCombineMols,
    /// Ni siquiera la unión fue posible; el producto no tiene estructura.
    #[serde(rename = "PARSE_FAILED")]
    ParseFailed,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Ok => "OK",
            ProductStatus::FallbackCombineMols => "FALLBACK_COMBINEMOLS",
            ProductStatus::ParseFailed => "PARSE_FAILED",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(ProductStatus::Ok),
            "FALLBACK_COMBINEMOLS" => Ok(ProductStatus::FallbackCombineMols),
            "PARSE_FAILED" => Ok(ProductStatus::ParseFailed),
            other => Err(format!("unknown product status {other:?}")),
        }
    }
}

/// Producto de un par de la enumeración.
///
/// `smiles` solo es `None` cuando el estado es `ParseFailed`; los otros
/// dos estados siempre llevan estructura.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub pair_index: usize,
    pub sulfonyl_id: String,
    pub amine_id: String,
    pub smiles: Option<String>,
    pub status: ProductStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_to_wire_names() {
        let ser = |s: ProductStatus| serde_json::to_string(&s).unwrap_or_default();
        assert_eq!(ser(ProductStatus::Ok), "\"OK\"");
        assert_eq!(ser(ProductStatus::FallbackCombineMols), "\"FALLBACK_COMBINEMOLS\"");
        assert_eq!(ser(ProductStatus::ParseFailed), "\"PARSE_FAILED\"");
    }

    #[test]
    fn status_displays_like_the_wire_name() {
        assert_eq!(ProductStatus::Ok.to_string(), "OK");
        assert_eq!(ProductStatus::ParseFailed.to_string(), "PARSE_FAILED");
    }

    #[test]
    fn status_round_trips_through_from_str() {
        for status in [
            ProductStatus::Ok,
            ProductStatus::FallbackCombineMols,
            ProductStatus::ParseFailed,
        ] {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
        assert!("ok".parse::<ProductStatus>().is_err());
    }
}
