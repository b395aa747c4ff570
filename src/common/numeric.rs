// src/common/numeric.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Converte qualquer valor vindo de fora (JSON solto, texto do OCR) em um `Decimal`.
///
/// Nunca falha: `null`, tipos inesperados e textos que não são números viram zero.
/// Dados ruins do OCR não podem derrubar a agregação.
pub fn coerce_amount(value: &Value) -> Decimal {
    match value {
        Value::Null => Decimal::ZERO,
        Value::Number(n) => {
            // Passa pela representação textual para não herdar o ruído binário do f64
            Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .unwrap_or(Decimal::ZERO)
        }
        Value::String(s) => coerce_str(s),
        _ => Decimal::ZERO,
    }
}

/// Versão para texto: tira espaços e separadores de milhar antes de converter.
pub fn coerce_str(raw: &str) -> Decimal {
    parse_amount(raw).unwrap_or(Decimal::ZERO)
}

/// Como `coerce_str`, mas sem esconder a falha: texto vazio, lixo ou número
/// que estoura o `Decimal` devolvem `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Campos do livro mensal são sempre >= 0.
pub fn coerce_non_negative(value: &Value) -> Decimal {
    coerce_amount(value).max(Decimal::ZERO)
}
