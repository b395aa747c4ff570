// src/models/tax_document.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::numeric::coerce_non_negative;

// Um comprovante fiscal guardado para o usuário
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxDocument {
    pub id: Uuid,

    #[schema(example = "80C")]
    pub document_type: String,

    #[schema(example = "ppf_receipt.pdf")]
    pub filename: Option<String>,

    pub verified: bool,

    #[schema(example = "150000")]
    pub amount: Decimal,

    pub uploaded_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTaxDocumentPayload {
    #[validate(length(min = 1, max = 64, message = "O tipo do documento é obrigatório."))]
    #[schema(example = "80C")]
    pub document_type: String,

    #[validate(length(max = 255, message = "Nome de arquivo muito longo."))]
    #[schema(example = "ppf_receipt.pdf")]
    pub filename: Option<String>,

    // A verificação em si é externa; aqui só se registra o resultado
    #[serde(default)]
    pub verified: bool,

    #[serde(default)]
    #[schema(value_type = Option<f64>, example = "150,000")]
    pub amount: Option<Value>,
}

/// Dados já normalizados para gravar.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaxDocument {
    pub document_type: String,
    pub filename: Option<String>,
    pub verified: bool,
    pub amount: Decimal,
}

impl SaveTaxDocumentPayload {
    pub fn to_new(&self) -> NewTaxDocument {
        NewTaxDocument {
            document_type: self.document_type.trim().to_string(),
            filename: self
                .filename
                .as_ref()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty()),
            verified: self.verified,
            amount: self.amount.as_ref().map(coerce_non_negative).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> SaveTaxDocumentPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn amount_is_coerced() {
        let doc = payload(json!({ "documentType": " 80C ", "filename": "ppf.pdf", "amount": "1,50,000" })).to_new();

        assert_eq!(
            doc,
            NewTaxDocument {
                document_type: "80C".into(),
                filename: Some("ppf.pdf".into()),
                verified: false,
                amount: dec!(150000),
            }
        );
    }

    #[test]
    fn missing_or_bad_amount_becomes_zero() {
        assert_eq!(payload(json!({ "documentType": "80D" })).to_new().amount, Decimal::ZERO);
        assert_eq!(payload(json!({ "documentType": "80D", "amount": "n/a" })).to_new().amount, Decimal::ZERO);
        assert_eq!(payload(json!({ "documentType": "80D", "amount": -50 })).to_new().amount, Decimal::ZERO);
    }

    #[test]
    fn blank_filename_is_dropped() {
        let doc = payload(json!({ "documentType": "HRA", "filename": "  ", "verified": true })).to_new();

        assert_eq!(doc.filename, None);
        assert!(doc.verified);
    }

    #[test]
    fn empty_type_fails_validation() {
        let errors = payload(json!({ "documentType": "" })).validate().unwrap_err();

        assert!(errors.field_errors().contains_key("document_type"));
    }
}
