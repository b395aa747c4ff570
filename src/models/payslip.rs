// src/models/payslip.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// O que o parser conseguiu tirar do texto do OCR. Qualquer campo pode faltar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedPayslip {
    #[schema(example = "Ravi Kumar")]
    pub name: Option<String>,
    #[schema(example = "85000")]
    pub income: Option<Decimal>,
    #[schema(example = "Infosys")]
    pub employer: Option<String>,
    #[schema(example = "April 2024")]
    pub date: Option<String>,
    #[schema(example = "12000")]
    pub deductions: Option<Decimal>,
    #[schema(example = "73000")]
    pub net_pay: Option<Decimal>,
}

// Histórico de extrações
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipEntry {
    pub id: Uuid,

    #[schema(example = "payslip_april.png")]
    pub filename: Option<String>,

    #[sqlx(json)]
    pub extracted_data: ExtractedPayslip,

    pub uploaded_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPayslipPayload {
    /// Texto bruto devolvido pelo OCR
    #[validate(length(min = 1, message = "O texto do holerite é obrigatório."))]
    #[schema(example = "Infosys Limited Payslip for April 2024 Name: Ravi Kumar Total Earnings: 85,000 ...")]
    pub text: String,

    #[validate(length(max = 255, message = "Nome de arquivo muito longo."))]
    #[schema(example = "payslip_april.png")]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    #[schema(example = 3)]
    pub removed: u64,
}
