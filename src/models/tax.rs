// src/models/tax.rs

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums ---

/// Seções de dedução do regime modelado
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum DeductionSection {
    #[serde(rename = "80C")]
    Section80C,
    #[serde(rename = "80D")]
    Section80D,
    #[serde(rename = "80G")]
    Section80G,
    #[serde(rename = "80E")]
    Section80E,
    #[serde(rename = "HRA")]
    Hra,
    #[serde(rename = "LTA")]
    Lta,
    #[serde(rename = "professional_tax")]
    ProfessionalTax,
    #[serde(rename = "standard_deduction")]
    StandardDeduction,
}

impl DeductionSection {
    pub const ALL: [DeductionSection; 8] = [
        DeductionSection::Section80C,
        DeductionSection::Section80D,
        DeductionSection::Section80G,
        DeductionSection::Section80E,
        DeductionSection::Hra,
        DeductionSection::Lta,
        DeductionSection::ProfessionalTax,
        DeductionSection::StandardDeduction,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DeductionSection::Section80C => "80C",
            DeductionSection::Section80D => "80D",
            DeductionSection::Section80G => "80G",
            DeductionSection::Section80E => "80E",
            DeductionSection::Hra => "HRA",
            DeductionSection::Lta => "LTA",
            DeductionSection::ProfessionalTax => "professional_tax",
            DeductionSection::StandardDeduction => "standard_deduction",
        }
    }
}

impl FromStr for DeductionSection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DeductionSection::ALL
            .into_iter()
            .find(|section| section.code().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

pub type Deductions = BTreeMap<DeductionSection, Decimal>;

// --- Structs ---

/// Perfil fiscal de um usuário. Os campos derivados só mudam quando o
/// cálculo é executado de novo (`tax_calculated`).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct TaxProfile {
    #[schema(ignore)]
    #[serde(skip_serializing)]
    pub user_id: Uuid,

    #[schema(example = "1020000")]
    pub total_income: Decimal,

    #[sqlx(json)]
    #[schema(value_type = Object)]
    pub deductions: Deductions,

    pub taxable_income: Decimal,
    pub total_deductions: Decimal,
    pub final_tax_payable: Decimal,
    pub tax_calculated: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resultado da calculadora (função pura)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaxCalculation {
    #[schema(example = "600000")]
    pub total_income: Decimal,
    #[schema(example = "50000")]
    pub total_deductions: Decimal,
    #[schema(example = "550000")]
    pub taxable_income: Decimal,
    #[schema(example = "22500")]
    pub tax_payable: Decimal,
    #[schema(example = "3.75")]
    pub effective_tax_rate: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationResponse {
    pub tax_calculation: TaxCalculation,
    pub tax_profile: TaxProfile,
}

// --- Payloads ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIncomePayload {
    #[schema(value_type = f64, example = "1020000")]
    pub income: Value,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDeductionPayload {
    #[validate(custom(function = "validate_section"))]
    #[schema(example = "80C")]
    pub section: String,

    #[schema(value_type = f64, example = "150000")]
    pub amount: Value,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    /// Filtra os meses cujo rótulo contém o ano (ex: 2024)
    #[param(example = "2024")]
    pub year: Option<String>,
}

fn validate_section(section: &str) -> Result<(), ValidationError> {
    DeductionSection::from_str(section).map(|_| ()).map_err(|_| {
        ValidationError::new("unknown_section").with_message(
            "Seção desconhecida. Use 80C, 80D, 80G, 80E, HRA, LTA, professional_tax ou standard_deduction.".into(),
        )
    })
}
