// src/models/ledger.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::numeric::coerce_non_negative;

/// Fatia das deduções que o caminho simplificado de gravação trata como imposto retido.
pub const TAX_PAID_SHARE: Decimal = dec!(0.30);

// --- Enums ---

/// Instrumentos da seção 80C acompanhados mês a mês
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Investment {
    Ppf,
    Elss,
    LifeInsurance,
    Nsc,
}

/// Quem é coberto pelo prêmio do seguro saúde (80D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsurancePayer {
    #[serde(rename = "self")]
    Myself,
    Parents,
}

// --- Structs ---

/// Uma entrada do livro mensal de um usuário, chaveada pelo rótulo do mês.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct MonthlyRecord {
    #[sqlx(rename = "month_key")]
    #[schema(example = "April 2024")]
    pub month: String,

    #[schema(example = "85000")]
    pub income: Decimal,
    #[schema(example = "12000")]
    pub deductions: Decimal,
    #[schema(example = "73000")]
    pub net_pay: Decimal,
    // Sempre derivado de `deductions`
    #[schema(example = "3600")]
    pub tax_paid: Decimal,
    #[schema(example = "1800")]
    pub provident_fund: Decimal,

    #[schema(example = "Infosys")]
    pub employer: Option<String>,
    #[schema(example = "30/04/2024")]
    pub date_raw: Option<String>,

    #[sqlx(json)]
    #[schema(value_type = Object)]
    pub investments: BTreeMap<Investment, Decimal>,

    #[sqlx(json)]
    #[schema(value_type = Object)]
    pub insurance: BTreeMap<InsurancePayer, Decimal>,

    pub updated_at: Option<DateTime<Utc>>,
}

/// Atualização parcial de um mês: `None` mantém o valor gravado.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyRecordUpdate {
    pub income: Option<Decimal>,
    pub deductions: Option<Decimal>,
    pub net_pay: Option<Decimal>,
    pub provident_fund: Option<Decimal>,
    pub employer: Option<String>,
    pub date_raw: Option<String>,
    pub investments: BTreeMap<Investment, Decimal>,
    pub insurance: BTreeMap<InsurancePayer, Decimal>,
}

impl MonthlyRecord {
    pub fn empty(month: &str) -> Self {
        Self {
            month: month.to_string(),
            ..Default::default()
        }
    }

    /// Aplica uma atualização sobre o registro existente.
    ///
    /// Escalares informados sobrescrevem; os sub-mapas de investimentos e
    /// seguros são mesclados chave a chave. `tax_paid` é recalculado no fim.
    pub fn apply(&mut self, update: MonthlyRecordUpdate) {
        if let Some(income) = update.income {
            self.income = income;
        }
        if let Some(deductions) = update.deductions {
            self.deductions = deductions;
        }
        if let Some(net_pay) = update.net_pay {
            self.net_pay = net_pay;
        }
        if let Some(pf) = update.provident_fund {
            self.provident_fund = pf;
        }
        if update.employer.is_some() {
            self.employer = update.employer;
        }
        if update.date_raw.is_some() {
            self.date_raw = update.date_raw;
        }

        self.investments.extend(update.investments);
        self.insurance.extend(update.insurance);

        self.tax_paid = (self.deductions * TAX_PAID_SHARE).round_dp(2);
    }

    pub fn total_investments(&self) -> Decimal {
        self.investments.values().copied().sum()
    }

    pub fn total_insurance(&self) -> Decimal {
        self.insurance.values().copied().sum()
    }
}

// --- Payloads ---

/// Corpo do POST /api/financial-data. Os números chegam soltos (texto com
/// vírgulas, null, número) e passam pela coerção numérica.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct SaveMonthPayload {
    // Imagem do holerite (base64). Só o OCR externo usa; aqui é ignorada.
    #[schema(example = "data:image/png;base64,...")]
    pub image: Option<String>,

    #[schema(example = "30/04/2024")]
    pub date: Option<String>,

    #[schema(value_type = Option<f64>, example = "85,000")]
    pub income: Option<Value>,

    #[schema(example = "Infosys")]
    pub employer: Option<String>,

    #[schema(value_type = Option<f64>, example = "12000")]
    pub deductions: Option<Value>,

    #[schema(value_type = Option<f64>, example = "73000")]
    pub net_pay: Option<Value>,

    #[serde(alias = "pf")]
    #[schema(value_type = Option<f64>, example = "1800")]
    pub provident_fund: Option<Value>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[schema(value_type = Object)]
    pub investments: BTreeMap<Investment, Value>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[schema(value_type = Object)]
    pub insurance: BTreeMap<InsurancePayer, Value>,
}

// `null` vale o mesmo que a chave ausente
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SaveMonthPayload {
    pub fn to_update(&self) -> MonthlyRecordUpdate {
        MonthlyRecordUpdate {
            income: self.income.as_ref().map(coerce_non_negative),
            deductions: self.deductions.as_ref().map(coerce_non_negative),
            net_pay: self.net_pay.as_ref().map(coerce_non_negative),
            provident_fund: self.provident_fund.as_ref().map(coerce_non_negative),
            employer: self
                .employer
                .as_ref()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            date_raw: self.date.clone(),
            investments: self
                .investments
                .iter()
                .map(|(k, v)| (*k, coerce_non_negative(v)))
                .collect(),
            insurance: self
                .insurance
                .iter()
                .map(|(k, v)| (*k, coerce_non_negative(v)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn apply_on_empty_record_sets_fields_and_derives_tax() {
        let mut record = MonthlyRecord::empty("April 2024");

        record.apply(MonthlyRecordUpdate {
            income: Some(dec!(50000)),
            deductions: Some(dec!(5000)),
            net_pay: Some(dec!(45000)),
            ..Default::default()
        });

        assert_eq!(record.income, dec!(50000));
        assert_eq!(record.net_pay, dec!(45000));
        assert_eq!(record.tax_paid, dec!(1500));
    }

    #[test]
    fn second_update_overwrites_scalars_and_merges_investments() {
        let mut record = MonthlyRecord::empty("April 2024");
        record.apply(MonthlyRecordUpdate {
            income: Some(dec!(50000)),
            employer: Some("Infosys".into()),
            investments: BTreeMap::from([(Investment::Ppf, dec!(1000)), (Investment::Elss, dec!(2000))]),
            insurance: BTreeMap::from([(InsurancePayer::Parents, dec!(500))]),
            ..Default::default()
        });

        record.apply(MonthlyRecordUpdate {
            income: Some(dec!(52000)),
            investments: BTreeMap::from([(Investment::Elss, dec!(3000))]),
            ..Default::default()
        });

        assert_eq!(record.income, dec!(52000));
        assert_eq!(record.employer.as_deref(), Some("Infosys"));
        assert_eq!(record.investments[&Investment::Ppf], dec!(1000));
        assert_eq!(record.investments[&Investment::Elss], dec!(3000));
        assert_eq!(record.insurance[&InsurancePayer::Parents], dec!(500));
    }

    #[test]
    fn tax_paid_follows_latest_deductions() {
        let mut record = MonthlyRecord::empty("May 2024");
        record.apply(MonthlyRecordUpdate { deductions: Some(dec!(1000)), ..Default::default() });
        record.apply(MonthlyRecordUpdate { deductions: Some(dec!(2000)), ..Default::default() });

        assert_eq!(record.tax_paid, dec!(600));
    }

    #[test]
    fn payload_coerces_loose_numbers() {
        let payload: SaveMonthPayload = serde_json::from_value(json!({
            "image": "abc",
            "date": "30/04/2024",
            "income": "85,000",
            "employer": "  Infosys ",
            "deductions": 12000,
            "net_pay": null,
            "pf": "1,800",
            "investments": { "ppf": "5,000", "life_insurance": "oops" },
            "insurance": { "self": 1200 }
        }))
        .unwrap();

        let update = payload.to_update();

        assert_eq!(update.income, Some(dec!(85000)));
        assert_eq!(update.deductions, Some(dec!(12000)));
        assert_eq!(update.net_pay, None);
        assert_eq!(update.provident_fund, Some(dec!(1800)));
        assert_eq!(update.employer.as_deref(), Some("Infosys"));
        assert_eq!(update.investments[&Investment::Ppf], dec!(5000));
        assert_eq!(update.investments[&Investment::LifeInsurance], Decimal::ZERO);
        assert_eq!(update.insurance[&InsurancePayer::Myself], dec!(1200));
    }

    #[test]
    fn null_maps_are_treated_as_absent() {
        let payload: SaveMonthPayload = serde_json::from_value(json!({
            "date": "April 2024",
            "investments": null,
            "insurance": null
        }))
        .unwrap();

        assert!(payload.investments.is_empty());
        assert!(payload.insurance.is_empty());
    }

    #[test]
    fn record_uses_the_same_casing_as_the_request_body() {
        let mut record = MonthlyRecord::empty("June 2024");
        record.apply(MonthlyRecordUpdate {
            deductions: Some(dec!(1000)),
            net_pay: Some(dec!(9000)),
            provident_fund: Some(dec!(500)),
            date_raw: Some("30/06/2024".into()),
            ..Default::default()
        });

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["net_pay"], json!(9000.0));
        assert_eq!(value["tax_paid"], json!(300.0));
        assert_eq!(value["provident_fund"], json!(500.0));
        assert_eq!(value["date_raw"], json!("30/06/2024"));
        assert!(value.get("netPay").is_none());
    }

    #[test]
    fn record_serializes_maps_with_wire_keys() {
        let mut record = MonthlyRecord::empty("June 2024");
        record.insurance.insert(InsurancePayer::Myself, dec!(100));
        record.investments.insert(Investment::LifeInsurance, dec!(200));

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["month"], json!("June 2024"));
        assert_eq!(value["insurance"]["self"], json!(100.0));
        assert_eq!(value["investments"]["life_insurance"], json!(200.0));
    }
}
