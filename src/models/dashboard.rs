// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// 1. Uma linha do detalhamento mês a mês
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthBreakdown {
    #[schema(example = "April 2024")]
    pub month: String,
    pub income: Decimal,
    pub tax_paid: Decimal,
    pub deductions: Decimal,
}

// 2. Resumo anual (visão derivada, nunca gravada)
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    pub total_income: Decimal,
    pub total_tax: Decimal,
    pub total_deductions: Decimal,
    pub total_investments: Decimal,
    pub tax_saved: Decimal,
    pub months_tracked: usize,
    /// Variação % entre a média do começo e a do fim da série; cada janela
    /// tem min(3, meses / 2) meses
    pub trend: i64,
    pub breakdown: Vec<MonthBreakdown>,
}

// 3. Séries para os gráficos
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyData {
    pub months: Vec<String>,
    pub incomes: Vec<Decimal>,
    pub take_home: Decimal,
    pub tds: Decimal,
    pub pf: Decimal,
    pub other_deductions: Decimal,
}

// 4. Progresso das economias (80C / 80D)
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct Savings {
    #[serde(rename = "invested80C")]
    pub invested_80c: Decimal,
    #[serde(rename = "invested80D")]
    pub invested_80d: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub summary: YearlySummary,
    pub monthly_data: MonthlyData,
    pub savings: Savings,
}
