// src/services/dashboard_service.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{FinancialSummary, Savings},
        ledger::MonthlyRecord,
        tax::{DeductionSection, Deductions},
    },
    services::{aggregator, ledger_service::LedgerService, tax_calculator::calculate_tax},
};

#[derive(Clone)]
pub struct DashboardService {
    ledger: LedgerService,
}

impl DashboardService {
    pub fn new(ledger: LedgerService) -> Self {
        Self { ledger }
    }

    pub async fn financial_summary(&self, user_id: Uuid, year: Option<&str>) -> Result<FinancialSummary, AppError> {
        let records = self.ledger.get_chronological(user_id).await?;
        Ok(build_summary(&records, year))
    }
}

/// Monta o painel a partir dos registros já em ordem cronológica.
pub fn build_summary(records: &[MonthlyRecord], year: Option<&str>) -> FinancialSummary {
    let selected = aggregator::filter_by_year(records, year);

    let mut summary = aggregator::summarize(&selected);
    let savings = aggregator::savings(&selected);
    summary.tax_saved = tax_saved(summary.total_income, &savings);

    FinancialSummary {
        summary,
        monthly_data: aggregator::monthly_data(&selected),
        savings,
    }
}

/// Diferença entre o imposto sem e com os investimentos 80C/80D.
pub fn tax_saved(total_income: Decimal, savings: &Savings) -> Decimal {
    let without = calculate_tax(total_income, &Deductions::new());

    let with_investments: Deductions = BTreeMap::from([
        (DeductionSection::Section80C, savings.invested_80c),
        (DeductionSection::Section80D, savings.invested_80d),
    ]);
    let with = calculate_tax(total_income, &with_investments);

    (without.tax_payable - with.tax_payable).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::ledger::{InsurancePayer, Investment, MonthlyRecordUpdate};

    fn month(key: &str, income: Decimal) -> MonthlyRecord {
        let mut r = MonthlyRecord::empty(key);
        r.apply(MonthlyRecordUpdate { income: Some(income), ..Default::default() });
        r
    }

    #[test]
    fn no_investments_saves_nothing() {
        assert_eq!(tax_saved(dec!(600000), &Savings::default()), dec!(0));
    }

    #[test]
    fn investments_reduce_tax_at_marginal_rate() {
        // 550000 tributável cai para 500000: 50000 a 20%
        let savings = Savings { invested_80c: dec!(50000), invested_80d: dec!(0) };

        assert_eq!(tax_saved(dec!(600000), &savings), dec!(10000));
    }

    #[test]
    fn summary_filters_year_and_fills_tax_saved() {
        let mut records = vec![
            month("December 2023", dec!(100000)),
            month("January 2024", dec!(300000)),
            month("February 2024", dec!(300000)),
        ];
        records[1].investments.insert(Investment::Ppf, dec!(30000));
        records[2].insurance.insert(InsurancePayer::Parents, dec!(20000));

        let dashboard = build_summary(&records, Some("2024"));

        assert_eq!(dashboard.summary.months_tracked, 2);
        assert_eq!(dashboard.summary.total_income, dec!(600000));
        assert_eq!(dashboard.summary.tax_saved, dec!(10000));
        assert_eq!(dashboard.monthly_data.months, vec!["January 2024", "February 2024"]);
        assert_eq!(dashboard.savings.invested_80c, dec!(30000));
        assert_eq!(dashboard.savings.invested_80d, dec!(20000));
    }
}
