// src/services/aggregator.rs

//! Visões derivadas do livro mensal. Nada aqui é gravado; tudo é
//! recalculado a cada requisição a partir dos registros.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;

use crate::models::{
    dashboard::{MonthBreakdown, MonthlyData, Savings, YearlySummary},
    ledger::MonthlyRecord,
};

const TREND_WINDOW: usize = 3;

/// Mantém só os meses cujo rótulo contém o ano pedido.
pub fn filter_by_year<'a>(records: &'a [MonthlyRecord], year: Option<&str>) -> Vec<&'a MonthlyRecord> {
    match year.map(str::trim).filter(|y| !y.is_empty()) {
        Some(year) => records.iter().filter(|r| r.month.contains(year)).collect(),
        None => records.iter().collect(),
    }
}

/// Soma os registros (já em ordem cronológica) no resumo anual.
/// `tax_saved` fica zerado; quem tem a calculadora preenche.
pub fn summarize(records: &[&MonthlyRecord]) -> YearlySummary {
    let incomes: Vec<Decimal> = records.iter().map(|r| r.income).collect();

    YearlySummary {
        total_income: incomes.iter().copied().sum(),
        total_tax: records.iter().map(|r| r.tax_paid).sum(),
        total_deductions: records.iter().map(|r| r.deductions).sum(),
        total_investments: records.iter().map(|r| r.total_investments()).sum(),
        tax_saved: Decimal::ZERO,
        months_tracked: records.len(),
        trend: income_trend(&incomes),
        breakdown: records
            .iter()
            .map(|r| MonthBreakdown {
                month: r.month.clone(),
                income: r.income,
                tax_paid: r.tax_paid,
                deductions: r.deductions,
            })
            .collect(),
    }
}

/// Indicador simples de momento: variação % entre a média do começo e a
/// média do fim da série. Não é uma tendência estatística.
///
/// As janelas têm até 3 meses e nunca se sobrepõem (cada uma fica com no
/// máximo metade da série). Menos de 2 pontos, ou média inicial zero, dá 0.
pub fn income_trend(incomes: &[Decimal]) -> i64 {
    if incomes.len() < 2 {
        return 0;
    }

    let window = TREND_WINDOW.min(incomes.len() / 2);
    let first_avg = average(&incomes[..window]);
    let last_avg = average(&incomes[incomes.len() - window..]);

    if first_avg.is_zero() {
        return 0;
    }

    ((last_avg - first_avg) / first_avg * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

fn average(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
}

/// Séries dos gráficos do painel.
pub fn monthly_data(records: &[&MonthlyRecord]) -> MonthlyData {
    let take_home: Decimal = records.iter().map(|r| r.net_pay).sum();
    let tds: Decimal = records.iter().map(|r| r.tax_paid).sum();
    let pf: Decimal = records.iter().map(|r| r.provident_fund).sum();
    let deductions: Decimal = records.iter().map(|r| r.deductions).sum();

    MonthlyData {
        months: records.iter().map(|r| r.month.clone()).collect(),
        incomes: records.iter().map(|r| r.income).collect(),
        take_home,
        tds,
        pf,
        other_deductions: (deductions - tds - pf).max(Decimal::ZERO),
    }
}

/// 80C = todos os instrumentos; 80D = prêmios de seguro saúde.
pub fn savings(records: &[&MonthlyRecord]) -> Savings {
    Savings {
        invested_80c: records.iter().map(|r| r.total_investments()).sum(),
        invested_80d: records.iter().map(|r| r.total_insurance()).sum(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::ledger::{InsurancePayer, Investment, MonthlyRecordUpdate};

    fn record(month: &str, income: Decimal, deductions: Decimal) -> MonthlyRecord {
        let mut r = MonthlyRecord::empty(month);
        r.apply(MonthlyRecordUpdate {
            income: Some(income),
            deductions: Some(deductions),
            net_pay: Some(income - deductions),
            ..Default::default()
        });
        r
    }

    fn quarter() -> Vec<MonthlyRecord> {
        vec![
            record("January 2024", dec!(10000), dec!(1000)),
            record("February 2024", dec!(12000), dec!(1000)),
            record("March 2024", dec!(14000), dec!(1000)),
        ]
    }

    // =========================================================================
    // summarize
    // =========================================================================

    #[test]
    fn summarize_three_months() {
        let records = quarter();
        let refs: Vec<&MonthlyRecord> = records.iter().collect();

        let summary = summarize(&refs);

        assert_eq!(summary.total_income, dec!(36000));
        assert_eq!(summary.total_deductions, dec!(3000));
        assert_eq!(summary.total_tax, dec!(900));
        assert_eq!(summary.months_tracked, 3);
        assert_eq!(summary.trend, 40);
        assert_eq!(summary.breakdown.len(), 3);
        assert_eq!(summary.breakdown[0].month, "January 2024");
    }

    #[test]
    fn summarize_sums_investments_across_instruments() {
        let mut jan = record("January 2024", dec!(10000), dec!(0));
        jan.investments.insert(Investment::Ppf, dec!(1000));
        jan.investments.insert(Investment::Elss, dec!(500));
        let mut feb = record("February 2024", dec!(10000), dec!(0));
        feb.investments.insert(Investment::Nsc, dec!(250));

        let summary = summarize(&[&jan, &feb]);

        assert_eq!(summary.total_investments, dec!(1750));
    }

    #[test]
    fn summarize_empty_ledger() {
        let summary = summarize(&[]);

        assert_eq!(summary, YearlySummary::default());
    }

    #[test]
    fn filter_by_year_uses_substring() {
        let mut records = quarter();
        records.push(record("December 2023", dec!(9000), dec!(0)));

        assert_eq!(filter_by_year(&records, Some("2024")).len(), 3);
        assert_eq!(filter_by_year(&records, Some("2023")).len(), 1);
        assert_eq!(filter_by_year(&records, None).len(), 4);
        assert_eq!(filter_by_year(&records, Some(" ")).len(), 4);
    }

    // =========================================================================
    // income_trend
    // =========================================================================

    #[test]
    fn trend_needs_two_points() {
        assert_eq!(income_trend(&[]), 0);
        assert_eq!(income_trend(&[dec!(5000)]), 0);
    }

    #[test]
    fn trend_with_two_points_compares_them() {
        assert_eq!(income_trend(&[dec!(10000), dec!(15000)]), 50);
    }

    #[test]
    fn trend_with_four_points_uses_two_month_windows() {
        // janelas de 2: média 100 contra média 150
        assert_eq!(income_trend(&[dec!(100), dec!(100), dec!(100), dec!(200)]), 50);
    }

    #[test]
    fn trend_uses_three_month_windows_on_long_series() {
        let incomes = [
            dec!(100), dec!(100), dec!(100), dec!(500), dec!(500), dec!(200), dec!(200), dec!(200),
        ];

        assert_eq!(income_trend(&incomes), 100);
    }

    #[test]
    fn trend_can_be_negative() {
        assert_eq!(income_trend(&[dec!(20000), dec!(15000)]), -25);
    }

    #[test]
    fn trend_rounds_to_nearest_integer() {
        // 1/3 de alta = 33.33...%
        assert_eq!(income_trend(&[dec!(3000), dec!(4000)]), 33);
        // 2/3 = 66.66...%
        assert_eq!(income_trend(&[dec!(3000), dec!(5000)]), 67);
    }

    #[test]
    fn trend_guards_zero_start() {
        assert_eq!(income_trend(&[dec!(0), dec!(15000)]), 0);
    }

    // =========================================================================
    // monthly_data / savings
    // =========================================================================

    #[test]
    fn monthly_data_splits_deductions() {
        let mut jan = record("January 2024", dec!(50000), dec!(10000));
        jan.provident_fund = dec!(1800);

        let data = monthly_data(&[&jan]);

        assert_eq!(data.months, vec!["January 2024"]);
        assert_eq!(data.incomes, vec![dec!(50000)]);
        assert_eq!(data.take_home, dec!(40000));
        assert_eq!(data.tds, dec!(3000));
        assert_eq!(data.pf, dec!(1800));
        assert_eq!(data.other_deductions, dec!(5200));
    }

    #[test]
    fn other_deductions_never_negative() {
        let mut jan = record("January 2024", dec!(50000), dec!(1000));
        jan.provident_fund = dec!(5000);

        assert_eq!(monthly_data(&[&jan]).other_deductions, Decimal::ZERO);
    }

    #[test]
    fn savings_split_80c_and_80d() {
        let mut jan = record("January 2024", dec!(50000), dec!(0));
        jan.investments.insert(Investment::LifeInsurance, dec!(12000));
        jan.insurance.insert(InsurancePayer::Myself, dec!(8000));
        jan.insurance.insert(InsurancePayer::Parents, dec!(15000));

        let s = savings(&[&jan]);

        assert_eq!(s.invested_80c, dec!(12000));
        assert_eq!(s.invested_80d, dec!(23000));
    }
}
