// src/services/tax_calculator.rs

//! Cálculo do imposto de renda no regime de quatro faixas progressivas.
//! Função pura: mesma entrada, mesma saída.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::tax::{DeductionSection, Deductions, TaxCalculation};

pub const SECTION_80C_CAP: Decimal = dec!(150000);
pub const DEFAULT_STANDARD_DEDUCTION: Decimal = dec!(50000);

/// Uma faixa: alíquota marginal aplicada à parte da renda entre `lower` e `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxSlab {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

pub const TAX_SLABS: [TaxSlab; 4] = [
    TaxSlab { lower: dec!(0), upper: Some(dec!(250000)), rate: dec!(0) },
    TaxSlab { lower: dec!(250000), upper: Some(dec!(500000)), rate: dec!(0.05) },
    TaxSlab { lower: dec!(500000), upper: Some(dec!(1000000)), rate: dec!(0.20) },
    TaxSlab { lower: dec!(1000000), upper: None, rate: dec!(0.30) },
];

/// Soma das deduções aplicáveis, com o teto da 80C e a dedução padrão
/// assumida quando não informada.
pub fn total_deductions(deductions: &Deductions) -> Decimal {
    DeductionSection::ALL
        .iter()
        .map(|section| {
            let claimed = deductions.get(section).copied();
            let amount = match section {
                DeductionSection::Section80C => claimed.unwrap_or_default().min(SECTION_80C_CAP),
                DeductionSection::StandardDeduction => claimed.unwrap_or(DEFAULT_STANDARD_DEDUCTION),
                _ => claimed.unwrap_or_default(),
            };
            amount.max(Decimal::ZERO)
        })
        .sum()
}

/// Imposto progressivo: cada faixa tributa só a sua fatia da renda.
pub fn tax_on(taxable_income: Decimal) -> Decimal {
    TAX_SLABS
        .iter()
        .filter(|slab| taxable_income > slab.lower)
        .map(|slab| {
            let top = match slab.upper {
                Some(upper) => taxable_income.min(upper),
                None => taxable_income,
            };
            (top - slab.lower) * slab.rate
        })
        .sum::<Decimal>()
        .round_dp(2)
}

pub fn calculate_tax(total_income: Decimal, deductions: &Deductions) -> TaxCalculation {
    let total_income = total_income.max(Decimal::ZERO);
    let total_deductions = total_deductions(deductions);
    let taxable_income = (total_income - total_deductions).max(Decimal::ZERO);
    let tax_payable = tax_on(taxable_income);

    let effective_tax_rate = if total_income.is_zero() {
        Decimal::ZERO
    } else {
        (tax_payable / total_income * Decimal::ONE_HUNDRED).round_dp(2)
    };

    TaxCalculation {
        total_income,
        total_deductions,
        taxable_income,
        tax_payable,
        effective_tax_rate,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // calculate_tax
    // =========================================================================

    #[test]
    fn standard_deduction_defaults_when_absent() {
        let calc = calculate_tax(dec!(600000), &Deductions::new());

        assert_eq!(calc.total_deductions, dec!(50000));
        assert_eq!(calc.taxable_income, dec!(550000));
        assert_eq!(calc.tax_payable, dec!(22500));
        assert_eq!(calc.effective_tax_rate, dec!(3.75));
    }

    #[test]
    fn section_80c_is_capped() {
        let deductions = BTreeMap::from([(DeductionSection::Section80C, dec!(300000))]);

        assert_eq!(total_deductions(&deductions), dec!(200000));
    }

    #[test]
    fn every_section_is_summed() {
        let deductions = BTreeMap::from([
            (DeductionSection::Section80C, dec!(100000)),
            (DeductionSection::Section80D, dec!(25000)),
            (DeductionSection::Section80G, dec!(1000)),
            (DeductionSection::Section80E, dec!(2000)),
            (DeductionSection::Hra, dec!(60000)),
            (DeductionSection::Lta, dec!(10000)),
            (DeductionSection::ProfessionalTax, dec!(2400)),
            (DeductionSection::StandardDeduction, dec!(50000)),
        ]);

        assert_eq!(total_deductions(&deductions), dec!(250400));
    }

    #[test]
    fn explicit_standard_deduction_overrides_default() {
        let deductions = BTreeMap::from([(DeductionSection::StandardDeduction, dec!(0))]);

        assert_eq!(total_deductions(&deductions), dec!(0));
    }

    #[test]
    fn zero_bracket_pays_nothing() {
        let calc = calculate_tax(dec!(250000), &Deductions::new());

        assert_eq!(calc.taxable_income, dec!(200000));
        assert_eq!(calc.tax_payable, dec!(0));
    }

    #[test]
    fn zero_income_has_zero_rate() {
        let calc = calculate_tax(dec!(0), &Deductions::new());

        assert_eq!(calc.taxable_income, dec!(0));
        assert_eq!(calc.tax_payable, dec!(0));
        assert_eq!(calc.effective_tax_rate, dec!(0));
    }

    #[test]
    fn deductions_larger_than_income_floor_at_zero() {
        let deductions = BTreeMap::from([(DeductionSection::Hra, dec!(900000))]);

        let calc = calculate_tax(dec!(400000), &deductions);

        assert_eq!(calc.taxable_income, dec!(0));
    }

    // =========================================================================
    // tax_on
    // =========================================================================

    #[test]
    fn slabs_are_progressive() {
        assert_eq!(tax_on(dec!(250000)), dec!(0));
        assert_eq!(tax_on(dec!(300000)), dec!(2500));
        assert_eq!(tax_on(dec!(500000)), dec!(12500));
        assert_eq!(tax_on(dec!(1000000)), dec!(112500));
        assert_eq!(tax_on(dec!(1500000)), dec!(262500));
    }

    #[test]
    fn slab_table_is_contiguous() {
        for pair in TAX_SLABS.windows(2) {
            assert_eq!(pair[0].upper, Some(pair[1].lower));
        }
        assert_eq!(TAX_SLABS.last().unwrap().upper, None);
    }
}
