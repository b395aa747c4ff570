// src/services/tax_service.rs

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TaxProfileRepository,
    models::tax::{DeductionSection, Deductions, TaxCalculation, TaxCalculationResponse, TaxProfile},
    services::{
        aggregator,
        ledger_service::LedgerService,
        tax_calculator::{DEFAULT_STANDARD_DEDUCTION, calculate_tax, total_deductions},
    },
};

#[derive(Clone)]
pub struct TaxService {
    repo: TaxProfileRepository,
    ledger: LedgerService,
}

impl TaxService {
    pub fn new(repo: TaxProfileRepository, ledger: LedgerService) -> Self {
        Self { repo, ledger }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<TaxProfile, AppError> {
        let mut tx = self.repo.pool().begin().await?;
        let profile = self.load(&mut *tx, user_id).await?;
        tx.commit().await?;
        Ok(profile)
    }

    pub async fn update_income(&self, user_id: Uuid, income: Decimal) -> Result<TaxProfile, AppError> {
        self.modify(user_id, |profile| set_income(profile, income)).await
    }

    pub async fn update_deduction(
        &self,
        user_id: Uuid,
        section: DeductionSection,
        amount: Decimal,
    ) -> Result<TaxProfile, AppError> {
        self.modify(user_id, |profile| set_deduction(profile, section, amount)).await
    }

    /// "Analisar minha renda": a renda do perfil passa a ser a soma do livro.
    pub async fn sync_income_from_ledger(&self, user_id: Uuid, year: Option<&str>) -> Result<TaxProfile, AppError> {
        let records = self.ledger.get_chronological(user_id).await?;
        let selected = aggregator::filter_by_year(&records, year);
        let total_income = aggregator::summarize(&selected).total_income;

        tracing::info!(%user_id, months = selected.len(), %total_income, "Renda sincronizada a partir do livro");
        self.update_income(user_id, total_income).await
    }

    pub async fn calculate(&self, user_id: Uuid) -> Result<TaxCalculationResponse, AppError> {
        let mut tax_calculation = None;
        let tax_profile = self
            .modify(user_id, |profile| {
                let calc = calculate_tax(profile.total_income, &profile.deductions);
                apply_calculation(profile, &calc);
                tax_calculation = Some(calc);
            })
            .await?;

        let tax_calculation = tax_calculation
            .ok_or_else(|| anyhow::anyhow!("Cálculo não executado para o perfil {}", user_id))?;

        tracing::info!(%user_id, tax_payable = %tax_calculation.tax_payable, "Imposto calculado");
        Ok(TaxCalculationResponse { tax_calculation, tax_profile })
    }

    // Lê (criando se preciso), altera e grava o perfil numa única transação.
    async fn modify<F>(&self, user_id: Uuid, change: F) -> Result<TaxProfile, AppError>
    where
        F: FnOnce(&mut TaxProfile),
    {
        let mut tx = self.repo.pool().begin().await?;

        let mut profile = self.load(&mut *tx, user_id).await?;
        change(&mut profile);
        let saved = self.repo.save(&mut *tx, &profile).await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn load(&self, tx: &mut sqlx::PgConnection, user_id: Uuid) -> Result<TaxProfile, AppError> {
        let defaults = default_deductions();
        let default_total = total_deductions(&defaults);
        self.repo
            .get_or_create_for_update(tx, user_id, &defaults, default_total)
            .await
    }
}

/// Perfil novo: 80C zerada e a dedução padrão preenchida.
pub fn default_deductions() -> Deductions {
    BTreeMap::from([
        (DeductionSection::Section80C, Decimal::ZERO),
        (DeductionSection::StandardDeduction, DEFAULT_STANDARD_DEDUCTION),
    ])
}

pub fn set_income(profile: &mut TaxProfile, income: Decimal) {
    profile.total_income = income.max(Decimal::ZERO);
    profile.tax_calculated = false;
}

pub fn set_deduction(profile: &mut TaxProfile, section: DeductionSection, amount: Decimal) {
    profile.deductions.insert(section, amount.max(Decimal::ZERO));
    profile.tax_calculated = false;
}

pub fn apply_calculation(profile: &mut TaxProfile, calc: &TaxCalculation) {
    profile.taxable_income = calc.taxable_income;
    profile.total_deductions = calc.total_deductions;
    profile.final_tax_payable = calc.tax_payable;
    profile.tax_calculated = true;
    profile.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn profile() -> TaxProfile {
        let now = Utc::now();
        let deductions = default_deductions();
        TaxProfile {
            user_id: Uuid::new_v4(),
            total_income: Decimal::ZERO,
            total_deductions: total_deductions(&deductions),
            deductions,
            taxable_income: Decimal::ZERO,
            final_tax_payable: Decimal::ZERO,
            tax_calculated: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn default_profile_has_standard_deduction() {
        let p = profile();

        assert_eq!(p.deductions[&DeductionSection::Section80C], dec!(0));
        assert_eq!(p.deductions[&DeductionSection::StandardDeduction], dec!(50000));
        assert_eq!(p.total_deductions, dec!(50000));
    }

    #[test]
    fn deduction_update_merges_and_marks_stale() {
        let mut p = profile();
        p.tax_calculated = true;

        set_deduction(&mut p, DeductionSection::Section80D, dec!(25000));
        set_deduction(&mut p, DeductionSection::Section80C, dec!(90000));

        assert_eq!(p.deductions.len(), 3);
        assert_eq!(p.deductions[&DeductionSection::Section80C], dec!(90000));
        assert_eq!(p.deductions[&DeductionSection::Section80D], dec!(25000));
        assert!(!p.tax_calculated);
    }

    #[test]
    fn negative_income_is_clamped() {
        let mut p = profile();

        set_income(&mut p, dec!(-10));

        assert_eq!(p.total_income, dec!(0));
    }

    #[test]
    fn calculation_is_stored_on_profile() {
        let mut p = profile();
        set_income(&mut p, dec!(600000));

        let calc = calculate_tax(p.total_income, &p.deductions);
        apply_calculation(&mut p, &calc);

        assert!(p.tax_calculated);
        assert_eq!(p.taxable_income, dec!(550000));
        assert_eq!(p.final_tax_payable, dec!(22500));
    }
}
