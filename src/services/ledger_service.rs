// src/services/ledger_service.rs

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        month_key::{compare_month_keys, extract_month_key, sort_month_keys},
    },
    db::LedgerRepository,
    models::ledger::{MonthlyRecord, MonthlyRecordUpdate, SaveMonthPayload},
};

#[derive(Clone)]
pub struct LedgerService {
    repo: LedgerRepository,
}

impl LedgerService {
    pub fn new(repo: LedgerRepository) -> Self {
        Self { repo }
    }

    /// Grava (ou atualiza) o mês indicado pela data do payload.
    pub async fn upsert(&self, user_id: Uuid, payload: &SaveMonthPayload) -> Result<MonthlyRecord, AppError> {
        let month_key = resolve_month_key(payload.date.as_deref())?;

        let mut tx = self.repo.pool().begin().await?;

        let existing = self.repo.lock_month(&mut *tx, user_id, &month_key).await?;
        let merged = merge_month(Some(existing), &month_key, payload.to_update());
        let saved = self.repo.upsert_month(&mut *tx, user_id, &merged).await?;

        tx.commit().await?;

        tracing::info!(%user_id, month = %saved.month, "Mês gravado no livro");
        Ok(saved)
    }

    /// Um mês só; se não existe, devolve o registro vazio.
    pub async fn get_month(&self, user_id: Uuid, month: &str) -> Result<MonthlyRecord, AppError> {
        // "april 2024" e "April 2024" apontam para a mesma chave
        let key = extract_month_key(Some(month)).unwrap_or_else(|| month.trim().to_string());
        let record = self.repo.find_month(user_id, &key).await?;
        Ok(record.unwrap_or_else(|| MonthlyRecord::empty(&key)))
    }

    pub async fn get_all(&self, user_id: Uuid) -> Result<BTreeMap<String, MonthlyRecord>, AppError> {
        let records = self.repo.list_months(user_id).await?;
        Ok(records.into_iter().map(|r| (r.month.clone(), r)).collect())
    }

    /// Registros em ordem cronológica (meses ilegíveis no fim).
    pub async fn get_chronological(&self, user_id: Uuid) -> Result<Vec<MonthlyRecord>, AppError> {
        let mut records = self.repo.list_months(user_id).await?;
        records.sort_by(|a, b| compare_month_keys(&a.month, &b.month));
        Ok(records)
    }

    pub async fn list_months(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let mut keys = self.repo.list_month_keys(user_id).await?;
        sort_month_keys(&mut keys);
        Ok(keys)
    }
}

pub fn resolve_month_key(date: Option<&str>) -> Result<String, AppError> {
    extract_month_key(date).ok_or_else(|| {
        tracing::warn!(date = ?date, "Não foi possível determinar o mês");
        AppError::MonthNotDetermined(date.map(str::to_string))
    })
}

/// Mescla a atualização sobre o que já está gravado (ou sobre um mês vazio).
pub fn merge_month(existing: Option<MonthlyRecord>, month_key: &str, update: MonthlyRecordUpdate) -> MonthlyRecord {
    let mut record = existing.unwrap_or_else(|| MonthlyRecord::empty(month_key));
    record.apply(update);
    record
}
