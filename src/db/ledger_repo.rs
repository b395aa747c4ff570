// src/db/ledger_repo.rs

use sqlx::{Executor, PgConnection, PgPool, Postgres, types::Json};
use uuid::Uuid;

use crate::{common::error::AppError, models::ledger::MonthlyRecord};

const RECORD_COLUMNS: &str = r#"
    month_key, income, deductions, net_pay, tax_paid, provident_fund,
    employer, date_raw, investments, insurance, updated_at
"#;

#[derive(Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Garante que a linha do mês existe e a trava até o fim da transação.
    // Dois primeiros saves concorrentes do mesmo mês passam a se enfileirar.
    pub async fn lock_month(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        month_key: &str,
    ) -> Result<MonthlyRecord, AppError> {
        sqlx::query(
            r#"
            INSERT INTO monthly_records (user_id, month_key)
            VALUES ($1, $2)
            ON CONFLICT (user_id, month_key) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(month_key)
        .execute(&mut *conn)
        .await?;

        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM monthly_records WHERE user_id = $1 AND month_key = $2 FOR UPDATE"
        );
        let record = sqlx::query_as::<_, MonthlyRecord>(&sql)
            .bind(user_id)
            .bind(month_key)
            .fetch_one(&mut *conn)
            .await?;

        Ok(record)
    }

    pub async fn find_month(&self, user_id: Uuid, month_key: &str) -> Result<Option<MonthlyRecord>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM monthly_records WHERE user_id = $1 AND month_key = $2"
        );
        let record = sqlx::query_as::<_, MonthlyRecord>(&sql)
            .bind(user_id)
            .bind(month_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    // A ordem cronológica é decidida no serviço; aqui só a ordem estável por chave.
    pub async fn list_months(&self, user_id: Uuid) -> Result<Vec<MonthlyRecord>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM monthly_records WHERE user_id = $1 ORDER BY month_key ASC"
        );
        let records = sqlx::query_as::<_, MonthlyRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    pub async fn list_month_keys(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let keys = sqlx::query_scalar::<_, String>(
            "SELECT month_key FROM monthly_records WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    // Grava o registro já mesclado. A chave (user_id, month_key) garante um por mês.
    pub async fn upsert_month<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        record: &MonthlyRecord,
    ) -> Result<MonthlyRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO monthly_records (
                user_id, month_key, income, deductions, net_pay, tax_paid, provident_fund,
                employer, date_raw, investments, insurance, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now())
            ON CONFLICT (user_id, month_key) DO UPDATE SET
                income = EXCLUDED.income,
                deductions = EXCLUDED.deductions,
                net_pay = EXCLUDED.net_pay,
                tax_paid = EXCLUDED.tax_paid,
                provident_fund = EXCLUDED.provident_fund,
                employer = EXCLUDED.employer,
                date_raw = EXCLUDED.date_raw,
                investments = EXCLUDED.investments,
                insurance = EXCLUDED.insurance,
                updated_at = now()
            RETURNING {RECORD_COLUMNS}
            "#
        );
        let saved = sqlx::query_as::<_, MonthlyRecord>(&sql)
            .bind(user_id)
            .bind(&record.month)
            .bind(record.income)
            .bind(record.deductions)
            .bind(record.net_pay)
            .bind(record.tax_paid)
            .bind(record.provident_fund)
            .bind(record.employer.as_deref())
            .bind(record.date_raw.as_deref())
            .bind(Json(&record.investments))
            .bind(Json(&record.insurance))
            .fetch_one(executor)
            .await?;

        Ok(saved)
    }
}
