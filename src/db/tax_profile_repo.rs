// src/db/tax_profile_repo.rs

use sqlx::{Executor, PgConnection, PgPool, Postgres, types::Json};
use uuid::Uuid;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::tax::{Deductions, TaxProfile},
};

const PROFILE_COLUMNS: &str = r#"
    user_id, total_income, deductions, taxable_income, total_deductions,
    final_tax_payable, tax_calculated, created_at, updated_at
"#;

#[derive(Clone)]
pub struct TaxProfileRepository {
    pool: PgPool,
}

impl TaxProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Garante que o perfil existe (criação preguiçosa) e devolve a linha travada.
    pub async fn get_or_create_for_update(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        default_deductions: &Deductions,
        default_total: Decimal,
    ) -> Result<TaxProfile, AppError> {
        sqlx::query(
            r#"
            INSERT INTO tax_profiles (user_id, deductions, total_deductions)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(Json(default_deductions))
        .bind(default_total)
        .execute(&mut *conn)
        .await?;

        let sql = format!("SELECT {PROFILE_COLUMNS} FROM tax_profiles WHERE user_id = $1 FOR UPDATE");
        let profile = sqlx::query_as::<_, TaxProfile>(&sql)
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(profile)
    }

    pub async fn save<'e, E>(&self, executor: E, profile: &TaxProfile) -> Result<TaxProfile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE tax_profiles SET
                total_income = $2,
                deductions = $3,
                taxable_income = $4,
                total_deductions = $5,
                final_tax_payable = $6,
                tax_calculated = $7,
                updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let saved = sqlx::query_as::<_, TaxProfile>(&sql)
            .bind(profile.user_id)
            .bind(profile.total_income)
            .bind(Json(&profile.deductions))
            .bind(profile.taxable_income)
            .bind(profile.total_deductions)
            .bind(profile.final_tax_payable)
            .bind(profile.tax_calculated)
            .fetch_one(executor)
            .await?;

        Ok(saved)
    }
}
