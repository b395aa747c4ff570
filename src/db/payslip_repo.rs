// src/db/payslip_repo.rs

use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payslip::{ExtractedPayslip, PayslipEntry},
};

#[derive(Clone)]
pub struct PayslipRepository {
    pool: PgPool,
}

impl PayslipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        filename: Option<&str>,
        extracted: &ExtractedPayslip,
    ) -> Result<PayslipEntry, AppError> {
        let entry = sqlx::query_as::<_, PayslipEntry>(
            r#"
            INSERT INTO payslips (id, user_id, filename, extracted_data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, filename, extracted_data, uploaded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(filename)
        .bind(Json(extracted))
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<PayslipEntry>, AppError> {
        let entries = sqlx::query_as::<_, PayslipEntry>(
            r#"
            SELECT id, filename, extracted_data, uploaded_at
            FROM payslips
            WHERE user_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    // Retorna quantas linhas saíram; 0 significa que o item não é do usuário ou não existe.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM payslips WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM payslips WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
