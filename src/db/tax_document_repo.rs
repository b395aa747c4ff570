// src/db/tax_document_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tax_document::{NewTaxDocument, TaxDocument},
};

#[derive(Clone)]
pub struct TaxDocumentRepository {
    pool: PgPool,
}

impl TaxDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, doc: &NewTaxDocument) -> Result<TaxDocument, AppError> {
        let saved = sqlx::query_as::<_, TaxDocument>(
            r#"
            INSERT INTO tax_documents (id, user_id, document_type, filename, verified, amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, document_type, filename, verified, amount, uploaded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&doc.document_type)
        .bind(doc.filename.as_deref())
        .bind(doc.verified)
        .bind(doc.amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<TaxDocument>, AppError> {
        let docs = sqlx::query_as::<_, TaxDocument>(
            r#"
            SELECT id, document_type, filename, verified, amount, uploaded_at
            FROM tax_documents
            WHERE user_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    const SCHEMA: &str = include_str!("../../migrations/20250102000000_tax_documents.sql");

    #[test]
    fn documents_follow_the_user_and_keep_any_amount() {
        assert!(SCHEMA.contains("REFERENCES users(id) ON DELETE CASCADE"));
        assert!(SCHEMA.contains("amount        NUMERIC NOT NULL DEFAULT 0"));
        assert!(!SCHEMA.contains("NUMERIC("));
    }
}
