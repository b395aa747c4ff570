// src/db/login_attempt_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::common::error::AppError;

// Contador de falhas de login por identidade (IP + e-mail)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct LoginAttempt {
    pub attempts: i32,
    pub window_started_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct LoginAttemptRepository {
    pool: PgPool,
}

impl LoginAttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, identity: &str) -> Result<Option<LoginAttempt>, AppError> {
        let attempt = sqlx::query_as::<_, LoginAttempt>(
            "SELECT attempts, window_started_at FROM login_attempts WHERE identity = $1",
        )
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }

    // Registra uma falha. Se a janela anterior já venceu, recomeça a contagem.
    pub async fn record_failure(
        &self,
        identity: &str,
        window_expired_before: DateTime<Utc>,
    ) -> Result<LoginAttempt, AppError> {
        let attempt = sqlx::query_as::<_, LoginAttempt>(
            r#"
            INSERT INTO login_attempts (identity, attempts, window_started_at)
            VALUES ($1, 1, now())
            ON CONFLICT (identity) DO UPDATE SET
                attempts = CASE
                    WHEN login_attempts.window_started_at < $2 THEN 1
                    ELSE login_attempts.attempts + 1
                END,
                window_started_at = CASE
                    WHEN login_attempts.window_started_at < $2 THEN now()
                    ELSE login_attempts.window_started_at
                END
            RETURNING attempts, window_started_at
            "#,
        )
        .bind(identity)
        .bind(window_expired_before)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    pub async fn clear(&self, identity: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM login_attempts WHERE identity = $1")
            .bind(identity)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
