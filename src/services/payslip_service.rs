// src/services/payslip_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PayslipRepository,
    models::payslip::PayslipEntry,
    services::payslip_parser::PayslipParser,
};

#[derive(Clone)]
pub struct PayslipService {
    repo: PayslipRepository,
    parser: Arc<PayslipParser>,
}

impl PayslipService {
    pub fn new(repo: PayslipRepository, parser: Arc<PayslipParser>) -> Self {
        Self { repo, parser }
    }

    /// Roda o parser sobre o texto do OCR e guarda o resultado no histórico.
    pub async fn extract(&self, user_id: Uuid, text: &str, filename: Option<&str>) -> Result<PayslipEntry, AppError> {
        let extracted = self.parser.parse(text);
        let entry = self.repo.create(user_id, filename, &extracted).await?;

        tracing::info!(%user_id, payslip_id = %entry.id, "Holerite extraído");
        Ok(entry)
    }

    pub async fn history(&self, user_id: Uuid) -> Result<Vec<PayslipEntry>, AppError> {
        self.repo.list(user_id).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        match self.repo.delete(user_id, id).await? {
            0 => Err(AppError::PayslipNotFound),
            _ => Ok(()),
        }
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<u64, AppError> {
        let removed = self.repo.clear(user_id).await?;
        tracing::info!(%user_id, removed, "Histórico de holerites limpo");
        Ok(removed)
    }
}
