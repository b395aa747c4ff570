// src/services/tax_document_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TaxDocumentRepository,
    models::tax_document::{SaveTaxDocumentPayload, TaxDocument},
};

#[derive(Clone)]
pub struct TaxDocumentService {
    repo: TaxDocumentRepository,
}

impl TaxDocumentService {
    pub fn new(repo: TaxDocumentRepository) -> Self {
        Self { repo }
    }

    pub async fn save(&self, user_id: Uuid, payload: &SaveTaxDocumentPayload) -> Result<TaxDocument, AppError> {
        let doc = self.repo.create(user_id, &payload.to_new()).await?;

        tracing::info!(%user_id, document_id = %doc.id, document_type = %doc.document_type, "Comprovante fiscal salvo");
        Ok(doc)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<TaxDocument>, AppError> {
        self.repo.list(user_id).await
    }
}
