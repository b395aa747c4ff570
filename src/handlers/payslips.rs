// src/handlers/payslips.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::payslip::{ClearHistoryResponse, ExtractPayslipPayload, PayslipEntry},
};

// POST /api/payslips/extract
#[utoipa::path(
    post,
    path = "/api/payslips/extract",
    tag = "Payslips",
    request_body = ExtractPayslipPayload,
    responses(
        (status = 201, description = "Campos extraídos do texto do OCR (qualquer um pode ser nulo)", body = PayslipEntry),
        (status = 400, description = "Texto vazio")
    ),
    security(("api_jwt" = []))
)]
pub async fn extract_payslip(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ExtractPayslipPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let entry = app_state
        .payslip_service
        .extract(user.id, &payload.text, payload.filename.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(entry)))
}

// GET /api/payslips
#[utoipa::path(
    get,
    path = "/api/payslips",
    tag = "Payslips",
    responses(
        (status = 200, description = "Histórico de extrações, mais recentes primeiro", body = Vec<PayslipEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payslips(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .payslip_service
        .history(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(entries)))
}

// DELETE /api/payslips/{id}
#[utoipa::path(
    delete,
    path = "/api/payslips/{id}",
    tag = "Payslips",
    params(("id" = Uuid, Path, description = "ID da extração")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_payslip(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .payslip_service
        .delete(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/payslips
#[utoipa::path(
    delete,
    path = "/api/payslips",
    tag = "Payslips",
    responses(
        (status = 200, description = "Histórico limpo", body = ClearHistoryResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn clear_payslips(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let removed = app_state
        .payslip_service
        .clear(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ClearHistoryResponse { removed })))
}
