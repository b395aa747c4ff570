// src/handlers/ledger.rs

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::ledger::{MonthlyRecord, SaveMonthPayload},
};

// POST /api/financial-data
#[utoipa::path(
    post,
    path = "/api/financial-data",
    tag = "Financial Data",
    request_body = SaveMonthPayload,
    responses(
        (status = 200, description = "Mês gravado (mesclado com o que já existia)", body = MonthlyRecord),
        (status = 400, description = "Não foi possível determinar o mês pela data")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_month(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SaveMonthPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let record = app_state
        .ledger_service
        .upsert(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(record)))
}

// GET /api/financial-data
#[utoipa::path(
    get,
    path = "/api/financial-data",
    tag = "Financial Data",
    responses(
        (status = 200, description = "Todos os meses do usuário, por rótulo", body = BTreeMap<String, MonthlyRecord>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all_months(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<BTreeMap<String, MonthlyRecord>>, ApiError> {
    let records = app_state
        .ledger_service
        .get_all(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(records))
}

// GET /api/financial-data/months
#[utoipa::path(
    get,
    path = "/api/financial-data/months",
    tag = "Financial Data",
    responses(
        (status = 200, description = "Rótulos dos meses em ordem cronológica", body = Vec<String>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_months(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let months = app_state
        .ledger_service
        .list_months(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(months)))
}

// GET /api/financial-data/{month}
#[utoipa::path(
    get,
    path = "/api/financial-data/{month}",
    tag = "Financial Data",
    params(("month" = String, Path, description = "Rótulo do mês, ex: April 2024")),
    responses(
        (status = 200, description = "O mês pedido (vazio se ainda não existe)", body = MonthlyRecord)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_month(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(month): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = app_state
        .ledger_service
        .get_month(user.id, &month)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(record)))
}
