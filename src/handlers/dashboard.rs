// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{dashboard::FinancialSummary, tax::YearQuery},
};

// GET /api/financial-summary
#[utoipa::path(
    get,
    path = "/api/financial-summary",
    tag = "Dashboard",
    params(YearQuery),
    responses(
        (status = 200, description = "Resumo anual, séries dos gráficos e economias 80C/80D", body = FinancialSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_financial_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dashboard_service
        .financial_summary(user.id, query.year.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(summary)))
}
