// src/handlers/tax.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        numeric::coerce_non_negative,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        tax::{
            DeductionSection, TaxCalculationResponse, TaxProfile, UpdateDeductionPayload, UpdateIncomePayload,
            YearQuery,
        },
        tax_document::{SaveTaxDocumentPayload, TaxDocument},
    },
};

// GET /api/tax/profile
#[utoipa::path(
    get,
    path = "/api/tax/profile",
    tag = "Tax",
    responses(
        (status = 200, description = "Perfil fiscal (criado com os padrões na primeira leitura)", body = TaxProfile)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .tax_service
        .get_profile(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(profile)))
}

// POST /api/tax/update-income
#[utoipa::path(
    post,
    path = "/api/tax/update-income",
    tag = "Tax",
    request_body = UpdateIncomePayload,
    responses(
        (status = 200, description = "Renda anual atualizada", body = TaxProfile)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_income(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateIncomePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .tax_service
        .update_income(user.id, coerce_non_negative(&payload.income))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(profile)))
}

// POST /api/tax/update-deduction
#[utoipa::path(
    post,
    path = "/api/tax/update-deduction",
    tag = "Tax",
    request_body = UpdateDeductionPayload,
    responses(
        (status = 200, description = "Dedução mesclada no perfil", body = TaxProfile),
        (status = 400, description = "Seção desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_deduction(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateDeductionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let section: DeductionSection = payload
        .section
        .parse()
        .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("seção validada sem correspondência")).to_api_error(&locale))?;

    let profile = app_state
        .tax_service
        .update_deduction(user.id, section, coerce_non_negative(&payload.amount))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(profile)))
}

// POST /api/tax/analyze-income
#[utoipa::path(
    post,
    path = "/api/tax/analyze-income",
    tag = "Tax",
    params(YearQuery),
    responses(
        (status = 200, description = "Renda do perfil substituída pelo total do livro mensal", body = TaxProfile)
    ),
    security(("api_jwt" = []))
)]
pub async fn analyze_income(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .tax_service
        .sync_income_from_ledger(user.id, query.year.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(profile)))
}

// POST /api/tax/calculate
#[utoipa::path(
    post,
    path = "/api/tax/calculate",
    tag = "Tax",
    responses(
        (status = 200, description = "Cálculo pelas faixas progressivas", body = TaxCalculationResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn calculate(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let response = app_state
        .tax_service
        .calculate(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(response)))
}

// POST /api/tax/documents
#[utoipa::path(
    post,
    path = "/api/tax/documents",
    tag = "Tax",
    request_body = SaveTaxDocumentPayload,
    responses(
        (status = 201, description = "Comprovante registrado", body = TaxDocument),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_tax_document(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SaveTaxDocumentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let doc = app_state
        .tax_document_service
        .save(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(doc)))
}

// GET /api/tax/documents
#[utoipa::path(
    get,
    path = "/api/tax/documents",
    tag = "Tax",
    responses(
        (status = 200, description = "Comprovantes do usuário, mais recentes primeiro", body = Vec<TaxDocument>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tax_documents(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let docs = app_state
        .tax_document_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(docs)))
}
