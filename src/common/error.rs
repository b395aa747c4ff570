use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro interno, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Too many login attempts")]
    TooManyLoginAttempts,

    // A data do holerite não casou com nenhum formato conhecido
    #[error("Month not determined from date {0:?}")]
    MonthNotDetermined(Option<String>),

    #[error("Payslip not found")]
    PayslipNotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que vai para o fio (JSON)
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::MonthNotDetermined(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound | AppError::PayslipNotFound => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::TooManyLoginAttempts => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Traduz o erro interno para a mensagem pública no idioma do cliente.
    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let pt = locale.is_portuguese();
        let status = self.status();

        let (message, details) = match &self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                                .into()
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                let msg = if pt { "Um ou mais campos são inválidos." } else { "One or more fields are invalid." };
                (msg.to_string(), Some(Value::Object(details)))
            }
            AppError::EmailAlreadyExists => (
                pick(pt, "Este e-mail já está em uso.", "This email is already in use."),
                None,
            ),
            AppError::InvalidCredentials => (
                pick(pt, "E-mail ou senha inválidos.", "Invalid email or password."),
                None,
            ),
            AppError::InvalidToken => (
                pick(
                    pt,
                    "Token de autenticação inválido ou ausente.",
                    "Authentication token is missing or invalid.",
                ),
                None,
            ),
            AppError::UserNotFound => (pick(pt, "Usuário não encontrado.", "User not found."), None),
            AppError::TooManyLoginAttempts => (
                pick(
                    pt,
                    "Muitas tentativas de login. Tente novamente mais tarde.",
                    "Too many login attempts. Please try again later.",
                ),
                None,
            ),
            AppError::MonthNotDetermined(date) => (
                pick(
                    pt,
                    "Não foi possível determinar o mês a partir da data informada.",
                    "Could not determine the month from the given date.",
                ),
                Some(json!({ "date": date })),
            ),
            AppError::PayslipNotFound => (pick(pt, "Holerite não encontrado.", "Payslip not found."), None),

            // Todo o resto vira 500. O detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    pick(pt, "Ocorreu um erro inesperado.", "An unexpected error occurred."),
                    None,
                )
            }
        };

        ApiError { status, error: message, details }
    }
}

fn pick(pt: bool, pt_msg: &str, en_msg: &str) -> String {
    if pt { pt_msg.to_string() } else { en_msg.to_string() }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado pelos middlewares, que não têm acesso ao Locale
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
