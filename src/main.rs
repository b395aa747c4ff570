// src/main.rs

use std::net::SocketAddr;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::{
    config::{AppState, Settings},
    docs::ApiDoc,
    middleware::auth::auth_guard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new(&settings).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(app_state);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    // O limitador de login precisa do IP do cliente
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas protegidas pelo auth_guard
    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let payslip_routes = Router::new()
        .route(
            "/",
            get(handlers::payslips::list_payslips).delete(handlers::payslips::clear_payslips),
        )
        .route("/extract", post(handlers::payslips::extract_payslip))
        .route("/{id}", delete(handlers::payslips::delete_payslip));

    let ledger_routes = Router::new()
        .route(
            "/",
            post(handlers::ledger::save_month).get(handlers::ledger::get_all_months),
        )
        .route("/months", get(handlers::ledger::list_months))
        .route("/{month}", get(handlers::ledger::get_month));

    let tax_routes = Router::new()
        .route("/profile", get(handlers::tax::get_profile))
        .route("/update-income", post(handlers::tax::update_income))
        .route("/update-deduction", post(handlers::tax::update_deduction))
        .route("/analyze-income", post(handlers::tax::analyze_income))
        .route("/calculate", post(handlers::tax::calculate))
        .route(
            "/documents",
            post(handlers::tax::save_tax_document).get(handlers::tax::list_tax_documents),
        );

    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/payslips", payslip_routes)
        .nest("/api/financial-data", ledger_routes)
        .nest("/api/tax", tax_routes)
        .route("/api/financial-summary", get(handlers::dashboard::get_financial_summary))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
