// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Payslips ---
        handlers::payslips::extract_payslip,
        handlers::payslips::list_payslips,
        handlers::payslips::delete_payslip,
        handlers::payslips::clear_payslips,

        // --- Financial Data ---
        handlers::ledger::save_month,
        handlers::ledger::get_all_months,
        handlers::ledger::list_months,
        handlers::ledger::get_month,

        // --- Dashboard ---
        handlers::dashboard::get_financial_summary,

        // --- Tax ---
        handlers::tax::get_profile,
        handlers::tax::update_income,
        handlers::tax::update_deduction,
        handlers::tax::analyze_income,
        handlers::tax::calculate,
        handlers::tax::save_tax_document,
        handlers::tax::list_tax_documents,
    ),
    components(
        schemas(
            handlers::health::HealthResponse,

            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Payslips ---
            models::payslip::ExtractedPayslip,
            models::payslip::PayslipEntry,
            models::payslip::ExtractPayslipPayload,
            models::payslip::ClearHistoryResponse,

            // --- Ledger ---
            models::ledger::Investment,
            models::ledger::InsurancePayer,
            models::ledger::MonthlyRecord,
            models::ledger::SaveMonthPayload,

            // --- Dashboard ---
            models::dashboard::MonthBreakdown,
            models::dashboard::YearlySummary,
            models::dashboard::MonthlyData,
            models::dashboard::Savings,
            models::dashboard::FinancialSummary,

            // --- Tax ---
            models::tax::DeductionSection,
            models::tax::TaxProfile,
            models::tax::TaxCalculation,
            models::tax::TaxCalculationResponse,
            models::tax::UpdateIncomePayload,
            models::tax::UpdateDeductionPayload,
            models::tax_document::TaxDocument,
            models::tax_document::SaveTaxDocumentPayload,
        )
    ),
    tags(
        (name = "Health", description = "Estado do serviço"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Payslips", description = "Extração de holerites a partir do texto do OCR"),
        (name = "Financial Data", description = "Livro mensal de rendimentos e deduções"),
        (name = "Dashboard", description = "Resumo anual e gráficos"),
        (name = "Tax", description = "Perfil fiscal e cálculo do imposto")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}
