pub mod aggregator;
pub mod auth;
pub mod dashboard_service;
pub mod ledger_service;
pub mod login_limiter;
pub mod payslip_parser;
pub mod payslip_service;
pub mod tax_calculator;
pub mod tax_document_service;
pub mod tax_service;
