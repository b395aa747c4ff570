pub mod auth;
pub mod dashboard;
pub mod ledger;
pub mod payslip;
pub mod tax;
pub mod tax_document;
