pub mod auth;
pub mod dashboard;
pub mod health;
pub mod ledger;
pub mod payslips;
pub mod tax;
