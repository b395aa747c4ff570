pub mod user_repo;
pub use user_repo::UserRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
pub mod tax_profile_repo;
pub use tax_profile_repo::TaxProfileRepository;
pub mod payslip_repo;
pub use payslip_repo::PayslipRepository;
pub mod login_attempt_repo;
pub use login_attempt_repo::LoginAttemptRepository;
pub mod tax_document_repo;
pub use tax_document_repo::TaxDocumentRepository;
