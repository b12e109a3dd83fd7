pub mod audit_log_page;
pub mod bank_account_page;
pub mod user_page;

pub use audit_log_page::AuditLogView;
pub use bank_account_page::BankAccountPage;
pub use user_page::UserPage;
