pub mod fetch_guard;
pub mod use_bank_accounts;
pub mod use_category_tags;
pub mod use_category_tree;
pub mod use_session;
pub mod use_transactions;

pub use fetch_guard::FetchGuard;
pub use use_bank_accounts::use_bank_accounts;
pub use use_category_tags::use_category_tags;
pub use use_category_tree::use_category_tree;
pub use use_session::use_session;
pub use use_transactions::use_transactions;
