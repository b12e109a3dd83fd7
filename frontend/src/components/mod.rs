pub mod categories;
pub mod category_leaf_select;
pub mod config;
pub mod fields;
pub mod forms;
pub mod header;
pub mod ledger_page;
pub mod login_page;
pub mod notice_bar;
pub mod pagination_bar;
pub mod stats;
pub mod tag_picker;
pub mod transactions;

pub use categories::CategoryPage;
pub use config::{AuditLogView, BankAccountPage, UserPage};
pub use header::Header;
pub use ledger_page::LedgerPage;
pub use login_page::LoginPage;
pub use notice_bar::NoticeBar;
pub use stats::StatsPage;
