pub mod edit_transaction_modal;
pub mod filter_bar;
pub mod refund_modal;
pub mod transaction_list;
pub mod transaction_table;

pub use transaction_list::TransactionList;
