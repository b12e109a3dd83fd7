pub mod entry_form;
pub mod transfer_form;

pub use entry_form::EntryForm;
pub use transfer_form::TransferForm;
