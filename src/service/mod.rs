pub mod invoicing;
pub mod receipt;

pub use invoicing::SuperAkiInvoicer;
pub use receipt::ReceiptService;
