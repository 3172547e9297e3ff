pub mod invoice;
pub mod receipt;

pub use invoice::{InvoiceRequest, InvoiceResponse};
pub use receipt::{BodegaAurreraFields, Establishment, ExtractionResult, FolioRequest, FolioResponse};
