pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod service;
pub mod webdriver;

pub use crate::config::AppConfig;
pub use error::{AppError, Result};
pub use ocr::{OcrEngine, TesseractEngine};
pub use service::{ReceiptService, SuperAkiInvoicer};
