pub mod handlers;

pub use handlers::*;

use crate::service::{ReceiptService, SuperAkiInvoicer};
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

/// 构建全部路由
pub fn routes(receipts: Arc<ReceiptService>, invoicer: Arc<SuperAkiInvoicer>) -> Router {
    // 小票 OCR
    let receipt_routes = Router::new()
        .route("/api/obtener_folio", post(obtener_folio))
        .with_state(receipts);

    // 自动开票
    let invoice_routes = Router::new()
        .route("/api/facturar_super-aki", post(facturar_super_aki))
        .with_state(invoicer);

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .merge(receipt_routes)
        .merge(invoice_routes)
}
