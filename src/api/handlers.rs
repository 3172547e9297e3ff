use crate::error::AppError;
use crate::models::{FolioRequest, FolioResponse, InvoiceRequest, InvoiceResponse};
use crate::service::{ReceiptService, SuperAkiInvoicer};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

const FOLIO_NOT_FOUND: &str = "No se pudo extraer el folio de facturación.";

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn welcome() -> Response {
    Json(json!({ "message": "Welcome to FacturaSnap application." })).into_response()
}

/// 小票 OCR 提取 folio
///
/// 所有失败 (包括请求体解析失败) 都以 200 + `success: false` 返回
pub async fn obtener_folio(
    State(service): State<Arc<ReceiptService>>,
    body: Result<Json<FolioRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!("obtener_folio rejected body: {}", rejection.body_text());
            return (StatusCode::OK, Json(FolioResponse::failed(rejection.body_text())))
                .into_response();
        }
    };

    let response = match service.obtain_folio(&req.establecimiento, &req.base64_image).await {
        Ok(Some(result)) => FolioResponse::found(result),
        Ok(None) => FolioResponse::failed(FOLIO_NOT_FOUND),
        Err(e @ AppError::InvalidEstablishment { .. }) => {
            tracing::warn!("Rejected establishment {:?}", req.establecimiento);
            FolioResponse::failed(e.to_string())
        }
        Err(e) => {
            tracing::error!("obtener_folio failed: {}", e);
            FolioResponse::failed(e.to_string())
        }
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Super Aki 自动开票
pub async fn facturar_super_aki(
    State(invoicer): State<Arc<SuperAkiInvoicer>>,
    body: Result<Json<InvoiceRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!("facturar_super-aki rejected body: {}", rejection.body_text());
            return (StatusCode::OK, Json(InvoiceResponse::failed(rejection.body_text())))
                .into_response();
        }
    };

    let response = match invoicer.generate_invoice(&req).await {
        Ok(url) => InvoiceResponse::generated(url),
        Err(e) => InvoiceResponse::failed(e.to_string()),
    };
    (StatusCode::OK, Json(response)).into_response()
}
