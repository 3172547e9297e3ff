use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use facturasnap_rust::{api, AppConfig, OcrEngine, ReceiptService, SuperAkiInvoicer};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// 固定返回文本的 OCR 引擎，记录调用次数
struct CannedOcr {
    text: String,
    calls: AtomicUsize,
}

impl CannedOcr {
    fn new(text: &str) -> Arc<Self> {
        Arc::new(Self { text: text.to_string(), calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for CannedOcr {
    async fn recognize(&self, _image: &[u8]) -> facturasnap_rust::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

fn app(ocr: Arc<CannedOcr>, webdriver_url: &str) -> axum::Router {
    let mut config = AppConfig::default();
    config.webdriver.url = webdriver_url.to_string();
    config.webdriver.wait_timeout_ms = 200;
    config.webdriver.poll_interval_ms = 50;

    let receipts = Arc::new(ReceiptService::new(ocr));
    let invoicer = Arc::new(SuperAkiInvoicer::new(&config.webdriver, &config.super_aki));
    api::routes(receipts, invoicer)
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_raw(
    app: axum::Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let response = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn assert_failure_envelope(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert!(body.get("folio_number").is_none());
}

fn receipt_image() -> String {
    STANDARD.encode(b"fake receipt bytes")
}

#[tokio::test]
async fn super_aki_folio_is_returned() {
    let ocr = CannedOcr::new("SUPER AKI\nFOLIO FACTURACION: 12345 extra\n");
    let (status, body) = post_json(
        app(ocr.clone(), "http://127.0.0.1:9"),
        "/api/obtener_folio",
        json!({"establecimiento": "/super-aki", "base64_image": receipt_image()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "folio_number": 12345}));
    assert_eq!(ocr.calls(), 1);
}

#[tokio::test]
async fn super_aki_without_label_reports_failure() {
    let ocr = CannedOcr::new("TOTAL 99.00\nGRACIAS");
    let (status, body) = post_json(
        app(ocr, "http://127.0.0.1:9"),
        "/api/obtener_folio",
        json!({"establecimiento": "/super-aki", "base64_image": receipt_image()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": false, "message": "No se pudo extraer el folio de facturación."})
    );
}

#[tokio::test]
async fn bodega_record_is_returned_as_folio_number() {
    let ocr = CannedOcr::new("TR#00931 TC 00045\nC.P. 66000");
    let (status, body) = post_json(
        app(ocr, "http://127.0.0.1:9"),
        "/api/obtener_folio",
        json!({"establecimiento": "/bodega-aurrera", "base64_image": receipt_image()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "folio_number": {"TR_number": 931, "TC_number": 45, "CP_number": 66000, "error": null}
        })
    );
}

#[tokio::test]
async fn unsupported_establishment_skips_ocr() {
    let ocr = CannedOcr::new("FOLIO FACTURACION: 1");
    let (status, body) = post_json(
        app(ocr.clone(), "http://127.0.0.1:9"),
        "/api/obtener_folio",
        json!({"establecimiento": "/oxxo", "base64_image": receipt_image()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": "Establecimiento no válido."}));
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn broken_base64_is_a_failure() {
    let ocr = CannedOcr::new("FOLIO FACTURACION: 1");
    let (status, body) = post_json(
        app(ocr.clone(), "http://127.0.0.1:9"),
        "/api/obtener_folio",
        json!({"establecimiento": "/super-aki", "base64_image": "%%%"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().starts_with("Base64 decode error"));
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn invoice_failure_carries_webdriver_message() {
    let server = MockServer::start_async().await;
    let new_session = server
        .mock_async(|when, then| {
            when.method(POST).path("/session");
            then.status(500).json_body(json!({
                "value": {"error": "session not created", "message": "Chrome failed to start"}
            }));
        })
        .await;

    let (status, body) = post_json(
        app(CannedOcr::new(""), &server.base_url()),
        "/api/facturar_super-aki",
        json!({
            "RFC_Field": "XAXX010101000",
            "folioField": "12345",
            "uso_CFID": "G03",
            "opcion_regimen_elegida": "616"
        }),
    )
    .await;

    new_session.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "WebDriver error (session not created): Chrome failed to start"
        })
    );
}

#[tokio::test]
async fn health_and_welcome() {
    let ocr = CannedOcr::new("");
    let response = app(ocr.clone(), "http://127.0.0.1:9")
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(ocr, "http://127.0.0.1:9")
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Welcome to FacturaSnap application.");
}

#[tokio::test]
async fn malformed_json_gets_failure_envelope() {
    let ocr = CannedOcr::new("FOLIO FACTURACION: 1");
    let (status, body) = post_raw(
        app(ocr.clone(), "http://127.0.0.1:9"),
        "/api/obtener_folio",
        Some("application/json"),
        "{not json",
    )
    .await;

    assert_failure_envelope(status, &body);
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn missing_content_type_gets_failure_envelope() {
    let ocr = CannedOcr::new("FOLIO FACTURACION: 1");
    let payload = json!({"establecimiento": "/super-aki", "base64_image": receipt_image()});
    let (status, body) = post_raw(
        app(ocr.clone(), "http://127.0.0.1:9"),
        "/api/obtener_folio",
        None,
        &payload.to_string(),
    )
    .await;

    assert_failure_envelope(status, &body);
    assert!(body["message"].as_str().unwrap().contains("Content-Type"));
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn wrongly_typed_establishment_gets_failure_envelope() {
    let ocr = CannedOcr::new("FOLIO FACTURACION: 1");
    let payload = json!({"establecimiento": 5, "base64_image": receipt_image()});
    let (status, body) = post_raw(
        app(ocr.clone(), "http://127.0.0.1:9"),
        "/api/obtener_folio",
        Some("application/json"),
        &payload.to_string(),
    )
    .await;

    assert_failure_envelope(status, &body);
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn null_invoice_body_gets_failure_envelope() {
    let (status, body) = post_raw(
        app(CannedOcr::new(""), "http://127.0.0.1:9"),
        "/api/facturar_super-aki",
        Some("application/json"),
        "null",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(body.get("pdf_factura").is_none());
    assert!(!body["message"].as_str().unwrap().is_empty());
}
